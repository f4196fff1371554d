// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format for fuzzdex indexes.
//!
//! One self-describing, versioned blob holding everything an index needs:
//! config, documents, base words, the classic maps, and whichever derived
//! structures the layout carries. Deserializing gives back a fully working
//! index without re-running analysis.
//!
//! Encoding is canonical. Every map is a `BTreeMap`, every set is sorted and
//! floats are written as raw bits, so decoding and encoding again reproduces
//! the input byte for byte.
//!
//! # Security Considerations
//!
//! The format is safe to parse from untrusted sources:
//! - Size fields are validated against MAX_* constants
//! - Counts are bounded by the bytes left in their section
//! - Posting lists must be strictly ascending with ids in range
//! - Trie children must point forward inside the arena
//! - CRC32 footer detects corruption/truncation
//!
//! Any violation is [`IndexError::CorruptData`]; no partial index is returned.
//!
//! # Format Overview (v1)
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │ HEADER (44 bytes)                                          │
//! │   magic: [u8; 4] = "FZDX"                                  │
//! │   version: u8 = 1                                          │
//! │   flags: u8 (inverted, stats, bloom, record schema)        │
//! │   doc_count: u32, base_count: u32                          │
//! │   config_len, documents_len, bases_len, variants_len,      │
//! │   inverted_len, stats_len, bloom_len: u32                  │
//! │   reserved: [u8; 2]                                        │
//! ├────────────────────────────────────────────────────────────┤
//! │ 1. CONFIG (serde_json)                                     │
//! ├────────────────────────────────────────────────────────────┤
//! │ 2. DOCUMENTS (id order, ids implicit)                      │
//! ├────────────────────────────────────────────────────────────┤
//! │ 3. BASES (key order, owners as doc id + field)             │
//! ├────────────────────────────────────────────────────────────┤
//! │ 4. VARIANTS (4 maps, values as base ordinals)              │
//! ├────────────────────────────────────────────────────────────┤
//! │ 5. INVERTED (4 posting maps delta+varint, trie arena)      │
//! ├────────────────────────────────────────────────────────────┤
//! │ 6. STATS (totals + document frequencies)                   │
//! ├────────────────────────────────────────────────────────────┤
//! │ 7. BLOOM (geometry + raw words)                            │
//! ├────────────────────────────────────────────────────────────┤
//! │ FOOTER (8 bytes): crc32 + magic "XDZF"                     │
//! └────────────────────────────────────────────────────────────┘
//! ```

mod encoding;
mod header;

pub use encoding::{decode_varint, encode_postings, encode_varint, SectionReader};
pub use header::{
    FormatFlags, FuzzdexFooter, FuzzdexHeader, SectionOffsets, FOOTER_MAGIC, MAGIC,
    MAX_BASE_COUNT, MAX_DOC_COUNT, MAX_FILE_SIZE, MAX_VARINT_BYTES, VERSION,
};

use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::time::Instant;

use log::debug;

use encoding::{put_f64, put_opt_str, put_str, put_strs};

use crate::config::Config;
use crate::error::{IndexError, Result};
use crate::index::{
    BaseEntry, BloomFilter, ClassicIndex, Index, InvertedIndex, Layout, Owner, PostingMap,
    PrefixTrie, TrieNode, VariantMap,
};
use crate::lang::PluginSet;
use crate::scoring::CorpusStats;
use crate::types::{DocId, Document, Record};

/// Bloom filters with more hash functions than this are rejected as corrupt.
const MAX_BLOOM_HASHES: u32 = 64;

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn section_len(bytes: &[u8], name: &str) -> io::Result<u32> {
    u32::try_from(bytes.len())
        .map_err(|_| invalid(format!("{} section exceeds 4 GiB", name)))
}

// ============================================================================
// ENCODING
// ============================================================================

fn encode_documents(documents: &[Document], buf: &mut Vec<u8>) {
    for doc in documents {
        put_str(&doc.display, buf);
        put_str(&doc.normalized, buf);
        put_opt_str(doc.language.as_deref(), buf);
        put_opt_str(doc.phonetic.as_deref(), buf);
        put_strs(&doc.compound_parts, buf);
        encode_varint(u64::from(doc.length), buf);
        match &doc.fields {
            Some(record) => {
                buf.push(1);
                encode_varint(record.len() as u64, buf);
                for (field, value) in record {
                    put_str(field, buf);
                    put_str(value, buf);
                }
            }
            None => buf.push(0),
        }
        put_strs(&doc.bases, buf);
    }
}

fn encode_bases(bases: &BTreeMap<String, BaseEntry>, buf: &mut Vec<u8>) {
    for (key, entry) in bases {
        put_str(key, buf);
        put_str(&entry.display, buf);
        put_str(&entry.normalized, buf);
        put_strs(&entry.phonetic, buf);
        put_strs(&entry.compound_parts, buf);
        put_strs(&entry.synonyms, buf);
        encode_varint(entry.owners.len() as u64, buf);
        for owner in &entry.owners {
            encode_varint(u64::from(owner.doc.get()), buf);
            // 0 = no field, n = field n - 1
            encode_varint(owner.field.map_or(0, |f| u64::from(f) + 1), buf);
        }
    }
}

fn encode_variant_map(map: &VariantMap, ordinals: &BTreeMap<&str, u64>, buf: &mut Vec<u8>) {
    encode_varint(map.len() as u64, buf);
    for (key, bases) in map {
        put_str(key, buf);
        encode_varint(bases.len() as u64, buf);
        for base in bases {
            // Every linked base exists; `ClassicIndex` never leaves dangling keys
            encode_varint(ordinals.get(base.as_str()).copied().unwrap_or(u64::MAX), buf);
        }
    }
}

fn encode_posting_map(map: &PostingMap, buf: &mut Vec<u8>) {
    encode_varint(map.len() as u64, buf);
    for (key, list) in map {
        put_str(key, buf);
        encode_postings(list, buf);
    }
}

fn encode_inverted(inverted: &InvertedIndex, buf: &mut Vec<u8>) {
    for (_, map) in inverted.maps() {
        encode_posting_map(map, buf);
    }
    let nodes = inverted.trie.nodes();
    encode_varint(nodes.len() as u64, buf);
    for node in nodes {
        buf.push(u8::from(node.terminal));
        encode_varint(node.children.len() as u64, buf);
        for (c, child) in &node.children {
            encode_varint(u64::from(u32::from(*c)), buf);
            encode_varint(u64::from(*child), buf);
        }
        encode_postings(&node.postings, buf);
    }
}

fn encode_stats(stats: &CorpusStats, buf: &mut Vec<u8>) {
    encode_varint(stats.total_docs, buf);
    put_f64(stats.avg_doc_len, buf);
    encode_varint(stats.doc_freq.len() as u64, buf);
    for (term, df) in &stats.doc_freq {
        put_str(term, buf);
        encode_varint(*df, buf);
    }
}

fn encode_bloom(bloom: &BloomFilter, buf: &mut Vec<u8>) {
    encode_varint(bloom.num_bits(), buf);
    encode_varint(u64::from(bloom.num_hashes()), buf);
    encode_varint(bloom.items(), buf);
    for word in bloom.bits() {
        buf.extend_from_slice(&word.to_le_bytes());
    }
}

fn to_bytes(index: &Index) -> io::Result<Vec<u8>> {
    let config_bytes = serde_json::to_vec(&index.config)
        .map_err(|e| invalid(format!("config encoding failed: {}", e)))?;

    let mut documents = Vec::new();
    encode_documents(&index.documents, &mut documents);

    let mut bases = Vec::new();
    encode_bases(&index.classic.bases, &mut bases);

    let ordinals: BTreeMap<&str, u64> = index
        .classic
        .bases
        .keys()
        .enumerate()
        .map(|(i, key)| (key.as_str(), i as u64))
        .collect();
    let mut variants = Vec::new();
    for map in [
        &index.classic.variants,
        &index.classic.phonetics,
        &index.classic.ngrams,
        &index.classic.synonyms,
    ] {
        encode_variant_map(map, &ordinals, &mut variants);
    }

    let mut inverted = Vec::new();
    if let Some(inv) = index.inverted() {
        encode_inverted(inv, &mut inverted);
    }
    let mut stats = Vec::new();
    if let Some(s) = &index.stats {
        encode_stats(s, &mut stats);
    }
    let mut bloom = Vec::new();
    if let Some(b) = &index.bloom {
        encode_bloom(b, &mut bloom);
    }

    let flags = FormatFlags::new()
        .with(FormatFlags::HAS_INVERTED, index.inverted().is_some())
        .with(FormatFlags::HAS_STATS, index.stats.is_some())
        .with(FormatFlags::HAS_BLOOM, index.bloom.is_some())
        .with(FormatFlags::RECORD_SCHEMA, !index.config.fields.is_empty());

    let header = FuzzdexHeader {
        version: VERSION,
        flags,
        doc_count: u32::try_from(index.documents.len())
            .map_err(|_| invalid("too many documents"))?,
        base_count: u32::try_from(index.classic.bases.len())
            .map_err(|_| invalid("too many base words"))?,
        config_len: section_len(&config_bytes, "Config")?,
        documents_len: section_len(&documents, "Documents")?,
        bases_len: section_len(&bases, "Bases")?,
        variants_len: section_len(&variants, "Variants")?,
        inverted_len: section_len(&inverted, "Inverted")?,
        stats_len: section_len(&stats, "Stats")?,
        bloom_len: section_len(&bloom, "Bloom")?,
    };

    let total_size = header.section_offsets().total_size();
    let mut buf = Vec::with_capacity(total_size);
    header.write(&mut buf)?;
    for section in [&config_bytes, &documents, &bases, &variants, &inverted, &stats, &bloom] {
        buf.extend_from_slice(section);
    }

    let crc32 = FuzzdexFooter::compute_crc32(&buf);
    FuzzdexFooter { crc32 }.write(&mut buf)?;
    Ok(buf)
}

// ============================================================================
// DECODING
// ============================================================================

fn decode_documents(bytes: &[u8], doc_count: u32) -> io::Result<Vec<Document>> {
    let mut r = SectionReader::new(bytes, "Documents");
    let mut documents = Vec::with_capacity((doc_count as usize).min(bytes.len()));
    for id in 0..doc_count {
        let display = r.string()?;
        let normalized = r.string()?;
        let language = r.opt_string()?;
        let phonetic = r.opt_string()?;
        let compound_parts = r.strings()?;
        let length = r.u32()?;
        let fields = if r.flag()? {
            let count = r.count(2)?;
            let mut record = Record::new();
            for _ in 0..count {
                let field = r.string()?;
                let value = r.string()?;
                record.insert(field, value);
            }
            if record.len() != count {
                return Err(invalid("Documents: duplicate record field"));
            }
            Some(record)
        } else {
            None
        };
        let bases = r.strings()?;
        documents.push(Document {
            id: DocId(id),
            display,
            normalized,
            language,
            phonetic,
            compound_parts,
            length,
            fields,
            bases,
        });
    }
    r.finish()?;
    Ok(documents)
}

fn decode_bases(
    bytes: &[u8],
    base_count: u32,
    doc_count: u32,
    field_count: usize,
) -> io::Result<BTreeMap<String, BaseEntry>> {
    let mut r = SectionReader::new(bytes, "Bases");
    let mut bases = BTreeMap::new();
    let mut last_key: Option<String> = None;
    for _ in 0..base_count {
        let key = r.string()?;
        if last_key.as_ref().is_some_and(|last| *last >= key) {
            return Err(invalid("Bases: keys out of order"));
        }
        let display = r.string()?;
        let normalized = r.string()?;
        let phonetic = r.strings()?;
        let compound_parts = r.strings()?;
        let synonyms = r.strings()?;
        let owner_count = r.count(2)?;
        if owner_count == 0 {
            return Err(invalid(format!("Bases: '{}' has no owner", key)));
        }
        let mut owners = Vec::with_capacity(owner_count);
        for _ in 0..owner_count {
            let doc = r.u32()?;
            let field = r.u32()?;
            if doc >= doc_count {
                return Err(invalid(format!("Bases: doc id {} out of range", doc)));
            }
            let field = match field {
                0 => None,
                n if (n as usize) <= field_count => Some((n - 1) as u16),
                n => return Err(invalid(format!("Bases: field {} out of range", n - 1))),
            };
            owners.push(Owner {
                doc: DocId(doc),
                field,
            });
        }
        if !owners.windows(2).all(|w| w[0] < w[1]) {
            return Err(invalid(format!("Bases: owners of '{}' unsorted", key)));
        }
        last_key = Some(key.clone());
        bases.insert(
            key,
            BaseEntry {
                display,
                normalized,
                phonetic,
                compound_parts,
                synonyms,
                owners,
            },
        );
    }
    r.finish()?;
    Ok(bases)
}

fn decode_variant_map(r: &mut SectionReader<'_>, keys: &[&str]) -> io::Result<VariantMap> {
    let count = r.count(2)?;
    let mut map = VariantMap::new();
    for _ in 0..count {
        let key = r.string()?;
        let linked = r.count(1)?;
        if linked == 0 {
            return Err(invalid(format!("Variants: '{}' links nothing", key)));
        }
        let mut set = BTreeSet::new();
        let mut prev: Option<u64> = None;
        for _ in 0..linked {
            let ordinal = r.varint()?;
            if prev.is_some_and(|p| p >= ordinal) {
                return Err(invalid("Variants: base ordinals out of order"));
            }
            let base = usize::try_from(ordinal)
                .ok()
                .and_then(|i| keys.get(i))
                .ok_or_else(|| {
                    invalid(format!("Variants: base ordinal {} out of range", ordinal))
                })?;
            set.insert((*base).to_string());
            prev = Some(ordinal);
        }
        if map.insert(key, set).is_some() {
            return Err(invalid("Variants: duplicate key"));
        }
    }
    Ok(map)
}

fn decode_posting_map(r: &mut SectionReader<'_>, doc_count: u32) -> io::Result<PostingMap> {
    let count = r.count(2)?;
    let mut map = PostingMap::new();
    for _ in 0..count {
        let key = r.string()?;
        let list = r.postings(doc_count)?;
        if list.is_empty() {
            return Err(invalid(format!("Inverted: '{}' has an empty posting list", key)));
        }
        if map.insert(key, list).is_some() {
            return Err(invalid("Inverted: duplicate key"));
        }
    }
    Ok(map)
}

fn decode_inverted(bytes: &[u8], doc_count: u32) -> io::Result<InvertedIndex> {
    let mut r = SectionReader::new(bytes, "Inverted");
    let terms = decode_posting_map(&mut r, doc_count)?;
    let phonetics = decode_posting_map(&mut r, doc_count)?;
    let ngrams = decode_posting_map(&mut r, doc_count)?;
    let synonyms = decode_posting_map(&mut r, doc_count)?;

    let node_count = r.count(3)?;
    let mut nodes = Vec::with_capacity(node_count);
    for _ in 0..node_count {
        let terminal = r.flag()?;
        let child_count = r.count(2)?;
        let mut children = BTreeMap::new();
        for _ in 0..child_count {
            let c = char::from_u32(r.u32()?).ok_or_else(|| invalid("Inverted: bad trie edge"))?;
            let child = r.u32()?;
            if children.insert(c, child).is_some() {
                return Err(invalid("Inverted: duplicate trie edge"));
            }
        }
        let postings = r.postings(doc_count)?;
        nodes.push(TrieNode {
            children,
            postings,
            terminal,
        });
    }
    let trie = PrefixTrie::from_nodes(nodes).ok_or_else(|| invalid("Inverted: malformed trie"))?;
    r.finish()?;

    Ok(InvertedIndex {
        terms,
        phonetics,
        ngrams,
        synonyms,
        trie,
    })
}

fn decode_stats(bytes: &[u8]) -> io::Result<CorpusStats> {
    let mut r = SectionReader::new(bytes, "Stats");
    let total_docs = r.varint()?;
    let avg_doc_len = r.f64()?;
    if !avg_doc_len.is_finite() || avg_doc_len < 0.0 {
        return Err(invalid("Stats: bad average document length"));
    }
    let count = r.count(2)?;
    let mut doc_freq = BTreeMap::new();
    for _ in 0..count {
        let term = r.string()?;
        let df = r.varint()?;
        if doc_freq.insert(term, df).is_some() {
            return Err(invalid("Stats: duplicate term"));
        }
    }
    r.finish()?;
    Ok(CorpusStats {
        total_docs,
        avg_doc_len,
        doc_freq,
    })
}

fn decode_bloom(bytes: &[u8]) -> io::Result<BloomFilter> {
    let mut r = SectionReader::new(bytes, "Bloom");
    let num_bits = r.varint()?;
    let num_hashes = r.u32()?;
    let items = r.varint()?;
    if num_hashes > MAX_BLOOM_HASHES {
        return Err(invalid(format!("Bloom: {} hash functions", num_hashes)));
    }
    let words = r.remaining() / 8;
    let mut bits = Vec::with_capacity(words);
    for _ in 0..words {
        bits.push(r.u64_le()?);
    }
    r.finish()?;
    BloomFilter::from_parts(bits, num_bits, num_hashes, items)
        .ok_or_else(|| invalid("Bloom: word count does not match bit count"))
}

/// Every document's bases exist and list that document as an owner.
fn check_links(documents: &[Document], classic: &ClassicIndex) -> io::Result<()> {
    for doc in documents {
        for key in &doc.bases {
            let owned = classic
                .bases
                .get(key)
                .is_some_and(|entry| entry.owners.iter().any(|o| o.doc == doc.id));
            if !owned {
                return Err(invalid(format!("Documents: {} links unknown base '{}'", doc.id, key)));
            }
        }
    }
    Ok(())
}

/// Extract one section, failing if the file is shorter than the header claims.
fn section<'a>(bytes: &'a [u8], range: (usize, usize), name: &str) -> io::Result<&'a [u8]> {
    bytes.get(range.0..range.1).ok_or_else(|| {
        io::Error::new(io::ErrorKind::UnexpectedEof, format!("{} section truncated", name))
    })
}

/// An optional section: present exactly when its flag is set.
fn optional<'a>(
    bytes: &'a [u8],
    flags: FormatFlags,
    flag: u8,
    range: (usize, usize),
    name: &str,
) -> io::Result<Option<&'a [u8]>> {
    let slice = section(bytes, range, name)?;
    match (flags.has(flag), slice.is_empty()) {
        (true, _) => Ok(Some(slice)),
        (false, true) => Ok(None),
        (false, false) => Err(invalid(format!("{} section present but not flagged", name))),
    }
}

fn from_bytes(bytes: &[u8], plugins: &PluginSet) -> Result<Index> {
    if bytes.len() > MAX_FILE_SIZE {
        return Err(invalid(format!(
            "File too large: {} bytes (max {})",
            bytes.len(),
            MAX_FILE_SIZE
        ))
        .into());
    }
    let min_size = FuzzdexHeader::SIZE + FuzzdexFooter::SIZE;
    if bytes.len() < min_size {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("File too small: {} bytes (minimum {})", bytes.len(), min_size),
        )
        .into());
    }

    let mut cursor = io::Cursor::new(bytes);
    let header = FuzzdexHeader::read(&mut cursor)?;
    if header.version != VERSION {
        return Err(invalid(format!(
            "Unsupported version: {} (expected {})",
            header.version, VERSION
        ))
        .into());
    }

    let footer = FuzzdexFooter::read(bytes)?;
    let content = &bytes[..bytes.len() - FuzzdexFooter::SIZE];
    let computed = FuzzdexFooter::compute_crc32(content);
    if footer.crc32 != computed {
        return Err(invalid(format!(
            "CRC32 mismatch: expected {:#010x}, got {:#010x} (file corrupted)",
            footer.crc32, computed
        ))
        .into());
    }

    if !header.flags.is_known() {
        return Err(invalid(format!("Unknown format flags {:#04x}", header.flags.0)).into());
    }
    if header.doc_count > MAX_DOC_COUNT || header.base_count > MAX_BASE_COUNT {
        return Err(invalid(format!(
            "Too many entries: {} documents, {} bases",
            header.doc_count, header.base_count
        ))
        .into());
    }

    let offsets = header.section_offsets();
    if offsets.content_size() != content.len() {
        return Err(invalid(format!(
            "Section lengths mismatch: header claims {} bytes, got {} bytes",
            offsets.content_size(),
            content.len()
        ))
        .into());
    }

    let config_bytes = section(bytes, offsets.config, "Config")?;
    let config: Config = serde_json::from_slice(config_bytes)
        .map_err(|e| IndexError::CorruptData(format!("config: {}", e)))?;
    config
        .validate()
        .map_err(|e| IndexError::CorruptData(format!("config: {}", e)))?;
    if header.flags.has(FormatFlags::RECORD_SCHEMA) == config.fields.is_empty() {
        return Err(IndexError::CorruptData("schema flag disagrees with config".into()));
    }
    let languages = plugins
        .resolve(&config.languages)
        .map_err(|e| IndexError::CorruptData(format!("languages: {}", e)))?;

    let doc_count = header.doc_count;
    let documents = decode_documents(section(bytes, offsets.documents, "Documents")?, doc_count)?;
    let bases = decode_bases(
        section(bytes, offsets.bases, "Bases")?,
        header.base_count,
        doc_count,
        config.fields.len(),
    )?;

    let keys: Vec<&str> = bases.keys().map(String::as_str).collect();
    let mut r = SectionReader::new(section(bytes, offsets.variants, "Variants")?, "Variants");
    let variants = decode_variant_map(&mut r, &keys)?;
    let phonetics = decode_variant_map(&mut r, &keys)?;
    let ngrams = decode_variant_map(&mut r, &keys)?;
    let synonyms = decode_variant_map(&mut r, &keys)?;
    r.finish()?;

    let classic = ClassicIndex::from_maps(bases, variants, phonetics, ngrams, synonyms);
    check_links(&documents, &classic)?;

    let flags = header.flags;
    let inverted = optional(bytes, flags, FormatFlags::HAS_INVERTED, offsets.inverted, "Inverted")?;
    let layout = match inverted {
        Some(slice) => Layout::WithInverted(decode_inverted(slice, doc_count)?),
        None => Layout::ClassicOnly,
    };
    let stats = optional(bytes, flags, FormatFlags::HAS_STATS, offsets.stats, "Stats")?
        .map(decode_stats)
        .transpose()?;
    let bloom = optional(bytes, flags, FormatFlags::HAS_BLOOM, offsets.bloom, "Bloom")?
        .map(decode_bloom)
        .transpose()?;

    let mut index = Index::empty(config, languages);
    index.documents = documents;
    index.classic = classic;
    index.layout = layout;
    index.stats = stats;
    index.bloom = bloom;
    Ok(index)
}

// ============================================================================
// PUBLIC API
// ============================================================================

impl Index {
    /// Encode the index. See the module docs for the layout.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let start = Instant::now();
        let bytes = to_bytes(self)?;
        debug!(
            "serialized {} documents into {} bytes ({:.2?})",
            self.documents.len(),
            bytes.len(),
            start.elapsed()
        );
        Ok(bytes)
    }

    /// Decode an index using the built-in language plugins.
    pub fn deserialize(bytes: &[u8]) -> Result<Index> {
        Self::deserialize_with_plugins(bytes, &PluginSet::builtin())
    }

    /// Decode an index, resolving its languages against `plugins`.
    ///
    /// Fails with [`IndexError::CorruptData`] on any malformed input,
    /// including a language `plugins` does not provide.
    pub fn deserialize_with_plugins(bytes: &[u8], plugins: &PluginSet) -> Result<Index> {
        let start = Instant::now();
        let index = from_bytes(bytes, plugins)?;
        debug!(
            "deserialized {} documents, layout {} ({:.2?})",
            index.documents.len(),
            index.layout.name(),
            start.elapsed()
        );
        Ok(index)
    }
}

/// Encode an index. See [`Index::serialize`].
pub fn serialize(index: &Index) -> Result<Vec<u8>> {
    index.serialize()
}

/// Decode an index with the built-in plugins. See [`Index::deserialize`].
pub fn deserialize(bytes: &[u8]) -> Result<Index> {
    Index::deserialize(bytes)
}
