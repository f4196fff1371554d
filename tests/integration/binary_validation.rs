//! Negative tests for binary format validation.
//!
//! The decoder must reject malformed, truncated or corrupted input with
//! `CorruptData`, never panic and never hand back a partial index.

use crate::common::sample_index;
use fuzzdex::binary::{FuzzdexFooter, FuzzdexHeader, MAGIC};
use fuzzdex::{
    build_index, deserialize, serialize, Config, Index, IndexError, LanguagePlugin,
    PerformanceTier, PluginSet, SearchOptions,
};

fn corrupt(result: fuzzdex::Result<Index>) -> String {
    match result {
        Err(IndexError::CorruptData(message)) => message,
        Err(other) => panic!("expected CorruptData, got {:?}", other),
        Ok(_) => panic!("corrupt input was accepted"),
    }
}

/// Rewrite the footer so the CRC matches the (tampered) content again.
fn reseal(bytes: &mut Vec<u8>) {
    let content_len = bytes.len() - FuzzdexFooter::SIZE;
    bytes.truncate(content_len);
    let crc32 = FuzzdexFooter::compute_crc32(bytes);
    FuzzdexFooter { crc32 }.write(bytes).unwrap();
}

#[test]
fn garbage_is_rejected() {
    corrupt(deserialize(&[]));
    corrupt(deserialize(b"not an index at all"));
    corrupt(deserialize(&[0u8; 256]));
}

#[test]
fn bad_magic_is_rejected() {
    let mut bytes = serialize(&sample_index()).unwrap();
    assert_eq!(&bytes[..4], &MAGIC);
    bytes[0] = b'G';
    corrupt(deserialize(&bytes));
}

#[test]
fn trailing_bytes_are_rejected() {
    let mut bytes = serialize(&sample_index()).unwrap();
    bytes.extend_from_slice(b"tail");
    corrupt(deserialize(&bytes));
}

#[test]
fn resealed_header_lies_are_caught() {
    let bytes = serialize(&sample_index()).unwrap();

    // Claim one more document than the section holds
    let mut more_docs = bytes.clone();
    more_docs[6] = more_docs[6].wrapping_add(1);
    reseal(&mut more_docs);
    corrupt(deserialize(&more_docs));

    // Unknown flag bit
    let mut flags = bytes.clone();
    flags[5] |= 0b1000_0000;
    reseal(&mut flags);
    assert!(corrupt(deserialize(&flags)).contains("flags"));

    // Inverted flag set on a classic index with no inverted section
    let mut inverted = bytes;
    inverted[5] |= 0b0000_0001;
    reseal(&mut inverted);
    corrupt(deserialize(&inverted));
}

#[test]
fn resealed_section_damage_is_caught() {
    let bytes = serialize(&sample_index()).unwrap();
    let header = FuzzdexHeader::read(&mut std::io::Cursor::new(&bytes)).unwrap();
    let offsets = header.section_offsets();

    // Flip a byte in the middle of every non-empty section
    for (start, end) in [
        offsets.config,
        offsets.documents,
        offsets.bases,
        offsets.variants,
    ] {
        let mut damaged = bytes.clone();
        let mid = start + (end - start) / 2;
        damaged[mid] ^= 0x80;
        reseal(&mut damaged);
        // Some flips still decode to a valid index; none may panic
        if let Err(err) = deserialize(&damaged) {
            assert!(matches!(err, IndexError::CorruptData(_)));
        }
    }
}

#[derive(Debug)]
struct Pig;

impl LanguagePlugin for Pig {
    fn language(&self) -> &str {
        "pig"
    }

    fn normalize(&self, text: &str) -> String {
        fuzzdex::normalize(text)
    }

    fn phonetic_code(&self, _term: &str) -> Option<String> {
        None
    }

    fn synonyms(&self, term: &str) -> Vec<String> {
        match term {
            "oink" => vec!["squeal".to_string()],
            "squeal" => vec!["oink".to_string()],
            _ => Vec::new(),
        }
    }

    fn variants(&self, _term: &str, _tier: PerformanceTier) -> Vec<String> {
        Vec::new()
    }
}

#[test]
fn custom_languages_must_be_supplied_on_load() {
    let plugins = PluginSet::builtin().with(Pig);
    let config = Config::default().with_languages(["pig"]);
    let index = build_index(["squeal", "trough"], config, &plugins).unwrap();
    let bytes = serialize(&index).unwrap();

    let message = corrupt(deserialize(&bytes));
    assert!(message.contains("pig"), "{}", message);

    let restored = Index::deserialize_with_plugins(&bytes, &plugins).unwrap();
    let results = restored.search("oink", 5, &SearchOptions::default());
    assert_eq!(results[0].display, "squeal");
}
