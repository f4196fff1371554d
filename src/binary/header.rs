// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format header and footer structures.
//!
//! The header is 44 bytes of fixed-size fields, parsed in one read before
//! anything else. It records the length of every section, so the reader knows
//! where each one lives before decoding any of them.
//!
//! The footer is 8 bytes: a CRC32 checksum over everything before it, plus a
//! magic number ("XDZF", the header magic reversed). If the footer is wrong,
//! the data was corrupted or truncated and nothing in it is trusted.
//!
//! `SectionOffsets` is the single source of truth for the file layout. Every
//! piece of code that reads or writes sections goes through it.

use std::io::{self, Read, Write};

use crc32fast::Hasher as Crc32Hasher;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Magic bytes: "FZDX" in ASCII (header)
pub const MAGIC: [u8; 4] = *b"FZDX";

/// Footer magic: "XDZF" (reversed, marks valid file end)
pub const FOOTER_MAGIC: [u8; 4] = *b"XDZF";

/// Current format version
pub const VERSION: u8 = 1;

// ============================================================================
// SECURITY LIMITS (prevent resource exhaustion from malicious input)
// ============================================================================

/// Maximum file size: 1 GiB
pub const MAX_FILE_SIZE: usize = 1 << 30;

/// Maximum number of documents
pub const MAX_DOC_COUNT: u32 = 50_000_000;

/// Maximum number of base words
pub const MAX_BASE_COUNT: u32 = 50_000_000;

/// Maximum varint bytes (u64 needs at most 10 bytes)
pub const MAX_VARINT_BYTES: usize = 10;

// ============================================================================
// FLAGS
// ============================================================================

/// Which optional sections are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatFlags(pub(crate) u8);

impl FormatFlags {
    pub const HAS_INVERTED: u8 = 0b0000_0001;
    pub const HAS_STATS: u8 = 0b0000_0010;
    pub const HAS_BLOOM: u8 = 0b0000_0100;
    pub const RECORD_SCHEMA: u8 = 0b0000_1000;
    const KNOWN: u8 = 0b0000_1111;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn with(mut self, flag: u8, on: bool) -> Self {
        if on {
            self.0 |= flag;
        }
        self
    }

    pub fn has(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    /// True when no bit outside the known flags is set.
    pub fn is_known(self) -> bool {
        self.0 & !Self::KNOWN == 0
    }
}

// ============================================================================
// HEADER
// ============================================================================

/// Binary format header (44 bytes fixed size)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzdexHeader {
    pub version: u8,
    pub flags: FormatFlags,
    pub doc_count: u32,
    pub base_count: u32,
    pub config_len: u32,
    pub documents_len: u32,
    pub bases_len: u32,
    pub variants_len: u32,
    pub inverted_len: u32,
    pub stats_len: u32,
    pub bloom_len: u32,
}

impl FuzzdexHeader {
    // 4 (magic) + 1 (version) + 1 (flags) + 9*4 (u32s) + 2 (reserved) = 44
    pub const SIZE: usize = 44;

    /// Compute section byte offsets for this header.
    pub fn section_offsets(&self) -> SectionOffsets {
        SectionOffsets::from_header(self)
    }

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&MAGIC)?;
        w.write_all(&[self.version])?;
        w.write_all(&[self.flags.0])?;
        for value in [
            self.doc_count,
            self.base_count,
            self.config_len,
            self.documents_len,
            self.bases_len,
            self.variants_len,
            self.inverted_len,
            self.stats_len,
            self.bloom_len,
        ] {
            w.write_all(&value.to_le_bytes())?;
        }
        w.write_all(&[0u8; 2])?; // reserved
        Ok(())
    }

    pub fn read<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid magic: expected FZDX, got {:?}", magic),
            ));
        }

        let mut buf = [0u8; 40]; // 44 - 4 (magic)
        r.read_exact(&mut buf)?;
        let word = |i: usize| u32::from_le_bytes([buf[i], buf[i + 1], buf[i + 2], buf[i + 3]]);

        Ok(Self {
            version: buf[0],
            flags: FormatFlags(buf[1]),
            doc_count: word(2),
            base_count: word(6),
            config_len: word(10),
            documents_len: word(14),
            bases_len: word(18),
            variants_len: word(22),
            inverted_len: word(26),
            stats_len: word(30),
            bloom_len: word(34),
            // buf[38..40] is reserved
        })
    }
}

// ============================================================================
// FOOTER (8 bytes)
// ============================================================================

/// Footer with CRC32 checksum and magic number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FuzzdexFooter {
    /// CRC32 checksum of header + all sections (everything before footer)
    pub crc32: u32,
}

impl FuzzdexFooter {
    pub const SIZE: usize = 8; // 4 bytes CRC32 + 4 bytes magic

    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.crc32.to_le_bytes())?;
        w.write_all(&FOOTER_MAGIC)?;
        Ok(())
    }

    pub fn read(bytes: &[u8]) -> io::Result<Self> {
        if bytes.len() < Self::SIZE {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "File too short for footer",
            ));
        }

        let footer_start = bytes.len() - Self::SIZE;
        let magic = &bytes[footer_start + 4..];
        if magic != FOOTER_MAGIC {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("Invalid footer magic: expected XDZF, got {:?}", magic),
            ));
        }

        let crc32 = u32::from_le_bytes([
            bytes[footer_start],
            bytes[footer_start + 1],
            bytes[footer_start + 2],
            bytes[footer_start + 3],
        ]);

        Ok(Self { crc32 })
    }

    /// Compute CRC32 over the given bytes
    pub fn compute_crc32(data: &[u8]) -> u32 {
        let mut hasher = Crc32Hasher::new();
        hasher.update(data);
        hasher.finalize()
    }
}

// ============================================================================
// SECTION OFFSETS
// ============================================================================

/// Section byte ranges, in file order:
///
/// 1. HEADER     [44B]
/// 2. CONFIG     [config_len]     - serde_json, needed to resolve languages
/// 3. DOCUMENTS  [documents_len]
/// 4. BASES      [bases_len]      - base entries with owners
/// 5. VARIANTS   [variants_len]   - the four classic maps, by base ordinal
/// 6. INVERTED   [inverted_len]   - posting maps and trie (may be empty)
/// 7. STATS      [stats_len]      - corpus statistics (may be empty)
/// 8. BLOOM      [bloom_len]      - bloom filter words (may be empty)
/// 9. FOOTER     [8B]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionOffsets {
    pub config: (usize, usize),
    pub documents: (usize, usize),
    pub bases: (usize, usize),
    pub variants: (usize, usize),
    pub inverted: (usize, usize),
    pub stats: (usize, usize),
    pub bloom: (usize, usize),
    pub footer: (usize, usize),
}

impl SectionOffsets {
    pub fn from_header(h: &FuzzdexHeader) -> Self {
        let mut pos = FuzzdexHeader::SIZE;
        let mut next = |len: u32| {
            let start = pos;
            pos += len as usize;
            (start, pos)
        };

        let config = next(h.config_len);
        let documents = next(h.documents_len);
        let bases = next(h.bases_len);
        let variants = next(h.variants_len);
        let inverted = next(h.inverted_len);
        let stats = next(h.stats_len);
        let bloom = next(h.bloom_len);
        let footer_start = bloom.1;

        Self {
            config,
            documents,
            bases,
            variants,
            inverted,
            stats,
            bloom,
            footer: (footer_start, footer_start + FuzzdexFooter::SIZE),
        }
    }

    /// Expected content size (everything before footer)
    pub fn content_size(&self) -> usize {
        self.footer.0
    }

    /// Total file size including footer
    pub fn total_size(&self) -> usize {
        self.footer.1
    }
}
