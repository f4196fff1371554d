// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary encoding primitives: varints, strings, floats and posting lists.
//!
//! Writers append to a `Vec<u8>` and cannot fail. Reading goes through
//! [`SectionReader`], a bounds-checked cursor over one section: every read
//! returns `io::Result`, and a section that is not consumed exactly is an
//! error, so trailing garbage never goes unnoticed.
//!
//! # References
//!
//! - **Varint (LEB128)**: Little-endian base-128 variable-length integer encoding.
//!   Originally from DWARF debugging format (1992+), popularized by Protocol Buffers.
//!   See: DWARF4 specification §7.6 "Variable Length Data", and
//!   Google Protocol Buffers encoding: <https://protobuf.dev/programming-guides/encoding/>

use std::io;

use super::header::MAX_VARINT_BYTES;
use crate::index::PostingList;
use crate::types::DocId;

fn invalid(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

fn truncated(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, format!("Truncated {}", what))
}

// ============================================================================
// VARINT ENCODING
// ============================================================================

/// Encode a varint to bytes
pub fn encode_varint(mut value: u64, buf: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            buf.push(byte);
            break;
        } else {
            buf.push(byte | 0x80);
        }
    }
}

/// Decode a varint from bytes, returning (value, bytes_consumed)
///
/// Returns an error if:
/// - Buffer is empty
/// - Varint exceeds MAX_VARINT_BYTES (malformed/malicious input)
/// - The last byte overflows 64 bits
pub fn decode_varint(bytes: &[u8]) -> io::Result<(u64, usize)> {
    if bytes.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Empty buffer for varint",
        ));
    }

    let mut result: u64 = 0;
    let mut shift = 0;
    let mut i = 0;

    while i < bytes.len() && i < MAX_VARINT_BYTES {
        let byte = bytes[i];
        if shift == 63 && byte & 0x7E != 0 {
            return Err(invalid("Varint overflows u64"));
        }
        result |= u64::from(byte & 0x7F) << shift;
        i += 1;
        if byte & 0x80 == 0 {
            return Ok((result, i));
        }
        shift += 7;
    }

    // If we get here, either buffer ended mid-varint or varint is too long
    if i >= MAX_VARINT_BYTES {
        Err(invalid("Varint exceeds maximum length (possible corruption)"))
    } else {
        Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "Incomplete varint",
        ))
    }
}

// ============================================================================
// WRITERS
// ============================================================================

/// Length-prefixed UTF-8.
pub fn put_str(value: &str, buf: &mut Vec<u8>) {
    encode_varint(value.len() as u64, buf);
    buf.extend_from_slice(value.as_bytes());
}

pub fn put_strs<S: AsRef<str>>(values: &[S], buf: &mut Vec<u8>) {
    encode_varint(values.len() as u64, buf);
    for value in values {
        put_str(value.as_ref(), buf);
    }
}

/// Presence byte, then the string when present.
pub fn put_opt_str(value: Option<&str>, buf: &mut Vec<u8>) {
    match value {
        Some(value) => {
            buf.push(1);
            put_str(value, buf);
        }
        None => buf.push(0),
    }
}

/// IEEE-754 bits, little-endian.
pub fn put_f64(value: f64, buf: &mut Vec<u8>) {
    buf.extend_from_slice(&value.to_bits().to_le_bytes());
}

/// Posting list as count, first id, then gaps.
///
/// Ids are strictly ascending, so every gap after the first is at least 1
/// and small gaps dominate in dense lists.
pub fn encode_postings(list: &PostingList, buf: &mut Vec<u8>) {
    encode_varint(list.len() as u64, buf);
    let mut prev: Option<u32> = None;
    for doc in list.iter() {
        let id = doc.get();
        let value = match prev {
            None => id,
            Some(p) => id - p,
        };
        encode_varint(u64::from(value), buf);
        prev = Some(id);
    }
}

// ============================================================================
// READER
// ============================================================================

/// Bounds-checked cursor over one section.
pub struct SectionReader<'a> {
    bytes: &'a [u8],
    pos: usize,
    name: &'static str,
}

impl<'a> SectionReader<'a> {
    pub fn new(bytes: &'a [u8], name: &'static str) -> Self {
        Self { bytes, pos: 0, name }
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn varint(&mut self) -> io::Result<u64> {
        let (value, used) = decode_varint(&self.bytes[self.pos..])?;
        self.pos += used;
        Ok(value)
    }

    pub fn u32(&mut self) -> io::Result<u32> {
        let value = self.varint()?;
        u32::try_from(value)
            .map_err(|_| invalid(format!("{}: value {} exceeds u32", self.name, value)))
    }

    /// A count that must fit the remaining bytes at `min_item_bytes` each.
    /// Stops a corrupt count from driving a huge allocation.
    pub fn count(&mut self, min_item_bytes: usize) -> io::Result<usize> {
        let value = self.varint()?;
        let limit = self.remaining() / min_item_bytes.max(1);
        if value > limit as u64 {
            return Err(invalid(format!(
                "{}: count {} exceeds available bytes {}",
                self.name,
                value,
                self.remaining()
            )));
        }
        Ok(value as usize)
    }

    pub fn byte(&mut self) -> io::Result<u8> {
        let byte = *self.bytes.get(self.pos).ok_or_else(|| truncated(self.name))?;
        self.pos += 1;
        Ok(byte)
    }

    pub fn flag(&mut self) -> io::Result<bool> {
        match self.byte()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(invalid(format!("{}: bad flag byte {}", self.name, other))),
        }
    }

    pub fn take(&mut self, len: usize) -> io::Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| truncated(self.name))?;
        let slice = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    pub fn string(&mut self) -> io::Result<String> {
        let len = self.varint()?;
        let len = usize::try_from(len).map_err(|_| truncated(self.name))?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| invalid(format!("{}: invalid UTF-8: {}", self.name, e)))
    }

    pub fn strings(&mut self) -> io::Result<Vec<String>> {
        let count = self.count(1)?;
        (0..count).map(|_| self.string()).collect()
    }

    pub fn opt_string(&mut self) -> io::Result<Option<String>> {
        if self.flag()? {
            Ok(Some(self.string()?))
        } else {
            Ok(None)
        }
    }

    pub fn f64(&mut self) -> io::Result<f64> {
        let bytes = self.take(8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        Ok(f64::from_bits(u64::from_le_bytes(word)))
    }

    pub fn u64_le(&mut self) -> io::Result<u64> {
        let bytes = self.take(8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(bytes);
        Ok(u64::from_le_bytes(word))
    }

    /// Posting list written by [`encode_postings`]: strictly ascending,
    /// non-empty, every id below `doc_count`.
    pub fn postings(&mut self, doc_count: u32) -> io::Result<PostingList> {
        let count = self.count(1)?;
        let mut ids = Vec::with_capacity(count);
        let mut prev: Option<u32> = None;
        for _ in 0..count {
            let value = self.u32()?;
            let id = match prev {
                None => value,
                Some(p) => {
                    if value == 0 {
                        return Err(invalid(format!("{}: unsorted posting list", self.name)));
                    }
                    p.checked_add(value)
                        .ok_or_else(|| invalid(format!("{}: posting id overflow", self.name)))?
                }
            };
            if id >= doc_count {
                return Err(invalid(format!(
                    "{}: doc id {} out of range ({} documents)",
                    self.name, id, doc_count
                )));
            }
            ids.push(DocId(id));
            prev = Some(id);
        }
        PostingList::from_sorted(ids)
            .ok_or_else(|| invalid(format!("{}: unsorted posting list", self.name)))
    }

    /// Fail unless every byte was consumed.
    pub fn finish(self) -> io::Result<()> {
        if self.pos == self.bytes.len() {
            Ok(())
        } else {
            Err(invalid(format!(
                "{}: {} trailing bytes",
                self.name,
                self.bytes.len() - self.pos
            )))
        }
    }
}
