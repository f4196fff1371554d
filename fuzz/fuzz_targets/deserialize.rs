// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary format parsing under adversarial input.
//!
//! A crafted index file must produce an error, never a panic or an
//! allocation sized by an attacker-controlled length.

#![no_main]

use fuzzdex::{deserialize, serialize, SearchOptions};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(index) = deserialize(data) else {
        return;
    };

    // Anything that parses must be searchable and survive another round trip
    let _ = index.search("a", 5, &SearchOptions::default());
    let bytes = serialize(&index).expect("a loaded index serializes");
    let again = deserialize(&bytes).expect("re-serialized index loads");
    assert_eq!(again.len(), index.len());
});
