//! German: ß/umlaut folding, Kölner Phonetik, suffix-based compound splitting.

use super::{synonym_group_lookup, LanguagePlugin};
use crate::config::PerformanceTier;
use crate::utils::{char_len, normalize};

const SYNONYMS: &[&[&str]] = &[
    &["arzt", "doktor"],
    &["krankenhaus", "klinik", "klinikum", "spital"],
    &["apotheke", "pharmazie"],
    &["auto", "wagen", "pkw"],
    &["strasse", "gasse"],
    &["zahnarzt", "dentist"],
    &["kaufen", "erwerben"],
];

/// Second halves of common compounds. The splitter takes the longest match.
const COMPOUND_SUFFIXES: &[&str] = &[
    "haus", "arzt", "zimmer", "platz", "strasse", "bahn", "hof", "stadt", "amt", "schule",
    "zeit", "werk", "kasse", "karte", "geld", "laden", "garten", "markt",
];

/// Shortest first half a compound split may leave.
const MIN_COMPOUND_HEAD: usize = 3;

const INFLECTION_SUFFIXES: &[&str] = &["en", "er", "es", "e", "n", "s"];

#[derive(Debug, Clone, Copy, Default)]
pub struct German;

impl German {
    pub fn new() -> Self {
        Self
    }

    fn split_word(word: &str) -> Vec<String> {
        let Some(suffix) = COMPOUND_SUFFIXES
            .iter()
            .filter(|s| word.ends_with(*s) && char_len(word) - char_len(s) >= MIN_COMPOUND_HEAD)
            .max_by_key(|s| s.len())
        else {
            return Vec::new();
        };
        let head = &word[..word.len() - suffix.len()];
        let mut parts = vec![head.to_string(), suffix.to_string()];
        // Linking "s" (Bahnhofsplatz -> bahnhof + platz)
        if let Some(stem) = head.strip_suffix('s').filter(|s| char_len(s) >= MIN_COMPOUND_HEAD) {
            parts.push(stem.to_string());
        }
        parts
    }
}

fn transliterate(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 4);
    for c in term.chars() {
        match c {
            'ä' => out.push_str("ae"),
            'ö' => out.push_str("oe"),
            'ü' => out.push_str("ue"),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

impl LanguagePlugin for German {
    fn language(&self) -> &str {
        "de"
    }

    fn normalize(&self, text: &str) -> String {
        normalize(&text.replace(['ß', 'ẞ'], "ss"))
    }

    fn phonetic_code(&self, term: &str) -> Option<String> {
        let codes: Vec<String> = self
            .normalize(term)
            .split_whitespace()
            .map(cologne_phonetic)
            .filter(|code| !code.is_empty())
            .collect();
        (!codes.is_empty()).then(|| codes.join(" "))
    }

    fn synonyms(&self, term: &str) -> Vec<String> {
        synonym_group_lookup(SYNONYMS, term)
    }

    fn variants(&self, term: &str, tier: PerformanceTier) -> Vec<String> {
        let mut forms = Vec::new();
        if term.contains(['ä', 'ö', 'ü', 'ß']) {
            forms.push(transliterate(term));
        }
        if term.contains(' ') || !term.chars().all(char::is_alphabetic) {
            return forms;
        }

        if tier != PerformanceTier::Fast {
            if let Some(stem) = INFLECTION_SUFFIXES
                .iter()
                .find_map(|s| term.strip_suffix(s).filter(|stem| char_len(stem) >= 4))
            {
                forms.push(stem.to_string());
            }
        }

        if tier == PerformanceTier::Comprehensive {
            if term.ends_with('e') {
                forms.push(format!("{}n", term));
            } else if !term.ends_with('n') {
                forms.push(format!("{}e", term));
                forms.push(format!("{}en", term));
            }
        }
        forms
    }

    fn compound_parts(&self, term: &str) -> Vec<String> {
        term.split_whitespace().flat_map(Self::split_word).collect()
    }
}

/// Kölner Phonetik code of a word, digits only.
///
/// Letters map to digit classes depending on their neighbours, repeated
/// digits collapse, and `0` survives only in first position.
pub fn cologne_phonetic(word: &str) -> String {
    let letters: Vec<char> = normalize(&word.replace(['ß', 'ẞ'], "ss"))
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    let mut raw = String::with_capacity(letters.len() * 2);
    for (i, &c) in letters.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|p| letters.get(p)).copied();
        let next = letters.get(i + 1).copied();
        let next_in = |set: &str| next.is_some_and(|n| set.contains(n));
        let prev_in = |set: &str| prev.is_some_and(|p| set.contains(p));

        let code = match c {
            'A' | 'E' | 'I' | 'J' | 'O' | 'U' | 'Y' => "0",
            'H' => "",
            'B' => "1",
            'P' => {
                if next_in("H") {
                    "3"
                } else {
                    "1"
                }
            }
            'D' | 'T' => {
                if next_in("CSZ") {
                    "8"
                } else {
                    "2"
                }
            }
            'F' | 'V' | 'W' => "3",
            'G' | 'K' | 'Q' => "4",
            'C' => {
                if i == 0 {
                    if next_in("AHKLOQRUX") {
                        "4"
                    } else {
                        "8"
                    }
                } else if prev_in("SZ") {
                    "8"
                } else if next_in("AHKOQUX") {
                    "4"
                } else {
                    "8"
                }
            }
            'X' => {
                if prev_in("CKQ") {
                    "8"
                } else {
                    "48"
                }
            }
            'L' => "5",
            'M' | 'N' => "6",
            'R' => "7",
            'S' | 'Z' => "8",
            _ => "",
        };
        raw.push_str(code);
    }

    let mut code = String::with_capacity(raw.len());
    let mut last = None;
    for digit in raw.chars() {
        if last != Some(digit) {
            if digit != '0' || code.is_empty() {
                code.push(digit);
            }
            last = Some(digit);
        }
    }
    code
}
