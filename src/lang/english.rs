//! English: accent stripping, Double Metaphone, light morphology.

use rphonetic::DoubleMetaphone;

use super::{synonym_group_lookup, LanguagePlugin};
use crate::config::PerformanceTier;
use crate::utils::normalize;

const SYNONYMS: &[&[&str]] = &[
    &["car", "automobile", "auto"],
    &["doctor", "physician"],
    &["hospital", "clinic"],
    &["pharmacy", "drugstore", "chemist"],
    &["big", "large"],
    &["quick", "fast"],
    &["buy", "purchase"],
    &["app", "application"],
    &["phone", "telephone"],
    &["film", "movie"],
];

#[derive(Debug, Clone, Copy, Default)]
pub struct English;

impl English {
    pub fn new() -> Self {
        Self
    }

    fn encode_word(&self, word: &str) -> Option<String> {
        // Double Metaphone only works reliably with ASCII letters
        let letters: String = word.chars().filter(char::is_ascii_alphabetic).collect();
        if letters.is_empty() {
            return None;
        }
        let code = DoubleMetaphone::default()
            .double_metaphone(&letters)
            .primary()
            .to_string();
        (!code.is_empty()).then_some(code)
    }
}

impl LanguagePlugin for English {
    fn language(&self) -> &str {
        "en"
    }

    fn normalize(&self, text: &str) -> String {
        normalize(text)
    }

    fn phonetic_code(&self, term: &str) -> Option<String> {
        let codes: Vec<String> = normalize(term)
            .split_whitespace()
            .filter_map(|word| self.encode_word(word))
            .collect();
        (!codes.is_empty()).then(|| codes.join(" "))
    }

    fn synonyms(&self, term: &str) -> Vec<String> {
        synonym_group_lookup(SYNONYMS, term)
    }

    fn variants(&self, term: &str, tier: PerformanceTier) -> Vec<String> {
        // Morphology applies to the last word of a phrase
        let (head, word) = match term.rsplit_once(' ') {
            Some((head, word)) => (format!("{} ", head), word),
            None => (String::new(), term),
        };
        let len = word.chars().count();
        if len < 3 || !word.chars().all(char::is_alphabetic) {
            return Vec::new();
        }

        let mut forms = Vec::new();
        if let Some(stem) = word.strip_suffix("ies").filter(|_| len > 4) {
            forms.push(format!("{}y", stem));
        } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| word.ends_with(s)) {
            if let Some(stem) = word.strip_suffix('s').filter(|s| !s.ends_with('s')) {
                forms.push(stem.to_string());
            } else {
                forms.push(format!("{}es", word));
            }
        } else {
            forms.push(format!("{}s", word));
        }

        if tier != PerformanceTier::Fast {
            if let Some(stem) = word.strip_suffix("ing").filter(|_| len > 5) {
                forms.push(stem.to_string());
            }
            if let Some(stem) = word.strip_suffix("ed").filter(|_| len > 4) {
                forms.push(stem.to_string());
            }
        }

        if tier == PerformanceTier::Comprehensive && !word.ends_with("ing") && !word.ends_with("ed")
        {
            let stem = word.strip_suffix('e').unwrap_or(word);
            forms.push(format!("{}ing", stem));
            forms.push(format!("{}ed", stem));
        }

        forms
            .into_iter()
            .filter(|f| f.chars().count() >= 2)
            .map(|f| format!("{}{}", head, f))
            .collect()
    }
}
