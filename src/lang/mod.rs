//! Language plugins: normalization, phonetic codes, synonyms and variants.
//!
//! The index never hard-codes linguistic rules. Everything language-specific
//! comes through [`LanguagePlugin`], selected by the tags in
//! `Config::languages`. The first configured language is the primary one: it
//! normalizes both indexed text and queries. Every configured plugin
//! contributes phonetic codes, synonyms, variants and compound parts.
//!
//! Two reference plugins ship with the crate: [`English`] and [`German`].

mod english;
mod german;

use std::fmt;
use std::sync::Arc;

pub use english::English;
pub use german::{cologne_phonetic, German};

use crate::config::PerformanceTier;
use crate::error::{IndexError, Result};

/// Capability set a language must provide to take part in indexing and search.
pub trait LanguagePlugin: Send + Sync + fmt::Debug {
    /// Language tag this plugin answers to, e.g. `"en"`.
    fn language(&self) -> &str;

    /// Canonical search form: lowercase, single-spaced, accents handled.
    fn normalize(&self, text: &str) -> String;

    /// Phonetic code, `None` when the term has nothing encodable.
    fn phonetic_code(&self, term: &str) -> Option<String>;

    /// Normalized synonyms of a normalized term, excluding the term itself.
    fn synonyms(&self, term: &str) -> Vec<String>;

    /// Morphological and transliterated forms of a case-folded term.
    /// Breadth grows with `tier`.
    fn variants(&self, term: &str, tier: PerformanceTier) -> Vec<String>;

    /// Parts of a compound word. Most languages have none.
    fn compound_parts(&self, _term: &str) -> Vec<String> {
        Vec::new()
    }
}

/// The plugins an index may draw from, looked up by language tag.
#[derive(Debug, Clone, Default)]
pub struct PluginSet {
    plugins: Vec<Arc<dyn LanguagePlugin>>,
}

impl PluginSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// English and German.
    pub fn builtin() -> Self {
        Self::new().with(English::new()).with(German::new())
    }

    /// Add a plugin. A later plugin with the same tag replaces the earlier one.
    pub fn with(mut self, plugin: impl LanguagePlugin + 'static) -> Self {
        self.register(Arc::new(plugin));
        self
    }

    pub fn register(&mut self, plugin: Arc<dyn LanguagePlugin>) {
        self.plugins.retain(|p| p.language() != plugin.language());
        self.plugins.push(plugin);
    }

    pub fn get(&self, language: &str) -> Option<Arc<dyn LanguagePlugin>> {
        self.plugins
            .iter()
            .find(|p| p.language().eq_ignore_ascii_case(language))
            .cloned()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.plugins.iter().map(|p| p.language())
    }

    /// Plugins for `languages`, in the same order.
    pub fn resolve(&self, languages: &[String]) -> Result<Languages> {
        if languages.is_empty() {
            return Err(IndexError::Config("at least one language is required".into()));
        }
        let plugins = languages
            .iter()
            .map(|tag| {
                self.get(tag).ok_or_else(|| {
                    IndexError::Config(format!(
                        "no language plugin for '{}' (available: {})",
                        tag,
                        self.languages().collect::<Vec<_>>().join(", ")
                    ))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Languages { plugins })
    }
}

/// Plugins resolved for one index. Never empty.
#[derive(Debug, Clone)]
pub struct Languages {
    plugins: Vec<Arc<dyn LanguagePlugin>>,
}

impl Languages {
    pub fn primary(&self) -> &dyn LanguagePlugin {
        // resolve() refuses empty language lists
        self.plugins[0].as_ref()
    }

    pub fn primary_tag(&self) -> &str {
        self.primary().language()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn LanguagePlugin> {
        self.plugins.iter().map(|p| p.as_ref())
    }

    pub fn normalize(&self, text: &str) -> String {
        self.primary().normalize(text)
    }

    /// Phonetic codes from every plugin, tagged `"lang:code"` so codes from
    /// different schemes never collide.
    pub fn phonetic_keys(&self, term: &str) -> Vec<String> {
        let mut keys: Vec<String> = self
            .iter()
            .filter_map(|p| {
                p.phonetic_code(term)
                    .map(|code| format!("{}:{}", p.language(), code))
            })
            .collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub fn synonyms(&self, term: &str) -> Vec<String> {
        let mut all: Vec<String> = self.iter().flat_map(|p| p.synonyms(term)).collect();
        all.sort();
        all.dedup();
        all.retain(|s| s != term);
        all
    }

    pub fn variants(&self, term: &str, tier: PerformanceTier) -> Vec<String> {
        let mut all: Vec<String> = self.iter().flat_map(|p| p.variants(term, tier)).collect();
        all.sort();
        all.dedup();
        all.retain(|v| v != term && !v.is_empty());
        all
    }

    pub fn compound_parts(&self, term: &str) -> Vec<String> {
        let mut all: Vec<String> = self.iter().flat_map(|p| p.compound_parts(term)).collect();
        all.sort();
        all.dedup();
        all.retain(|part| part != term);
        all
    }
}

/// Other members of the synonym group containing `term`.
pub(crate) fn synonym_group_lookup(groups: &[&[&str]], term: &str) -> Vec<String> {
    groups
        .iter()
        .filter(|group| group.contains(&term))
        .flat_map(|group| group.iter())
        .filter(|s| **s != term)
        .map(|s| s.to_string())
        .collect()
}
