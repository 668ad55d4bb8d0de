//! Configuration for header mapping

use serde::{Deserialize, Serialize};

use super::synonyms::SynonymTable;

/// Configuration for header-to-field mapping
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Candidates scoring at or above this value are discarded
    pub hopeless_cutoff: f64,
    /// Enable fuzzy (Levenshtein) matching
    pub fuzzy_matching: bool,
    /// Enable acronym matching
    pub acronym_matching: bool,
    /// Enable token-set (Jaccard) matching
    pub token_matching: bool,
    /// Minimum Jaccard similarity for a token-set match (0.0-1.0)
    pub min_token_similarity: f64,
    /// Maximum number of candidates returned by `suggest`
    pub max_suggestions: usize,
    /// Known header aliases
    pub synonyms: SynonymTable,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            hopeless_cutoff: 5.0,
            fuzzy_matching: true,
            acronym_matching: true,
            token_matching: true,
            min_token_similarity: 0.4,
            max_suggestions: 5,
            synonyms: SynonymTable::default(),
        }
    }
}

impl MappingConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a strict config (exact, synonym and leaf matches only)
    pub fn strict() -> Self {
        Self {
            fuzzy_matching: false,
            acronym_matching: false,
            token_matching: false,
            ..Self::default()
        }
    }

    /// Set the hopeless-candidate cutoff
    pub fn with_hopeless_cutoff(mut self, cutoff: f64) -> Self {
        self.hopeless_cutoff = cutoff.max(0.0);
        self
    }

    /// Enable/disable fuzzy matching
    pub fn with_fuzzy_matching(mut self, enabled: bool) -> Self {
        self.fuzzy_matching = enabled;
        self
    }

    /// Enable/disable acronym matching
    pub fn with_acronym_matching(mut self, enabled: bool) -> Self {
        self.acronym_matching = enabled;
        self
    }

    /// Enable/disable token-set matching
    pub fn with_token_matching(mut self, enabled: bool) -> Self {
        self.token_matching = enabled;
        self
    }

    /// Set minimum Jaccard similarity for token-set matches
    pub fn with_min_token_similarity(mut self, similarity: f64) -> Self {
        self.min_token_similarity = similarity.clamp(0.0, 1.0);
        self
    }

    /// Set maximum number of suggestions per header
    pub fn with_max_suggestions(mut self, max: usize) -> Self {
        self.max_suggestions = max;
        self
    }

    /// Replace the synonym table
    pub fn with_synonyms(mut self, synonyms: SynonymTable) -> Self {
        self.synonyms = synonyms;
        self
    }

    /// Add a single synonym on top of the current table
    pub fn with_synonym(mut self, header: &str, path: impl Into<String>) -> Self {
        self.synonyms.insert(header, path);
        self
    }
}
