//! Header-to-path match scoring
//!
//! Lower scores are better; `f64::INFINITY` means no tier accepted the
//! pair. Tier scores are ordered so literal matches always beat heuristic
//! ones during greedy assignment:
//!
//! | Tier      | Score                    |
//! |-----------|--------------------------|
//! | exact     | 0.0                      |
//! | synonym   | 0.05                     |
//! | leaf      | 0.1                      |
//! | fuzzy     | 1.0 + edit distance      |
//! | acronym   | 1.0 + edit distance      |
//! | token set | 0.2 + (1 - jaccard) * 5  |

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::config::MappingConfig;
use super::synonyms::SynonymTable;
use super::text::{
    header_acronym, jaccard, levenshtein_distance, normalize, path_acronym, tokenize,
};
use super::types::{MatchScore, MatchTier};

const EXACT_SCORE: f64 = 0.0;
const SYNONYM_SCORE: f64 = 0.05;
const LEAF_SCORE: f64 = 0.1;
const HEURISTIC_BASE: f64 = 1.0;
const TOKEN_SET_BASE: f64 = 0.2;
const TOKEN_SET_WEIGHT: f64 = 5.0;

/// Precomputed comparison forms of a field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparedField {
    pub path: String,
    normalized_path: String,
    normalized_leaf: String,
    acronym: String,
    tokens: BTreeSet<String>,
}

impl PreparedField {
    pub fn new(path: &str) -> Self {
        let leaf = path.rsplit('.').next().unwrap_or(path);
        Self {
            path: path.to_string(),
            normalized_path: normalize(path),
            normalized_leaf: normalize(leaf),
            acronym: path_acronym(path),
            tokens: tokenize(path),
        }
    }
}

/// Precomputed comparison forms of a header
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedHeader {
    pub header: String,
    normalized: String,
    acronym: String,
    tokens: BTreeSet<String>,
    synonym_target: Option<String>,
}

impl PreparedHeader {
    pub fn new(header: &str, synonyms: &SynonymTable) -> Self {
        let normalized = normalize(header);
        let synonym_target = synonyms.target(&normalized).map(String::from);
        Self {
            header: header.to_string(),
            acronym: header_acronym(header),
            tokens: tokenize(header),
            normalized,
            synonym_target,
        }
    }

    /// Whether the header has anything left to compare after normalization
    pub fn is_blank(&self) -> bool {
        self.normalized.is_empty()
    }
}

/// Scores headers against field paths under a mapping config
#[derive(Debug, Clone, Copy)]
pub struct MatchScorer<'a> {
    config: &'a MappingConfig,
}

impl<'a> MatchScorer<'a> {
    pub fn new(config: &'a MappingConfig) -> Self {
        Self { config }
    }

    /// Score a header against a path, `f64::INFINITY` when nothing matches
    pub fn score(&self, header: &str, path: &str) -> f64 {
        self.score_match(header, path)
            .map_or(f64::INFINITY, |m| m.score)
    }

    /// Best tier and score for a header against a path
    pub fn score_match(&self, header: &str, path: &str) -> Option<MatchScore> {
        let header = PreparedHeader::new(header, &self.config.synonyms);
        self.score_prepared(&header, &PreparedField::new(path))
    }

    /// Score precomputed forms
    pub fn score_prepared(
        &self,
        header: &PreparedHeader,
        field: &PreparedField,
    ) -> Option<MatchScore> {
        if header.is_blank() {
            return None;
        }

        let mut best: Option<MatchScore> = None;
        let mut offer = |score: f64, tier: MatchTier| {
            if best.is_none_or(|b| score < b.score) {
                best = Some(MatchScore { score, tier });
            }
        };

        if header.normalized == field.normalized_path {
            offer(EXACT_SCORE, MatchTier::Exact);
        }
        if header.synonym_target.as_deref() == Some(field.path.as_str()) {
            offer(SYNONYM_SCORE, MatchTier::Synonym);
        }
        if header.normalized == field.normalized_leaf {
            offer(LEAF_SCORE, MatchTier::Leaf);
        }
        if self.config.fuzzy_matching {
            if let Some(distance) = fuzzy_distance(header, field) {
                offer(HEURISTIC_BASE + distance as f64, MatchTier::Fuzzy);
            }
        }
        if self.config.acronym_matching {
            if let Some(distance) = acronym_distance(header, field) {
                offer(HEURISTIC_BASE + distance as f64, MatchTier::Acronym);
            }
        }
        if self.config.token_matching {
            let similarity = jaccard(&field.tokens, &header.tokens);
            if similarity > 0.0 && similarity >= self.config.min_token_similarity {
                offer(
                    TOKEN_SET_BASE + (1.0 - similarity) * TOKEN_SET_WEIGHT,
                    MatchTier::TokenSet,
                );
            }
        }

        best
    }
}

fn fuzzy_threshold(header_len: usize) -> usize {
    match header_len {
        0..=4 => 0,
        5..=8 => 1,
        _ => 3,
    }
}

fn acronym_threshold(acronym_len: usize) -> usize {
    if acronym_len < 4 {
        0
    } else {
        (acronym_len / 3).min(2)
    }
}

fn fuzzy_distance(header: &PreparedHeader, field: &PreparedField) -> Option<usize> {
    let distance = levenshtein_distance(&header.normalized, &field.normalized_leaf)
        .min(levenshtein_distance(&header.normalized, &field.normalized_path));
    (distance <= fuzzy_threshold(header.normalized.len())).then_some(distance)
}

fn acronym_distance(header: &PreparedHeader, field: &PreparedField) -> Option<usize> {
    if field.acronym.is_empty() {
        return None;
    }

    let mut distance = levenshtein_distance(&header.normalized, &field.acronym);
    // One- and two-letter header acronyms collide with almost anything
    if header.acronym.len() >= 3 {
        distance = distance.min(levenshtein_distance(&header.acronym, &field.acronym));
    }
    (distance <= acronym_threshold(field.acronym.len())).then_some(distance)
}

/// Score a header against a field path with default configuration
pub fn score(header: &str, path: &str) -> f64 {
    MatchScorer::new(&MappingConfig::default()).score(header, path)
}

/// Best tier and score with default configuration
pub fn score_match(header: &str, path: &str) -> Option<MatchScore> {
    MatchScorer::new(&MappingConfig::default()).score_match(header, path)
}
