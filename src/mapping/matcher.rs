//! Header-to-field auto mapping

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, trace, warn};

use super::config::MappingConfig;
use super::indexing::resolve_array_indices;
use super::scorer::{MatchScorer, PreparedField, PreparedHeader};
use super::types::{
    HeaderMapping, HeaderMatch, MappingReport, MappingStats, MatchCandidate, MatchTier,
};
use crate::schema::FieldDescriptor;

/// A scored pairing by position in the header and field lists
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredPair {
    pub header: usize,
    pub field: usize,
    pub score: f64,
    pub tier: MatchTier,
}

/// Chooses which scored pairs become mappings
///
/// Implementations must assign each header at most once and each
/// non-array field at most once; array fields may take many headers.
pub trait AssignmentStrategy {
    /// Return the chosen pairs
    fn assign(&self, candidates: &[ScoredPair], fields: &[FieldDescriptor]) -> Vec<ScoredPair>;
}

/// Global greedy assignment
///
/// Commits the best-scoring available pair first without backtracking.
/// This approximates minimum-cost bipartite matching and is not
/// guaranteed optimal, but it is deterministic: ties keep enumeration
/// order (headers first, then fields).
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyAssignment;

impl AssignmentStrategy for GreedyAssignment {
    fn assign(&self, candidates: &[ScoredPair], fields: &[FieldDescriptor]) -> Vec<ScoredPair> {
        let mut sorted = candidates.to_vec();
        sorted.sort_by(|a, b| a.score.total_cmp(&b.score));

        let mut used_headers = HashSet::new();
        let mut used_fields = HashSet::new();
        let mut chosen = Vec::new();

        for pair in sorted {
            if used_headers.contains(&pair.header) {
                continue;
            }
            let is_array = fields[pair.field].is_array;
            if !is_array && used_fields.contains(&pair.field) {
                continue;
            }
            used_headers.insert(pair.header);
            used_fields.insert(pair.field);
            chosen.push(pair);
        }

        chosen
    }
}

/// Maps column headers onto flattened schema fields
#[derive(Debug, Clone, Default)]
pub struct AutoMapper<S = GreedyAssignment> {
    config: MappingConfig,
    strategy: S,
}

impl AutoMapper<GreedyAssignment> {
    /// Create a mapper with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mapper with custom config
    pub fn with_config(config: MappingConfig) -> Self {
        Self {
            config,
            strategy: GreedyAssignment,
        }
    }
}

impl<S: AssignmentStrategy> AutoMapper<S> {
    /// Swap the assignment strategy
    pub fn with_strategy<T: AssignmentStrategy>(self, strategy: T) -> AutoMapper<T> {
        AutoMapper {
            config: self.config,
            strategy,
        }
    }

    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Map headers onto fields, returning only the mapping
    pub fn map<H: AsRef<str>>(&self, headers: &[H], fields: &[FieldDescriptor]) -> HeaderMapping {
        self.map_with_report(headers, fields).mapping
    }

    /// Map headers onto fields with a full report
    pub fn map_with_report<H: AsRef<str>>(
        &self,
        headers: &[H],
        fields: &[FieldDescriptor],
    ) -> MappingReport {
        let prepared = prepare_fields(fields);
        self.map_prepared(headers, fields, &prepared)
    }

    /// Map headers using precomputed field forms
    ///
    /// `prepared` must be `prepare_fields(fields)`.
    pub fn map_prepared<H: AsRef<str>>(
        &self,
        headers: &[H],
        fields: &[FieldDescriptor],
        prepared: &[PreparedField],
    ) -> MappingReport {
        debug_assert_eq!(fields.len(), prepared.len());

        let headers = distinct_headers(headers);
        if headers.is_empty() || fields.is_empty() {
            return MappingReport {
                unmapped_headers: headers.iter().map(|h| h.to_string()).collect(),
                unmapped_fields: fields.iter().map(|f| f.path.clone()).collect(),
                stats: MappingStats {
                    headers: headers.len(),
                    fields: fields.len(),
                    unmapped_headers: headers.len(),
                    unmapped_fields: fields.len(),
                    ..MappingStats::default()
                },
                ..MappingReport::empty()
            };
        }

        let prepared_headers: Vec<PreparedHeader> = headers
            .iter()
            .map(|h| PreparedHeader::new(h, &self.config.synonyms))
            .collect();

        let candidates = self.candidates(&prepared_headers, prepared);
        debug!(
            headers = headers.len(),
            fields = fields.len(),
            candidates = candidates.len(),
            "Generated match candidates"
        );

        let chosen = self.strategy.assign(&candidates, fields);
        for pair in &chosen {
            trace!(
                header = headers[pair.header],
                field = %fields[pair.field].path,
                score = pair.score,
                tier = %pair.tier,
                "Assigned header"
            );
        }

        let assignments: Vec<(&str, &FieldDescriptor)> = chosen
            .iter()
            .map(|pair| (headers[pair.header], &fields[pair.field]))
            .collect();
        let resolved = resolve_array_indices(&assignments);

        let mut report = MappingReport::empty();
        for (pair, (header, path)) in chosen.iter().zip(resolved) {
            report.mapping.insert(header.clone(), path.clone());
            report.matches.push(HeaderMatch {
                header,
                field_path: fields[pair.field].path.clone(),
                resolved_path: path,
                score: pair.score,
                tier: pair.tier,
            });
        }

        let mapped_fields: BTreeSet<usize> = chosen.iter().map(|pair| pair.field).collect();
        report.unmapped_headers = headers
            .iter()
            .filter(|h| report.mapping.get(h).is_none())
            .map(|h| h.to_string())
            .collect();
        report.unmapped_fields = fields
            .iter()
            .enumerate()
            .filter(|(index, _)| !mapped_fields.contains(index))
            .map(|(_, f)| f.path.clone())
            .collect();

        report.stats = MappingStats {
            headers: headers.len(),
            fields: fields.len(),
            mapped_headers: report.mapping.len(),
            array_headers: chosen.iter().filter(|p| fields[p.field].is_array).count(),
            unmapped_headers: report.unmapped_headers.len(),
            unmapped_fields: report.unmapped_fields.len(),
        };

        if !report.unmapped_headers.is_empty() {
            debug!(
                unmapped = ?report.unmapped_headers,
                "Headers without a viable field"
            );
        }
        debug!(
            mapped = report.stats.mapped_headers,
            coverage = report.stats.coverage(),
            "Auto-mapping complete"
        );

        report
    }

    /// Best candidates for a single header, best first
    pub fn suggest(&self, header: &str, fields: &[FieldDescriptor], limit: usize) -> Vec<MatchCandidate> {
        self.suggest_prepared(header, &prepare_fields(fields), limit)
    }

    /// Best candidates for a single header using precomputed field forms
    pub fn suggest_prepared(
        &self,
        header: &str,
        prepared: &[PreparedField],
        limit: usize,
    ) -> Vec<MatchCandidate> {
        let prepared_header = PreparedHeader::new(header, &self.config.synonyms);
        let mut candidates = self.candidates(std::slice::from_ref(&prepared_header), prepared);
        candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
        candidates
            .into_iter()
            .take(limit)
            .map(|pair| MatchCandidate {
                header: header.to_string(),
                path: prepared[pair.field].path.clone(),
                score: pair.score,
                tier: pair.tier,
            })
            .collect()
    }

    fn candidates(&self, headers: &[PreparedHeader], fields: &[PreparedField]) -> Vec<ScoredPair> {
        let scorer = MatchScorer::new(&self.config);
        let mut candidates = Vec::new();
        for (header_index, header) in headers.iter().enumerate() {
            for (field_index, field) in fields.iter().enumerate() {
                let Some(m) = scorer.score_prepared(header, field) else {
                    continue;
                };
                if m.score < self.config.hopeless_cutoff {
                    candidates.push(ScoredPair {
                        header: header_index,
                        field: field_index,
                        score: m.score,
                        tier: m.tier,
                    });
                }
            }
        }
        candidates
    }
}

/// Precompute comparison forms for a descriptor list
pub fn prepare_fields(fields: &[FieldDescriptor]) -> Vec<PreparedField> {
    fields.iter().map(|f| PreparedField::new(&f.path)).collect()
}

fn distinct_headers<H: AsRef<str>>(headers: &[H]) -> Vec<&str> {
    let mut seen = HashSet::new();
    let mut distinct = Vec::with_capacity(headers.len());
    for header in headers {
        let header = header.as_ref();
        if seen.insert(header) {
            distinct.push(header);
        } else {
            warn!(header, "Duplicate header ignored");
        }
    }
    distinct
}

/// Map headers onto fields with default configuration
pub fn auto_map<H: AsRef<str>>(headers: &[H], fields: &[FieldDescriptor]) -> HeaderMapping {
    AutoMapper::new().map(headers, fields)
}
