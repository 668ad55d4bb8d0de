//! Text primitives shared by the match tiers

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::trace;

static SEPARATOR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9]+").expect("valid separator regex"));

static DIGIT_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").expect("valid digit regex"));

/// Normalize a header or path for comparison
///
/// `%` expands to `Percentage`, then everything is lowercased and reduced
/// to `[a-z0-9]`.
pub fn normalize(text: &str) -> String {
    text.replace('%', "Percentage")
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// Calculate Levenshtein distance between two strings
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut previous: Vec<usize> = (0..=b.len()).collect();
    let mut current = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        current[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[b.len()]
}

/// Split a word into camel-case runs
///
/// Boundaries fall between a lowercase letter or digit and an uppercase
/// letter, at the last capital of an uppercase run followed by lowercase
/// (`HTTPServer` -> `HTTP`, `Server`), and between letters and digits.
/// Non-alphanumeric characters separate runs.
pub fn camel_runs(word: &str) -> Vec<&str> {
    let mut runs = Vec::new();
    for part in SEPARATOR_REGEX.split(word).filter(|p| !p.is_empty()) {
        let chars: Vec<(usize, char)> = part.char_indices().collect();
        let mut start = 0;
        for k in 1..chars.len() {
            let (offset, c) = chars[k];
            let prev = chars[k - 1].1;
            let next = chars.get(k + 1).map(|(_, n)| *n);
            let boundary = (c.is_uppercase() && (prev.is_lowercase() || prev.is_ascii_digit()))
                || (c.is_uppercase()
                    && prev.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()))
                || (c.is_ascii_digit() != prev.is_ascii_digit());
            if boundary {
                runs.push(&part[start..offset]);
                start = offset;
            }
        }
        runs.push(&part[start..]);
    }
    runs
}

/// Normalized word tokens of a header or dotted path
pub fn tokenize(text: &str) -> BTreeSet<String> {
    let expanded = text.replace('%', " Percentage ");
    camel_runs(&expanded)
        .into_iter()
        .map(normalize)
        .filter(|t| !t.is_empty())
        .collect()
}

/// Acronym of a header
///
/// Uses the first character of each space-separated word, or of each
/// camel-case run when the header has no spaces.
pub fn header_acronym(header: &str) -> String {
    let header = header.trim();
    let initials: String = if header.contains(' ') {
        header
            .split_whitespace()
            .filter_map(|word| word.chars().find(|c| c.is_alphanumeric()))
            .collect()
    } else {
        camel_runs(header)
            .into_iter()
            .filter_map(|run| run.chars().next())
            .collect()
    };
    normalize(&initials)
}

/// Acronym of a dotted field path
///
/// Short all-lowercase segments (`id`, `co2`) pass through unchanged;
/// everything else is reduced to the initials of its camel-case runs.
pub fn path_acronym(path: &str) -> String {
    let mut acronym = String::new();
    for segment in path.split('.') {
        if segment.chars().count() < 4 && !segment.chars().any(|c| c.is_uppercase()) {
            acronym.push_str(segment);
        } else {
            acronym.extend(camel_runs(segment).into_iter().filter_map(|r| r.chars().next()));
        }
    }
    normalize(&acronym)
}

/// Jaccard similarity of two token sets
pub fn jaccard(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}

/// First digit run in a header, read as an external item id
///
/// Runs too long for a `u64` saturate to `u64::MAX`, so every such header
/// shares one item.
pub fn first_number(header: &str) -> Option<u64> {
    let digits = DIGIT_RUN_REGEX.find(header)?.as_str();
    Some(digits.parse().unwrap_or_else(|_| {
        trace!(header, digits, "Item id out of range, saturating");
        u64::MAX
    }))
}
