//! Header synonym table

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::text::normalize;

/// Headers that are known aliases of specific field paths
///
/// Keys are stored normalized, so `"Brand"`, `"BRAND"` and `"brand "` all
/// hit the same entry. Targets are exact field paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct SynonymTable {
    entries: BTreeMap<String, String>,
}

impl SynonymTable {
    /// Create an empty table
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Add or replace a synonym
    pub fn with_synonym(mut self, header: &str, path: impl Into<String>) -> Self {
        self.insert(header, path);
        self
    }

    /// Add or replace a synonym
    pub fn insert(&mut self, header: &str, path: impl Into<String>) {
        let key = normalize(header);
        if !key.is_empty() {
            self.entries.insert(key, path.into());
        }
    }

    /// Target path for an already-normalized header
    pub fn target(&self, normalized_header: &str) -> Option<&str> {
        self.entries.get(normalized_header).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::empty()
            .with_synonym("Brand", "tradeName")
            .with_synonym("Brand Name", "tradeName")
            .with_synonym("Product Name", "productName")
            .with_synonym("EAN", "gtin")
            .with_synonym("Barcode", "gtin")
            .with_synonym("Model", "modelName")
            .with_synonym("Manufacturer", "manufacturer.name")
            .with_synonym("Country", "countryOfOrigin")
    }
}

impl From<BTreeMap<String, String>> for SynonymTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut table = Self::empty();
        for (header, path) in map {
            table.insert(&header, path);
        }
        table
    }
}

impl From<SynonymTable> for BTreeMap<String, String> {
    fn from(table: SynonymTable) -> Self {
        table.entries
    }
}
