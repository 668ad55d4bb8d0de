//! JSON-LD `@context` population

use serde::{Deserialize, Serialize};
use serde_json::Value;

const SECTOR_PLACEHOLDER: &str = "{sector}";

/// URL template for sector contexts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContextTemplate {
    template: String,
}

impl Default for ContextTemplate {
    fn default() -> Self {
        Self::new("https://schemas.example.org/contexts/{sector}.jsonld")
    }
}

impl ContextTemplate {
    /// Create a template; `{sector}` is replaced by each sector id
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Context URL for a single sector
    pub fn url(&self, sector: &str) -> String {
        self.template.replace(SECTOR_PLACEHOLDER, sector)
    }

    /// `@context` value for the given sectors
    ///
    /// One sector renders as a string, several as an array in the given
    /// order. Blank sector ids are skipped; `None` when nothing is left.
    pub fn render<S: AsRef<str>>(&self, sectors: &[S]) -> Option<Value> {
        let mut urls: Vec<Value> = sectors
            .iter()
            .map(|s| s.as_ref().trim())
            .filter(|s| !s.is_empty())
            .map(|s| Value::String(self.url(s)))
            .collect();

        match urls.len() {
            0 => None,
            1 => urls.pop(),
            _ => Some(Value::Array(urls)),
        }
    }
}
