//! Configuration for row materialization

use serde::{Deserialize, Serialize};

use super::context::ContextTemplate;

/// Configuration for turning mapped rows into documents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterializeConfig {
    /// Convert exact `true` / `false` cells to booleans
    pub infer_booleans: bool,
    /// Convert numeric cells to numbers
    pub infer_numbers: bool,
    /// Remove null holes from arrays after all cells are written
    pub compact_arrays: bool,
    /// Keep raw text for fields the schema declares as `string`
    pub respect_field_types: bool,
    /// Template used for `@context` URLs
    pub context: ContextTemplate,
}

impl Default for MaterializeConfig {
    fn default() -> Self {
        Self {
            infer_booleans: true,
            infer_numbers: true,
            compact_arrays: true,
            respect_field_types: false,
            context: ContextTemplate::default(),
        }
    }
}

impl MaterializeConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Write every cell as text
    pub fn verbatim() -> Self {
        Self {
            infer_booleans: false,
            infer_numbers: false,
            ..Self::default()
        }
    }

    pub fn with_infer_booleans(mut self, enabled: bool) -> Self {
        self.infer_booleans = enabled;
        self
    }

    pub fn with_infer_numbers(mut self, enabled: bool) -> Self {
        self.infer_numbers = enabled;
        self
    }

    pub fn with_compact_arrays(mut self, enabled: bool) -> Self {
        self.compact_arrays = enabled;
        self
    }

    /// Honour declared `string` types when inferring values
    pub fn with_respect_field_types(mut self, enabled: bool) -> Self {
        self.respect_field_types = enabled;
        self
    }

    pub fn with_context(mut self, context: ContextTemplate) -> Self {
        self.context = context;
        self
    }
}
