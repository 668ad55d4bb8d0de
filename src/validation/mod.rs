//! Validation of finished mappings
//!
//! Currently covers `oneOf` exclusivity. `anyOf` and `if`/`then`/`else`
//! branches are treated as structurally merged and never reported.

mod conflicts;

pub use conflicts::{ConflictGroup, ConflictValidator, find_conflicts};
