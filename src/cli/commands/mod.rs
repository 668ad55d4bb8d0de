//! `tabmap` subcommand implementations

pub mod convert;
pub mod fields;
pub mod map;
