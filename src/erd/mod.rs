//! Schema-to-diagram translation.
//!
//! This module provides:
//! - Key role derivation (PK / FK / UK) for every field
//! - Entity blocks with display type rewriting
//! - Crow's-foot relationship lines encoding cardinality and cascade deletes
//! - Whole-document rendering and a JSON summary

pub mod flags;
pub mod json;
pub mod relationship;
pub mod renderer;
pub mod table;

pub use flags::{derive_flags, ForeignKeyIndex, KeyFlags};
pub use json::{build_erd_json, to_json, ErdJson};
pub use relationship::{render_relationship, RelationshipLine};
pub use renderer::{ErdRenderer, RenderStats};
pub use table::{display_type, render_table, FieldLine, TableBlock};
