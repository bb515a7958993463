//! Schema snapshot generator for mermaid-erd tests and benchmarks.
//!
//! Generates deterministic introspection snapshots (tables, fields,
//! constraints, references) in the JSON shape `mermaid-erd render` reads.
//!
//! # Example
//!
//! ```rust
//! use snapshot_gen::{Generator, Scale};
//!
//! let mut gen = Generator::new(42, Scale::Small);
//! let snapshot = gen.generate();
//! let json = snapshot.to_json().unwrap();
//!
//! assert!(json.contains("\"tableConstraints\""));
//! ```

pub mod generator;
pub mod model;

pub use generator::{Generator, GeneratorOptions, Scale};
pub use model::{Constraint, Endpoint, Field, FieldType, Ref, Snapshot, Table};
