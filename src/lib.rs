pub mod config;
pub mod erd;
pub mod json_schema;
pub mod snapshot;
pub mod writer;
