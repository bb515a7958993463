//! Schema command: print JSON Schemas for the snapshot input and `--json` output.

use crate::json_schema;
use anyhow::{bail, Result};
use std::collections::BTreeMap;

pub fn run(name: Option<String>) -> Result<()> {
    let output = match name {
        Some(name) => match json_schema::get_schema(&name) {
            Some(schema) => serde_json::to_string_pretty(&schema)?,
            None => bail!(
                "Unknown schema: {}. Valid options: {}",
                name,
                json_schema::schema_names().join(", ")
            ),
        },
        None => {
            let all: BTreeMap<_, _> = json_schema::all_schemas();
            serde_json::to_string_pretty(&all)?
        }
    };

    println!("{}", output);
    Ok(())
}
