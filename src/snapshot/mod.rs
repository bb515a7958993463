//! Introspected schema snapshot consumed by the ERD renderer.
//!
//! This module provides:
//! - Data models for tables, fields, constraints and references
//! - Loading of the introspection JSON from a file, reader or stdin
//! - Lookups keyed the way the introspection output keys them (`schema.table`)

use anyhow::{Context, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Schema assumed for tables that do not name one
pub const DEFAULT_SCHEMA: &str = "public";

/// A note attached to a table or field.
///
/// Introspection output carries notes either as a bare string or as
/// `{ "value": "..." }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum Note {
    Text(String),
    Block { value: String },
}

impl Note {
    pub fn text(&self) -> &str {
        match self {
            Note::Text(s) => s,
            Note::Block { value } => value,
        }
    }
}

/// Table as listed by the introspection output
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    /// Bare table name
    pub name: String,
    /// Owning schema (defaults to `public`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: None,
            note: None,
        }
    }

    pub fn in_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema_name = Some(schema.into());
        self
    }

    /// Schema name, falling back to `public`
    pub fn schema(&self) -> &str {
        match self.schema_name.as_deref() {
            Some(s) if !s.is_empty() => s,
            _ => DEFAULT_SCHEMA,
        }
    }

    /// Lookup key used by the fields and constraint indexes
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema(), self.name)
    }
}

/// Stored column type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldType {
    /// Type name, possibly schema-qualified (`public.uuid`)
    pub type_name: String,
    #[serde(
        default,
        rename = "schemaName",
        skip_serializing_if = "Option::is_none"
    )]
    pub schema_name: Option<String>,
}

/// Column of a table. Ownership comes from the fields index key.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<Note>,
}

impl Field {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            field_type: FieldType {
                type_name: type_name.into(),
                schema_name: None,
            },
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(Note::Text(note.into()));
        self
    }

    pub fn type_name(&self) -> &str {
        &self.field_type.type_name
    }
}

/// Key constraints recorded for a single field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldConstraint {
    #[serde(default)]
    pub pk: bool,
    #[serde(default)]
    pub unique: bool,
}

/// Cardinality marker of a reference endpoint
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Relation {
    /// `"1"`
    One,
    /// `"*"`
    Many,
    /// Anything else the introspection layer emits
    Other(String),
}

impl From<String> for Relation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "1" => Relation::One,
            "*" => Relation::Many,
            _ => Relation::Other(s),
        }
    }
}

impl From<&str> for Relation {
    fn from(s: &str) -> Self {
        Relation::from(s.to_string())
    }
}

impl Relation {
    pub fn as_str(&self) -> &str {
        match self {
            Relation::One => "1",
            Relation::Many => "*",
            Relation::Other(s) => s,
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Relation {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Missing relations fall into the unknown case
impl Default for Relation {
    fn default() -> Self {
        Relation::Other(String::new())
    }
}

impl<'de> Deserialize<'de> for Relation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<String>::deserialize(deserializer)
            .map(|relation| relation.map(Relation::from).unwrap_or_default())
    }
}

/// One side of a reference
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    pub table_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema_name: Option<String>,
    /// Participating columns, in key order
    #[serde(default)]
    pub field_names: Vec<String>,
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub relation: Relation,
}

impl Endpoint {
    pub fn new<I, S>(table: impl Into<String>, fields: I, relation: impl Into<Relation>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            table_name: table.into(),
            schema_name: None,
            field_names: fields.into_iter().map(Into::into).collect(),
            relation: relation.into(),
        }
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.field_names.iter().any(|f| f == field)
    }
}

/// Relationship between two tables
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ref {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Expected to hold exactly two endpoints
    #[serde(default)]
    pub endpoints: Vec<Endpoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub on_update: Option<String>,
}

impl Ref {
    pub fn new(left: Endpoint, right: Endpoint) -> Self {
        Self {
            endpoints: vec![left, right],
            ..Default::default()
        }
    }

    pub fn on_delete(mut self, action: impl Into<String>) -> Self {
        self.on_delete = Some(action.into());
        self
    }

    /// Left and right endpoints, or `None` when either is missing
    pub fn sides(&self) -> Option<(&Endpoint, &Endpoint)> {
        match self.endpoints.as_slice() {
            [left, right, ..] => Some((left, right)),
            _ => None,
        }
    }

    pub fn cascades_on_delete(&self) -> bool {
        self.on_delete.as_deref() == Some("CASCADE")
    }
}

/// The complete introspection result
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SchemaSnapshot {
    /// Tables in introspection order
    #[serde(default)]
    pub tables: Vec<Table>,
    /// Fields keyed by `schema.table`, in column declaration order
    #[serde(default)]
    pub fields: BTreeMap<String, Vec<Field>>,
    /// Constraint flags keyed by `schema.table`, then field name
    #[serde(default)]
    pub table_constraints: BTreeMap<String, BTreeMap<String, FieldConstraint>>,
    #[serde(default)]
    pub refs: Vec<Ref>,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("invalid schema snapshot JSON")
    }

    /// Parse a snapshot from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(BufReader::new(reader)).context("invalid schema snapshot JSON")
    }

    /// Load a snapshot from a file, or from stdin when `path` is `-`
    pub fn load(path: &Path) -> Result<Self> {
        if path.as_os_str() == "-" {
            return Self::from_reader(io::stdin().lock());
        }

        let file = File::open(path)
            .with_context(|| format!("failed to open schema snapshot: {}", path.display()))?;
        Self::from_reader(file)
            .with_context(|| format!("failed to read schema snapshot: {}", path.display()))
    }

    /// Add a table together with its fields
    pub fn add_table(&mut self, table: Table, fields: Vec<Field>) {
        self.fields.insert(table.qualified_name(), fields);
        self.tables.push(table);
    }

    /// Record constraint flags for a field
    pub fn set_constraint(&mut self, table: &Table, field: &str, constraint: FieldConstraint) {
        self.table_constraints
            .entry(table.qualified_name())
            .or_default()
            .insert(field.to_string(), constraint);
    }

    pub fn add_ref(&mut self, reference: Ref) {
        self.refs.push(reference);
    }

    /// Fields of a table in declaration order.
    ///
    /// Looks up `schema.table` first, then the first entry whose table part
    /// matches the bare name. Unknown tables have no fields.
    pub fn fields_for(&self, table: &Table) -> &[Field] {
        if let Some(fields) = self.fields.get(&table.qualified_name()) {
            return fields;
        }

        self.fields
            .iter()
            .find(|(key, _)| key.split('.').nth(1) == Some(table.name.as_str()))
            .map(|(_, fields)| fields.as_slice())
            .unwrap_or(&[])
    }

    /// Constraint flags for a field; absent entries mean no constraints
    pub fn constraint_for(&self, table: &Table, field: &str) -> FieldConstraint {
        self.table_constraints
            .get(&table.qualified_name())
            .and_then(|fields| fields.get(field))
            .copied()
            .unwrap_or_default()
    }
}
