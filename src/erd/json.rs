//! JSON summary of a rendered diagram.

use crate::erd::renderer::{ErdRenderer, RenderStats};
use schemars::JsonSchema;
use serde::Serialize;

/// JSON representation of the rendered ERD
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdJson {
    pub tables: Vec<TableJson>,
    pub excluded_tables: Vec<String>,
    pub relationships: Vec<RelationshipJson>,
    pub stats: ErdStats,
}

/// JSON representation of an entity block
#[derive(Debug, Serialize, JsonSchema)]
pub struct TableJson {
    pub name: String,
    pub schema: String,
    pub fields: Vec<FieldJson>,
}

/// JSON representation of a field with its derived roles
#[derive(Debug, Serialize, JsonSchema)]
pub struct FieldJson {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub display_type: String,
    pub is_primary_key: bool,
    pub is_foreign_key: bool,
    pub is_unique: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// JSON representation of a relationship line
#[derive(Debug, Serialize, JsonSchema)]
pub struct RelationshipJson {
    pub from_table: String,
    pub from_columns: Vec<String>,
    pub to_table: String,
    pub to_columns: Vec<String>,
    pub notation: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_delete: Option<String>,
    pub line: String,
}

/// ERD statistics
#[derive(Debug, Serialize, JsonSchema)]
pub struct ErdStats {
    pub table_count: usize,
    pub excluded_table_count: usize,
    pub field_count: usize,
    pub relationship_count: usize,
    pub skipped_reference_count: usize,
}

impl From<RenderStats> for ErdStats {
    fn from(stats: RenderStats) -> Self {
        Self {
            table_count: stats.tables,
            excluded_table_count: stats.excluded_tables,
            field_count: stats.fields,
            relationship_count: stats.relationships,
            skipped_reference_count: stats.skipped_refs(),
        }
    }
}

/// Generate pretty JSON from a renderer
pub fn to_json(renderer: &ErdRenderer<'_>) -> String {
    let erd = build_erd_json(renderer);
    serde_json::to_string_pretty(&erd).unwrap_or_else(|_| "{}".to_string())
}

/// Build the JSON structure
pub fn build_erd_json(renderer: &ErdRenderer<'_>) -> ErdJson {
    let mut total_fields = 0;

    let tables: Vec<TableJson> = renderer
        .table_blocks()
        .into_iter()
        .map(|block| {
            let fields: Vec<FieldJson> = block
                .fields
                .into_iter()
                .map(|f| FieldJson {
                    name: f.name,
                    type_name: f.type_name,
                    display_type: f.display_type,
                    is_primary_key: f.flags.primary,
                    is_foreign_key: f.flags.foreign,
                    is_unique: f.flags.unique,
                    note: f.note,
                })
                .collect();

            total_fields += fields.len();

            TableJson {
                name: block.name,
                schema: block.schema,
                fields,
            }
        })
        .collect();

    let (lines, mut stats) = renderer.relationship_lines();
    let relationships: Vec<RelationshipJson> = lines
        .into_iter()
        .map(|l| RelationshipJson {
            line: l.to_string(),
            from_table: l.left_table,
            from_columns: l.left_fields,
            to_table: l.right_table,
            to_columns: l.right_fields,
            notation: l.notation,
            on_delete: l.on_delete,
        })
        .collect();

    let excluded_tables = renderer.excluded_tables();
    stats.tables = tables.len();
    stats.fields = total_fields;
    stats.excluded_tables = excluded_tables.len();

    ErdJson {
        tables,
        excluded_tables,
        relationships,
        stats: stats.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ErdConfig;
    use crate::snapshot::{Endpoint, Field, FieldConstraint, Ref, SchemaSnapshot, Table};

    fn create_test_snapshot() -> SchemaSnapshot {
        let mut snapshot = SchemaSnapshot::new();
        let users = Table::new("users");
        snapshot.add_table(
            users.clone(),
            vec![Field::new("id", "public.text"), Field::new("email", "text")],
        );
        snapshot.set_constraint(
            &users,
            "id",
            FieldConstraint {
                pk: true,
                unique: false,
            },
        );
        snapshot.add_table(
            Table::new("orders"),
            vec![Field::new("user_id", "public.text")],
        );
        snapshot.add_table(Table::new("spatial_ref_sys"), vec![]);
        snapshot.add_ref(
            Ref::new(
                Endpoint::new("orders", ["user_id"], "*"),
                Endpoint::new("users", ["id"], "1"),
            )
            .on_delete("CASCADE"),
        );
        snapshot
    }

    #[test]
    fn test_json_structure() {
        let snapshot = create_test_snapshot();
        let config = ErdConfig::default();
        let renderer = ErdRenderer::new(&snapshot, &config);
        let erd = build_erd_json(&renderer);

        assert_eq!(erd.tables.len(), 2);
        assert_eq!(erd.excluded_tables, vec!["spatial_ref_sys".to_string()]);
        assert_eq!(erd.stats.table_count, 2);
        assert_eq!(erd.stats.field_count, 3);
        assert_eq!(erd.stats.relationship_count, 1);
        assert_eq!(erd.stats.excluded_table_count, 1);

        let id = &erd.tables[0].fields[0];
        assert_eq!(id.display_type, "uuid(7)");
        assert!(id.is_primary_key);
        assert!(!id.is_foreign_key);

        let rel = &erd.relationships[0];
        assert_eq!(rel.notation, "}|--||");
        assert_eq!(rel.line, "orders}|--||users : \"orders.user_id -> users.id\"");
    }

    #[test]
    fn test_json_serialization() {
        let snapshot = create_test_snapshot();
        let config = ErdConfig::default();
        let json = to_json(&ErdRenderer::new(&snapshot, &config));
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed["tables"][0]["fields"][0]["type"], "public.text");
        assert_eq!(parsed["relationships"][0]["on_delete"], "CASCADE");
        assert_eq!(parsed["stats"]["skipped_reference_count"], 0);
    }
}
