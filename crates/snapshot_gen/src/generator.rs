//! Deterministic snapshot generation.

use crate::model::{Constraint, Endpoint, Field, Ref, Snapshot, Table};
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Size presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scale {
    /// 8 tables
    Small,
    /// 40 tables
    Medium,
    /// 200 tables
    Large,
    /// 1000 tables (for throughput benchmarks)
    XLarge,
}

impl Scale {
    pub fn tables(&self) -> usize {
        match self {
            Scale::Small => 8,
            Scale::Medium => 40,
            Scale::Large => 200,
            Scale::XLarge => 1000,
        }
    }

    pub fn max_columns(&self) -> usize {
        match self {
            Scale::Small => 6,
            Scale::Medium => 10,
            Scale::Large => 14,
            Scale::XLarge => 20,
        }
    }
}

impl std::str::FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "small" => Ok(Scale::Small),
            "medium" => Ok(Scale::Medium),
            "large" => Ok(Scale::Large),
            "xlarge" => Ok(Scale::XLarge),
            _ => Err(format!(
                "Unknown scale: {}. Valid options: small, medium, large, xlarge",
                s
            )),
        }
    }
}

/// Knobs beyond the size preset
#[derive(Debug, Clone, Copy)]
pub struct GeneratorOptions {
    /// Add a PostGIS `spatial_ref_sys` table with a reference into it
    pub postgis: bool,
    /// Append one reference with a single endpoint
    pub malformed_ref: bool,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            postgis: true,
            malformed_ref: false,
        }
    }
}

const SCHEMA: &str = "public";

const ENTITY_NAMES: &[&str] = &[
    "accounts",
    "projects",
    "invoices",
    "payments",
    "products",
    "categories",
    "comments",
    "documents",
    "events",
    "teams",
    "tickets",
    "shipments",
    "warehouses",
    "subscriptions",
    "webhooks",
    "tags",
];

const COLUMN_TYPES: &[&str] = &[
    "public.text",
    "int4",
    "int8",
    "bool",
    "numeric",
    "timestamptz",
    "jsonb",
    "public.citext",
    "date",
];

const COLUMN_NAMES: &[&str] = &[
    "name", "title", "status", "amount", "slug", "payload", "position", "starts_on", "enabled",
    "code", "summary", "weight",
];

const DELETE_ACTIONS: &[Option<&str>] = &[
    Some("CASCADE"),
    Some("SET NULL"),
    Some("RESTRICT"),
    Some("NO ACTION"),
    None,
];

/// Main snapshot generator
pub struct Generator {
    rng: ChaCha8Rng,
    scale: Scale,
    options: GeneratorOptions,
}

impl Generator {
    pub fn new(seed: u64, scale: Scale) -> Self {
        Self::with_options(seed, scale, GeneratorOptions::default())
    }

    pub fn with_options(seed: u64, scale: Scale, options: GeneratorOptions) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            scale,
            options,
        }
    }

    /// Generate a full snapshot
    pub fn generate(&mut self) -> Snapshot {
        let mut snapshot = Snapshot::default();

        let users = self.add_users(&mut snapshot);
        let mut parents = vec![users];

        for i in 0..self.scale.tables().saturating_sub(1) {
            let base = ENTITY_NAMES[i % ENTITY_NAMES.len()];
            let name = if i < ENTITY_NAMES.len() {
                base.to_string()
            } else {
                format!("{}_{}", base, i / ENTITY_NAMES.len())
            };
            let table = self.add_entity(&mut snapshot, &name, &parents);
            parents.push(table);
        }

        if self.options.postgis {
            self.add_spatial_ref_sys(&mut snapshot, &parents[parents.len() - 1]);
        }

        if self.options.malformed_ref {
            snapshot.refs.push(Ref {
                name: "broken_ref".to_string(),
                endpoints: vec![endpoint(&parents[0], &["id"], "*")],
                on_delete: None,
                on_update: None,
            });
        }

        snapshot
    }

    fn add_users(&mut self, snapshot: &mut Snapshot) -> Table {
        let table = table("users");
        let key = table.qualified_name();

        snapshot.fields.insert(
            key.clone(),
            vec![
                Field::new("id", "public.text").not_null(),
                Field::new("email", "public.citext").not_null(),
                Field::new("created_at", "timestamptz").not_null(),
            ],
        );
        let constraints = snapshot.table_constraints.entry(key).or_default();
        constraints.insert("id".to_string(), Constraint { pk: true, unique: false });
        constraints.insert(
            "email".to_string(),
            Constraint {
                pk: false,
                unique: true,
            },
        );

        snapshot.tables.push(table.clone());
        table
    }

    fn add_entity(&mut self, snapshot: &mut Snapshot, name: &str, parents: &[Table]) -> Table {
        let table = table(name);
        let key = table.qualified_name();
        let mut fields = Vec::new();
        let mut constraints = std::collections::BTreeMap::new();

        let id_type = if self.rng.random_bool(0.7) { "public.text" } else { "int8" };
        fields.push(Field::new("id", id_type).not_null());
        constraints.insert("id".to_string(), Constraint { pk: true, unique: false });

        let fk_count = self.rng.random_range(1..=parents.len().min(3));
        for _ in 0..fk_count {
            let Some(parent) = parents.choose(&mut self.rng).cloned() else {
                break;
            };
            let column = format!("{}_id", singular(&parent.name));
            if fields.iter().any(|f: &Field| f.name == column) {
                continue;
            }

            let one_to_one = self.rng.random_bool(0.1);
            fields.push(Field::new(column.clone(), "public.text"));
            if one_to_one {
                constraints.insert(
                    column.clone(),
                    Constraint {
                        pk: false,
                        unique: true,
                    },
                );
            }

            let on_delete = DELETE_ACTIONS
                .choose(&mut self.rng)
                .copied()
                .flatten()
                .map(str::to_string);
            snapshot.refs.push(Ref {
                name: format!("{}_{}_fkey", name, column),
                endpoints: vec![
                    endpoint(&table, &[column.as_str()], if one_to_one { "1" } else { "*" }),
                    endpoint(&parent, &["id"], "1"),
                ],
                on_delete,
                on_update: None,
            });
        }

        let extra = self.rng.random_range(0..self.scale.max_columns());
        for j in 0..extra {
            let column = COLUMN_NAMES[j % COLUMN_NAMES.len()];
            let column = if j < COLUMN_NAMES.len() {
                column.to_string()
            } else {
                format!("{}_{}", column, j)
            };
            let column_type = COLUMN_TYPES
                .choose(&mut self.rng)
                .copied()
                .unwrap_or("text");
            if self.rng.random_bool(0.1) {
                constraints.insert(
                    column.clone(),
                    Constraint {
                        pk: false,
                        unique: true,
                    },
                );
            }
            fields.push(Field::new(column, column_type));
        }

        snapshot.fields.insert(key.clone(), fields);
        snapshot.table_constraints.insert(key, constraints);
        snapshot.tables.push(table.clone());
        table
    }

    fn add_spatial_ref_sys(&mut self, snapshot: &mut Snapshot, referencing: &Table) {
        let table = table("spatial_ref_sys");
        let key = table.qualified_name();

        if let Some(fields) = snapshot.fields.get_mut(&referencing.qualified_name()) {
            fields.push(Field::new("srid", "int4"));
        }

        snapshot.fields.insert(
            key.clone(),
            vec![
                Field::new("srid", "int4").not_null(),
                Field::new("auth_name", "varchar"),
                Field::new("srtext", "varchar"),
            ],
        );
        snapshot
            .table_constraints
            .entry(key)
            .or_default()
            .insert("srid".to_string(), Constraint { pk: true, unique: false });
        snapshot.refs.push(Ref {
            name: format!("{}_srid_fkey", referencing.name),
            endpoints: vec![
                endpoint(referencing, &["srid"], "*"),
                endpoint(&table, &["srid"], "1"),
            ],
            on_delete: None,
            on_update: None,
        });
        snapshot.tables.push(table);
    }
}

fn table(name: &str) -> Table {
    Table {
        name: name.to_string(),
        schema_name: SCHEMA.to_string(),
    }
}

fn endpoint(table: &Table, fields: &[&str], relation: &str) -> Endpoint {
    Endpoint {
        schema_name: table.schema_name.clone(),
        table_name: table.name.clone(),
        field_names: fields.iter().map(|f| f.to_string()).collect(),
        relation: relation.to_string(),
    }
}

fn singular(name: &str) -> String {
    if let Some(stem) = name.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    name.strip_suffix('s').unwrap_or(name).to_string()
}
