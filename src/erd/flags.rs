//! Key role derivation for fields.

use crate::snapshot::{Relation, SchemaSnapshot, Table};
use ahash::{AHashMap, AHashSet};

/// Derived key roles of a single field. All three may hold at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyFlags {
    pub primary: bool,
    pub foreign: bool,
    pub unique: bool,
}

impl KeyFlags {
    /// Comma-joined `PK`, `FK`, `UK` markers, or `None` when no flag is set
    pub fn markers(&self) -> Option<String> {
        let markers: Vec<&str> = [
            (self.primary, "PK"),
            (self.foreign, "FK"),
            (self.unique, "UK"),
        ]
        .into_iter()
        .filter_map(|(set, marker)| set.then_some(marker))
        .collect();

        if markers.is_empty() {
            None
        } else {
            Some(markers.join(","))
        }
    }

    /// Whether the field identifies a row, here or in another table
    pub fn is_identifier(&self) -> bool {
        self.primary || self.foreign
    }
}

/// Set of `(table, field)` pairs that sit on a non-"one" reference endpoint.
///
/// Built once per render from every reference, so flag derivation does not
/// rescan references per field. Tables are matched by bare name.
#[derive(Debug, Default)]
pub struct ForeignKeyIndex {
    fields_by_table: AHashMap<String, AHashSet<String>>,
}

impl ForeignKeyIndex {
    pub fn build(snapshot: &SchemaSnapshot) -> Self {
        let mut fields_by_table: AHashMap<String, AHashSet<String>> = AHashMap::new();

        for reference in &snapshot.refs {
            for endpoint in &reference.endpoints {
                if endpoint.relation == Relation::One {
                    continue;
                }
                fields_by_table
                    .entry(endpoint.table_name.clone())
                    .or_default()
                    .extend(endpoint.field_names.iter().cloned());
            }
        }

        Self { fields_by_table }
    }

    pub fn contains(&self, table: &str, field: &str) -> bool {
        self.fields_by_table
            .get(table)
            .is_some_and(|fields| fields.contains(field))
    }

    /// Number of `(table, field)` pairs
    pub fn len(&self) -> usize {
        self.fields_by_table.values().map(|fields| fields.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derive the key flags of `field` in `table`
pub fn derive_flags(
    snapshot: &SchemaSnapshot,
    fk_index: &ForeignKeyIndex,
    table: &Table,
    field: &str,
) -> KeyFlags {
    let constraint = snapshot.constraint_for(table, field);
    KeyFlags {
        primary: constraint.pk,
        foreign: fk_index.contains(&table.name, field),
        unique: constraint.unique,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Endpoint, FieldConstraint, Ref};

    #[test]
    fn test_markers() {
        assert_eq!(KeyFlags::default().markers(), None);
        let all = KeyFlags {
            primary: true,
            foreign: true,
            unique: true,
        };
        assert_eq!(all.markers().as_deref(), Some("PK,FK,UK"));
        let fk_uk = KeyFlags {
            primary: false,
            foreign: true,
            unique: true,
        };
        assert_eq!(fk_uk.markers().as_deref(), Some("FK,UK"));
    }

    #[test]
    fn test_one_side_is_not_a_foreign_key() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_ref(Ref::new(
            Endpoint::new("orders", ["user_id"], "*"),
            Endpoint::new("users", ["id"], "1"),
        ));
        let index = ForeignKeyIndex::build(&snapshot);

        assert!(index.contains("orders", "user_id"));
        assert!(!index.contains("users", "id"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_unknown_relation_counts_as_foreign_key() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_ref(Ref::new(
            Endpoint::new("profiles", ["user_id", "tenant_id"], "?"),
            Endpoint::new("users", ["id", "tenant_id"], "1"),
        ));
        let index = ForeignKeyIndex::build(&snapshot);

        assert!(index.contains("profiles", "user_id"));
        assert!(index.contains("profiles", "tenant_id"));
        assert!(!index.contains("users", "tenant_id"));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_fields_are_matched_per_table() {
        let mut snapshot = SchemaSnapshot::new();
        snapshot.add_ref(Ref::new(
            Endpoint::new("orders", ["user_id"], "*"),
            Endpoint::new("users", ["id"], "1"),
        ));
        snapshot.add_ref(Ref::new(
            Endpoint::new("orders", ["user_id", "coupon_id"], "*"),
            Endpoint::new("coupons", ["user_id", "id"], "1"),
        ));
        let index = ForeignKeyIndex::build(&snapshot);

        assert!(index.contains("orders", "coupon_id"));
        assert!(!index.contains("invoices", "user_id"));
        assert!(!index.contains("coupons", "user_id"));
        assert_eq!(index.len(), 2);
        assert!(ForeignKeyIndex::default().is_empty());
    }

    #[test]
    fn test_derive_flags_combines_sources() {
        let mut snapshot = SchemaSnapshot::new();
        let table = Table::new("profiles");
        snapshot.set_constraint(
            &table,
            "user_id",
            FieldConstraint {
                pk: true,
                unique: true,
            },
        );
        snapshot.add_ref(Ref::new(
            Endpoint::new("profiles", ["user_id"], "*"),
            Endpoint::new("users", ["id"], "1"),
        ));
        let index = ForeignKeyIndex::build(&snapshot);

        let flags = derive_flags(&snapshot, &index, &table, "user_id");
        assert!(flags.primary && flags.foreign && flags.unique);

        let none = derive_flags(&snapshot, &index, &table, "bio");
        assert_eq!(none, KeyFlags::default());
    }
}
