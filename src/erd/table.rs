//! Entity blocks: one per included table.

use crate::erd::flags::{derive_flags, ForeignKeyIndex, KeyFlags};
use crate::snapshot::{SchemaSnapshot, Table};
use std::fmt;

/// Prefix stripped from stored type names
pub const SCHEMA_TYPE_PREFIX: &str = "public.";

/// Identifier columns stored as `text` hold UUIDv7 values
pub const IDENTIFIER_TYPE: &str = "uuid(7)";

/// Type name shown in the diagram for a field.
///
/// Strips one leading `public.`; a `text` key column is shown as `uuid(7)`.
pub fn display_type(type_name: &str, flags: KeyFlags) -> &str {
    let stripped = type_name
        .strip_prefix(SCHEMA_TYPE_PREFIX)
        .unwrap_or(type_name);

    if stripped == "text" && flags.is_identifier() {
        IDENTIFIER_TYPE
    } else {
        stripped
    }
}

/// A rendered attribute line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    pub name: String,
    /// Type as stored by the database
    pub type_name: String,
    /// Type as shown in the diagram
    pub display_type: String,
    pub flags: KeyFlags,
    pub note: Option<String>,
}

impl fmt::Display for FieldLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.display_type, self.name)?;
        if let Some(markers) = self.flags.markers() {
            write!(f, " {}", markers)?;
        }
        if let Some(ref note) = self.note {
            write!(f, " \"{}\"", note.replace('"', "\\\""))?;
        }
        Ok(())
    }
}

/// A rendered entity block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableBlock {
    pub name: String,
    pub schema: String,
    pub fields: Vec<FieldLine>,
}

impl fmt::Display for TableBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {{", self.name)?;
        for field in &self.fields {
            writeln!(f, "  {}", field)?;
        }
        writeln!(f, "}}")
    }
}

/// Render the entity block for `table`, fields in declaration order
pub fn render_table(
    snapshot: &SchemaSnapshot,
    fk_index: &ForeignKeyIndex,
    table: &Table,
    with_notes: bool,
) -> TableBlock {
    let fields = snapshot
        .fields_for(table)
        .iter()
        .map(|field| {
            let flags = derive_flags(snapshot, fk_index, table, &field.name);
            FieldLine {
                name: field.name.clone(),
                type_name: field.type_name().to_string(),
                display_type: display_type(field.type_name(), flags).to_string(),
                flags,
                note: field
                    .note
                    .as_ref()
                    .filter(|_| with_notes)
                    .map(|n| n.text().to_string()),
            }
        })
        .collect();

    TableBlock {
        name: table.name.clone(),
        schema: table.schema().to_string(),
        fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{Endpoint, Field, FieldConstraint, Ref};

    const PK: KeyFlags = KeyFlags {
        primary: true,
        foreign: false,
        unique: false,
    };
    const FK: KeyFlags = KeyFlags {
        primary: false,
        foreign: true,
        unique: false,
    };
    const UK: KeyFlags = KeyFlags {
        primary: false,
        foreign: false,
        unique: true,
    };

    #[test]
    fn test_display_type_strips_public_prefix() {
        assert_eq!(display_type("public.citext", KeyFlags::default()), "citext");
        assert_eq!(display_type("int4", PK), "int4");
        assert_eq!(display_type("auth.role", KeyFlags::default()), "auth.role");
        assert_eq!(display_type("public.public.x", KeyFlags::default()), "public.x");
    }

    #[test]
    fn test_text_keys_become_uuid7() {
        assert_eq!(display_type("public.text", PK), "uuid(7)");
        assert_eq!(display_type("text", FK), "uuid(7)");
        assert_eq!(display_type("text", UK), "text");
        assert_eq!(display_type("public.text", KeyFlags::default()), "text");
        assert_eq!(display_type("varchar", PK), "varchar");
        assert_eq!(display_type("text[]", FK), "text[]");
    }

    #[test]
    fn test_field_line_format() {
        let line = FieldLine {
            name: "email".to_string(),
            type_name: "public.text".to_string(),
            display_type: "text".to_string(),
            flags: UK,
            note: None,
        };
        assert_eq!(line.to_string(), "text email UK");

        let plain = FieldLine {
            flags: KeyFlags::default(),
            ..line.clone()
        };
        assert_eq!(plain.to_string(), "text email");

        let noted = FieldLine {
            note: Some("the \"login\"".to_string()),
            ..line
        };
        assert_eq!(noted.to_string(), "text email UK \"the \\\"login\\\"\"");
    }

    #[test]
    fn test_render_table_block() {
        let mut snapshot = SchemaSnapshot::new();
        let users = Table::new("users");
        snapshot.add_table(
            users.clone(),
            vec![
                Field::new("id", "public.text"),
                Field::new("email", "public.text").with_note("login"),
                Field::new("created_at", "timestamptz"),
            ],
        );
        snapshot.set_constraint(
            &users,
            "id",
            FieldConstraint {
                pk: true,
                unique: false,
            },
        );
        snapshot.set_constraint(
            &users,
            "email",
            FieldConstraint {
                pk: false,
                unique: true,
            },
        );
        snapshot.add_ref(Ref::new(
            Endpoint::new("sessions", ["user_id"], "*"),
            Endpoint::new("users", ["id"], "1"),
        ));
        let index = ForeignKeyIndex::build(&snapshot);

        let block = render_table(&snapshot, &index, &users, false);
        assert_eq!(
            block.to_string(),
            "users {\n  uuid(7) id PK\n  text email UK\n  timestamptz created_at\n}\n"
        );

        let with_notes = render_table(&snapshot, &index, &users, true);
        assert_eq!(with_notes.fields[1].to_string(), "text email UK \"login\"");
    }

    #[test]
    fn test_table_without_fields_renders_empty_block() {
        let snapshot = SchemaSnapshot::new();
        let index = ForeignKeyIndex::default();
        let block = render_table(&snapshot, &index, &Table::new("empty"), false);

        assert!(block.fields.is_empty());
        assert_eq!(block.to_string(), "empty {\n}\n");
    }
}
