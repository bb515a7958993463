//! Crow's-foot relationship lines.

use crate::snapshot::{Endpoint, Ref, Relation};
use std::fmt;

/// Base glyph at the left end; completed by [`cascade_suffix`]
pub fn left_base_symbol(relation: &Relation) -> &'static str {
    match relation {
        Relation::Many => "}",
        Relation::One => "|",
        Relation::Other(_) => "|",
    }
}

/// Full glyph at the right end. `onDelete` does not affect it.
pub fn right_symbol(relation: &Relation) -> &'static str {
    match relation {
        Relation::Many => "o{",
        Relation::One => "||",
        Relation::Other(_) => "||",
    }
}

/// `|` when deletes cascade, `o` otherwise
pub fn cascade_suffix(reference: &Ref) -> &'static str {
    if reference.cascades_on_delete() {
        "|"
    } else {
        "o"
    }
}

/// The connector between the two table names, e.g. `}|--||`
pub fn notation(reference: &Ref, left: &Endpoint, right: &Endpoint) -> String {
    format!(
        "{}{}--{}",
        left_base_symbol(&left.relation),
        cascade_suffix(reference),
        right_symbol(&right.relation)
    )
}

/// A rendered relationship line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationshipLine {
    pub left_table: String,
    pub left_fields: Vec<String>,
    pub right_table: String,
    pub right_fields: Vec<String>,
    pub notation: String,
    pub on_delete: Option<String>,
}

impl RelationshipLine {
    /// `left.cols -> right.cols`, composite keys comma-joined
    pub fn label(&self) -> String {
        format!(
            "{}.{} -> {}.{}",
            self.left_table,
            self.left_fields.join(","),
            self.right_table,
            self.right_fields.join(",")
        )
    }

    pub fn touches(&self, table: &str) -> bool {
        self.left_table == table || self.right_table == table
    }
}

impl fmt::Display for RelationshipLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{} : \"{}\"",
            self.left_table,
            self.notation,
            self.right_table,
            self.label()
        )
    }
}

/// Render a reference, or `None` when it lacks either endpoint
pub fn render_relationship(reference: &Ref) -> Option<RelationshipLine> {
    let (left, right) = reference.sides()?;

    Some(RelationshipLine {
        left_table: left.table_name.clone(),
        left_fields: left.field_names.clone(),
        right_table: right.table_name.clone(),
        right_fields: right.field_names.clone(),
        notation: notation(reference, left, right),
        on_delete: reference.on_delete.clone(),
    })
}
