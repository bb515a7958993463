//! Full-document rendering: header, entity blocks, relationships, footer.

use crate::config::ErdConfig;
use crate::erd::flags::ForeignKeyIndex;
use crate::erd::relationship::{render_relationship, RelationshipLine};
use crate::erd::table::{render_table, TableBlock};
use crate::snapshot::{SchemaSnapshot, Table};
use crate::writer::DiagramWriter;
use std::io::Write;

/// Counters collected while rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub tables: usize,
    pub excluded_tables: usize,
    pub fields: usize,
    pub relationships: usize,
    /// References with a missing endpoint
    pub malformed_refs: usize,
    /// References dropped because they touch an excluded table
    pub excluded_refs: usize,
}

impl RenderStats {
    pub fn skipped_refs(&self) -> usize {
        self.malformed_refs + self.excluded_refs
    }
}

/// Renders one snapshot with one configuration.
///
/// Both passes read the same snapshot; neither depends on the other's output.
pub struct ErdRenderer<'a> {
    snapshot: &'a SchemaSnapshot,
    config: &'a ErdConfig,
    fk_index: ForeignKeyIndex,
}

impl<'a> ErdRenderer<'a> {
    pub fn new(snapshot: &'a SchemaSnapshot, config: &'a ErdConfig) -> Self {
        Self {
            snapshot,
            config,
            fk_index: ForeignKeyIndex::build(snapshot),
        }
    }

    /// Tables that get an entity block, in input order
    pub fn included_tables(&self) -> impl Iterator<Item = &'a Table> + '_ {
        self.snapshot
            .tables
            .iter()
            .filter(|t| !self.config.is_excluded(&t.name))
    }

    /// Names of tables left out, in input order
    pub fn excluded_tables(&self) -> Vec<String> {
        self.snapshot
            .tables
            .iter()
            .filter(|t| self.config.is_excluded(&t.name))
            .map(|t| t.name.clone())
            .collect()
    }

    pub fn table_blocks(&self) -> Vec<TableBlock> {
        self.included_tables()
            .map(|t| render_table(self.snapshot, &self.fk_index, t, self.config.notes))
            .collect()
    }

    /// Relationship lines in reference order, with skip counts
    pub fn relationship_lines(&self) -> (Vec<RelationshipLine>, RenderStats) {
        let mut stats = RenderStats::default();
        let mut lines = Vec::new();

        for (i, reference) in self.snapshot.refs.iter().enumerate() {
            let Some(line) = render_relationship(reference) else {
                tracing::debug!(index = i, "skipping reference without two endpoints");
                stats.malformed_refs += 1;
                continue;
            };

            if self.config.is_excluded(&line.left_table)
                || self.config.is_excluded(&line.right_table)
            {
                tracing::debug!(
                    left = %line.left_table,
                    right = %line.right_table,
                    "skipping reference to excluded table"
                );
                stats.excluded_refs += 1;
                continue;
            }

            lines.push(line);
        }

        stats.relationships = lines.len();
        (lines, stats)
    }

    /// Stream the whole document into `writer` and close it
    pub fn render_to<W: Write>(
        &self,
        mut writer: DiagramWriter<W>,
    ) -> std::io::Result<(W, RenderStats)> {
        writer.write_header(&self.config.fence, &self.config.layout)?;

        let mut table_count = 0;
        let mut field_count = 0;
        for table in self.included_tables() {
            let block = render_table(self.snapshot, &self.fk_index, table, self.config.notes);
            tracing::debug!(
                table = %block.name,
                schema = %block.schema,
                fields = block.fields.len(),
                "rendered table"
            );
            table_count += 1;
            field_count += block.fields.len();
            writer.write_table_block(&block.to_string())?;
        }

        let (lines, mut stats) = self.relationship_lines();
        for line in &lines {
            writer.write_relationship(&line.to_string())?;
        }

        stats.tables = table_count;
        stats.fields = field_count;
        stats.excluded_tables = self.snapshot.tables.len() - table_count;

        let sink = writer.finish()?;
        Ok((sink, stats))
    }

    /// Render the whole document to a string
    pub fn render_to_string(&self) -> String {
        // Writes into a Vec cannot fail.
        match self.render_to(DiagramWriter::new(Vec::new())) {
            Ok((bytes, _)) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => String::new(),
        }
    }
}
