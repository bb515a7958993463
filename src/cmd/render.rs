//! Render command: snapshot JSON in, fenced Mermaid ER diagram out.

use crate::config::ErdConfig;
use crate::erd::{to_json, ErdRenderer, RenderStats};
use crate::snapshot::SchemaSnapshot;
use crate::writer::DiagramWriter;
use anyhow::{Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;

/// Options for the render command
#[derive(Debug, Default)]
pub struct RenderArgs {
    pub snapshot: PathBuf,
    pub output: PathBuf,
    pub config: Option<PathBuf>,
    pub exclude: Option<String>,
    pub layout: Option<String>,
    pub fence: Option<String>,
    pub notes: bool,
    pub stdout: bool,
    pub json: bool,
}

/// Run the render command
pub fn run(args: RenderArgs) -> Result<()> {
    let config = build_config(&args)?;

    let snapshot = SchemaSnapshot::load(&args.snapshot)?;
    tracing::info!(
        snapshot = %args.snapshot.display(),
        tables = snapshot.tables.len(),
        refs = snapshot.refs.len(),
        "loaded schema snapshot"
    );

    let renderer = ErdRenderer::new(&snapshot, &config);

    let stats = if args.stdout {
        let stdout = io::stdout().lock();
        let (mut sink, stats) = renderer.render_to(DiagramWriter::new(stdout))?;
        sink.write_all(b"\n")?;
        stats
    } else {
        let writer = DiagramWriter::create(&args.output)
            .with_context(|| format!("failed to create output file: {}", args.output.display()))?;
        let (_, stats) = renderer.render_to(writer)?;
        if !args.json {
            eprintln!("ERD written to: {}", args.output.display());
        }
        stats
    };

    if args.json {
        println!("{}", to_json(&renderer));
    } else {
        print_summary(&stats);
    }

    Ok(())
}

/// Merge the YAML file (if any) with command-line overrides
fn build_config(args: &RenderArgs) -> Result<ErdConfig> {
    let mut config = match args.config {
        Some(ref path) => ErdConfig::load(path)
            .with_context(|| format!("failed to load config: {}", path.display()))?,
        None => ErdConfig::default(),
    };

    if let Some(ref exclude) = args.exclude {
        config = config.with_excludes(
            exclude
                .split(',')
                .map(|s| s.trim())
                .filter(|s| !s.is_empty()),
        );
    }
    if let Some(ref layout) = args.layout {
        config = config.with_layout(layout);
    }
    if let Some(ref fence) = args.fence {
        config = config.with_fence(fence);
    }
    if args.notes {
        config = config.with_notes(true);
    }

    tracing::debug!(exclude = ?config.sorted_excludes(), layout = %config.layout, "render configuration");
    Ok(config)
}

fn print_summary(stats: &RenderStats) {
    eprintln!(
        "\nERD: {} tables, {} fields, {} relationships",
        stats.tables, stats.fields, stats.relationships
    );
    if stats.excluded_tables > 0 {
        eprintln!("Excluded tables: {}", stats.excluded_tables);
    }
    if stats.skipped_refs() > 0 {
        eprintln!(
            "Skipped references: {} ({} malformed, {} to excluded tables)",
            stats.skipped_refs(),
            stats.malformed_refs,
            stats.excluded_refs
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_excludes_extend_config() {
        let args = RenderArgs {
            exclude: Some("audit_log, ,sessions".to_string()),
            layout: Some("dagre".to_string()),
            notes: true,
            ..Default::default()
        };
        let config = build_config(&args).unwrap();

        assert!(config.is_excluded("spatial_ref_sys"));
        assert!(config.is_excluded("audit_log"));
        assert!(config.is_excluded("sessions"));
        assert!(!config.is_excluded(""));
        assert_eq!(config.layout, "dagre");
        assert!(config.notes);
    }
}
