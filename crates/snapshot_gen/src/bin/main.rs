//! CLI for generating schema snapshot fixtures.
//!
//! Usage:
//!   gen-snapshot --scale small --seed 42 > fixtures/small.json
//!   gen-snapshot --scale large --no-postgis --malformed-ref -o large.json

use clap::Parser;
use snapshot_gen::{Generator, GeneratorOptions, Scale};
use std::fs;

#[derive(Parser, Debug)]
#[command(name = "gen-snapshot")]
#[command(about = "Generate schema snapshot fixtures for mermaid-erd", long_about = None)]
struct Args {
    /// Scale preset: small, medium, large, xlarge
    #[arg(short, long, default_value = "small")]
    scale: String,

    /// Random seed for reproducibility
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Skip the PostGIS spatial_ref_sys table
    #[arg(long)]
    no_postgis: bool,

    /// Append a reference with a missing endpoint
    #[arg(long)]
    malformed_ref: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let scale: Scale = args.scale.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    let options = GeneratorOptions {
        postgis: !args.no_postgis,
        malformed_ref: args.malformed_ref,
    };

    let snapshot = Generator::with_options(args.seed, scale, options).generate();
    let json = snapshot.to_json()?;

    if let Some(ref path) = args.output {
        fs::write(path, &json)?;
        eprintln!(
            "Generated {} tables, {} fields, {} refs to {}",
            snapshot.tables.len(),
            snapshot.field_count(),
            snapshot.refs.len(),
            path
        );
    } else {
        println!("{}", json);
    }

    Ok(())
}
