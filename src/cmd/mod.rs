mod render;
mod schema;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

pub use render::RenderArgs;

#[derive(Parser)]
#[command(name = "mermaid-erd")]
#[command(version)]
#[command(
    about = "Render an introspected database schema as a Mermaid ER diagram",
    long_about = None
)]
pub struct Cli {
    /// Verbose diagnostics on stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Render a schema snapshot (introspection JSON) as a Mermaid erDiagram
    Render {
        /// Schema snapshot JSON file, or - for stdin
        #[arg(env = "ERD_SNAPSHOT")]
        snapshot: PathBuf,

        /// Output markdown file (replaced if it exists)
        #[arg(short, long, default_value = "output/result.md")]
        output: PathBuf,

        /// YAML config file (exclude, layout, fence, notes)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Exclude additional tables by bare name (comma-separated)
        #[arg(short, long)]
        exclude: Option<String>,

        /// Layout engine hint for the diagram header (default: elk)
        #[arg(long)]
        layout: Option<String>,

        /// Code fence info string (default: mermaid; use "diagram" for a generic fence)
        #[arg(long)]
        fence: Option<String>,

        /// Append field notes to attribute lines
        #[arg(long)]
        notes: bool,

        /// Print the diagram to stdout instead of writing a file
        #[arg(long, conflicts_with = "json")]
        stdout: bool,

        /// Print a JSON summary of the rendered diagram to stdout
        #[arg(long)]
        json: bool,
    },

    /// Print JSON Schemas for the snapshot input and --json output
    Schema {
        /// Schema name: render, snapshot (default: all)
        name: Option<String>,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Install the stderr log subscriber
fn init_logging(verbose: bool) {
    let default = if verbose { "mermaid_erd=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    init_logging(cli.verbose);

    match cli.command {
        Commands::Render {
            snapshot,
            output,
            config,
            exclude,
            layout,
            fence,
            notes,
            stdout,
            json,
        } => render::run(RenderArgs {
            snapshot,
            output,
            config,
            exclude,
            layout,
            fence,
            notes,
            stdout,
            json,
        }),
        Commands::Schema { name } => schema::run(name),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "mermaid-erd", &mut io::stdout());
            Ok(())
        }
    }
}
