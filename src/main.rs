// Library items used only by tests and benches are compiled into the binary too
#![allow(dead_code)]

mod cmd;
mod config;
mod erd;
mod json_schema;
mod snapshot;
mod writer;

use clap::Parser;
use cmd::Cli;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = cmd::run(cli) {
        eprintln!("{e:#}");
        std::process::exit(1);
    }
}
