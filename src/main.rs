mod allocation;
mod commands;
mod formats;
mod model;
mod read_metadata;
mod reporting;
mod util;

use crate::commands::{allocate, info};
use crate::reporting::Verbosity;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
struct Opts {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate and dump info about an election file.
    Info {
        /// Election metadata file (JSON).
        election_file: PathBuf,
    },
    /// Allocate mandates from the election's vote file.
    Allocate {
        /// Election metadata file (JSON).
        election_file: PathBuf,
        /// Show per-round quotients and alliance splits
        #[clap(short, long)]
        verbose: bool,
        /// Only print the final distribution
        #[clap(short, long, conflicts_with = "verbose")]
        quiet: bool,
        /// Write the full allocation report as JSON
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

fn main() {
    let opts = Opts::parse();

    let result = match opts.command {
        Command::Info { election_file } => info(&election_file),
        Command::Allocate {
            election_file,
            verbose,
            quiet,
            output,
        } => {
            let verbosity = if quiet {
                Verbosity::Quiet
            } else if verbose {
                Verbosity::Detailed
            } else {
                Verbosity::Summary
            };
            allocate(&election_file, verbosity, output.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }
}
