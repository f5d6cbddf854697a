//! wirekit CLI - Code generator for wirekit message codecs
//!
//! Commands:
//! - `wirekit generate` - Write generated units to a directory
//! - `wirekit check` - Report accepted, skipped and failing declarations
//! - `wirekit describe` - Print the descriptors of every message

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod check;
mod describe;
mod generate;
mod sources;

use sources::SourceArgs;

#[derive(Parser)]
#[command(name = "wirekit")]
#[command(author, version, about = "Code generator for wirekit message codecs", long_about = None)]
struct Cli {
    /// Log at debug level (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate units for every marked declaration
    Generate {
        #[command(flatten)]
        sources: SourceArgs,

        /// Output directory for generated units
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path generated code uses to reach the runtime (default: ::wirekit)
        #[arg(long)]
        runtime_path: Option<String>,
    },

    /// Check declarations without writing anything
    Check {
        #[command(flatten)]
        sources: SourceArgs,
    },

    /// Print message descriptors
    Describe {
        #[command(flatten)]
        sources: SourceArgs,

        /// Print JSON instead of schema text
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            sources,
            output,
            runtime_path,
        } => {
            generate::run(&sources, output, runtime_path)?;
        }
        Commands::Check { sources } => {
            check::run(&sources)?;
        }
        Commands::Describe { sources, json } => {
            describe::run(&sources, json)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
