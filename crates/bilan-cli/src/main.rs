//! bilan CLI — score datasets and render audience reports from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bilan", version, about = "Diagnostic scoring and bilan rendering engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a dataset against a curriculum definition
    Score {
        /// Path to the student dataset (JSON)
        #[arg(long)]
        dataset: PathBuf,

        /// Path to the curriculum definition (TOML)
        #[arg(long)]
        definition: PathBuf,

        /// Output directory
        #[arg(long, default_value = "./bilan-results")]
        output: PathBuf,

        /// Output format: json, markdown, all
        #[arg(long, default_value = "json")]
        format: String,
    },

    /// Print the retrieval queries for a scored dataset
    Queries {
        /// Path to the student dataset (JSON)
        #[arg(long)]
        dataset: PathBuf,

        /// Path to the curriculum definition (TOML)
        #[arg(long)]
        definition: PathBuf,
    },

    /// Validate curriculum definition TOML files
    Validate {
        /// Path to a definition file or directory
        #[arg(long)]
        definition: PathBuf,
    },

    /// Create a starter definition and example dataset
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("bilan=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            dataset,
            definition,
            output,
            format,
        } => commands::score::execute(dataset, definition, output, format),
        Commands::Queries {
            dataset,
            definition,
        } => commands::queries::execute(dataset, definition),
        Commands::Validate { definition } => commands::validate::execute(definition),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
