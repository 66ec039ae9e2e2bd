//! gradientiq CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "gradientiq",
    version,
    about = "Heuristic answer analysis and concept progression"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single answer
    Analyze {
        /// Concept the answer is for (e.g. "Loops")
        #[arg(long)]
        concept: String,

        /// File containing the answer
        #[arg(long, conflicts_with = "text")]
        answer: Option<PathBuf>,

        /// Answer text
        #[arg(long)]
        text: Option<String>,

        /// Catalog file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Replay recorded attempts through a session
    Replay {
        /// Replay script JSON
        #[arg(long)]
        script: PathBuf,

        /// Catalog file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// List catalog concepts
    Concepts {
        /// Catalog file (default: built-in catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Only show one subject
        #[arg(long)]
        subject: Option<String>,
    },

    /// Validate catalog TOML files
    Validate {
        /// Path to catalog file or directory
        #[arg(long)]
        catalog: PathBuf,
    },

    /// Create starter config and example catalog
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gradientiq=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Analyze {
            concept,
            answer,
            text,
            catalog,
            config,
            format,
        } => commands::analyze::execute(concept, answer, text, catalog, config, format),
        Commands::Replay {
            script,
            catalog,
            config,
            format,
        } => commands::replay::execute(script, catalog, config, format),
        Commands::Concepts { catalog, subject } => commands::concepts::execute(catalog, subject),
        Commands::Validate { catalog } => commands::validate::execute(catalog),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
