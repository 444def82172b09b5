//! appforge CLI — the main entry point.
//!
//! Commands:
//! - `init`     — Write default config, prompt templates, and context stubs
//! - `generate` — Run the full pipeline: stages → extraction → materialization

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "appforge",
    about = "appforge — staged AI codebase generator",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize configuration, prompt templates, and context stubs
    Init,

    /// Generate a codebase from an app description
    Generate {
        /// The app description, given inline
        description: Option<String>,

        /// Read the app description from a file instead
        #[arg(short, long, conflicts_with = "description")]
        file: Option<std::path::PathBuf>,

        /// Session id for the materialization agent (resumes prior transcripts)
        #[arg(short, long)]
        session: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Init => commands::init::run(),
        Commands::Generate {
            description,
            file,
            session,
        } => commands::generate::run(description, file, session).await,
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(e.exit_code());
    }
}
