//! TutorBot CLI — the main entry point.
//!
//! Commands:
//! - `init`      — Write the default config
//! - `status`    — Initialize the engine and report its status
//! - `ask`       — Ask a question about your code
//! - `grade`     — Grade code against an assignment
//! - `validate`  — Run the code, then decide whether the assignment is passed

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(
    name = "tutorbot",
    about = "TutorBot — a lenient programming tutor for beginners",
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

/// Student state shared by the tutoring commands.
#[derive(Args, Debug, Clone, Default)]
pub struct StudentArgs {
    /// Student code file (repeatable; the first one is the entry file)
    #[arg(short, long = "file", value_name = "PATH")]
    pub files: Vec<PathBuf>,

    /// Assignment description (markdown file)
    #[arg(short, long, value_name = "PATH")]
    pub assignment: Option<PathBuf>,

    /// Result of the last run (JSON file with stdout/stderr/error)
    #[arg(long, value_name = "PATH")]
    pub run_result: Option<PathBuf>,

    /// Print the verdict as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default configuration file
    Init,

    /// Initialize the generation engine and show its status
    Status {
        /// Print the status as JSON
        #[arg(long)]
        json: bool,
    },

    /// Ask a question about your code
    Ask {
        /// The question
        question: String,

        #[command(flatten)]
        student: StudentArgs,
    },

    /// Grade code against an assignment
    Grade {
        #[command(flatten)]
        student: StudentArgs,
    },

    /// Check whether the assignment is passed
    Validate {
        #[command(flatten)]
        student: StudentArgs,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init => commands::init::run().await?,
        Commands::Status { json } => commands::status::run(json).await?,
        Commands::Ask { question, student } => commands::ask::run(question, student).await?,
        Commands::Grade { student } => commands::grade::run(student).await?,
        Commands::Validate { student } => commands::validate::run(student).await?,
    }

    Ok(())
}
