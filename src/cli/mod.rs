use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// harnet: human activity recognition trainer using recurrent networks
#[derive(Parser, Debug)]
#[command(name = "harnet")]
#[command(about = "Human activity recognition trainer using recurrent networks")]
#[command(version)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Train a model and evaluate it on the test split
    Train(TrainArgs),

    /// Inspect the test split without training
    Evaluate(EvaluateArgs),
}

/// Training arguments
#[derive(Parser, Debug)]
pub struct TrainArgs {
    /// Dataset directory containing train/ and test/ splits
    #[arg(short, long, required = true)]
    pub data: PathBuf,

    /// Output directory for charts and the results summary
    #[arg(short, long, default_value = "./output")]
    pub output: PathBuf,

    /// Architecture preset (LSTM1 or LSTM2)
    #[arg(short, long, default_value = "LSTM2")]
    pub preset: String,

    /// Number of training epochs
    #[arg(short, long)]
    pub epochs: Option<usize>,

    /// Random seed for weight initialization
    #[arg(long, default_value = "2026")]
    pub seed: u64,

    /// Quick test mode (fewer epochs)
    #[arg(long)]
    pub quick: bool,
}

/// Evaluation arguments
#[derive(Parser, Debug)]
pub struct EvaluateArgs {
    /// Dataset directory containing the test/ split
    #[arg(short, long, required = true)]
    pub data: PathBuf,

    /// Split to inspect
    #[arg(short, long, default_value = "test")]
    pub split: String,
}

/// Parse CLI arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Setup logging based on verbosity
pub fn setup_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .init();
}
