//! CLI interface for the candidate ranker

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "candidate-ranker")]
#[command(about = "Rank candidates against job descriptions")]
#[command(
    long_about = "Combines embedding similarity from a vector index with skill overlap and experience fit into a deterministic ranked list per job description"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank a candidate pool against job descriptions
    Rank {
        /// Candidate JSON file, or a directory of them
        #[arg(long)]
        candidates: PathBuf,

        /// Job description JSON file, or a directory of them
        #[arg(short, long)]
        jobs: PathBuf,

        /// Candidates kept per job (overrides configuration)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Output format: console, json, csv (overrides configuration)
        #[arg(short, long)]
        output: Option<String>,

        /// Write the report to a file instead of stdout
        #[arg(short, long)]
        save: Option<PathBuf>,
    },

    /// Show or manage configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file path
    Path,
}

/// Parse and validate output format
pub fn parse_output_format(format: &str) -> Result<crate::config::OutputFormat, String> {
    match format.to_lowercase().as_str() {
        "console" => Ok(crate::config::OutputFormat::Console),
        "json" => Ok(crate::config::OutputFormat::Json),
        "csv" => Ok(crate::config::OutputFormat::Csv),
        _ => Err(format!(
            "Invalid output format: {}. Supported: console, json, csv",
            format
        )),
    }
}
