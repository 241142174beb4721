//! Candidate ranker: hybrid candidate-to-job ranking tool

use candidate_ranker::cli::{self, Cli, Commands, ConfigAction};
use candidate_ranker::config::Config;
use candidate_ranker::error::{RankerError, Result};
use candidate_ranker::index::{HashEmbedder, MemoryIndex};
use candidate_ranker::input::loader;
use candidate_ranker::matching::engine::Pipeline;
use candidate_ranker::output::formatter::{formatter_for, ReportFormatter};
use clap::Parser;
use indicatif::ProgressBar;
use log::{error, info};
use std::path::PathBuf;
use std::process;
use std::time::Duration;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli.command, cli.config, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&std::path::Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(
    command: Commands,
    config_path: Option<PathBuf>,
    mut config: Config,
) -> Result<()> {
    match command {
        Commands::Rank {
            candidates,
            jobs,
            top_k,
            output,
            save,
        } => {
            if let Some(k) = top_k {
                config.ranking.top_k = k;
            }
            if let Some(format) = &output {
                config.output.format =
                    cli::parse_output_format(format).map_err(RankerError::InvalidInput)?;
            }

            let candidate_outcome = loader::load_candidates(&candidates)?;
            let job_outcome = loader::load_jobs(&jobs)?;
            info!(
                "Loaded {} candidate records and {} job records",
                candidate_outcome.records.len(),
                job_outcome.records.len()
            );

            let embedder = HashEmbedder::new(config.index.embedding_dim);
            let pipeline = Pipeline::new(config.clone(), MemoryIndex::new(), embedder)?;

            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("Ranking {} jobs", job_outcome.records.len()));
            spinner.enable_steady_tick(Duration::from_millis(100));
            let run = pipeline
                .run(&candidate_outcome.records, &job_outcome.records)
                .await;
            spinner.finish_and_clear();
            let mut report = run?;

            // Loader skips join the pipeline's own, so one report covers the
            // whole batch.
            let mut skipped = candidate_outcome.skipped;
            skipped.extend(job_outcome.skipped);
            skipped.extend(report.skipped);
            report.skipped = skipped;

            let rendered = formatter_for(&config.output).format(&report)?;
            match save {
                Some(path) => {
                    std::fs::write(&path, rendered)?;
                    info!("Report written to {}", path.display());
                }
                None => print!("{}", rendered),
            }

            if !report.failures.is_empty() {
                error!("{} jobs failed to rank", report.failures.len());
            }
        }

        Commands::Config { action } => {
            let path = config_path.unwrap_or_else(Config::config_path);
            match action {
                Some(ConfigAction::Show) | None => {
                    let rendered = toml::to_string_pretty(&config).map_err(|e| {
                        RankerError::Configuration(format!("Failed to render config: {}", e))
                    })?;
                    println!("# {}", path.display());
                    print!("{}", rendered);
                }

                Some(ConfigAction::Reset) => {
                    Config::default().save_to(&path)?;
                    println!("Configuration reset: {}", path.display());
                }

                Some(ConfigAction::Path) => {
                    println!("{}", path.display());
                }
            }
        }
    }

    Ok(())
}
