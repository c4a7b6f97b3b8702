//! shopfloor - boot a simulated job shop and push task sets through it.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use shopfloor_core::domain::TaskSetSpec;
use shopfloor_core::{FloorBuilder, FloorConfig};

#[derive(Parser)]
#[command(name = "shopfloor")]
#[command(about = "Simulated job shop: transport workers, station crews and facility pools")]
struct Cli {
    /// Floor configuration (TOML). Defaults to 2 of every facility and role.
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit task sets and wait for them to finish
    Run {
        /// Task sets to submit (.json array, or .toml with `[[task_sets]]`).
        /// Without it the three-product demo is submitted.
        #[arg(short, long, value_name = "FILE")]
        jobs: Option<PathBuf>,

        /// Give up waiting after this many seconds
        #[arg(long, default_value = "60")]
        budget_secs: u64,
    },
    /// Print the effective configuration as TOML
    Config,
}

#[derive(Debug, Deserialize)]
struct JobsFile {
    task_sets: Vec<TaskSetSpec>,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::Level::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<FloorConfig> {
    match path {
        Some(path) => Ok(FloorConfig::load(path)?),
        None => Ok(FloorConfig::default()),
    }
}

fn load_jobs(path: &Path) -> Result<Vec<TaskSetSpec>> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&raw).with_context(|| format!("invalid jobs file {}", path.display())),
        Some("toml") => {
            let file: JobsFile = toml::from_str(&raw).with_context(|| format!("invalid jobs file {}", path.display()))?;
            Ok(file.task_sets)
        }
        _ => bail!("jobs file must end in .json or .toml: {}", path.display()),
    }
}

/// Steel bar, steel wool and steel pot, each through the whole line.
fn demo_jobs() -> Vec<TaskSetSpec> {
    let line = ["pickup", "welding", "assembly", "painting", "dropoff"];
    let products = [
        ["Steel bar", "Weld bar", "Assemble bar", "Paint bar", "Drop off bar"],
        ["Steel wool", "Weld wool", "Assemble wool", "Paint wool", "Drop off wool"],
        ["Steel pot", "Weld pot", "Assemble pot", "Paint pot", "Drop off pot"],
    ];
    products
        .iter()
        .zip(1..)
        .map(|(descriptions, id)| TaskSetSpec::from_pairs(id, line.iter().copied().zip(descriptions.iter().copied())))
        .collect()
}

async fn run(config: FloorConfig, jobs: Option<PathBuf>, budget: Duration) -> Result<()> {
    let jobs = match jobs {
        Some(path) => load_jobs(&path)?,
        None => demo_jobs(),
    };

    let floor = FloorBuilder::from_config(config).boot().await?;

    let mut submitted = 0;
    for spec in jobs {
        match floor.submit(spec).await {
            Ok(id) => {
                tracing::info!(task_set = %id, "submitted");
                submitted += 1;
            }
            Err(err) => tracing::warn!(%err, "skipped task set"),
        }
    }

    if !floor.wait_for_completed(submitted, budget).await {
        tracing::warn!(
            completed = floor.completed(),
            submitted,
            budget_secs = budget.as_secs(),
            "budget ran out before every task set finished"
        );
    } else if !floor.wait_until_idle(budget).await {
        tracing::warn!("workers still returning when the budget ran out");
    }

    let counts = floor.counts().await;
    println!("{}", serde_json::to_string_pretty(&counts)?);
    floor.shutdown().await;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Run { jobs, budget_secs } => run(config, jobs, Duration::from_secs(budget_secs)).await,
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_is_three_full_line_task_sets() {
        let jobs = demo_jobs();
        assert_eq!(jobs.len(), 3);
        for spec in jobs {
            let task_set = spec.into_task_set().unwrap();
            assert_eq!(task_set.tasks.len(), 5);
        }
    }

    #[test]
    fn toml_jobs_file_parses() {
        let file: JobsFile = toml::from_str(
            r#"
            [[task_sets]]
            id = 4
            steps = [
                { station = "pickup", description = "Copper rod" },
                { station = "Painting", description = "Paint rod" },
            ]
            "#,
        )
        .unwrap();
        assert_eq!(file.task_sets.len(), 1);
        assert!(file.task_sets[0].clone().into_task_set().is_ok());
    }
}
