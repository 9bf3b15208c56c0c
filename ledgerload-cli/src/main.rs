mod profiles;

use anyhow::{bail, Context};
use clap::Parser;
use ledgerload::LoadGenerator;
use ledgerload_core::{RunReport, RunResults};
use mock_ledger::MockLedger;
use profiles::Profile;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
#[allow(unused)]
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Stress-run orchestrator for the ledgerload transaction generator.
#[derive(Parser, Debug)]
#[command(name = "ledgerload", version, about)]
struct Cli {
    /// Profiles to run; see --list for the catalog.
    profiles: Vec<String>,

    /// Run every profile in the catalog.
    #[arg(long, conflicts_with = "profiles")]
    all: bool,

    /// List the available profiles and exit.
    #[arg(long)]
    list: bool,

    /// Directory for JSON run reports.
    #[arg(long, default_value = "reports")]
    output_dir: PathBuf,

    /// Per-profile wall-clock limit (e.g. `90s`, `5m`).
    #[arg(long, default_value = "5m", value_parser = humantime::parse_duration)]
    timeout: Duration,

    /// Skip writing JSON reports.
    #[arg(long)]
    no_reports: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Cli::parse()).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<bool> {
    if cli.list {
        for profile in profiles::catalog() {
            println!("{:<16} {}", profile.name, profile.description);
        }
        return Ok(true);
    }

    let selected = if cli.all {
        profiles::catalog()
    } else {
        profiles::resolve(&cli.profiles)?
    };
    if selected.is_empty() {
        bail!("no profiles selected, pass profile names or --all");
    }

    if !cli.no_reports {
        std::fs::create_dir_all(&cli.output_dir)
            .with_context(|| format!("creating {}", cli.output_dir.display()))?;
    }

    let mut failed = 0usize;
    for profile in &selected {
        info!(profile = profile.name, "Starting profile");
        match run_profile(profile, cli.timeout).await {
            Ok(results) => {
                println!("--- {} ---", profile.name);
                print!("{results}");
                if !cli.no_reports {
                    if let Err(err) = write_report(&cli.output_dir, profile, &results) {
                        warn!(profile = profile.name, "failed to write report: {err:#}");
                    }
                }
            }
            Err(err) => {
                error!(profile = profile.name, "Profile failed: {err:#}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        warn!("{failed}/{} profiles failed", selected.len());
    }
    Ok(failed == 0)
}

async fn run_profile(profile: &Profile, timeout: Duration) -> anyhow::Result<RunResults> {
    // Fatal setup path: a run never dispatches a batch without a ledger.
    let ledger = MockLedger::connect(profile.ledger.clone()).context("ledger setup failed")?;
    let generator = LoadGenerator::new(ledger, profile.config.clone());

    match tokio::time::timeout(timeout, generator.run()).await {
        Ok(results) => Ok(results),
        Err(_) => bail!(
            "timed out after {}",
            humantime::format_duration(timeout)
        ),
    }
}

fn write_report(dir: &Path, profile: &Profile, results: &RunResults) -> anyhow::Result<()> {
    let report = RunReport::new(profile.name, &profile.config, results);
    let path = dir.join(format!("{}.json", profile.name));
    let json = serde_json::to_vec_pretty(&report)?;
    std::fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
    info!("Report written to {}", path.display());
    Ok(())
}
