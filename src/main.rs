//! healthwatchd - health-check daemon
//!
//! Loads check definitions from a YAML file and runs them on their schedules,
//! or evaluates every enabled check once with `--once`.

#![allow(missing_docs)]

use anyhow::Context;
use clap::{Parser, ValueEnum};
use healthwatch::{Config, HealthOrchestrator, HealthSummary};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "healthwatchd", version, about = "Health-check orchestration daemon")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(
        short,
        long,
        env = "HEALTHWATCH_CONFIG",
        default_value = "config/healthwatch.yaml"
    )]
    config: PathBuf,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,

    /// Run every enabled check once, print the summary and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.log_format);

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false);

    match format {
        LogFormat::Pretty => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}

async fn load_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        warn!(
            "Configuration file {} not found, starting without checks",
            path.display()
        );
        return Ok(Config::from_env()?);
    }

    let config = Config::from_file(path)
        .await
        .with_context(|| format!("failed to load {}", path.display()))?
        .with_env_overrides()?;
    config.validate()?;
    Ok(config)
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let build = healthwatch::build_info();
    info!(
        "healthwatchd {} ({}, {})",
        build.version, build.git_hash, build.rust_version
    );

    let config = load_config(&cli.config).await?;
    let orchestrator = HealthOrchestrator::new(config.engine().clone());

    for check in config.checks() {
        orchestrator
            .register(check.clone())
            .with_context(|| format!("failed to register check {}", check.id))?;
    }
    info!("Registered {} checks", config.checks().len());

    if cli.once {
        let summary = orchestrator.execute_all().await;
        orchestrator.shutdown();
        println!("{}", summary.to_json_pretty()?);
        return Ok(exit_code(&summary));
    }

    shutdown_signal().await;
    orchestrator.shutdown();
    Ok(ExitCode::SUCCESS)
}

/// Success when the summary would be served as 200 or 206
fn exit_code(summary: &HealthSummary) -> ExitCode {
    match summary.status.http_status_code() {
        200 | 206 => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C signal, shutting down"),
            Err(e) => {
                warn!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
