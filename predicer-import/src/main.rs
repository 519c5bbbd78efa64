//! Command-line entry point for the workbook importer

mod config;
mod dispatch;
mod graphql;
mod model;
mod parse;
mod pipeline;
mod tabular;
mod workbook;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::config::{Config, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};

#[derive(Parser)]
#[command(
    name = "predicer-import",
    about = "Convert an energy-system model workbook into Predicer GraphQL mutations",
    version
)]
struct Cli {
    /// Path to the model workbook (.xlsx)
    workbook: PathBuf,

    /// GraphQL endpoint to submit mutations to (env: PREDICER_ENDPOINT)
    #[arg(long)]
    endpoint: Option<String>,

    /// Bearer credential sent as an Authorization header (env: PREDICER_TOKEN)
    #[arg(long)]
    token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Submit the generated mutations to the endpoint; without this flag
    /// payloads are only written to the output directory
    #[arg(long)]
    submit: bool,

    /// Output directory (defaults to the workbook's directory)
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let workbook = cli
        .workbook
        .canonicalize()
        .with_context(|| format!("workbook not found: {}", cli.workbook.display()))?;
    let base_dir = match cli.output {
        Some(dir) => dir,
        None => workbook
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    };

    let config = Config {
        workbook,
        base_dir,
        endpoint: cli
            .endpoint
            .or_else(|| std::env::var("PREDICER_ENDPOINT").ok())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
        bearer_token: cli.token.or_else(|| std::env::var("PREDICER_TOKEN").ok()),
        timeout_secs: cli.timeout,
        submit: cli.submit,
    };

    let summary = pipeline::run(&config).await?;

    log::info!(
        "import finished: {} records assembled, {} files written",
        summary.entities_parsed,
        summary.files_written
    );
    if let Some(report) = summary.dispatch {
        log::info!(
            "dispatch: {} submitted, {} succeeded, {} failed",
            report.submitted,
            report.succeeded(),
            report.failed
        );
    }

    Ok(())
}
