#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod telemetry;

use std::io::{self, Write};
use std::process;

use anyhow::Context;
use ocr_probe::ProbeClient;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "ocr_probe_cli::startup";
pub const TRACING_TARGET_SHUTDOWN: &str = "ocr_probe_cli::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "ocr_probe_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::debug!(
            target: TRACING_TARGET_SHUTDOWN,
            "probe finished"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SHUTDOWN,
            error = %format!("{error:#}"),
            "probe aborted"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Parses configuration, sets up tracing and reports to stdout.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();
    telemetry::init_tracing()?;

    run_with(cli, io::stdout().lock()).await
}

/// Runs one probe and writes its report to `sink`.
///
/// Only configuration problems are returned as errors; every probe outcome
/// is reported to the sink and counts as a normal run.
async fn run_with(cli: Cli, mut sink: impl Write) -> anyhow::Result<()> {
    cli.log();
    cli.validate()?;

    let request = cli
        .probe
        .build_request()
        .await
        .context("failed to build probe request")?;
    let client =
        ProbeClient::with_reqwest(cli.http.clone()).context("failed to create HTTP transport")?;

    let result = client.probe(&request).await;

    result
        .report(&mut sink, cli.output)
        .and_then(|()| sink.flush())
        .context("failed to write probe report")?;

    Ok(())
}
