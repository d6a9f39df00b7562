//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── probe: ProbeConfig    # Target URL and image source
//! ├── http: ReqwestConfig   # Timeout, user agent, API key
//! └── output: ReportFormat  # Text or JSON report
//! ```
//!
//! All configuration can be provided via CLI arguments or environment variables.
//! Use `--help` to see all available options.
//!
//! # Example
//!
//! ```bash
//! ocr-probe --target-url http://localhost:5000/ocr --image-file scan.png
//!
//! # Or via environment variables
//! OCR_PROBE_TARGET_URL=http://localhost:5000/ocr ocr-probe
//! ```

mod probe;

use std::process;

use anyhow::Context;
use clap::Parser;
use ocr_probe::{ReportFormat, ReqwestConfig};
pub use probe::ProbeConfig;
use serde::{Deserialize, Serialize};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
///
/// Combines all configuration groups for the probe:
/// - [`ProbeConfig`]: what to send and where
/// - [`ReqwestConfig`]: HTTP transport settings
/// - [`ReportFormat`]: how the outcome is printed
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "ocr-probe")]
#[command(about = "Send one request to an OCR endpoint and report the outcome")]
#[command(version)]
pub struct Cli {
    /// Probe target and payload configuration.
    #[clap(flatten)]
    pub probe: ProbeConfig,

    /// HTTP transport configuration.
    #[clap(flatten)]
    pub http: ReqwestConfig,

    /// Output format of the probe report.
    #[arg(long, env = "OCR_PROBE_OUTPUT", value_enum, default_value_t = ReportFormat::Text)]
    #[serde(default)]
    pub output: ReportFormat,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    ///
    /// This ensures .env files are loaded before clap parses arguments, so
    /// variables from .env are used as defaults.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.probe
            .validate()
            .context("invalid probe configuration")?;
        self.http
            .validate()
            .context("invalid HTTP configuration")?;
        Ok(())
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.probe.log();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            http_timeout_secs = ?self.http.http_timeout,
            user_agent = %self.http.effective_user_agent(),
            has_api_key = self.http.api_key.is_some(),
            accept_invalid_certs = self.http.accept_invalid_certs,
            output = %self.output,
            "HTTP configuration"
        );
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
