//! Probe outcomes and their operator-facing report.

use std::io::{self, Write};

#[cfg(feature = "config")]
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};

/// The outcome of a single probe.
///
/// Exactly one variant is produced per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProbeResult {
    /// The endpoint answered with a 2xx status and a JSON body.
    Success {
        /// HTTP status code (200-299).
        status_code: u16,
        /// Decoded response body.
        body: Value,
    },
    /// The endpoint answered with a non-2xx status and a JSON body.
    ApiError {
        /// HTTP status code.
        status_code: u16,
        /// Decoded response body.
        body: Value,
    },
    /// The exchange failed before a usable response was obtained.
    TransportFailure {
        /// Underlying failure description.
        message: String,
    },
}

impl ProbeResult {
    /// Classifies a received HTTP response.
    ///
    /// A body that does not decode as JSON makes the whole exchange a
    /// transport failure, whatever the status.
    pub fn from_response(status_code: u16, body: &[u8]) -> Self {
        let body = match serde_json::from_slice::<Value>(body) {
            Ok(body) => body,
            Err(e) => {
                return Self::transport_failure(format!(
                    "Malformed response (status {status_code}): body is not valid JSON: {e}"
                ));
            }
        };

        if (200..300).contains(&status_code) {
            Self::Success { status_code, body }
        } else {
            Self::ApiError { status_code, body }
        }
    }

    /// Creates a transport failure.
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self::TransportFailure {
            message: message.into(),
        }
    }

    /// Returns whether the probe succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Returns the HTTP status code, if a response was received.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Success { status_code, .. } | Self::ApiError { status_code, .. } => {
                Some(*status_code)
            }
            Self::TransportFailure { .. } => None,
        }
    }

    /// Returns the decoded response body, if one was received.
    #[must_use]
    pub const fn body(&self) -> Option<&Value> {
        match self {
            Self::Success { body, .. } | Self::ApiError { body, .. } => Some(body),
            Self::TransportFailure { .. } => None,
        }
    }

    /// Returns the snake_case name of the variant.
    #[must_use]
    pub const fn outcome(&self) -> &'static str {
        match self {
            Self::Success { .. } => "success",
            Self::ApiError { .. } => "api_error",
            Self::TransportFailure { .. } => "transport_failure",
        }
    }

    /// Writes the outcome to `sink` in the requested format.
    pub fn report<W: Write>(&self, sink: &mut W, format: ReportFormat) -> io::Result<()> {
        match format {
            ReportFormat::Text => self.report_text(sink),
            ReportFormat::Json => {
                serde_json::to_writer(&mut *sink, self).map_err(io::Error::other)?;
                writeln!(sink)
            }
        }
    }

    fn report_text<W: Write>(&self, sink: &mut W) -> io::Result<()> {
        match self {
            Self::Success { status_code, body } => {
                writeln!(sink, "OCR probe succeeded (status {status_code})")?;
                writeln!(sink, "{}", pretty(body)?)
            }
            Self::ApiError { status_code, body } => {
                writeln!(sink, "OCR probe failed: API error (status {status_code})")?;
                writeln!(sink, "{}", pretty(body)?)
            }
            Self::TransportFailure { message } => {
                writeln!(sink, "OCR probe failed: transport error: {message}")
            }
        }
    }
}

fn pretty(body: &Value) -> io::Result<String> {
    serde_json::to_string_pretty(body).map_err(io::Error::other)
}

/// How a [`ProbeResult`] is written to the output sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[cfg_attr(feature = "config", derive(ValueEnum))]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReportFormat {
    /// Human-readable lines with a distinct prefix per outcome.
    #[default]
    Text,
    /// The result serialized as a single JSON line.
    Json,
}
