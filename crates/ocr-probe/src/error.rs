//! Errors raised while building probe requests and transports.
//!
//! Probe outcomes themselves are never errors: once a request exists, every
//! failure is folded into [`ProbeResult`](crate::ProbeResult).

use thiserror::Error;

/// Result type for fallible operations in this crate.
///
/// Defaults to [`Error`] as the error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that prevent a probe request or transport from being built.
#[derive(Debug, Error)]
pub enum Error {
    /// The target URL is malformed, relative, or uses an unsupported scheme.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The URL as supplied.
        url: String,
        /// Why it was rejected.
        message: String,
    },

    /// Invalid input data.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what's invalid
        message: String,
    },

    /// The image is not a `data:<mime>;base64,<payload>` string.
    #[error("Invalid data URI: {message}")]
    InvalidDataUri {
        /// Description of what's invalid
        message: String,
    },

    /// Unsupported file format.
    #[error("Unsupported: {message}")]
    Unsupported {
        /// Description of what's unsupported
        message: String,
    },

    /// File I/O errors
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },
}

impl Error {
    /// Create an invalid URL error
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an invalid data URI error
    pub fn invalid_data_uri(message: impl Into<String>) -> Self {
        Self::InvalidDataUri {
            message: message.into(),
        }
    }

    /// Create an unsupported error
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
