//! Reqwest-based probe transport.
//!
//! This module provides a reqwest-based implementation of the [`ProbeTransport`] trait.
//!
//! # Example
//!
//! ```rust,ignore
//! use ocr_probe::reqwest::{ReqwestConfig, ReqwestTransport};
//! use ocr_probe::ProbeClient;
//!
//! // Create a transport with default configuration
//! let transport = ReqwestTransport::new(ReqwestConfig::default())?;
//!
//! // Wrap it in a probe client
//! let client = ProbeClient::new(transport);
//! ```
//!
//! [`ProbeTransport`]: crate::ProbeTransport

mod client;
mod config;
mod error;

pub use client::ReqwestTransport;
pub use config::ReqwestConfig;

/// Tracing target for reqwest transport operations.
pub const TRACING_TARGET: &str = "ocr_probe::reqwest";
