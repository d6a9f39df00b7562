#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod client;
mod data_uri;
mod error;
mod transport;

pub mod reqwest;
pub mod request;
pub mod response;

#[cfg(test)]
mod mock;

pub use client::{ProbeClient, probe};
pub use data_uri::ImageDataUri;
pub use error::{Error, Result};
pub use request::{ProbePayload, ProbeRequest};
pub use response::{ProbeResult, ReportFormat};
pub use transport::{ProbeTransport, TransportError, TransportErrorKind, TransportResponse};

pub use crate::reqwest::{ReqwestConfig, ReqwestTransport};

/// Tracing target for probe client operations.
pub const TRACING_TARGET: &str = "ocr_probe::client";
