//! Probe target and payload configuration.

use std::path::PathBuf;

use anyhow::{Context, Result as AnyhowResult, anyhow};
use clap::Args;
use ocr_probe::{ImageDataUri, ProbeRequest};
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// A 1x1 transparent PNG, sent when no image is configured.
const SAMPLE_IMAGE_DATA_URI: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

/// What the probe sends and where.
///
/// # Environment Variables
///
/// - `OCR_PROBE_TARGET_URL` - OCR endpoint (default: http://localhost:5000/ocr)
/// - `OCR_PROBE_IMAGE` - Inline `data:<mime>;base64,<payload>` image
/// - `OCR_PROBE_IMAGE_FILE` - Image file to encode instead
///
/// Without an image the probe sends a built-in 1x1 PNG.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ProbeConfig {
    /// Absolute http(s) URL of the OCR endpoint.
    #[arg(
        long,
        env = "OCR_PROBE_TARGET_URL",
        default_value = ProbeConfig::DEFAULT_TARGET_URL
    )]
    #[serde(default = "default_target_url")]
    pub target_url: String,

    /// Image to send, as a base64 data URI.
    #[arg(long, env = "OCR_PROBE_IMAGE", conflicts_with = "image_file")]
    #[serde(default)]
    pub image: Option<String>,

    /// Image file to encode and send (png, jpg, gif, webp, bmp, tiff).
    #[arg(long, env = "OCR_PROBE_IMAGE_FILE")]
    #[serde(default)]
    pub image_file: Option<PathBuf>,
}

fn default_target_url() -> String {
    ProbeConfig::DEFAULT_TARGET_URL.to_owned()
}

impl ProbeConfig {
    /// Default OCR endpoint.
    pub const DEFAULT_TARGET_URL: &'static str = "http://localhost:5000/ocr";

    /// Validates the target URL and the image source.
    ///
    /// The image file is only checked for existence here; it is read when the
    /// request is built.
    pub fn validate(&self) -> AnyhowResult<()> {
        ProbeRequest::parse_target_url(&self.target_url)
            .context("invalid target URL")?;

        if let Some(image) = &self.image {
            ImageDataUri::parse(image.as_str()).context("invalid image data URI")?;
        }

        if let Some(path) = &self.image_file
            && !path.is_file()
        {
            return Err(anyhow!("Image file '{}' does not exist", path.display()));
        }

        Ok(())
    }

    /// Loads the image and builds a fresh probe request.
    pub async fn build_request(&self) -> AnyhowResult<ProbeRequest> {
        let image = self.load_image().await?;
        let request = ProbeRequest::with_image(&self.target_url, image)?;
        Ok(request)
    }

    async fn load_image(&self) -> AnyhowResult<ImageDataUri> {
        match (&self.image, &self.image_file) {
            (_, Some(path)) => ImageDataUri::from_file(path)
                .await
                .with_context(|| format!("failed to load image file '{}'", path.display())),
            (Some(image), None) => {
                ImageDataUri::parse(image.as_str()).context("invalid image data URI")
            }
            (None, None) => {
                ImageDataUri::parse(SAMPLE_IMAGE_DATA_URI).context("invalid sample image")
            }
        }
    }

    /// Returns where the image comes from.
    fn image_source(&self) -> &'static str {
        match (&self.image, &self.image_file) {
            (_, Some(_)) => "file",
            (Some(_), None) => "inline",
            (None, None) => "sample",
        }
    }

    /// Logs the probe configuration.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            target_url = %self.target_url,
            image_source = self.image_source(),
            image_file = ?self.image_file,
            "Probe configuration"
        );
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            target_url: default_target_url(),
            image: None,
            image_file: None,
        }
    }
}
