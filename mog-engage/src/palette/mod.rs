//! Thumbnail palette extraction
//!
//! Fetches a post thumbnail, downsamples it to the quantization grid, and
//! derives the dominant/vibrant pair for UI theming. Extraction is pure
//! presentation: every failure mode (fetch, decode, all pixels excluded)
//! falls back to the placeholder palette at `debug!` severity and nothing
//! upstream ever sees an error.

use std::time::Duration;
use tracing::debug;

use palette_core::{quantize_rgba, Palette, SAMPLE_GRID};

use crate::types::{EngageError, Result};

/// Derives theming palettes from post thumbnails.
pub struct PaletteExtractor {
    http: reqwest::Client,
}

impl PaletteExtractor {
    pub fn new(timeout_ms: u64) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| EngageError::Config(format!("palette client build failed: {e}")))?;

        Ok(Self { http })
    }

    /// Fetch and quantize a thumbnail.
    ///
    /// Always returns a palette; failures yield the placeholder.
    pub async fn extract(&self, image_url: &str) -> Palette {
        match self.try_extract(image_url).await {
            Ok(palette) => palette,
            Err(e) => {
                debug!(url = %image_url, "Palette extraction fell back to placeholder: {e}");
                Palette::default()
            }
        }
    }

    async fn try_extract(&self, image_url: &str) -> Result<Palette> {
        let response = self.http.get(image_url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngageError::Decode(format!(
                "thumbnail fetch returned HTTP {status}"
            )));
        }
        let bytes = response.bytes().await?;
        Self::from_bytes(&bytes)
    }

    /// Quantize already-fetched image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Palette> {
        let decoded = image::load_from_memory(bytes)?;
        let sampled = decoded.thumbnail_exact(SAMPLE_GRID, SAMPLE_GRID).to_rgba8();

        Ok(quantize_rgba(sampled.as_raw()).unwrap_or_else(|| {
            debug!("All sampled pixels excluded by brightness filter");
            Palette::default()
        }))
    }
}
