//! Palette Core - Pixel-Bucket Color Quantization
//!
//! Reduces a downsampled thumbnail to two theming colors (dominant and
//! vibrant) by bucketing RGB channels, instead of scanning the full
//! 16M-color space. Pure CPU, no I/O; callers handle decode and resize.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Quantization Constants
// ============================================================================

/// Expected sample grid edge; callers downsample thumbnails to this size.
pub const SAMPLE_GRID: u32 = 50;

/// Channel values are rounded to the nearest multiple of this quantum.
pub const BUCKET_QUANTUM: u32 = 20;

/// Buckets with `r + g + b <= DARK_CUTOFF` are excluded (near-black).
pub const DARK_CUTOFF: u32 = 50;

/// Buckets with `r + g + b >= LIGHT_CUTOFF` are excluded (near-white).
pub const LIGHT_CUTOFF: u32 = 700;

/// A bucket qualifies as vibrant when `max(r,g,b) - min(r,g,b)` exceeds
/// this span (saturation proxy).
pub const VIBRANT_SPAN: u32 = 50;

// ============================================================================
// Colors
// ============================================================================

/// An 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex form, e.g. `#82a0c8`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// CSS functional form, e.g. `rgb(130, 160, 200)`.
    pub fn to_css(self) -> String {
        format!("rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Theming colors derived from one thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    /// Highest-count surviving bucket.
    pub dominant: Color,
    /// Highest-count saturated bucket; falls back to dominant.
    pub vibrant: Color,
}

impl Default for Palette {
    /// Placeholder used until extraction succeeds (or when it never does).
    fn default() -> Self {
        Self {
            dominant: Color::new(24, 24, 27),
            vibrant: Color::new(39, 39, 42),
        }
    }
}

// ============================================================================
// Quantization
// ============================================================================

/// Round a channel to the nearest multiple of [`BUCKET_QUANTUM`].
///
/// Values can land one quantum above 255 (e.g. 255 -> 260); bucket sums are
/// compared in u32 space and clamped only when converted back to a color.
fn bucket_channel(value: u8) -> u32 {
    ((value as u32 + BUCKET_QUANTUM / 2) / BUCKET_QUANTUM) * BUCKET_QUANTUM
}

fn bucket_to_color(bucket: (u32, u32, u32)) -> Color {
    Color::new(
        bucket.0.min(255) as u8,
        bucket.1.min(255) as u8,
        bucket.2.min(255) as u8,
    )
}

/// Quantize raw RGBA pixels (4 bytes per pixel) into a palette.
///
/// Returns `None` when every bucket is excluded by the brightness filter,
/// which happens for pure-black and pure-white thumbnails; callers keep
/// their placeholder palette in that case. Fully transparent pixels are
/// skipped. Output is deterministic for a fixed input: ties are broken by
/// bucket value, not map iteration order.
pub fn quantize_rgba(pixels: &[u8]) -> Option<Palette> {
    let mut buckets: HashMap<(u32, u32, u32), u32> = HashMap::new();

    for px in pixels.chunks_exact(4) {
        if px[3] == 0 {
            continue;
        }
        let bucket = (
            bucket_channel(px[0]),
            bucket_channel(px[1]),
            bucket_channel(px[2]),
        );
        let sum = bucket.0 + bucket.1 + bucket.2;
        if sum <= DARK_CUTOFF || sum >= LIGHT_CUTOFF {
            continue;
        }
        *buckets.entry(bucket).or_insert(0) += 1;
    }

    let dominant_bucket = buckets
        .iter()
        .max_by_key(|(bucket, count)| (*count, *bucket))
        .map(|(bucket, _)| *bucket)?;

    let vibrant_bucket = buckets
        .iter()
        .filter(|(bucket, _)| {
            let max = bucket.0.max(bucket.1).max(bucket.2);
            let min = bucket.0.min(bucket.1).min(bucket.2);
            max - min > VIBRANT_SPAN
        })
        .max_by_key(|(bucket, count)| (*count, *bucket))
        .map(|(bucket, _)| *bucket)
        .unwrap_or(dominant_bucket);

    Some(Palette {
        dominant: bucket_to_color(dominant_bucket),
        vibrant: bucket_to_color(vibrant_bucket),
    })
}
