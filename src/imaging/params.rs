//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between the high-level [`operations`](super::operations) module
//! (which resolves output dimensions and filenames) and the
//! [`backend`](super::backend) (which does the actual pixel work). This
//! separation allows swapping backends (e.g. for testing with a mock)
//! without changing operation logic.

use super::calculations::{CropRect, Dimensions};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Quality setting for lossy image encoding (10-100).
///
/// Matches the quality slider range of the editing UI this tool serves.
/// Clamped on construction; meaningless for (and ignored by) PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u32);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(10, 100))
    }

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(90)
    }
}

/// Output encoding format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Jpeg,
    Png,
    WebP,
}

impl ExportFormat {
    /// File extension used in generated filenames.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::WebP => "webp",
        }
    }

    /// MIME type of the encoded artifact.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::WebP => "image/webp",
        }
    }

    /// Whether the encoder takes a quality setting.
    pub fn is_lossy(self) -> bool {
        !matches!(self, Self::Png)
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Jpeg => "jpeg",
            Self::Png => "png",
            Self::WebP => "webp",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "webp" => Ok(Self::WebP),
            other => Err(format!(
                "unknown format '{other}' (expected jpeg, png, or webp)"
            )),
        }
    }
}

/// Full specification for an export: which sub-region of which source goes
/// to which file, at what size, format, and quality.
///
/// `target` is the output surface size; the blit scales the crop to it in
/// one step. `None` means export at the crop's own dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub crop: CropRect,
    pub target: Option<Dimensions>,
    pub format: ExportFormat,
    pub quality: Quality,
}

impl ExportParams {
    /// The output surface size this export will produce.
    pub fn output_dimensions(&self) -> Dimensions {
        self.target.unwrap_or_else(|| self.crop.size())
    }
}

/// Full specification for a preview render: crop sub-region, downscaled so
/// the longer edge fits `max_edge`, written as PNG.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewParams {
    pub source: PathBuf,
    pub output: PathBuf,
    pub crop: CropRect,
    pub max_edge: u32,
}
