//! Image processing backend trait and shared error type.
//!
//! The [`ImageBackend`] trait defines the four operations every backend must
//! support: identify, export, preview, and estimate. The production
//! implementation is [`RustBackend`](super::rust_backend::RustBackend) —
//! pure pixel work via the `image` crate plus libwebp for lossy WebP.
//! Session and operation logic stays backend-agnostic so tests can run
//! against a recording mock.

use super::calculations::{CropRect, Dimensions};
use super::params::{ExportFormat, ExportParams, PreviewParams};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failures in the imaging layer.
///
/// Each variant is recoverable at the operation that produced it: a failed
/// decode leaves no image loaded, a failed encode leaves the session intact
/// and the export retriable. Nothing here aborts the process.
#[derive(Error, Debug)]
pub enum ImagingError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The source file could not be rasterized.
    #[error("failed to decode {path}: {reason}")]
    Decode { path: PathBuf, reason: String },
    /// The encoder produced no usable data.
    #[error("{format} encode of {path} failed: {reason}")]
    Encode {
        path: PathBuf,
        format: ExportFormat,
        reason: String,
    },
    /// The requested crop does not lie inside the source image.
    #[error("crop {crop} exceeds image bounds {natural}")]
    CropOutOfBounds { crop: CropRect, natural: Dimensions },
    /// The output surface cannot be created (degenerate or oversized).
    #[error("cannot create a {requested} output surface (limit {limit} px per edge)")]
    InvalidSurface { requested: Dimensions, limit: u32 },
}

/// Trait for image processing backends.
///
/// Every backend must implement all four operations so session and batch
/// logic never touch pixels directly. `Sync` because batch mode shares one
/// backend across rayon workers.
pub trait ImageBackend: Sync {
    /// Read the natural (intrinsic) dimensions of an image file.
    fn identify(&self, path: &Path) -> Result<Dimensions, ImagingError>;

    /// Execute an export: crop+scale blit, encode, write. Returns the
    /// number of bytes written.
    fn export(&self, params: &ExportParams) -> Result<u64, ImagingError>;

    /// Render a bounded preview of the crop as PNG. Returns the preview
    /// surface dimensions.
    fn preview(&self, params: &PreviewParams) -> Result<Dimensions, ImagingError>;

    /// Encode at the current settings without writing anything, returning
    /// the encoded byte length. Advisory only.
    fn estimate(&self, params: &ExportParams) -> Result<u64, ImagingError>;
}
