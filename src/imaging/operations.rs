//! High-level image operations.
//!
//! These functions combine the pure calculations with backend execution:
//! they resolve output dimensions, build parameter structs, and hand the
//! pixel work to an [`ImageBackend`]. Planning is separated from execution
//! so tests can inspect parameters without touching pixels.

use super::backend::{ImageBackend, ImagingError};
use super::calculations::{CropRect, Dimensions};
use super::params::{ExportFormat, ExportParams, PreviewParams, Quality};
use std::path::{Path, PathBuf};

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ImagingError>;

/// Get image dimensions using the backend.
pub fn get_dimensions(backend: &impl ImageBackend, path: &Path) -> Result<Dimensions> {
    backend.identify(path)
}

/// A finished export: where it went, how big the surface was, how many
/// bytes the encoder produced.
#[derive(Debug, Clone)]
pub struct ExportedFile {
    pub path: PathBuf,
    pub dimensions: Dimensions,
    pub bytes: u64,
}

/// Plan an export without executing it.
///
/// `target` is the fixed output surface from the active preset or custom
/// dimensions; `None` exports at the crop's own size. Capturing source and
/// crop by value here is deliberate: once planned, an export is immune to
/// later session mutations (a new file selection cannot redirect an
/// in-flight export).
pub fn plan_export(
    source: &Path,
    output: &Path,
    crop: CropRect,
    target: Option<Dimensions>,
    format: ExportFormat,
    quality: Quality,
) -> ExportParams {
    ExportParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        crop,
        target,
        format,
        quality,
    }
}

/// Execute a planned export.
pub fn export_image(backend: &impl ImageBackend, params: &ExportParams) -> Result<ExportedFile> {
    let bytes = backend.export(params)?;
    Ok(ExportedFile {
        path: params.output.clone(),
        dimensions: params.output_dimensions(),
        bytes,
    })
}

/// Estimate the encoded byte size at the current settings.
///
/// Advisory only — callers surface failures as a warning and proceed with
/// the export regardless.
pub fn estimate_size(backend: &impl ImageBackend, params: &ExportParams) -> Result<u64> {
    backend.estimate(params)
}

/// Render a bounded PNG preview of the crop.
pub fn render_preview(
    backend: &impl ImageBackend,
    source: &Path,
    output: &Path,
    crop: CropRect,
    max_edge: u32,
) -> Result<Dimensions> {
    backend.preview(&PreviewParams {
        source: source.to_path_buf(),
        output: output.to_path_buf(),
        crop,
        max_edge,
    })
}
