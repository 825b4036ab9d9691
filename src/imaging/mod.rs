//! Image processing: pure crop math plus pixel work.
//!
//! | Concern | Where |
//! |---|---|
//! | **Coordinate math** | [`calculations`] — centered crops, displayed→natural scaling |
//! | **Parameters** | [`params`] — quality, formats, export/preview specs |
//! | **Backend** | [`backend`] — [`ImageBackend`] trait; [`RustBackend`] does the pixels |
//! | **Operations** | [`operations`] — plan/execute exports, previews, size estimates |
//!
//! The module is split so that everything above the backend trait is pure
//! and unit-testable without decoding a single image.

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{ImageBackend, ImagingError};
pub use calculations::{
    CropRect, Dimensions, centered_crop, centered_crop_px, clamp_to_bounds, locked_height,
    locked_width, preview_dimensions, scale_to_natural,
};
pub use operations::{
    ExportedFile, estimate_size, export_image, get_dimensions, plan_export, render_preview,
};
pub use params::{ExportFormat, ExportParams, PreviewParams, Quality};
pub use rust_backend::{MAX_SURFACE_EDGE, RustBackend, SUPPORTED_EXTENSIONS, is_supported_input};
