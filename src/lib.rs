//! # Bildfix
//!
//! A crop-and-resize tool for images. Load a photo, pick an aspect preset
//! (or custom pixel dimensions), position the crop, and export as JPEG,
//! PNG, or WebP at a fixed output size — from the command line, one file
//! or a whole directory at a time.
//!
//! # Architecture: Session Over Backend
//!
//! All editing state lives in a [`session::Session`]: the loaded image, the
//! active aspect selection, and the crop rectangle in natural-image pixel
//! space. The session never touches pixels — it does pure coordinate math
//! and hands execution to an [`imaging::ImageBackend`]:
//!
//! ```text
//! CLI / batch  →  Session (selection + crop math)  →  ImageBackend (pixels)
//! ```
//!
//! This separation exists for two reasons:
//!
//! - **Testability**: crop placement, displayed→natural mapping, and export
//!   planning are pure functions tested without decoding a single image.
//! - **Isolation**: batch mode runs one session per file across rayon
//!   workers against a single shared backend.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Static aspect-ratio preset table (ratio + fixed output size) |
//! | [`session`] | Editing state: image, selection, crop; the invariant holder |
//! | [`imaging`] | Crop math, parameter types, backend trait, pixel work |
//! | [`naming`] | `{prefix}_{w}x{h}_{timestamp}.{ext}` export filenames |
//! | [`config`] | `config.toml` loading and validation |
//! | [`batch`] | Parallel multi-file export with per-file failure isolation |
//! | [`output`] | CLI output formatting — pure `format_*` plus `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## One Coordinate Space
//!
//! Every stored crop is in natural-image pixels. Displayed-space rectangles
//! (from whatever surface the user dragged on) are converted exactly once,
//! at drag completion, by [`imaging::scale_to_natural`]. Nothing downstream
//! ever sees display coordinates, so no export can be off by a zoom factor.
//!
//! ## Fixed Output Surfaces
//!
//! Presets carry both a ratio and a target size. The ratio shapes the crop;
//! the target sizes the export. A 16:9 crop of any source exports at
//! 1920x1080 — the crop+scale blit bridges whatever gap remains, in a
//! single Lanczos3 resample.
//!
//! ## Pure-Rust Imaging
//!
//! Pixel work uses the `image` crate plus libwebp bindings for lossy WebP.
//! No ImageMagick, no system libraries to install — the binary is fully
//! self-contained.

pub mod batch;
pub mod catalog;
pub mod config;
pub mod imaging;
pub mod naming;
pub mod output;
pub mod session;
