//! Export filename generation.
//!
//! Every exported file is named `{prefix}_{width}x{height}_{YYYYMMDD}_{HHMMSS}.{ext}`:
//! the output surface size, the local wall-clock moment of export, and an
//! extension matching the chosen format. The prefix is a fixed literal
//! (`"image"`) unless the caller asks for the source file's stem instead.
//!
//! Timestamps are passed in rather than read here so the scheme stays pure
//! and testable; callers hand in `Local::now().naive_local()`.

use crate::imaging::{Dimensions, ExportFormat};
use chrono::NaiveDateTime;
use std::path::Path;

/// Prefix used when the source filename is not requested.
pub const DEFAULT_PREFIX: &str = "image";

/// Build an export filename.
///
/// # Examples
/// ```
/// # use bildfix::naming::export_filename;
/// # use bildfix::imaging::{Dimensions, ExportFormat};
/// # use chrono::NaiveDate;
/// let at = NaiveDate::from_ymd_opt(2026, 8, 25)
///     .unwrap()
///     .and_hms_opt(14, 30, 5)
///     .unwrap();
/// assert_eq!(
///     export_filename("image", Dimensions::new(1920, 1080), ExportFormat::Jpeg, at),
///     "image_1920x1080_20260825_143005.jpg"
/// );
/// ```
pub fn export_filename(
    prefix: &str,
    size: Dimensions,
    format: ExportFormat,
    at: NaiveDateTime,
) -> String {
    format!(
        "{}_{}x{}_{}.{}",
        prefix,
        size.width,
        size.height,
        at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// The filename stem of a source path, for prefix-by-original-name exports.
/// Falls back to [`DEFAULT_PREFIX`] when the path has no usable stem.
pub fn source_prefix(path: &Path) -> &str {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_PREFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 8, 25)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn filename_carries_size_timestamp_and_extension() {
        assert_eq!(
            export_filename("image", Dimensions::new(1920, 1080), ExportFormat::Jpeg, at(14, 30, 5)),
            "image_1920x1080_20260825_143005.jpg"
        );
        assert_eq!(
            export_filename("image", Dimensions::new(970, 400), ExportFormat::WebP, at(9, 5, 0)),
            "image_970x400_20260825_090500.webp"
        );
    }

    #[test]
    fn timestamp_fields_are_zero_padded() {
        let name = export_filename("image", Dimensions::new(100, 100), ExportFormat::Png, at(1, 2, 3));
        assert_eq!(name, "image_100x100_20260825_010203.png");
    }

    #[test]
    fn custom_prefix_is_used_verbatim() {
        let name = export_filename("vacation-photo", Dimensions::new(800, 600), ExportFormat::Png, at(12, 0, 0));
        assert!(name.starts_with("vacation-photo_800x600_"));
    }

    #[test]
    fn source_prefix_takes_the_stem() {
        assert_eq!(source_prefix(Path::new("/uploads/sunset.jpeg")), "sunset");
        assert_eq!(source_prefix(Path::new("beach.holiday.png")), "beach.holiday");
    }

    #[test]
    fn source_prefix_falls_back_for_unusable_paths() {
        assert_eq!(source_prefix(Path::new("/")), DEFAULT_PREFIX);
        assert_eq!(source_prefix(Path::new("")), DEFAULT_PREFIX);
    }
}
