//! CLI output formatting.
//!
//! Each display has a `format_*` function (returns `Vec<String>` or
//! `String`) for testability and a `print_*` wrapper that writes to stdout.
//! Format functions are pure — no I/O, no side effects.
//!
//! ## Output Format
//!
//! ### Presets
//!
//! ```text
//! Aspect presets
//!     16:9      16:9 - Landscape (1920x1080)
//!     4:3       4:3 - Standard (1600x1200)
//!     ...
//! ```
//!
//! ### Info
//!
//! ```text
//! photo.jpg
//!     Natural size: 4000x3000
//!     Crop (16:9): 4000x2250 at (0, 375)
//!     Export size: 1920x1080
//! ```
//!
//! ### Batch
//!
//! ```text
//! photo.jpg → out/image_1920x1080_20260825_143005.jpg (1920x1080, 245.12 KB)
//! broken.jpg: failed to decode /in/broken.jpg: invalid JPEG
//! Exported 1 file, 1 failed
//! ```

use crate::batch::{BatchEvent, BatchSummary};
use crate::catalog::ASPECT_PRESETS;
use crate::imaging::{CropRect, Dimensions};
use std::path::Path;

/// Format a byte count as human-readable KB or MB.
pub fn format_bytes(bytes: u64) -> String {
    let kb = bytes as f64 / 1024.0;
    if kb >= 1024.0 {
        format!("{:.2} MB", kb / 1024.0)
    } else {
        format!("{:.2} KB", kb)
    }
}

/// The filename component of a path, for compact per-file lines.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Format the aspect preset catalog listing.
pub fn format_presets() -> Vec<String> {
    let mut lines = vec!["Aspect presets".to_string()];
    for preset in ASPECT_PRESETS {
        lines.push(format!("    {:<9} {}", preset.key, preset.label));
    }
    lines
}

/// Print the preset catalog to stdout.
pub fn print_presets() {
    for line in format_presets() {
        println!("{}", line);
    }
}

/// Format the `info` display for a single image: natural size, the crop the
/// active selection would place, and the export surface size.
pub fn format_info(
    path: &Path,
    natural: Dimensions,
    selection_label: &str,
    crop: CropRect,
    export: Dimensions,
) -> Vec<String> {
    vec![
        display_name(path),
        format!("    Natural size: {}", natural),
        format!(
            "    Crop ({}): {}x{} at ({}, {})",
            selection_label, crop.width, crop.height, crop.x, crop.y
        ),
        format!("    Export size: {}", export),
    ]
}

/// Print the info display to stdout.
pub fn print_info(
    path: &Path,
    natural: Dimensions,
    selection_label: &str,
    crop: CropRect,
    export: Dimensions,
) {
    for line in format_info(path, natural, selection_label, crop, export) {
        println!("{}", line);
    }
}

/// Format one batch progress event as a single display line.
pub fn format_batch_event(event: &BatchEvent) -> String {
    match event {
        BatchEvent::Exported {
            source,
            output,
            dimensions,
            bytes,
        } => format!(
            "{} \u{2192} {} ({}, {})",
            display_name(source),
            output.display(),
            dimensions,
            format_bytes(*bytes)
        ),
        BatchEvent::Failed { source, reason } => {
            format!("{}: {}", display_name(source), reason)
        }
    }
}

/// Format the closing summary line for a batch run.
pub fn format_batch_summary(summary: &BatchSummary) -> String {
    let files = if summary.exported == 1 { "file" } else { "files" };
    if summary.failed == 0 {
        format!("Exported {} {}", summary.exported, files)
    } else {
        format!(
            "Exported {} {}, {} failed",
            summary.exported, files, summary.failed
        )
    }
}

/// Format the size-estimate line shown before an export.
pub fn format_estimate(bytes: u64) -> String {
    format!("Estimated size: {}", format_bytes(bytes))
}
