//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, WebP) | `image` crate (pure Rust decoders) |
//! | Crop+scale blit | `image::DynamicImage::crop_imm` + `resize_exact` (Lanczos3) |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder::new_with_quality` |
//! | Encode → PNG | `image::codecs::png::PngEncoder` (lossless, no quality) |
//! | Encode → WebP | `webp::Encoder` (libwebp — the `image` crate's WebP encoder is lossless-only) |
//!
//! All encoding goes through an in-memory buffer so the export and estimate
//! paths produce byte-identical output for the same parameters.

use super::backend::{ImageBackend, ImagingError};
use super::calculations::{CropRect, Dimensions, preview_dimensions};
use super::params::{ExportFormat, ExportParams, PreviewParams, Quality};
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::path::Path;

/// Extensions whose decoders are compiled in.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Hard ceiling on output surface edges. Matches the dimension inputs the
/// editing UI accepts (10–10000 px); anything past this is a typo, not a
/// crop.
pub const MAX_SURFACE_EDGE: u32 = 10_000;

/// True when the path carries an extension we can decode.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| SUPPORTED_EXTENSIONS.iter().any(|s| e.eq_ignore_ascii_case(s)))
}

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

/// Load and decode an image from disk.
fn load_image(path: &Path) -> Result<DynamicImage, ImagingError> {
    ImageReader::open(path)
        .map_err(ImagingError::Io)?
        .decode()
        .map_err(|e| ImagingError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
}

/// Crop the sub-region out of the source and scale it to the output size in
/// one conceptual blit. The resize is skipped when the crop already has the
/// output dimensions.
fn blit(
    img: &DynamicImage,
    crop: CropRect,
    output: Dimensions,
) -> Result<DynamicImage, ImagingError> {
    let natural = Dimensions::new(img.width(), img.height());
    if !crop.fits_within(natural) {
        return Err(ImagingError::CropOutOfBounds { crop, natural });
    }
    if output.width == 0
        || output.height == 0
        || output.width > MAX_SURFACE_EDGE
        || output.height > MAX_SURFACE_EDGE
    {
        return Err(ImagingError::InvalidSurface {
            requested: output,
            limit: MAX_SURFACE_EDGE,
        });
    }

    let cropped = img.crop_imm(crop.x, crop.y, crop.width, crop.height);
    if cropped.width() == output.width && cropped.height() == output.height {
        Ok(cropped)
    } else {
        Ok(cropped.resize_exact(output.width, output.height, FilterType::Lanczos3))
    }
}

/// Encode a surface to bytes in the requested format.
///
/// Quality is passed to the lossy encoders only; PNG never sees it. JPEG
/// cannot carry alpha, so that path flattens to RGB first.
fn encode(
    img: &DynamicImage,
    format: ExportFormat,
    quality: Quality,
    path: &Path,
) -> Result<Vec<u8>, ImagingError> {
    let encode_err = |reason: String| ImagingError::Encode {
        path: path.to_path_buf(),
        format,
        reason,
    };

    let mut buf = Vec::new();
    match format {
        ExportFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
            let encoder =
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, quality.value() as u8);
            rgb.write_with_encoder(encoder)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        ExportFormat::Png => {
            let encoder = image::codecs::png::PngEncoder::new(&mut buf);
            img.write_with_encoder(encoder)
                .map_err(|e| encode_err(e.to_string()))?;
        }
        ExportFormat::WebP => {
            let rgba = DynamicImage::ImageRgba8(img.to_rgba8());
            let encoder = webp::Encoder::from_image(&rgba)
                .map_err(|e| encode_err(format!("unsupported pixel layout: {e}")))?;
            buf = encoder.encode(quality.value() as f32).to_vec();
        }
    }

    if buf.is_empty() {
        return Err(encode_err("encoder returned an empty buffer".to_string()));
    }
    Ok(buf)
}

impl ImageBackend for RustBackend {
    fn identify(&self, path: &Path) -> Result<Dimensions, ImagingError> {
        let (width, height) = image::image_dimensions(path).map_err(|e| ImagingError::Decode {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Dimensions { width, height })
    }

    fn export(&self, params: &ExportParams) -> Result<u64, ImagingError> {
        let img = load_image(&params.source)?;
        let surface = blit(&img, params.crop, params.output_dimensions())?;
        let bytes = encode(&surface, params.format, params.quality, &params.source)?;
        std::fs::write(&params.output, &bytes).map_err(ImagingError::Io)?;
        Ok(bytes.len() as u64)
    }

    fn preview(&self, params: &PreviewParams) -> Result<Dimensions, ImagingError> {
        let img = load_image(&params.source)?;
        let dims = preview_dimensions(params.crop.size(), params.max_edge);
        let surface = blit(&img, params.crop, dims)?;
        let bytes = encode(&surface, ExportFormat::Png, Quality::default(), &params.source)?;
        std::fs::write(&params.output, &bytes).map_err(ImagingError::Io)?;
        Ok(dims)
    }

    fn estimate(&self, params: &ExportParams) -> Result<u64, ImagingError> {
        let img = load_image(&params.source)?;
        let surface = blit(&img, params.crop, params.output_dimensions())?;
        let bytes = encode(&surface, params.format, params.quality, &params.source)?;
        Ok(bytes.len() as u64)
    }
}
