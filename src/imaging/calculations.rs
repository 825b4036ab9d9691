//! Pure crop and scale math.
//!
//! All functions here are pure and testable without any I/O or images.
//! Every rectangle produced by this module is expressed in natural-image
//! pixel space (the original decoded resolution), the one canonical unit
//! stored anywhere in the crate. Displayed-space coordinates exist only as
//! *inputs* to [`scale_to_natural`].

/// Pixel dimensions of an image or surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A crop rectangle. Stored state is always in natural-image pixel space;
/// the same type carries displayed-space input on its way through
/// [`scale_to_natural`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn size(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }

    /// True when the rectangle lies fully inside `bounds`.
    pub fn fits_within(&self, bounds: Dimensions) -> bool {
        self.width >= 1
            && self.height >= 1
            && self
                .x
                .checked_add(self.width)
                .is_some_and(|r| r <= bounds.width)
            && self
                .y
                .checked_add(self.height)
                .is_some_and(|b| b <= bounds.height)
    }
}

impl std::fmt::Display for CropRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{} {}x{}", self.x, self.y, self.width, self.height)
    }
}

/// Compute the largest centered crop with the given aspect ratio.
///
/// Starts from full width and derives the height; when that height exceeds
/// the image, clamps to full height and derives the width instead. The
/// result is rounded to integer pixels, floored at 1 px per edge, and is
/// always fully contained in the image.
///
/// The caller must reject `ratio <= 0` before invoking this.
///
/// # Examples
/// ```
/// # use bildfix::imaging::{centered_crop, CropRect, Dimensions};
/// // 4000x3000 at 16:9 → full width, height clamps to 2250, centered
/// let crop = centered_crop(Dimensions::new(4000, 3000), 16.0 / 9.0);
/// assert_eq!(crop, CropRect::new(0, 375, 4000, 2250));
/// ```
pub fn centered_crop(natural: Dimensions, ratio: f64) -> CropRect {
    let mut width = natural.width as f64;
    let mut height = width / ratio;

    if height > natural.height as f64 {
        height = natural.height as f64;
        width = height * ratio;
    }

    let width = (width.round() as u32).clamp(1, natural.width);
    let height = (height.round() as u32).clamp(1, natural.height);

    CropRect {
        x: ((natural.width - width) as f64 / 2.0).round() as u32,
        y: ((natural.height - height) as f64 / 2.0).round() as u32,
        width,
        height,
    }
}

/// Center a crop of the preferred pixel size, shrunk to fit the image.
///
/// Used when the selection carries explicit pixel dimensions rather than a
/// bare ratio: each edge is `min(preferred, natural)`, floored at 1 px.
pub fn centered_crop_px(natural: Dimensions, preferred: Dimensions) -> CropRect {
    let width = preferred.width.clamp(1, natural.width.max(1));
    let height = preferred.height.clamp(1, natural.height.max(1));

    CropRect {
        x: (natural.width.saturating_sub(width) as f64 / 2.0).round() as u32,
        y: (natural.height.saturating_sub(height) as f64 / 2.0).round() as u32,
        width,
        height,
    }
}

/// Convert a rectangle drawn over the displayed (layout-scaled) image into
/// natural-image pixel space.
///
/// `x`/`width` scale by `natural.width / displayed.width`, `y`/`height` by
/// the Y equivalent, each coordinate rounded independently. This is the
/// single conversion point between displayed and natural space and must be
/// applied exactly once per completed drag, never cumulatively.
///
/// The caller must reject a zero `displayed` size (image not laid out yet)
/// before invoking this.
pub fn scale_to_natural(rect: CropRect, displayed: Dimensions, natural: Dimensions) -> CropRect {
    let scale_x = natural.width as f64 / displayed.width as f64;
    let scale_y = natural.height as f64 / displayed.height as f64;

    CropRect {
        x: (rect.x as f64 * scale_x).round() as u32,
        y: (rect.y as f64 * scale_y).round() as u32,
        width: (rect.width as f64 * scale_x).round() as u32,
        height: (rect.height as f64 * scale_y).round() as u32,
    }
}

/// Clamp a rectangle into image bounds, keeping each edge at least 1 px.
///
/// Independent per-axis rounding in [`scale_to_natural`] can land a pixel
/// past the edge; this pulls the rectangle back inside.
pub fn clamp_to_bounds(rect: CropRect, bounds: Dimensions) -> CropRect {
    let x = rect.x.min(bounds.width.saturating_sub(1));
    let y = rect.y.min(bounds.height.saturating_sub(1));
    let width = rect.width.clamp(1, bounds.width - x);
    let height = rect.height.clamp(1, bounds.height - y);
    CropRect {
        x,
        y,
        width,
        height,
    }
}

/// Compute preview surface dimensions for a crop, bounded by `max_edge`.
///
/// Scales down uniformly so the longer edge equals `max_edge`. Never
/// upscales: a crop already within the bound on both edges renders 1:1.
pub fn preview_dimensions(crop: Dimensions, max_edge: u32) -> Dimensions {
    if crop.width <= max_edge && crop.height <= max_edge {
        return crop;
    }

    if crop.width >= crop.height {
        let scale = max_edge as f64 / crop.width as f64;
        Dimensions::new(
            max_edge,
            ((crop.height as f64 * scale).round() as u32).max(1),
        )
    } else {
        let scale = max_edge as f64 / crop.height as f64;
        Dimensions::new(((crop.width as f64 * scale).round() as u32).max(1), max_edge)
    }
}

/// Derive a height from a width under a locked aspect ratio.
pub fn locked_height(width: u32, ratio: f64) -> u32 {
    ((width as f64 / ratio).round() as u32).max(1)
}

/// Derive a width from a height under a locked aspect ratio.
pub fn locked_width(height: u32, ratio: f64) -> u32 {
    ((height as f64 * ratio).round() as u32).max(1)
}
