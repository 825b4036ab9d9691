//! Crop session state.
//!
//! A [`Session`] owns the authoritative editing state: the loaded source
//! image, the active aspect selection, and the current crop rectangle in
//! natural-image pixel space. It is the single writer of that state — every
//! update goes through an explicit method call, and each method leaves the
//! session honoring one invariant: whenever a crop exists, it lies fully
//! inside the current image's natural bounds.
//!
//! Two triggers invalidate a crop and force a recompute: loading a new
//! image and changing the aspect selection. Both discard the old rectangle
//! outright; there is no observable moment where a crop belongs to a
//! previous image, and no attempt to preserve a previous position across an
//! aspect change.

use crate::catalog::AspectPreset;
use crate::imaging::{
    CropRect, Dimensions, MAX_SURFACE_EDGE, centered_crop, centered_crop_px, clamp_to_bounds,
    scale_to_natural,
};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("no image loaded")]
    NoImage,
    #[error("no crop selection — load an image first")]
    NoCrop,
    #[error("displayed size is zero — the image has no layout yet")]
    ZeroDisplaySize,
    #[error("invalid dimensions {width}x{height} (each edge must be 1-{MAX_SURFACE_EDGE})")]
    InvalidDimensions { width: u32, height: u32 },
}

/// A loaded source image: where it came from and its natural size.
///
/// The session never holds decoded pixels — those stay behind the imaging
/// backend, loaded per operation. Replaced wholesale when a new file is
/// selected.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
}

impl SourceImage {
    pub fn new(path: impl Into<PathBuf>, dims: Dimensions) -> Self {
        Self {
            path: path.into(),
            width: dims.width,
            height: dims.height,
        }
    }

    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.width, self.height)
    }
}

/// The active aspect selection: a catalog preset or custom pixel dimensions.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    Preset(AspectPreset),
    Custom { width: u32, height: u32 },
}

impl Selection {
    /// Width-over-height ratio of the selection.
    pub fn ratio(&self) -> f64 {
        match self {
            Self::Preset(p) => p.ratio,
            Self::Custom { width, height } => *width as f64 / *height as f64,
        }
    }
}

/// The editing session. Created empty; populated by [`Session::load_image`];
/// reset by [`Session::clear`] or by loading another image.
#[derive(Debug, Clone)]
pub struct Session {
    image: Option<SourceImage>,
    selection: Selection,
    crop: Option<CropRect>,
}

impl Session {
    /// Create an empty session with the given preset selected.
    pub fn new(preset: AspectPreset) -> Self {
        Self {
            image: None,
            selection: Selection::Preset(preset),
            crop: None,
        }
    }

    pub fn image(&self) -> Option<&SourceImage> {
        self.image.as_ref()
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn crop(&self) -> Option<CropRect> {
        self.crop
    }

    /// Load a new source image, discarding any previous image and crop in
    /// the same step, then compute the initial centered crop for the
    /// current selection.
    pub fn load_image(&mut self, image: SourceImage) {
        self.crop = None;
        self.image = Some(image);
        self.recompute_crop();
    }

    /// Drop the image and crop, returning to the empty state.
    pub fn clear(&mut self) {
        self.image = None;
        self.crop = None;
    }

    /// Switch to a catalog preset. With an image loaded, the crop is
    /// recomputed centered against the existing natural size.
    pub fn select_preset(&mut self, preset: AspectPreset) {
        self.selection = Selection::Preset(preset);
        self.recompute_crop();
    }

    /// Switch to custom pixel dimensions.
    pub fn select_custom(&mut self, width: u32, height: u32) -> Result<(), SessionError> {
        if width == 0 || height == 0 || width > MAX_SURFACE_EDGE || height > MAX_SURFACE_EDGE {
            return Err(SessionError::InvalidDimensions { width, height });
        }
        self.selection = Selection::Custom { width, height };
        self.recompute_crop();
        Ok(())
    }

    /// Accept a completed drag: a rectangle in displayed-space pixels plus
    /// the displayed size at drag time. Converts to natural space (exactly
    /// once), clamps into bounds, and stores the result as the
    /// authoritative crop.
    pub fn complete_drag(
        &mut self,
        rect: CropRect,
        displayed: Dimensions,
    ) -> Result<CropRect, SessionError> {
        let image = self.image.as_ref().ok_or(SessionError::NoImage)?;
        if displayed.width == 0 || displayed.height == 0 {
            return Err(SessionError::ZeroDisplaySize);
        }

        let natural = image.dimensions();
        let scaled = scale_to_natural(rect, displayed, natural);
        let clamped = clamp_to_bounds(scaled, natural);
        self.crop = Some(clamped);
        Ok(clamped)
    }

    /// The output surface size an export of this session would produce:
    /// the preset's fixed target or the custom dimensions when one is
    /// selected, otherwise the crop's own size.
    pub fn export_dimensions(&self) -> Result<Dimensions, SessionError> {
        let crop = self.crop.ok_or(SessionError::NoCrop)?;
        Ok(match &self.selection {
            Selection::Preset(p) => p.target.unwrap_or_else(|| crop.size()),
            Selection::Custom { width, height } => Dimensions::new(*width, *height),
        })
    }

    fn recompute_crop(&mut self) {
        let Some(image) = &self.image else {
            return;
        };
        let natural = image.dimensions();
        self.crop = Some(match &self.selection {
            Selection::Preset(p) => centered_crop(natural, p.ratio),
            Selection::Custom { width, height } => {
                centered_crop_px(natural, Dimensions::new(*width, *height))
            }
        });
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(*crate::catalog::default_preset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::find_preset;

    fn image(width: u32, height: u32) -> SourceImage {
        SourceImage::new("/photos/test.jpg", Dimensions::new(width, height))
    }

    #[test]
    fn new_session_is_empty() {
        let session = Session::default();
        assert!(session.image().is_none());
        assert!(session.crop().is_none());
        assert!(matches!(session.export_dimensions(), Err(SessionError::NoCrop)));
    }

    #[test]
    fn loading_an_image_computes_the_initial_centered_crop() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));

        // Default preset is 16:9
        assert_eq!(session.crop(), Some(CropRect::new(0, 375, 4000, 2250)));
    }

    #[test]
    fn selecting_a_preset_recomputes_against_the_same_image() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));

        session.select_preset(*find_preset("1:1").unwrap());
        assert_eq!(session.crop(), Some(CropRect::new(500, 0, 3000, 3000)));
    }

    #[test]
    fn selection_made_before_loading_applies_on_load() {
        let mut session = Session::default();
        session.select_preset(*find_preset("9:16").unwrap());
        assert!(session.crop().is_none());

        session.load_image(image(4000, 3000));
        let crop = session.crop().unwrap();
        assert!(crop.fits_within(Dimensions::new(4000, 3000)));
        // Portrait ratio on a landscape image: full height
        assert_eq!(crop.height, 3000);
    }

    #[test]
    fn custom_selection_centers_preferred_pixels() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));

        session.select_custom(1200, 630).unwrap();
        assert_eq!(session.crop(), Some(CropRect::new(1400, 1185, 1200, 630)));
    }

    #[test]
    fn custom_selection_rejects_degenerate_dimensions() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));
        let before = session.crop();

        assert!(session.select_custom(0, 100).is_err());
        assert!(session.select_custom(100, 0).is_err());
        assert!(session.select_custom(10_001, 100).is_err());
        // Failed selection leaves the crop untouched
        assert_eq!(session.crop(), before);
    }

    #[test]
    fn new_image_discards_the_previous_crop() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));
        session
            .complete_drag(CropRect::new(0, 0, 100, 100), Dimensions::new(800, 600))
            .unwrap();

        session.load_image(SourceImage::new(
            "/photos/other.jpg",
            Dimensions::new(640, 480),
        ));
        let crop = session.crop().unwrap();
        assert!(crop.fits_within(Dimensions::new(640, 480)));
    }

    #[test]
    fn drag_scales_displayed_rect_to_natural_space() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));

        let stored = session
            .complete_drag(
                CropRect::new(100, 50, 200, 150),
                Dimensions::new(800, 600),
            )
            .unwrap();
        assert_eq!(stored, CropRect::new(500, 250, 1000, 750));
        assert_eq!(session.crop(), Some(stored));
    }

    #[test]
    fn drag_with_zero_display_size_is_rejected() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));
        let before = session.crop();

        let result = session.complete_drag(CropRect::new(0, 0, 10, 10), Dimensions::new(0, 600));
        assert!(matches!(result, Err(SessionError::ZeroDisplaySize)));
        assert_eq!(session.crop(), before);
    }

    #[test]
    fn drag_without_image_is_rejected() {
        let mut session = Session::default();
        let result = session.complete_drag(CropRect::new(0, 0, 10, 10), Dimensions::new(800, 600));
        assert!(matches!(result, Err(SessionError::NoImage)));
    }

    #[test]
    fn drag_overhang_is_clamped_into_bounds() {
        let mut session = Session::default();
        session.load_image(image(1000, 1000));

        // 2x scale pushes the right edge past the image
        let stored = session
            .complete_drag(CropRect::new(400, 400, 200, 200), Dimensions::new(500, 500))
            .unwrap();
        assert!(stored.fits_within(Dimensions::new(1000, 1000)));
        assert_eq!(stored, CropRect::new(800, 800, 200, 200));
    }

    #[test]
    fn aspect_change_after_drag_yields_in_bounds_crop() {
        let mut session = Session::default();
        session.load_image(image(3000, 4000));
        session
            .complete_drag(CropRect::new(10, 10, 50, 50), Dimensions::new(750, 1000))
            .unwrap();

        for key in ["1:1", "twitter", "9:16", "linkedin"] {
            session.select_preset(*find_preset(key).unwrap());
            let crop = session.crop().unwrap();
            assert!(
                crop.fits_within(Dimensions::new(3000, 4000)),
                "{key}: {crop:?}"
            );
        }
    }

    #[test]
    fn export_dimensions_use_preset_target() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));

        // Even after a drag, the preset's fixed target sizes the output
        session
            .complete_drag(CropRect::new(0, 0, 400, 225), Dimensions::new(800, 600))
            .unwrap();
        assert_eq!(
            session.export_dimensions().unwrap(),
            Dimensions::new(1920, 1080)
        );
    }

    #[test]
    fn export_dimensions_use_custom_selection() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));
        session.select_custom(970, 400).unwrap();

        assert_eq!(
            session.export_dimensions().unwrap(),
            Dimensions::new(970, 400)
        );
    }

    #[test]
    fn clear_returns_to_empty() {
        let mut session = Session::default();
        session.load_image(image(4000, 3000));
        session.clear();

        assert!(session.image().is_none());
        assert!(session.crop().is_none());
    }
}
