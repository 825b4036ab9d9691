//! The aspect-ratio preset catalog.
//!
//! A static table of named presets, each with a display label, a numeric
//! width/height ratio, and a fixed output pixel size. The table is defined
//! at compile time and consumed read-only by the session and the CLI.
//!
//! Presets carry *two* independent facts: the ratio shapes the crop
//! rectangle drawn over the source, and the target dimensions size the
//! exported surface. A 16:9 crop of any source always exports at 1920x1080;
//! the blit bridges whatever gap remains.

use crate::imaging::Dimensions;

/// A named aspect-ratio preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AspectPreset {
    /// Stable lookup key (`"16:9"`, `"facebook"`, ...).
    pub key: &'static str,
    /// Human-readable label for listings.
    pub label: &'static str,
    /// Width divided by height. Always positive.
    pub ratio: f64,
    /// Fixed output surface size. When present, equals `ratio` exactly.
    pub target: Option<Dimensions>,
}

impl AspectPreset {
    pub const fn target_dims(width: u32, height: u32) -> Option<Dimensions> {
        Some(Dimensions { width, height })
    }
}

/// Key of the preset selected when nothing else is configured.
pub const DEFAULT_PRESET: &str = "16:9";

/// All built-in presets, in display order.
pub const ASPECT_PRESETS: &[AspectPreset] = &[
    AspectPreset {
        key: "16:9",
        label: "16:9 - Landscape (1920x1080)",
        ratio: 16.0 / 9.0,
        target: AspectPreset::target_dims(1920, 1080),
    },
    AspectPreset {
        key: "4:3",
        label: "4:3 - Standard (1600x1200)",
        ratio: 4.0 / 3.0,
        target: AspectPreset::target_dims(1600, 1200),
    },
    AspectPreset {
        key: "3:2",
        label: "3:2 - Photo (1200x800)",
        ratio: 3.0 / 2.0,
        target: AspectPreset::target_dims(1200, 800),
    },
    AspectPreset {
        key: "1:1",
        label: "1:1 - Square (1080x1080)",
        ratio: 1.0,
        target: AspectPreset::target_dims(1080, 1080),
    },
    AspectPreset {
        key: "2:3",
        label: "2:3 - Portrait (800x1200)",
        ratio: 2.0 / 3.0,
        target: AspectPreset::target_dims(800, 1200),
    },
    AspectPreset {
        key: "9:16",
        label: "9:16 - Story (1080x1920)",
        ratio: 9.0 / 16.0,
        target: AspectPreset::target_dims(1080, 1920),
    },
    AspectPreset {
        key: "facebook",
        label: "Facebook Cover (1200x630)",
        ratio: 1200.0 / 630.0,
        target: AspectPreset::target_dims(1200, 630),
    },
    AspectPreset {
        key: "twitter",
        label: "Twitter Header (1500x500)",
        ratio: 1500.0 / 500.0,
        target: AspectPreset::target_dims(1500, 500),
    },
    AspectPreset {
        key: "linkedin",
        label: "LinkedIn Banner (1584x396)",
        ratio: 1584.0 / 396.0,
        target: AspectPreset::target_dims(1584, 396),
    },
    AspectPreset {
        key: "youtube",
        label: "YouTube Thumbnail (1280x720)",
        ratio: 1280.0 / 720.0,
        target: AspectPreset::target_dims(1280, 720),
    },
];

/// Look up a preset by key.
pub fn find_preset(key: &str) -> Option<&'static AspectPreset> {
    ASPECT_PRESETS.iter().find(|p| p.key == key)
}

/// The preset used when no selection has been made.
pub fn default_preset() -> &'static AspectPreset {
    find_preset(DEFAULT_PRESET).expect("default preset must exist in the catalog")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_ratios_are_positive() {
        for preset in ASPECT_PRESETS {
            assert!(preset.ratio > 0.0, "{}", preset.key);
        }
    }

    #[test]
    fn targets_agree_with_ratios() {
        for preset in ASPECT_PRESETS {
            let Some(target) = preset.target else {
                continue;
            };
            let target_ratio = target.width as f64 / target.height as f64;
            assert!(
                (target_ratio - preset.ratio).abs() < 1e-9,
                "{}: ratio {} vs target {}",
                preset.key,
                preset.ratio,
                target_ratio
            );
        }
    }

    #[test]
    fn keys_are_unique() {
        for (i, a) in ASPECT_PRESETS.iter().enumerate() {
            for b in &ASPECT_PRESETS[i + 1..] {
                assert_ne!(a.key, b.key);
            }
        }
    }

    #[test]
    fn default_preset_is_16_9() {
        let preset = default_preset();
        assert_eq!(preset.key, "16:9");
        assert_eq!(preset.target, Some(Dimensions::new(1920, 1080)));
    }

    #[test]
    fn lookup_by_key() {
        assert_eq!(find_preset("facebook").unwrap().ratio, 1200.0 / 630.0);
        assert!(find_preset("circle").is_none());
        assert!(find_preset("").is_none());
    }
}
