//! Pixel Classification
//!
//! Decides whether a colour belongs to the background or to the content.
//! The stripper, the bounds pass and the neighbour test all go through
//! [`PixelClassifier`], so a different heuristic can be dropped in without
//! touching the crop or mask stages.

use serde::{Deserialize, Serialize};

/// Category of a single colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelClass {
    /// Presumed background (near-white for the default classifier)
    Background,
    /// Anything that should survive stripping
    Content,
}

impl PixelClass {
    pub fn is_background(self) -> bool {
        matches!(self, PixelClass::Background)
    }
}

/// Maps an RGB colour to a [`PixelClass`]. Alpha is never passed in; callers
/// check opacity separately.
pub trait PixelClassifier {
    fn classify(&self, rgb: [u8; 3]) -> PixelClass;

    fn is_background(&self, rgb: [u8; 3]) -> bool {
        self.classify(rgb).is_background()
    }
}

impl<F> PixelClassifier for F
where
    F: Fn([u8; 3]) -> PixelClass,
{
    fn classify(&self, rgb: [u8; 3]) -> PixelClass {
        self(rgb)
    }
}

/// Background = every channel strictly above `threshold`
#[derive(Debug, Clone, Copy)]
pub struct WhitenessClassifier {
    pub threshold: u8,
}

impl WhitenessClassifier {
    pub fn new(threshold: u8) -> Self {
        Self { threshold }
    }
}

impl Default for WhitenessClassifier {
    fn default() -> Self {
        Self { threshold: 240 }
    }
}

impl PixelClassifier for WhitenessClassifier {
    fn classify(&self, rgb: [u8; 3]) -> PixelClass {
        let t = self.threshold;
        if rgb[0] > t && rgb[1] > t && rgb[2] > t {
            PixelClass::Background
        } else {
            PixelClass::Content
        }
    }
}
