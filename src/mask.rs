//! Rounded-corner mask compositing
//!
//! Squares a cropped image off into a badge: a coverage mask (0 or 255)
//! shaped like a rounded rectangle is built at the image size, and each
//! output alpha is `min(source alpha, mask)`. Colour is never touched.

use image::{GrayImage, Luma, RgbaImage};
use serde::{Deserialize, Serialize};
use crate::error::{Result, TouchupError};
use crate::shape::RoundedRect;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskSettings {
    /// Corner radius as a fraction of min(width, height) (default: 0.12)
    pub corner_radius_fraction: f64,
}

impl Default for MaskSettings {
    fn default() -> Self {
        Self { corner_radius_fraction: 0.12 }
    }
}

impl MaskSettings {
    pub fn validate(&self) -> Result<()> {
        if !self.corner_radius_fraction.is_finite() {
            return Err(TouchupError::InvalidParameter(format!(
                "corner radius fraction must be finite, got {}",
                self.corner_radius_fraction
            )));
        }
        Ok(())
    }
}

/// Radius in pixels, truncated; non-positive fractions give 0
pub fn corner_radius(width: u32, height: u32, fraction: f64) -> u32 {
    if fraction <= 0.0 {
        return 0;
    }
    (width.min(height) as f64 * fraction) as u32
}

/// Coverage mask for a rounded rectangle filling the whole `width` x `height`
pub fn rounded_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let shape = RoundedRect::new(0, 0, width, height, radius);
    GrayImage::from_fn(width, height, |x, y| {
        if shape.contains(x, y) {
            Luma([255])
        } else {
            Luma([0])
        }
    })
}

/// Apply a rounded mask sized to `img`
pub fn apply_rounded_mask(img: &RgbaImage, settings: &MaskSettings) -> Result<RgbaImage> {
    settings.validate()?;

    let (width, height) = img.dimensions();
    let radius = corner_radius(width, height, settings.corner_radius_fraction);
    let mask = rounded_mask(width, height, radius);

    log::debug!("rounded mask: {}x{} radius {}", width, height, radius);

    let mut result = img.clone();
    for (x, y, pixel) in result.enumerate_pixels_mut() {
        let coverage = mask.get_pixel(x, y)[0];
        pixel[3] = pixel[3].min(coverage);
    }

    Ok(result)
}
