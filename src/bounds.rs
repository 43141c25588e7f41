use image::RgbaImage;
use serde::{Deserialize, Serialize};
use crate::classify::PixelClassifier;
use crate::error::{Result, TouchupError};

/// Inclusive axis-aligned pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.min_x && x <= self.max_x && y >= self.min_y && y <= self.max_y
    }

    /// Centre point, rounded down
    pub fn center(&self) -> (u32, u32) {
        ((self.min_x + self.max_x) / 2, (self.min_y + self.max_y) / 2)
    }

    /// Full bounds of an image
    pub fn of_image(img: &RgbaImage) -> Option<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self { min_x: 0, min_y: 0, max_x: width - 1, max_y: height - 1 })
    }
}

/// Smallest box enclosing every pixel matching `keep`
fn bounds_where<F>(img: &RgbaImage, keep: F) -> Option<BoundingBox>
where
    F: Fn(&image::Rgba<u8>) -> bool,
{
    let (width, height) = img.dimensions();

    let mut min_x = width;
    let mut max_x = 0;
    let mut min_y = height;
    let mut max_y = 0;

    for y in 0..height {
        for x in 0..width {
            if keep(img.get_pixel(x, y)) {
                min_x = min_x.min(x);
                max_x = max_x.max(x);
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
    }

    if min_x > max_x || min_y > max_y {
        return None;
    }

    Some(BoundingBox { min_x, min_y, max_x, max_y })
}

/// Bounds of every pixel the classifier calls content, regardless of alpha
pub fn content_bounds<C: PixelClassifier + ?Sized>(img: &RgbaImage, classifier: &C) -> Option<BoundingBox> {
    bounds_where(img, |p| !classifier.is_background([p[0], p[1], p[2]]))
}

/// Bounds of every pixel with alpha > 0
pub fn opaque_bounds(img: &RgbaImage) -> Option<BoundingBox> {
    bounds_where(img, |p| p[3] > 0)
}

/// Crop to the tight box around non-transparent pixels
///
/// Idempotent: cropping an already tight image returns it unchanged.
pub fn crop_to_opaque(img: &RgbaImage) -> Result<RgbaImage> {
    let bbox = opaque_bounds(img)
        .ok_or_else(|| TouchupError::NoContent("no opaque pixel left to crop".to_string()))?;

    log::debug!(
        "crop: ({}, {}) to ({}, {}) -> {}x{}",
        bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y, bbox.width(), bbox.height()
    );

    Ok(image::imageops::crop_imm(img, bbox.min_x, bbox.min_y, bbox.width(), bbox.height()).to_image())
}
