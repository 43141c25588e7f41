//! Background Stripping
//!
//! Turns a flat near-white backdrop transparent while keeping white glyphs
//! that sit on coloured content:
//! 1. Content bounds - box around every non-background pixel of the source
//! 2. Text fill (optional) - dark strokes near the centre become solid white
//! 3. Neighbour pass - background pixels outside the box are cleared; inside
//!    the box they survive only next to an opaque content pixel
//! 4. Edge pass (optional) - clears surviving background within a margin of
//!    the box edge
//!
//! Only alpha is ever lowered. Colour channels of cleared pixels are left as
//! they were.

use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use crate::bounds::{content_bounds, BoundingBox};
use crate::classify::{PixelClassifier, WhitenessClassifier};
use crate::error::{Result, TouchupError};

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StripSettings {
    /// Channels strictly above this count as background white (default: 240)
    pub white_threshold: u8,
    /// Half-size of the neighbour window, 2 means 5x5 (default: 2)
    pub neighbor_radius: u32,
    /// Margin inside the content box swept by the edge pass, 0 disables (default: 20)
    pub edge_margin: u32,
    /// Recolour dark text strokes to white before stripping (default: off)
    pub text_fill: Option<TextFillSettings>,
}

impl Default for StripSettings {
    fn default() -> Self {
        Self {
            white_threshold: 240,
            neighbor_radius: 2,
            edge_margin: 20,
            text_fill: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextFillSettings {
    /// Channels all strictly below this count as a dark stroke (default: 50)
    pub dark_threshold: u8,
    /// Where strokes are looked for
    pub region: TextFillRegion,
}

impl Default for TextFillSettings {
    fn default() -> Self {
        Self {
            dark_threshold: 50,
            region: TextFillRegion::default(),
        }
    }
}

/// Square region searched by the text fill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TextFillRegion {
    /// Centred on the content box, half-size = min(content w, h) * fraction
    ContentCentered { fraction: f64 },
    /// Centred on the image, fixed half-size in pixels
    ImageCentered { half_size: u32 },
}

impl Default for TextFillRegion {
    fn default() -> Self {
        TextFillRegion::ContentCentered { fraction: 0.6 }
    }
}

/// Per-stage counts from one strip run
#[derive(Debug, Clone, Serialize)]
pub struct StripReport {
    pub content_bounds: BoundingBox,
    pub filled: usize,
    pub cleared: usize,
    pub edge_cleared: usize,
}

impl StripSettings {
    pub fn validate(&self) -> Result<()> {
        if let Some(fill) = &self.text_fill {
            if let TextFillRegion::ContentCentered { fraction } = fill.region {
                if !fraction.is_finite() || fraction < 0.0 {
                    return Err(TouchupError::InvalidParameter(format!(
                        "text fill fraction must be a non-negative number, got {}",
                        fraction
                    )));
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// TEXT FILL
// ============================================================================

/// Centre and half-size of the fill square
fn fill_square(img: &RgbaImage, bounds: &BoundingBox, region: &TextFillRegion) -> (i64, i64, f64) {
    match *region {
        TextFillRegion::ContentCentered { fraction } => {
            let (cx, cy) = bounds.center();
            // Span, not pixel count: max - min
            let span = (bounds.max_x - bounds.min_x).min(bounds.max_y - bounds.min_y);
            (cx as i64, cy as i64, span as f64 * fraction)
        }
        TextFillRegion::ImageCentered { half_size } => {
            let (width, height) = img.dimensions();
            ((width / 2) as i64, (height / 2) as i64, half_size as f64)
        }
    }
}

fn fill_dark_text(img: &mut RgbaImage, bounds: &BoundingBox, settings: &TextFillSettings) -> usize {
    let (width, height) = img.dimensions();
    let (cx, cy, half) = fill_square(img, bounds, &settings.region);
    let dark = settings.dark_threshold;
    let mut filled = 0;

    for y in 0..height {
        for x in 0..width {
            let in_region = ((x as i64 - cx).abs() as f64) < half && ((y as i64 - cy).abs() as f64) < half;
            if !in_region {
                continue;
            }

            let pixel = img.get_pixel_mut(x, y);
            if pixel[0] < dark && pixel[1] < dark && pixel[2] < dark {
                *pixel = Rgba([255, 255, 255, 255]);
                filled += 1;
            }
        }
    }

    filled
}

// ============================================================================
// NEIGHBOUR PASS
// ============================================================================

/// Any opaque content pixel within `radius` (square window, centre excluded)
fn has_content_neighbor<C: PixelClassifier + ?Sized>(
    img: &RgbaImage,
    x: u32,
    y: u32,
    radius: u32,
    classifier: &C,
) -> bool {
    let (width, height) = img.dimensions();

    let x_start = x.saturating_sub(radius);
    let x_end = x.saturating_add(radius).min(width - 1);
    let y_start = y.saturating_sub(radius);
    let y_end = y.saturating_add(radius).min(height - 1);

    for ny in y_start..=y_end {
        for nx in x_start..=x_end {
            if nx == x && ny == y {
                continue;
            }
            let n = img.get_pixel(nx, ny);
            if n[3] > 0 && !classifier.is_background([n[0], n[1], n[2]]) {
                return true;
            }
        }
    }

    false
}

fn clear_background<C: PixelClassifier + ?Sized>(
    img: &mut RgbaImage,
    bounds: &BoundingBox,
    radius: u32,
    classifier: &C,
) -> usize {
    let (width, height) = img.dimensions();
    let mut cleared = 0;

    // In place: decisions see pixels already cleared earlier in the scan
    for y in 0..height {
        for x in 0..width {
            let pixel = *img.get_pixel(x, y);
            if !classifier.is_background([pixel[0], pixel[1], pixel[2]]) {
                continue;
            }

            let keep = bounds.contains(x, y) && has_content_neighbor(img, x, y, radius, classifier);
            if !keep && pixel[3] != 0 {
                img.get_pixel_mut(x, y)[3] = 0;
                cleared += 1;
            }
        }
    }

    cleared
}

// ============================================================================
// EDGE PASS
// ============================================================================

fn clear_edge_band<C: PixelClassifier + ?Sized>(
    img: &mut RgbaImage,
    bounds: &BoundingBox,
    margin: u32,
    classifier: &C,
) -> usize {
    let (width, height) = img.dimensions();
    let mut cleared = 0;

    for y in 0..height {
        for x in 0..width {
            let pixel = img.get_pixel_mut(x, y);
            if pixel[3] == 0 || !classifier.is_background([pixel[0], pixel[1], pixel[2]]) {
                continue;
            }

            let near_edge = x < bounds.min_x.saturating_add(margin)
                || x.saturating_add(margin) > bounds.max_x
                || y < bounds.min_y.saturating_add(margin)
                || y.saturating_add(margin) > bounds.max_y;

            if near_edge {
                pixel[3] = 0;
                cleared += 1;
            }
        }
    }

    cleared
}

// ============================================================================
// ENTRY POINTS
// ============================================================================

/// Strip the background in place using a custom classifier
///
/// Fails with `NoContent` (leaving the image untouched) when the classifier
/// finds no content pixel at all.
pub fn strip_background<C: PixelClassifier + ?Sized>(
    img: &mut RgbaImage,
    settings: &StripSettings,
    classifier: &C,
) -> Result<StripReport> {
    settings.validate()?;

    let bounds = content_bounds(img, classifier)
        .ok_or_else(|| TouchupError::NoContent("every pixel is background".to_string()))?;

    log::debug!(
        "content bounds: ({}, {}) to ({}, {})",
        bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y
    );

    let filled = match &settings.text_fill {
        Some(fill) => fill_dark_text(img, &bounds, fill),
        None => 0,
    };

    let cleared = clear_background(img, &bounds, settings.neighbor_radius, classifier);

    let edge_cleared = if settings.edge_margin > 0 {
        clear_edge_band(img, &bounds, settings.edge_margin, classifier)
    } else {
        0
    };

    log::debug!("strip: filled {}, cleared {}, edge cleared {}", filled, cleared, edge_cleared);

    Ok(StripReport {
        content_bounds: bounds,
        filled,
        cleared,
        edge_cleared,
    })
}

/// Strip using the whiteness classifier at `settings.white_threshold`
pub fn strip_white_background(img: &mut RgbaImage, settings: &StripSettings) -> Result<StripReport> {
    let classifier = WhitenessClassifier::new(settings.white_threshold);
    strip_background(img, settings, &classifier)
}

// ============================================================================
// TESTS
// ============================================================================
