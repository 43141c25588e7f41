//! Synthetic Button Rendering
//!
//! Draws a flat rounded-rectangle badge with centred text straight onto a
//! transparent square canvas. No source image and no stripping involved:
//! everything outside the rounded rectangle stays transparent by
//! construction, text included.

use ab_glyph::{FontVec, PxScale};
use image::{Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use crate::builtin_font;
use crate::error::{Result, TouchupError};
use crate::shape::RoundedRect;

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ButtonSettings {
    /// Square canvas side in pixels (default: 200)
    pub canvas_size: u32,
    /// Button width as a fraction of the canvas (default: 0.90)
    pub width_fraction: f64,
    /// Button height as a fraction of the canvas (default: 0.80)
    pub height_fraction: f64,
    /// Corner radius as a fraction of the button height (default: 0.20)
    pub corner_radius_fraction: f64,
    /// Label drawn on the button (default: "IMDb")
    pub text: String,
    /// Font pixel size as a fraction of the button height (default: 0.60)
    pub text_height_fraction: f64,
    /// Text is raised by this fraction of its own height (default: 0.10)
    pub text_lift_fraction: f64,
    /// Button fill as RGBA (default: opaque black)
    pub fill_color: (u8, u8, u8, u8),
    /// Text colour as RGBA (default: opaque white)
    pub text_color: (u8, u8, u8, u8),
    /// Font files tried in order; the built-in font is used if none load
    pub font_candidates: Vec<PathBuf>,
}

impl Default for ButtonSettings {
    fn default() -> Self {
        Self {
            canvas_size: 200,
            width_fraction: 0.90,
            height_fraction: 0.80,
            corner_radius_fraction: 0.20,
            text: "IMDb".to_string(),
            text_height_fraction: 0.60,
            text_lift_fraction: 0.10,
            fill_color: (0, 0, 0, 255),
            text_color: (255, 255, 255, 255),
            font_candidates: vec![
                PathBuf::from("/System/Library/Fonts/Supplemental/Arial Bold.ttf"),
                PathBuf::from("/System/Library/Fonts/Helvetica.ttc"),
                PathBuf::from("/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf"),
            ],
        }
    }
}

impl ButtonSettings {
    pub fn validate(&self) -> Result<()> {
        if self.canvas_size == 0 {
            return Err(TouchupError::InvalidParameter("canvas size must be positive".to_string()));
        }

        let unit_fractions = [
            ("width fraction", self.width_fraction),
            ("height fraction", self.height_fraction),
            ("text height fraction", self.text_height_fraction),
        ];
        for (name, value) in unit_fractions {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(TouchupError::InvalidParameter(format!(
                    "{} must be in (0, 1], got {}",
                    name, value
                )));
            }
        }

        if !self.corner_radius_fraction.is_finite() || !self.text_lift_fraction.is_finite() {
            return Err(TouchupError::InvalidParameter(
                "corner radius and text lift fractions must be finite".to_string(),
            ));
        }

        Ok(())
    }
}

// ============================================================================
// FONT RESOLUTION
// ============================================================================

/// Font used for the label
pub enum ButtonFont {
    TrueType(FontVec),
    Builtin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontKind {
    TrueType,
    Builtin,
}

impl ButtonFont {
    pub fn kind(&self) -> FontKind {
        match self {
            ButtonFont::TrueType(_) => FontKind::TrueType,
            ButtonFont::Builtin => FontKind::Builtin,
        }
    }
}

/// First candidate that reads and parses, otherwise the built-in font
///
/// Missing or broken font files are not errors.
pub fn resolve_font(candidates: &[PathBuf]) -> ButtonFont {
    for path in candidates {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::debug!("font {} unavailable: {}", path.display(), e);
                continue;
            }
        };

        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                log::debug!("using font {}", path.display());
                return ButtonFont::TrueType(font);
            }
            Err(e) => log::debug!("font {} unreadable: {}", path.display(), e),
        }
    }

    log::debug!("no candidate font resolved, falling back to built-in bitmap font");
    ButtonFont::Builtin
}

// ============================================================================
// LAYOUT
// ============================================================================

/// Geometry of a rendered button
#[derive(Debug, Clone, Serialize)]
pub struct ButtonLayout {
    pub canvas_size: u32,
    pub button: RoundedRect,
    pub font: FontKind,
    pub text_size: (u32, u32),
}

/// Centred rounded rectangle for the given settings
pub fn button_shape(settings: &ButtonSettings) -> Result<RoundedRect> {
    settings.validate()?;

    let size = settings.canvas_size;
    let width = (size as f64 * settings.width_fraction) as u32;
    let height = (size as f64 * settings.height_fraction) as u32;
    let radius = if settings.corner_radius_fraction > 0.0 {
        (height as f64 * settings.corner_radius_fraction) as u32
    } else {
        0
    };

    Ok(RoundedRect::new((size - width) / 2, (size - height) / 2, width, height, radius))
}

/// Source-over blend of two straight-alpha pixels
fn blend_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let channel = |i: usize| {
        let c = (src[i] as f32 * sa + dst[i] as f32 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    Rgba([channel(0), channel(1), channel(2), (out_a * 255.0).round().clamp(0.0, 255.0) as u8])
}

/// Draw the label into a coverage layer (alpha = coverage)
fn draw_label(layer: &mut RgbaImage, button: &RoundedRect, settings: &ButtonSettings, font: &ButtonFont) -> (u32, u32) {
    let text = settings.text.as_str();
    let coverage = Rgba([255, 255, 255, 255]);
    let max_width = (button.width as f64 * 0.9) as u32;
    let target_height = (button.height as f64 * settings.text_height_fraction) as u32;

    let (text_w, text_h, origin) = match font {
        ButtonFont::TrueType(face) => {
            let mut px = target_height.max(1) as f32;
            let (w, _) = text_size(PxScale::from(px), face, text);
            if w > max_width && w > 0 {
                px *= max_width as f32 / w as f32;
            }
            let scale = PxScale::from(px);
            let (w, h) = text_size(scale, face, text);
            let origin = text_origin(button, w, h, settings.text_lift_fraction);
            draw_text_mut(layer, coverage, origin.0 as i32, origin.1 as i32, scale, face, text);
            (w, h, origin)
        }
        ButtonFont::Builtin => {
            let scale = builtin_font::fit_scale(text, max_width, target_height);
            let (w, h) = builtin_font::text_size(text, scale);
            let origin = text_origin(button, w, h, settings.text_lift_fraction);
            builtin_font::draw_text(layer, coverage, origin.0, origin.1, scale, text);
            (w, h, origin)
        }
    };

    log::debug!("label {:?}: {}x{} at ({}, {})", text, text_w, text_h, origin.0, origin.1);
    (text_w, text_h)
}

fn text_origin(button: &RoundedRect, w: u32, h: u32, lift: f64) -> (i64, i64) {
    let x = button.x as i64 + (button.width as i64 - w as i64).div_euclid(2);
    let y = button.y as i64 + (button.height as i64 - h as i64).div_euclid(2) - (h as f64 * lift) as i64;
    (x, y)
}

// ============================================================================
// RENDERING
// ============================================================================

/// Render using fonts resolved from `settings.font_candidates`
pub fn render_button(settings: &ButtonSettings) -> Result<(RgbaImage, ButtonLayout)> {
    let font = resolve_font(&settings.font_candidates);
    render_button_with_font(settings, &font)
}

/// Render with an already resolved font
pub fn render_button_with_font(settings: &ButtonSettings, font: &ButtonFont) -> Result<(RgbaImage, ButtonLayout)> {
    let button = button_shape(settings)?;
    let size = settings.canvas_size;

    let (fr, fg, fb, fa) = settings.fill_color;
    let fill = Rgba([fr, fg, fb, fa]);
    let mut canvas = RgbaImage::from_fn(size, size, |x, y| {
        if button.contains(x, y) {
            fill
        } else {
            Rgba([0, 0, 0, 0])
        }
    });

    let mut layer = RgbaImage::new(size, size);
    let text_size = draw_label(&mut layer, &button, settings, font);

    let (tr, tg, tb, ta) = settings.text_color;
    for (x, y, cov) in layer.enumerate_pixels() {
        // Label is clipped to the button outline
        if cov[3] == 0 || !button.contains(x, y) {
            continue;
        }
        let alpha = (ta as u32 * cov[3] as u32 / 255) as u8;
        let dst = *canvas.get_pixel(x, y);
        canvas.put_pixel(x, y, blend_over(dst, Rgba([tr, tg, tb, alpha])));
    }

    Ok((
        canvas,
        ButtonLayout {
            canvas_size: size,
            button,
            font: font.kind(),
            text_size,
        },
    ))
}

// ============================================================================
// TESTS
// ============================================================================
