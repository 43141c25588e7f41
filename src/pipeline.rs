//! Touch-up Pipeline
//!
//! Chains the stages into the single transform every asset goes through:
//! load -> strip background -> crop to opaque -> (rounded mask) -> save.
//! A failure at any stage aborts before anything is written.
//!
//! `touch_up_image` is the in-memory form; `touch_up`, `create_button` and
//! `run_batch` wrap it with file I/O.

use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ExtendedColorType, ImageEncoder, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use crate::bounds::{crop_to_opaque, BoundingBox};
use crate::button::{render_button, ButtonLayout, ButtonSettings};
use crate::classify::{PixelClassifier, WhitenessClassifier};
use crate::error::{Result, TouchupError};
use crate::mask::{apply_rounded_mask, MaskSettings};
use crate::stripper::{strip_background, StripReport, StripSettings};

// ============================================================================
// SETTINGS
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TouchupSettings {
    /// Background stripping thresholds
    pub strip: StripSettings,
    /// Rounded-corner mask applied after cropping (default: off)
    pub rounded_corners: Option<MaskSettings>,
    /// Synthetic button parameters
    pub button: ButtonSettings,
}

impl TouchupSettings {
    /// Check the sections the touch-up pipeline uses; `button` is checked
    /// by the renderer
    pub fn validate(&self) -> Result<()> {
        self.strip.validate()?;
        if let Some(mask) = &self.rounded_corners {
            mask.validate()?;
        }
        Ok(())
    }
}

/// Read settings from a JSON file; omitted fields keep their defaults
///
/// Values are validated by the stage that uses them, so a bad `button`
/// section does not block stripping.
pub fn load_settings(path: &Path) -> Result<TouchupSettings> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[derive(Debug, Clone, Serialize)]
pub struct TouchupResult {
    pub original_size: (u32, u32),
    pub final_size: (u32, u32),
    pub content_bounds: BoundingBox,
    pub rounded: bool,
    pub strip: StripReport,
}

// ============================================================================
// IMAGE I/O
// ============================================================================

fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| TouchupError::Load {
        path: path.to_path_buf(),
        source,
    })
}

/// Load an image from disk as RGBA, keeping any alpha it has
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    Ok(open_image(path)?.to_rgba8())
}

/// Load a source photo for touch-up: alpha is discarded, every pixel starts opaque
pub fn load_source_image(path: &Path) -> Result<RgbaImage> {
    let rgb = open_image(path)?.to_rgb8();
    Ok(DynamicImage::ImageRgb8(rgb).to_rgba8())
}

/// Encode as RGBA PNG with the strongest compression and adaptive filtering
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let encoder = PngEncoder::new_with_quality(&mut buffer, CompressionType::Best, FilterType::Adaptive);
    encoder.write_image(img.as_raw(), img.width(), img.height(), ExtendedColorType::Rgba8)?;
    Ok(buffer)
}

/// Save as optimized PNG, creating the output directory if needed
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(img)?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(())
}

// ============================================================================
// PIPELINES
// ============================================================================

/// Strip, crop and optionally round an in-memory image with a custom classifier
pub fn touch_up_image_with<C: PixelClassifier + ?Sized>(
    mut img: RgbaImage,
    settings: &TouchupSettings,
    classifier: &C,
) -> Result<(RgbaImage, TouchupResult)> {
    settings.validate()?;
    let original_size = img.dimensions();

    let strip = strip_background(&mut img, &settings.strip, classifier)?;
    let mut output = crop_to_opaque(&img)?;

    if let Some(mask) = &settings.rounded_corners {
        output = apply_rounded_mask(&output, mask)?;
    }

    let result = TouchupResult {
        original_size,
        final_size: output.dimensions(),
        content_bounds: strip.content_bounds,
        rounded: settings.rounded_corners.is_some(),
        strip,
    };

    Ok((output, result))
}

/// Strip, crop and optionally round using the whiteness classifier
pub fn touch_up_image(img: RgbaImage, settings: &TouchupSettings) -> Result<(RgbaImage, TouchupResult)> {
    let classifier = WhitenessClassifier::new(settings.strip.white_threshold);
    touch_up_image_with(img, settings, &classifier)
}

/// File to file touch-up; nothing is written unless every stage succeeds
pub fn touch_up(input_path: &Path, output_path: &Path, settings: &TouchupSettings) -> Result<TouchupResult> {
    let img = load_source_image(input_path)?;
    let (output, result) = touch_up_image(img, settings)?;

    save_png(&output, output_path)?;

    log::debug!(
        "{}: {:?} -> {:?}, saved to {}",
        input_path.display(),
        result.original_size,
        result.final_size,
        output_path.display()
    );

    Ok(result)
}

/// Render the synthetic button and save it
pub fn create_button(output_path: &Path, settings: &ButtonSettings) -> Result<ButtonLayout> {
    let (img, layout) = render_button(settings)?;
    save_png(&img, output_path)?;

    log::debug!(
        "button {}x{} (radius {}) on {}px canvas, saved to {}",
        layout.button.width,
        layout.button.height,
        layout.button.radius,
        layout.canvas_size,
        output_path.display()
    );

    Ok(layout)
}

// ============================================================================
// BATCH
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchJob {
    /// Label for reporting; defaults to the input file stem
    #[serde(default)]
    pub name: Option<String>,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl BatchJob {
    pub fn label(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.input
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string()
        })
    }
}

#[derive(Debug, Serialize)]
pub struct BatchOutcome {
    pub name: String,
    pub output: PathBuf,
    pub result: std::result::Result<TouchupResult, TouchupError>,
}

impl BatchOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Read a JSON array of jobs
pub fn load_manifest(path: &Path) -> Result<Vec<BatchJob>> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Run every job in order; a failed job does not stop the rest
pub fn run_batch(jobs: &[BatchJob], settings: &TouchupSettings) -> Vec<BatchOutcome> {
    jobs.iter()
        .map(|job| {
            let name = job.label();
            let result = touch_up(&job.input, &job.output, settings);
            if let Err(e) = &result {
                log::warn!("{}: {}", name, e);
            }
            BatchOutcome {
                name,
                output: job.output.clone(),
                result,
            }
        })
        .collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn badge_source() -> RgbaImage {
        // White backdrop, yellow plate, black "text" bar in the middle
        let mut img = RgbaImage::from_pixel(160, 120, Rgba([252, 252, 252, 255]));
        for y in 20..100 {
            for x in 30..130 {
                img.put_pixel(x, y, Rgba([245, 197, 24, 255]));
            }
        }
        for y in 58..62 {
            for x in 60..100 {
                img.put_pixel(x, y, Rgba([10, 10, 10, 255]));
            }
        }
        img
    }

    #[test]
    fn test_touch_up_crops_to_plate() {
        let (out, result) = touch_up_image(badge_source(), &TouchupSettings::default()).unwrap();
        assert_eq!(result.original_size, (160, 120));
        assert_eq!(out.dimensions(), (100, 80));
        assert_eq!(result.final_size, (100, 80));
        assert!(!result.rounded);
    }

    #[test]
    fn test_touch_up_with_rounding() {
        let settings = TouchupSettings {
            rounded_corners: Some(MaskSettings { corner_radius_fraction: 0.25 }),
            ..TouchupSettings::default()
        };
        let (out, result) = touch_up_image(badge_source(), &settings).unwrap();
        assert!(result.rounded);
        assert_eq!(out.get_pixel(0, 0)[3], 0);
        assert_eq!(out.get_pixel(50, 40)[3], 255);
    }

    #[test]
    fn test_touch_up_with_text_fill() {
        let mut settings = TouchupSettings::default();
        settings.strip.text_fill = Some(Default::default());
        let (out, result) = touch_up_image(badge_source(), &settings).unwrap();
        assert_eq!(result.strip.filled, 160);
        // Bar at (60..100, 58..62) lands at (30..70, 38..42) after the crop
        assert_eq!(*out.get_pixel(40, 40), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4]));
        let bytes = encode_png(&img).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert!(decoded.color().has_alpha());
        assert_eq!(decoded.to_rgba8(), img);
    }

    #[test]
    fn test_settings_json_partial() {
        let json = r#"{ "strip": { "white_threshold": 245 }, "rounded_corners": {} }"#;
        let settings: TouchupSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.strip.white_threshold, 245);
        assert_eq!(settings.strip.edge_margin, 20);
        assert_eq!(settings.rounded_corners.unwrap().corner_radius_fraction, 0.12);
        assert_eq!(settings.button.canvas_size, 200);
    }

    #[test]
    fn test_source_alpha_is_flattened() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cutout.png");
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 1, Rgba([255, 0, 0, 255]));
        img.save(&path).unwrap();

        let source = load_source_image(&path).unwrap();
        assert_eq!(*source.get_pixel(0, 0), Rgba([0, 0, 0, 255]));
        assert_eq!(*source.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(load_image(&path).unwrap().get_pixel(0, 0)[3], 0);

        // Transparent black is content once flattened, so nothing is cropped
        let output = dir.path().join("out.png");
        let result = touch_up(&path, &output, &TouchupSettings::default()).unwrap();
        assert_eq!(result.final_size, (4, 4));
    }

    #[test]
    fn test_bad_button_section_does_not_block_stripping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{ "button": { "width_fraction": 1.5 } }"#).unwrap();

        let settings = load_settings(&path).unwrap();
        assert!(touch_up_image(badge_source(), &settings).is_ok());

        let err = create_button(&dir.path().join("button.png"), &settings.button).unwrap_err();
        assert!(matches!(err, TouchupError::InvalidParameter(_)));
        assert!(!dir.path().join("button.png").exists());
    }

    #[test]
    fn test_invalid_mask_rejected_before_stripping() {
        let settings = TouchupSettings {
            rounded_corners: Some(MaskSettings { corner_radius_fraction: f64::NAN }),
            ..TouchupSettings::default()
        };
        let err = touch_up_image(badge_source(), &settings).unwrap_err();
        assert!(matches!(err, TouchupError::InvalidParameter(_)));
    }

    #[test]
    fn test_batch_job_label() {
        let job = BatchJob {
            name: None,
            input: PathBuf::from("images/imdb2.jpg"),
            output: PathBuf::from("out.png"),
        };
        assert_eq!(job.label(), "imdb2");
    }
}
