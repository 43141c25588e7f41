// File-level behaviour of the touch-up and button pipelines
use badge_touchup::{
    create_button, load_image, load_manifest, run_batch, touch_up, BatchJob, ButtonSettings,
    MaskSettings, TouchupError, TouchupSettings,
};
use image::{Rgba, RgbaImage};
use std::path::Path;

fn write_square_on_white(path: &Path) {
    let mut img = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
    for y in 45..55 {
        for x in 45..55 {
            img.put_pixel(x, y, Rgba([0, 0, 0, 255]));
        }
    }
    img.save(path).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_on_white_yields_black_square() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("square.png");
        let output = dir.path().join("out/square.png");
        write_square_on_white(&input);

        let result = touch_up(&input, &output, &TouchupSettings::default()).unwrap();
        assert_eq!(result.final_size, (10, 10));

        let saved = image::open(&output).unwrap();
        assert!(saved.color().has_alpha());
        let saved = saved.to_rgba8();
        assert_eq!(saved.dimensions(), (10, 10));
        assert!(saved.pixels().all(|p| *p == Rgba([0, 0, 0, 255])));
    }

    #[test]
    fn test_jpeg_source_is_accepted() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("plate.jpg");
        let output = dir.path().join("plate.png");

        let mut img = image::RgbImage::from_pixel(80, 60, image::Rgb([255, 255, 255]));
        // Block-aligned so the encoder has no edge to ring on
        for y in 8..48 {
            for x in 8..72 {
                img.put_pixel(x, y, image::Rgb([20, 20, 20]));
            }
        }
        img.save(&input).unwrap();

        let result = touch_up(&input, &output, &TouchupSettings::default()).unwrap();
        let (w, h) = result.final_size;
        assert!((62..=66).contains(&w), "width {}", w);
        assert!((38..=42).contains(&h), "height {}", h);
        assert!(output.exists());
    }

    #[test]
    fn test_all_white_reports_no_content_and_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("white.png");
        let output = dir.path().join("white-out.png");
        RgbaImage::from_pixel(64, 64, Rgba([250, 250, 250, 255])).save(&input).unwrap();

        let err = touch_up(&input, &output, &TouchupSettings::default()).unwrap_err();
        assert!(matches!(err, TouchupError::NoContent(_)));
        assert!(!output.exists());
    }

    #[test]
    fn test_corrupt_source_is_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("broken.png");
        let output = dir.path().join("broken-out.png");
        std::fs::write(&input, b"\x89PNG not really").unwrap();

        let err = touch_up(&input, &output, &TouchupSettings::default()).unwrap_err();
        assert!(matches!(err, TouchupError::Load { .. }), "got {:?}", err);
        assert!(!output.exists());

        let missing = load_image(&dir.path().join("nope.jpg")).unwrap_err();
        assert!(matches!(missing, TouchupError::Load { .. }));
    }

    #[test]
    fn test_rounded_output_has_clear_corners() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("square.png");
        let output = dir.path().join("rounded.png");
        write_square_on_white(&input);

        let settings = TouchupSettings {
            rounded_corners: Some(MaskSettings { corner_radius_fraction: 0.4 }),
            ..TouchupSettings::default()
        };
        touch_up(&input, &output, &settings).unwrap();

        let saved = load_image(&output).unwrap();
        assert_eq!(saved.get_pixel(0, 0)[3], 0);
        assert_eq!(saved.get_pixel(5, 5)[3], 255);
    }

    #[test]
    fn test_button_file() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("button.png");
        let settings = ButtonSettings {
            font_candidates: Vec::new(),
            ..ButtonSettings::default()
        };

        let layout = create_button(&output, &settings).unwrap();
        assert_eq!((layout.button.width, layout.button.height), (180, 160));

        let saved = load_image(&output).unwrap();
        assert_eq!(saved.dimensions(), (200, 200));
        assert_eq!(saved.get_pixel(0, 0)[3], 0);
        assert_eq!(saved.get_pixel(100, 30)[3], 255);
    }

    #[test]
    fn test_batch_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.png");
        let bad = dir.path().join("white.png");
        write_square_on_white(&good);
        RgbaImage::from_pixel(20, 20, Rgba([255, 255, 255, 255])).save(&bad).unwrap();

        let manifest = dir.path().join("jobs.json");
        let jobs = vec![
            BatchJob { name: Some("white".into()), input: bad, output: dir.path().join("white-out.png") },
            BatchJob { name: None, input: dir.path().join("missing.jpg"), output: dir.path().join("missing-out.png") },
            BatchJob { name: None, input: good, output: dir.path().join("good-out.png") },
        ];
        std::fs::write(&manifest, serde_json::to_string(&jobs).unwrap()).unwrap();

        let jobs = load_manifest(&manifest).unwrap();
        let outcomes = run_batch(&jobs, &TouchupSettings::default());

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[0].result, Err(TouchupError::NoContent(_))));
        assert!(matches!(outcomes[1].result, Err(TouchupError::Load { .. })));
        assert_eq!(outcomes[1].name, "missing");
        assert!(outcomes[2].is_ok());
        assert!(dir.path().join("good-out.png").exists());
        assert!(!dir.path().join("white-out.png").exists());

        let report = serde_json::to_value(&outcomes).unwrap();
        assert!(report[0]["result"]["Err"].as_str().unwrap().contains("No content"));
    }
}
