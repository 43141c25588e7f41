//! Command-line interface definitions.

use badge_touchup::{MaskSettings, TextFillRegion, TextFillSettings, TouchupSettings};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Strip white backgrounds from badge images and render rounded buttons
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Log stage details (same as RUST_LOG=debug)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON settings file; command-line flags override its values
    #[arg(short = 'C', long, global = true, value_hint = clap::ValueHint::FilePath)]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Remove the white background, crop to content and save as PNG
    #[command(visible_alias = "s")]
    Strip {
        /// Source image (JPEG or PNG)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        input: PathBuf,

        /// Output PNG
        #[arg(value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,

        #[command(flatten)]
        strip: StripArgs,
    },

    /// Render a rounded button with centred text
    #[command(visible_alias = "b")]
    Button {
        /// Output PNG
        #[arg(value_hint = clap::ValueHint::FilePath)]
        output: PathBuf,

        /// Square canvas size in pixels
        #[arg(long)]
        size: Option<u32>,

        /// Button label
        #[arg(long)]
        text: Option<String>,

        /// Corner radius as a fraction of the button height
        #[arg(long)]
        corner_radius: Option<f64>,

        /// Font file to try (repeatable, tried in order before the built-in font)
        #[arg(long = "font", value_hint = clap::ValueHint::FilePath)]
        fonts: Vec<PathBuf>,
    },

    /// Process every job of a JSON manifest with shared settings
    Batch {
        /// JSON array of { "name"?, "input", "output" }
        #[arg(value_hint = clap::ValueHint::FilePath)]
        manifest: PathBuf,

        /// Write per-job outcomes as JSON
        #[arg(long, value_hint = clap::ValueHint::FilePath)]
        report: Option<PathBuf>,

        #[command(flatten)]
        strip: StripArgs,
    },
}

/// Overrides for the stripping and rounding stages
#[derive(Args, Debug, Clone, Default)]
pub struct StripArgs {
    /// Channels above this are background white
    #[arg(long)]
    pub white_threshold: Option<u8>,

    /// Neighbour window half-size for keeping white glyph pixels
    #[arg(long)]
    pub neighbor_radius: Option<u32>,

    /// Margin swept by the edge pass (0 disables it)
    #[arg(long)]
    pub edge_margin: Option<u32>,

    /// Recolour dark text strokes near the centre to white
    #[arg(long)]
    pub fill_text: bool,

    /// Channels below this count as a dark stroke
    #[arg(long, requires = "fill_text")]
    pub dark_threshold: Option<u8>,

    /// Fill region half-size as a fraction of the content size
    #[arg(long, requires = "fill_text", conflicts_with = "fill_half_size")]
    pub fill_fraction: Option<f64>,

    /// Fill region half-size in pixels, centred on the image
    #[arg(long, requires = "fill_text")]
    pub fill_half_size: Option<u32>,

    /// Round the corners of the cropped result (fraction of the shorter side)
    #[arg(long, num_args = 0..=1, default_missing_value = "0.12")]
    pub round_corners: Option<f64>,
}

impl StripArgs {
    pub fn apply(&self, settings: &mut TouchupSettings) {
        let strip = &mut settings.strip;
        if let Some(v) = self.white_threshold {
            strip.white_threshold = v;
        }
        if let Some(v) = self.neighbor_radius {
            strip.neighbor_radius = v;
        }
        if let Some(v) = self.edge_margin {
            strip.edge_margin = v;
        }

        if self.fill_text {
            let fill = strip.text_fill.get_or_insert_with(TextFillSettings::default);
            if let Some(v) = self.dark_threshold {
                fill.dark_threshold = v;
            }
            if let Some(fraction) = self.fill_fraction {
                fill.region = TextFillRegion::ContentCentered { fraction };
            }
            if let Some(half_size) = self.fill_half_size {
                fill.region = TextFillRegion::ImageCentered { half_size };
            }
        }

        if let Some(fraction) = self.round_corners {
            settings.rounded_corners = Some(MaskSettings { corner_radius_fraction: fraction });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_strip_overrides() {
        let cli = Cli::parse_from([
            "badge-touchup", "strip", "in.jpg", "out.png",
            "--white-threshold", "245", "--fill-text", "--fill-half-size", "400", "--round-corners",
        ]);
        let Commands::Strip { strip, .. } = cli.command else {
            panic!("expected strip command");
        };

        let mut settings = TouchupSettings::default();
        strip.apply(&mut settings);

        assert_eq!(settings.strip.white_threshold, 245);
        let fill = settings.strip.text_fill.unwrap();
        assert_eq!(fill.dark_threshold, 50);
        assert_eq!(fill.region, TextFillRegion::ImageCentered { half_size: 400 });
        assert_eq!(settings.rounded_corners.unwrap().corner_radius_fraction, 0.12);
    }

    #[test]
    fn test_no_flags_keep_settings() {
        let mut settings = TouchupSettings::default();
        settings.strip.edge_margin = 7;
        StripArgs::default().apply(&mut settings);
        assert_eq!(settings.strip.edge_margin, 7);
        assert!(settings.strip.text_fill.is_none());
        assert!(settings.rounded_corners.is_none());
    }

    #[test]
    fn test_dark_threshold_requires_fill_text() {
        let parsed = Cli::try_parse_from(["badge-touchup", "strip", "a", "b", "--dark-threshold", "40"]);
        assert!(parsed.is_err());
    }
}
