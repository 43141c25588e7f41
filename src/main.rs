mod cli;

use anyhow::{Context, Result};
use badge_touchup::{create_button, load_manifest, load_settings, run_batch, touch_up, TouchupSettings};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            println!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn base_settings(path: Option<&Path>) -> Result<TouchupSettings> {
    match path {
        Some(path) => load_settings(path)
            .with_context(|| format!("Failed to read settings from {}", path.display())),
        None => Ok(TouchupSettings::default()),
    }
}

/// Ok(false) means a job failed and was already reported
fn run(cli: Cli) -> Result<bool> {
    let mut settings = base_settings(cli.settings.as_deref())?;

    match cli.command {
        Commands::Strip { input, output, strip } => {
            strip.apply(&mut settings);
            match touch_up(&input, &output, &settings) {
                Ok(result) => {
                    println!(
                        "✓ Processed: {:?} -> {:?}, saved to {}",
                        result.original_size,
                        result.final_size,
                        output.display()
                    );
                    Ok(true)
                }
                Err(e) => {
                    println!("✗ {}", e);
                    Ok(false)
                }
            }
        }

        Commands::Button { output, size, text, corner_radius, fonts } => {
            let button = &mut settings.button;
            if let Some(size) = size {
                button.canvas_size = size;
            }
            if let Some(text) = text {
                button.text = text;
            }
            if let Some(fraction) = corner_radius {
                button.corner_radius_fraction = fraction;
            }
            if !fonts.is_empty() {
                button.font_candidates = fonts;
            }

            match create_button(&output, &settings.button) {
                Ok(layout) => {
                    println!(
                        "✓ Created button: {}x{}, saved to {}",
                        layout.canvas_size,
                        layout.canvas_size,
                        output.display()
                    );
                    println!(
                        "  Button size: {}x{}, corner radius: {}",
                        layout.button.width, layout.button.height, layout.button.radius
                    );
                    Ok(true)
                }
                Err(e) => {
                    println!("✗ {}", e);
                    Ok(false)
                }
            }
        }

        Commands::Batch { manifest, report, strip } => {
            strip.apply(&mut settings);
            let jobs = load_manifest(&manifest)
                .with_context(|| format!("Failed to read manifest {}", manifest.display()))?;

            let outcomes = run_batch(&jobs, &settings);
            for outcome in &outcomes {
                match &outcome.result {
                    Ok(result) => println!(
                        "✓ {}: Processed {:?} -> {:?}, saved to {}",
                        outcome.name,
                        result.original_size,
                        result.final_size,
                        outcome.output.display()
                    ),
                    Err(e) => println!("✗ {}: {}", outcome.name, e),
                }
            }

            if let Some(report) = report {
                let json = serde_json::to_string_pretty(&outcomes)?;
                std::fs::write(&report, json)
                    .with_context(|| format!("Failed to write report {}", report.display()))?;
            }

            Ok(outcomes.iter().all(|o| o.is_ok()))
        }
    }
}
