use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;

mod annotation;
pub mod apparatus;
mod config;
mod document;
mod error;
pub mod geometry;
mod intermediate_representation;
mod values;

use config::{Config, Overrides};
use intermediate_representation::Scene;

/// Draws the scattering geometry of a sample, cell, coil and detector layout as SVG.
#[derive(Parser)]
#[command(version, allow_negative_numbers = true)]
struct Args {
    /// Configuration file (TOML), built-in defaults if not present.
    #[clap(short, long)]
    config: Option<PathBuf>,
    /// Output file, stdout if not present.
    #[clap(short, long)]
    output: Option<PathBuf>,
    /// Whether to output the render data as JSON, and file to output to.
    #[clap(short, long)]
    debug: Option<Option<PathBuf>>,
    #[command(flatten)]
    overrides: Overrides,
}

fn main() -> Result<(), anyhow::Error> {
    env_logger::init();
    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    config.apply(&args.overrides);
    config.validate()?;
    log::debug!("{config:?}");

    let scene = Scene::new(&config.apparatus, &config.placement, &config.display);
    log::info!(
        "scattering angle {:.3}°, detector coverage {:.3}mm",
        scene.calculation.scattering_angle.to_degrees(),
        scene.calculation.detector_coverage
    );
    for line in &scene.annotation.lines {
        log::info!("{line}");
    }

    if let Some(debug_output) = args.debug {
        let debug_output: Box<dyn io::Write> = if let Some(path) = debug_output {
            Box::new(File::create(path)?)
        } else {
            Box::new(io::stderr())
        };
        if let Err(e) = serde_json::to_writer_pretty(debug_output, &scene) {
            eprintln!("{:?}", anyhow::Error::from(error::Error::from(e)));
        }
    }

    let mut output: Box<dyn io::Write> = if let Some(path) = args.output {
        Box::new(File::create(path)?)
    } else {
        Box::new(io::stdout())
    };
    writeln!(output, r#"<?xml version="1.0" encoding="utf-8" ?>"#)?;
    svg::write(&mut output, &document::Document::from_scene(&scene).compile())
        .map_err(error::Error::Io)?;
    Ok(())
}
