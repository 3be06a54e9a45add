//! Screen Labeler - annotate screenshots with compact labels over detected text
//!
//! Sends a screenshot to an OCR service, marks each distinct text region with a
//! short badge (`A1`, `A2`, ...) and prints which label points at which text.

mod app;
mod config;
mod overlay;
mod storage;
mod vision;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;
use crate::overlay::AnnotationEngine;
use crate::vision::BaiduOcrClient;

/// Screen Labeler - label OCR-detected text on a screenshot
#[derive(Parser, Debug)]
#[command(name = "screen-labeler")]
#[command(about = "Annotate a screenshot with short labels over detected text")]
struct Args {
    /// Screenshot to annotate
    #[arg(required_unless_present = "write_default_config")]
    image: Option<PathBuf>,

    /// Configuration file (defaults to config.toml in the platform config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the annotated image (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Print the label map as JSON on stdout
    #[arg(long)]
    json: bool,

    /// Write the default configuration file and exit
    #[arg(long)]
    write_default_config: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => storage::default_config_path()?,
    };

    if args.write_default_config {
        config::save_config(&AppConfig::default(), &config_path)?;
        info!("Wrote default configuration to {:?}", config_path);
        return Ok(());
    }

    let Some(image_path) = args.image.as_deref() else {
        anyhow::bail!("No screenshot given");
    };

    let mut config = load_or_default_config(&config_path, args.config.is_some())?;
    config.apply_env_overrides();
    if let Some(dir) = args.output_dir {
        config.output.directory = Some(dir);
    }

    let engine = AnnotationEngine::from_settings(&config.badge)
        .context("Badge renderer configuration is invalid")?;
    let detector = BaiduOcrClient::new(config.ocr.clone()).context("OCR client configuration is invalid")?;

    let report = app::run_annotation(&detector, &engine, image_path, &config.output)?;

    if report.labels.is_empty() {
        info!("No text regions were labeled");
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report.labels)?);
    } else {
        for entry in report.labels.iter() {
            println!(
                "{}\t({}, {})\t{}",
                entry.label, entry.position.x, entry.position.y, entry.text
            );
        }
        println!("{}", report.output_path.display());
    }

    Ok(())
}

/// Load configuration from file, falling back to defaults when the default file is absent
fn load_or_default_config(path: &Path, explicit: bool) -> Result<AppConfig> {
    if path.exists() {
        let config = config::load_config(path)?;
        info!("Loaded configuration from {:?}", path);
        return Ok(config);
    }

    if explicit {
        anyhow::bail!("Configuration file {:?} does not exist", path);
    }

    info!("Using default configuration");
    Ok(AppConfig::default())
}
