//! Spatial navigation viewer
//!
//! Usage: `spatial-nav [MANIFEST.json] [--config ENGINE.json]`. Without a
//! manifest the built-in demo gallery is shown.

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use eframe::egui;
use serde_json::Value;
use sn_data::{ContentSource, FileSource};
use sn_engine::{EngineConfig, SpatialEngine};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod demo;
mod input;
mod overlay;
mod render;

#[derive(Debug, Default)]
struct Args {
    manifest: Option<PathBuf>,
    config: Option<PathBuf>,
}

fn parse_args() -> Result<Args> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config needs a path")?;
                args.config = Some(PathBuf::from(path));
            }
            _ if args.manifest.is_none() => args.manifest = Some(PathBuf::from(arg)),
            _ => anyhow::bail!("Unexpected argument '{}'", arg),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,sn_engine=debug")),
        )
        .init();

    let args = parse_args()?;
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };

    let source: Box<dyn ContentSource> = match &args.manifest {
        Some(path) => Box::new(FileSource::new(path)),
        None => Box::new(demo::demo_source()),
    };
    let manifest = source
        .load()
        .with_context(|| format!("Failed to load content from '{}'", source.name()))?;

    let mut engine: SpatialEngine<Value> = SpatialEngine::new(config)?;
    engine.load_content(&manifest.categories);
    info!(
        source = source.name(),
        items = engine.index().len(),
        layout = engine.layout_name(),
        "Starting spatial navigation viewer"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([640.0, 480.0]),
        default_theme: eframe::Theme::Dark,
        persist_window: false,
        ..Default::default()
    };

    let title = manifest.title.clone();
    eframe::run_native(
        "Spatial Navigation",
        options,
        Box::new(move |cc| Box::new(app::ViewerApp::new(cc, engine, source, title))),
    )
    .map_err(|e| anyhow::anyhow!("Failed to run viewer: {}", e))?;

    Ok(())
}
