use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use fulgur_core::EngineConfig;
use fulgur_platform::{Extent, Result};
use fulgur_ui::{run_preview, PreviewOptions};

mod headless;

use crate::headless::HeadlessOptions;

/// Procedural lightning animation.
#[derive(Debug, Parser)]
#[command(name = "fulgur", version)]
struct Cli {
    /// TOML file overriding the default effect settings.
    #[arg(long, env = "FULGUR_CONFIG")]
    config: Option<PathBuf>,
    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,
    /// Render into a command recorder instead of opening a window.
    #[arg(long)]
    headless: bool,
    #[arg(long, default_value_t = 600)]
    frames: u64,
    #[arg(long, default_value_t = 1280.0)]
    width: f32,
    #[arg(long, default_value_t = 720.0)]
    height: f32,
    /// Headless only: resize to WIDTHxHEIGHT halfway through the run.
    #[arg(long, value_parser = parse_extent)]
    resize_to: Option<Extent>,
    /// Headless only: write the run summary as JSON to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

fn parse_extent(value: &str) -> std::result::Result<Extent, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{value}`"))?;
    let parse = |side: &str| {
        side.trim()
            .parse::<f32>()
            .map_err(|err| format!("invalid size `{side}`: {err}"))
    };
    Ok(Extent::new(parse(width)?, parse(height)?))
}

fn run(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            EngineConfig::load(path)?
        }
        None => EngineConfig::default(),
    };

    if !cli.headless {
        return run_preview(PreviewOptions {
            config,
            seed: cli.seed,
            inner_size: [cli.width, cli.height],
        });
    }

    let report = headless::run(
        config,
        HeadlessOptions {
            seed: cli.seed,
            frames: cli.frames,
            extent: Extent::new(cli.width, cli.height),
            resize_to: cli.resize_to,
        },
    )?;
    info!(
        frames = report.frames,
        spawned = report.bolts_spawned,
        peak_bolts = report.peak_bolts,
        peak_particles = report.peak_particles,
        strokes = report.strokes,
        fills = report.fills,
        "headless run finished"
    );
    if let Some(path) = &cli.report {
        std::fs::write(path, serde_json::to_string_pretty(&report)?)?;
        info!(path = %path.display(), "report written");
    }
    Ok(())
}

fn main() {
    // Init logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let cli = Cli::parse();
    info!("Fulgur starting");
    if let Err(e) = run(cli) {
        eprintln!("Fulgur error: {e}");
        std::process::exit(1);
    }
}
