//! Offscreen driver: ticks the engine against a [`RecordingSurface`].

use fulgur_core::{EngineConfig, LightningEngine};
use fulgur_platform::{Extent, FixedLayout, RecordingSurface, Result};
use serde::Serialize;
use tracing::{debug, info};

pub struct HeadlessOptions {
    pub seed: Option<u64>,
    pub frames: u64,
    pub extent: Extent,
    pub resize_to: Option<Extent>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct HeadlessReport {
    pub frames: u64,
    pub bolts_spawned: usize,
    pub peak_bolts: usize,
    pub peak_particles: usize,
    pub final_nodes: usize,
    pub strokes: usize,
    pub fills: usize,
}

pub fn run(config: EngineConfig, options: HeadlessOptions) -> Result<HeadlessReport> {
    let mut engine = match options.seed {
        Some(seed) => LightningEngine::seeded(config, seed)?,
        None => LightningEngine::new(config)?,
    };
    let mut surface = RecordingSurface::new();
    let layout = FixedLayout::new(options.extent.width, options.extent.height);
    engine.initialize(&layout, &mut surface)?;

    let resize_frame = options.frames / 2;
    let mut report = HeadlessReport::default();
    for frame in 0..options.frames {
        match options.resize_to {
            Some(extent) if frame == resize_frame => {
                info!(width = extent.width, height = extent.height, "headless resize");
                engine.resize(&FixedLayout::new(extent.width, extent.height), &mut surface)?;
            }
            _ => {}
        }
        let Some(stats) = engine.tick(&mut surface) else {
            break;
        };
        report.frames = stats.frame;
        report.bolts_spawned += stats.spawned;
        report.peak_bolts = report.peak_bolts.max(stats.bolts);
        report.peak_particles = report.peak_particles.max(stats.particles);
        report.final_nodes = stats.nodes;
        report.strokes += surface.strokes().count();
        report.fills += surface.fills().count();
        surface.take_commands();
        if stats.spawned > 0 {
            debug!(frame = stats.frame, bolts = stats.bolts, "spawn");
        }
    }
    Ok(report)
}
