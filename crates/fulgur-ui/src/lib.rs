//! Interactive preview window: drives the lightning engine from egui repaints.

use egui::Color32;
use fulgur_core::{EngineConfig, FrameStats, LightningEngine};
use fulgur_platform::{Extent, Result};
use tracing::{debug, info, warn};

mod painter;

pub use painter::{to_color32, PainterSurface, PanelLayout};

const BACKGROUND: Color32 = Color32::from_rgb(8, 12, 10);

pub struct PreviewOptions {
    pub config: EngineConfig,
    pub seed: Option<u64>,
    pub inner_size: [f32; 2],
}

/// Opens the preview window and blocks until it is closed.
pub fn run_preview(options: PreviewOptions) -> Result<()> {
    let engine = match options.seed {
        Some(seed) => LightningEngine::seeded(options.config, seed)?,
        None => LightningEngine::new(options.config)?,
    };
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size(options.inner_size)
            .with_title("Fulgur"),
        ..Default::default()
    };
    info!("opening preview window");
    eframe::run_native(
        "Fulgur",
        native_options,
        Box::new(move |_creation_context| Ok(Box::new(FulgurApp::new(engine)))),
    )
    .map_err(|err| err.to_string().into())
}

pub struct FulgurApp {
    engine: LightningEngine,
    last_extent: Option<Extent>,
    last_stats: Option<FrameStats>,
}

impl FulgurApp {
    pub fn new(engine: LightningEngine) -> Self {
        Self {
            engine,
            last_extent: None,
            last_stats: None,
        }
    }
}

impl eframe::App for FulgurApp {
    fn update(&mut self, context: &egui::Context, _frame: &mut eframe::Frame) {
        let window = context.input(|i| i.viewport().inner_rect);
        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(BACKGROUND))
            .show(context, |ui| {
                let rect = ui.max_rect();
                let mut surface = PainterSurface::new(ui.painter(), rect, BACKGROUND);
                let extent = Extent::new(rect.width(), rect.height());

                if self.last_extent != Some(extent) {
                    self.last_extent = Some(extent);
                    let layout = PanelLayout {
                        panel: rect,
                        window,
                    };
                    // Starts the engine on the first frame and after a failed resize.
                    if let Err(err) = self.engine.resize(&layout, &mut surface) {
                        warn!("preview: {err}");
                    }
                }

                if let Some(stats) = self.engine.tick(&mut surface) {
                    if self.last_stats.map_or(true, |last| last.bolts != stats.bolts) {
                        debug!(
                            frame = stats.frame,
                            bolts = stats.bolts,
                            particles = stats.particles,
                            "preview: bolt count changed"
                        );
                    }
                    self.last_stats = Some(stats);
                }
            });
        context.request_repaint();
    }
}
