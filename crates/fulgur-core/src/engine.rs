use fulgur_platform::{Extent, HostLayout, RenderSurface};
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::bolt::Bolt;
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::node::{self, Node};
use crate::particle::{self, Particle};
use crate::render;

/// Population snapshot after one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FrameStats {
    pub frame: u64,
    /// Bolts spawned during this tick.
    pub spawned: usize,
    pub bolts: usize,
    pub particles: usize,
    pub nodes: usize,
}

/// Owns every bolt, particle and node and advances them one frame per [`tick`].
///
/// The engine does no scheduling of its own: a driver calls [`initialize`] once,
/// [`tick`] at the display refresh rate and [`resize`] whenever the host region
/// changes size.
///
/// [`tick`]: LightningEngine::tick
/// [`initialize`]: LightningEngine::initialize
/// [`resize`]: LightningEngine::resize
pub struct LightningEngine<R: Rng = SmallRng> {
    config: EngineConfig,
    rng: R,
    extent: Extent,
    active: bool,
    frame: u64,
    next_bolt_frame: u64,
    bolts: Vec<Bolt>,
    particles: Vec<Particle>,
    nodes: Vec<Node>,
}

impl LightningEngine<SmallRng> {
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    pub fn seeded(config: EngineConfig, seed: u64) -> Result<Self, EngineError> {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> LightningEngine<R> {
    pub fn with_rng(config: EngineConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let next_bolt_frame = config.bolt.first_spawn_frame;
        Ok(Self {
            config,
            rng,
            extent: Extent::default(),
            active: false,
            frame: 0,
            next_bolt_frame,
            bolts: Vec::new(),
            particles: Vec::new(),
            nodes: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn extent(&self) -> Extent {
        self.extent
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn bolts(&self) -> &[Bolt] {
        &self.bolts
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Sizes the surface, scatters nodes and restarts the spawn schedule.
    ///
    /// Without a usable layout the engine is left inactive and empty.
    pub fn initialize(
        &mut self,
        layout: &dyn HostLayout,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), EngineError> {
        self.deactivate();
        self.apply_layout(layout, surface)?;
        self.frame = 0;
        self.next_bolt_frame = self.config.bolt.first_spawn_frame;
        self.active = true;
        info!(
            width = self.extent.width,
            height = self.extent.height,
            nodes = self.nodes.len(),
            "lightning engine initialized"
        );
        Ok(())
    }

    /// Re-reads the host extent, resizes the surface and replaces the node set.
    ///
    /// An inactive engine has no state to resize, so this initializes it instead.
    /// On failure the engine is deactivated and emptied.
    pub fn resize(
        &mut self,
        layout: &dyn HostLayout,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), EngineError> {
        if !self.active {
            return self.initialize(layout, surface);
        }
        self.apply_layout(layout, surface)
    }

    fn apply_layout(
        &mut self,
        layout: &dyn HostLayout,
        surface: &mut dyn RenderSurface,
    ) -> Result<(), EngineError> {
        let Some(extent) = usable_extent(layout) else {
            warn!("host layout unavailable; lightning engine inactive");
            self.deactivate();
            return Err(EngineError::LayoutUnavailable);
        };
        surface.set_size(extent);
        self.extent = extent;
        self.nodes = node::scatter(&mut self.rng, &self.config.node, extent);
        debug!(
            width = extent.width,
            height = extent.height,
            nodes = self.nodes.len(),
            "surface resized"
        );
        Ok(())
    }

    /// Advances and draws one frame. Returns `None` while the engine is inactive.
    pub fn tick(&mut self, surface: &mut dyn RenderSurface) -> Option<FrameStats> {
        if !self.active {
            return None;
        }
        let extent = self.extent;
        surface.clear_rect(Vec2::ZERO, extent);
        self.frame += 1;

        let spawned = self.spawn_due_bolts();
        self.advance_bolts(surface);
        self.advance_particles(surface);
        self.advance_nodes(surface);
        self.draw_links(surface);

        let stats = FrameStats {
            frame: self.frame,
            spawned,
            bolts: self.bolts.len(),
            particles: self.particles.len(),
            nodes: self.nodes.len(),
        };
        trace!(?stats, "tick");
        Some(stats)
    }

    fn deactivate(&mut self) {
        self.active = false;
        self.bolts.clear();
        self.particles.clear();
        self.nodes.clear();
    }

    fn spawn_due_bolts(&mut self) -> usize {
        if self.frame < self.next_bolt_frame {
            return 0;
        }
        let config = &self.config.bolt;
        let mut spawned = 1;
        self.bolts.push(Bolt::spawn(&mut self.rng, config, self.extent));
        if self.rng.gen::<f32>() < config.second_bolt_chance {
            self.bolts.push(Bolt::spawn(&mut self.rng, config, self.extent));
            spawned += 1;
        }
        let interval = config.spawn_interval.sample(&mut self.rng);
        self.next_bolt_frame = self.frame + u64::from(interval);
        debug!(
            frame = self.frame,
            spawned,
            next = self.next_bolt_frame,
            "bolts spawned"
        );
        spawned
    }

    fn advance_bolts(&mut self, surface: &mut dyn RenderSurface) {
        let rng = &mut self.rng;
        let particles = &mut self.particles;
        let config = &self.config;
        self.bolts.retain_mut(|bolt| {
            let outcome = bolt.advance(rng);
            if outcome.expired {
                return false;
            }
            render::draw_bolt(surface, bolt, &config.style);
            if let Some(tip) = outcome.burst {
                let burst = particle::burst(rng, &config.particle, tip);
                debug!(x = tip.x, y = tip.y, count = burst.len(), "particle burst");
                particles.extend(burst);
            }
            true
        });
    }

    fn advance_particles(&mut self, surface: &mut dyn RenderSurface) {
        let config = &self.config;
        self.particles.retain_mut(|particle| {
            if !particle.advance(config.particle.decay) {
                return false;
            }
            render::draw_particle(surface, particle, &config.particle, &config.style);
            true
        });
    }

    fn advance_nodes(&mut self, surface: &mut dyn RenderSurface) {
        let config = &self.config;
        for node in &mut self.nodes {
            node.advance(self.extent, config.node.pulse_step);
            render::draw_node(surface, node, &config.node, &config.style);
        }
    }

    fn draw_links(&self, surface: &mut dyn RenderSurface) {
        let config = &self.config;
        for (a, b, alpha) in node::links(&self.nodes, &config.node) {
            render::draw_link(
                surface,
                self.nodes[a].pos,
                self.nodes[b].pos,
                alpha,
                &config.node,
                &config.style,
            );
        }
    }
}

/// The containing region's extent, or the viewport when the region is empty.
fn usable_extent(layout: &dyn HostLayout) -> Option<Extent> {
    layout
        .extent()
        .filter(|extent| !extent.is_empty())
        .or_else(|| layout.viewport_extent())
        .filter(|extent| !extent.is_empty())
}
