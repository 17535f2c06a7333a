//! Lightning bolts: spawning and the per-bolt lifecycle.

use fulgur_platform::Extent;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::BoltConfig;
use crate::path::jagged_path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Appearing,
    Holding,
    Fading,
}

/// Canvas edge a bolt starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Top,
    Left,
    Right,
}

impl Origin {
    fn pick<R: Rng + ?Sized>(rng: &mut R, config: &BoltConfig) -> Self {
        let roll = rng.gen::<f32>();
        if roll < config.top_weight {
            Origin::Top
        } else if roll < config.top_weight + config.left_weight {
            Origin::Left
        } else {
            Origin::Right
        }
    }
}

/// Per-bolt values drawn once at spawn time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoltParams {
    pub max_opacity: f32,
    pub fade_rate: f32,
    pub hold_frames: u32,
    pub width: f32,
    pub appear_rate_factor: f32,
    pub flicker_floor: f32,
}

impl BoltParams {
    fn sample<R: Rng + ?Sized>(rng: &mut R, config: &BoltConfig) -> Self {
        Self {
            max_opacity: config.max_opacity.sample(rng),
            fade_rate: config.fade_rate.sample(rng),
            hold_frames: config.hold_frames.sample(rng),
            width: config.width.sample(rng),
            appear_rate_factor: config.appear_rate_factor,
            flicker_floor: config.flicker_floor,
        }
    }
}

/// What one lifecycle step asks of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StepOutcome {
    /// Set on the first holding step: burst particles at this point.
    pub burst: Option<Vec2>,
    /// The bolt finished fading and must leave the active set.
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bolt {
    main: Vec<Vec2>,
    branches: Vec<Vec<Vec2>>,
    params: BoltParams,
    opacity: f32,
    phase: Phase,
    hold_count: u32,
}

impl Bolt {
    /// A bolt at opacity zero in [`Phase::Appearing`].
    pub fn new(main: Vec<Vec2>, branches: Vec<Vec<Vec2>>, params: BoltParams) -> Self {
        Self {
            main,
            branches,
            params,
            opacity: 0.0,
            phase: Phase::Appearing,
            hold_count: 0,
        }
    }

    /// Spawns a bolt from a randomly chosen edge of a surface of size `extent`.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, config: &BoltConfig, extent: Extent) -> Self {
        let origin = Origin::pick(rng, config);
        let (start, end) = endpoints(rng, config, origin, extent);
        let roughness = config.roughness.sample(rng);
        let main = jagged_path(
            rng,
            start,
            end,
            roughness,
            config.primary_depth,
            config.displacement_scale,
        );

        let branch_count = config.branches.sample(rng);
        let branches = (0..branch_count)
            .map(|_| {
                // Interior points only; a branch never roots at either end.
                let root = main[rng.gen_range(1..main.len() - 1)];
                let tip = root
                    + Vec2::new(
                        config.branch_spread.sample(rng),
                        config.branch_drop.sample(rng),
                    );
                jagged_path(
                    rng,
                    root,
                    tip,
                    roughness * config.branch_roughness_factor,
                    config.branch_depth,
                    config.displacement_scale,
                )
            })
            .collect();

        Self::new(main, branches, BoltParams::sample(rng, config))
    }

    pub fn main(&self) -> &[Vec2] {
        &self.main
    }

    pub fn branches(&self) -> &[Vec<Vec2>] {
        &self.branches
    }

    pub fn params(&self) -> &BoltParams {
        &self.params
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn hold_count(&self) -> u32 {
        self.hold_count
    }

    /// End of the primary path, where particle bursts originate.
    pub fn tip(&self) -> Vec2 {
        self.main.last().copied().unwrap_or_default()
    }

    /// Advances the lifecycle by one frame.
    ///
    /// Opacity stays within `[0, max_opacity]`; once fading drives it to zero the
    /// outcome is marked expired and the bolt must not be stepped again.
    pub fn advance<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepOutcome {
        let params = self.params;
        let mut outcome = StepOutcome::default();
        match self.phase {
            Phase::Appearing => {
                let rate = params.fade_rate * params.appear_rate_factor;
                self.opacity = (self.opacity + rate).min(params.max_opacity);
                if self.opacity >= params.max_opacity {
                    self.phase = Phase::Holding;
                }
            }
            Phase::Holding => {
                self.hold_count += 1;
                let floor = params.flicker_floor;
                self.opacity = (params.max_opacity * (floor + rng.gen::<f32>() * (1.0 - floor)))
                    .min(params.max_opacity);
                if self.hold_count == 1 {
                    outcome.burst = Some(self.tip());
                }
                if self.hold_count >= params.hold_frames {
                    self.phase = Phase::Fading;
                }
            }
            Phase::Fading => {
                self.opacity = (self.opacity - params.fade_rate).max(0.0);
                outcome.expired = self.opacity <= 0.0;
            }
        }
        outcome
    }
}

fn endpoints<R: Rng + ?Sized>(
    rng: &mut R,
    config: &BoltConfig,
    origin: Origin,
    extent: Extent,
) -> (Vec2, Vec2) {
    let Extent { width, height } = extent;
    let reach = width * config.side_reach_fraction;
    match origin {
        Origin::Top => {
            let start = Vec2::new(rng.gen::<f32>() * width, 0.0);
            let end = Vec2::new(
                start.x + config.top_reach.sample(rng),
                rng.gen::<f32>() * height * config.top_depth_fraction,
            );
            (start, end)
        }
        Origin::Left => {
            let start = Vec2::new(0.0, rng.gen::<f32>() * height);
            let end = Vec2::new(
                rng.gen::<f32>() * reach,
                start.y + config.side_spread.sample(rng),
            );
            (start, end)
        }
        Origin::Right => {
            let start = Vec2::new(width, rng.gen::<f32>() * height);
            let end = Vec2::new(
                width - rng.gen::<f32>() * reach,
                start.y + config.side_spread.sample(rng),
            );
            (start, end)
        }
    }
}
