//! Drifting background nodes and the faint links between them.

use fulgur_platform::Extent;
use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::NodeConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Radians; drives the sinusoidal opacity pulse.
    pub pulse: f32,
}

impl Node {
    /// Moves one step, bouncing off the surface edges, and advances the pulse.
    ///
    /// A node that crosses an edge is pulled back onto it with its velocity pointing
    /// inwards, so positions never leave `[0, width] x [0, height]`.
    pub fn advance(&mut self, extent: Extent, pulse_step: f32) {
        self.pos += self.vel;
        self.pulse += pulse_step;
        reflect(&mut self.pos.x, &mut self.vel.x, extent.width);
        reflect(&mut self.pos.y, &mut self.vel.y, extent.height);
    }

    pub fn opacity(&self, config: &NodeConfig) -> f32 {
        config.base_opacity + self.pulse.sin() * config.pulse_amplitude
    }
}

fn reflect(pos: &mut f32, vel: &mut f32, limit: f32) {
    if *pos < 0.0 {
        *pos = 0.0;
        *vel = vel.abs();
    } else if *pos > limit {
        *pos = limit.max(0.0);
        *vel = -vel.abs();
    }
}

/// Upper bound on the node set, however wide the surface.
pub const MAX_NODES: usize = 4096;

/// `floor(width / spacing) + extra`, capped at [`MAX_NODES`].
pub fn node_count(width: f32, config: &NodeConfig) -> usize {
    let proportional = (width / config.spacing).floor().max(0.0) as usize;
    proportional
        .saturating_add(config.extra as usize)
        .min(MAX_NODES)
}

/// A fresh node set for a surface of size `extent`.
pub fn scatter<R: Rng + ?Sized>(rng: &mut R, config: &NodeConfig, extent: Extent) -> Vec<Node> {
    (0..node_count(extent.width, config))
        .map(|_| Node {
            pos: Vec2::new(
                rng.gen::<f32>() * extent.width,
                rng.gen::<f32>() * extent.height,
            ),
            vel: Vec2::new(config.drift.sample(rng), config.drift.sample(rng)),
            pulse: rng.gen::<f32>() * std::f32::consts::TAU,
        })
        .collect()
}

/// Opacity of the link between two nodes `distance` apart.
///
/// Linear from `link_opacity` at zero down to nothing at `link_distance`.
pub fn link_opacity(distance: f32, config: &NodeConfig) -> f32 {
    if distance >= config.link_distance {
        return 0.0;
    }
    (1.0 - distance / config.link_distance) * config.link_opacity
}

/// Index pairs `(a, b)` with `a < b` closer than `link_distance`, with their opacity.
pub fn links<'a>(
    nodes: &'a [Node],
    config: &'a NodeConfig,
) -> impl Iterator<Item = (usize, usize, f32)> + 'a {
    (0..nodes.len()).flat_map(move |a| {
        (a + 1..nodes.len()).filter_map(move |b| {
            let distance = nodes[a].pos.distance(nodes[b].pos);
            (distance < config.link_distance)
                .then(|| (a, b, link_opacity(distance, config)))
        })
    })
}
