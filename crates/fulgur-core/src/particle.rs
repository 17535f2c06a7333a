use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ParticleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub opacity: f32,
    pub radius: f32,
}

impl Particle {
    /// Moves one step and decays. Returns `false` once the particle has faded out.
    pub fn advance(&mut self, decay: f32) -> bool {
        self.pos += self.vel;
        self.opacity -= decay;
        self.opacity > 0.0
    }
}

/// Radial burst of particles centred on `origin`.
pub fn burst<R: Rng + ?Sized>(rng: &mut R, config: &ParticleConfig, origin: Vec2) -> Vec<Particle> {
    let count = config.count.sample(rng);
    (0..count)
        .map(|_| {
            let angle = rng.gen::<f32>() * std::f32::consts::TAU;
            let speed = config.speed.sample(rng);
            Particle {
                pos: origin,
                vel: Vec2::from_angle(angle) * speed,
                opacity: config.initial_opacity,
                radius: config.radius.sample(rng),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn burst_shape() {
        let mut rng = StdRng::seed_from_u64(8);
        let config = ParticleConfig::default();
        let origin = Vec2::new(50.0, 60.0);
        for _ in 0..100 {
            let particles = burst(&mut rng, &config, origin);
            assert!((3..=7).contains(&particles.len()));
            for p in &particles {
                assert_eq!(p.pos, origin);
                assert_eq!(p.opacity, 0.8);
                assert!((1.0..=3.0).contains(&p.radius));
                let speed = p.vel.length();
                assert!(speed >= 0.5 - 1e-4 && speed <= 2.5 + 1e-4);
            }
        }
    }

    #[test]
    fn particle_dies_after_opacity_runs_out() {
        let mut particle = Particle {
            pos: Vec2::ZERO,
            vel: Vec2::new(1.0, -1.0),
            opacity: 0.8,
            radius: 2.0,
        };
        let mut alive_steps = 0;
        while particle.advance(0.025) {
            alive_steps += 1;
            assert!(particle.opacity > 0.0);
        }
        // 0.8 / 0.025 = 32 steps, give or take float error on the last one.
        assert!((31..=32).contains(&alive_steps));
        assert_eq!(particle.pos.x, (alive_steps + 1) as f32);
    }
}
