//! Drawing helpers that translate engine state into surface calls.

use fulgur_platform::{FillStyle, LineCap, LineJoin, RenderSurface, StrokeStyle};
use glam::Vec2;

use crate::bolt::Bolt;
use crate::config::{NodeConfig, ParticleConfig, StyleConfig};
use crate::node::Node;
use crate::particle::Particle;

fn trace_path(surface: &mut dyn RenderSurface, points: &[Vec2]) {
    surface.begin_path();
    surface.move_to(points[0]);
    for point in &points[1..] {
        surface.line_to(*point);
    }
}

/// Glow pass in the primary colour, then a narrower, brighter core pass.
pub fn stroke_lightning(
    surface: &mut dyn RenderSurface,
    points: &[Vec2],
    alpha: f32,
    width: f32,
    style: &StyleConfig,
) {
    if points.len() < 2 {
        return;
    }
    trace_path(surface, points);
    surface.stroke(&StrokeStyle {
        color: style.primary,
        alpha,
        width,
        glow_blur: style.bolt_glow,
        glow_color: style.primary,
        cap: LineCap::Round,
        join: LineJoin::Round,
    });

    trace_path(surface, points);
    surface.stroke(&StrokeStyle {
        color: style.core,
        alpha: alpha * style.core_opacity_factor,
        width: width * style.core_width_factor,
        glow_blur: style.core_glow,
        glow_color: style.core,
        cap: LineCap::Round,
        join: LineJoin::Round,
    });
}

pub fn draw_bolt(surface: &mut dyn RenderSurface, bolt: &Bolt, style: &StyleConfig) {
    let alpha = bolt.opacity();
    let width = bolt.params().width;
    stroke_lightning(surface, bolt.main(), alpha, width, style);
    for branch in bolt.branches() {
        stroke_lightning(
            surface,
            branch,
            alpha * style.branch_opacity_factor,
            width * style.branch_width_factor,
            style,
        );
    }
}

fn disc(surface: &mut dyn RenderSurface, center: Vec2, radius: f32, style: FillStyle) {
    surface.begin_path();
    surface.fill_arc(center, radius, 0.0, std::f32::consts::TAU, &style);
}

pub fn draw_particle(
    surface: &mut dyn RenderSurface,
    particle: &Particle,
    config: &ParticleConfig,
    style: &StyleConfig,
) {
    disc(
        surface,
        particle.pos,
        particle.radius,
        FillStyle {
            color: style.primary,
            alpha: particle.opacity,
            glow_blur: config.glow_blur,
            glow_color: style.primary,
        },
    );
}

pub fn draw_node(
    surface: &mut dyn RenderSurface,
    node: &Node,
    config: &NodeConfig,
    style: &StyleConfig,
) {
    disc(
        surface,
        node.pos,
        config.radius,
        FillStyle {
            color: style.primary,
            alpha: node.opacity(config),
            glow_blur: config.glow_blur,
            glow_color: style.primary,
        },
    );
}

pub fn draw_link(
    surface: &mut dyn RenderSurface,
    from: Vec2,
    to: Vec2,
    alpha: f32,
    config: &NodeConfig,
    style: &StyleConfig,
) {
    trace_path(surface, &[from, to]);
    surface.stroke(&StrokeStyle {
        color: style.primary,
        alpha,
        width: config.link_width,
        glow_blur: 0.0,
        glow_color: style.primary,
        cap: LineCap::Butt,
        join: LineJoin::Miter,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bolt::BoltParams;
    use fulgur_platform::RecordingSurface;

    #[test]
    fn lightning_draws_glow_then_core() {
        let mut surface = RecordingSurface::new();
        let style = StyleConfig::default();
        let points = [Vec2::ZERO, Vec2::new(5.0, 5.0), Vec2::new(10.0, 0.0)];
        stroke_lightning(&mut surface, &points, 0.5, 2.0, &style);

        let strokes: Vec<_> = surface.strokes().collect();
        assert_eq!(strokes.len(), 2);
        let (glow_points, glow) = strokes[0];
        let (core_points, core) = strokes[1];
        assert_eq!(glow_points, &points);
        assert_eq!(core_points, &points);
        assert_eq!(glow.color, style.primary);
        assert_eq!(glow.alpha, 0.5);
        assert_eq!(glow.glow_blur, 18.0);
        assert_eq!(glow.cap, LineCap::Round);
        assert_eq!(core.color, style.core);
        assert!((core.alpha - 0.3).abs() < 1e-6);
        assert!((core.width - 0.6).abs() < 1e-6);
        assert!(core.width < glow.width);
    }

    #[test]
    fn degenerate_path_draws_nothing() {
        let mut surface = RecordingSurface::new();
        stroke_lightning(&mut surface, &[Vec2::ONE], 1.0, 1.0, &StyleConfig::default());
        assert!(surface.commands().is_empty());
    }

    #[test]
    fn branches_are_dimmer_and_thinner() {
        let mut surface = RecordingSurface::new();
        let style = StyleConfig::default();
        let bolt = Bolt::new(
            vec![Vec2::ZERO, Vec2::new(0.0, 10.0)],
            vec![vec![Vec2::new(0.0, 5.0), Vec2::new(4.0, 9.0)]],
            BoltParams {
                max_opacity: 0.5,
                fade_rate: 0.1,
                hold_frames: 2,
                width: 2.0,
                appear_rate_factor: 2.0,
                flicker_floor: 0.7,
            },
        );
        draw_bolt(&mut surface, &bolt, &style);
        let strokes: Vec<_> = surface.strokes().collect();
        assert_eq!(strokes.len(), 4);
        assert_eq!(strokes[2].1.width, 1.0);
        assert_eq!(strokes[2].1.alpha, bolt.opacity() * 0.6);
    }
}
