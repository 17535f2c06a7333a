//! Jagged path generation by recursive midpoint displacement.

use glam::Vec2;
use rand::Rng;

/// Number of points [`jagged_path`] emits for `depth`.
pub const fn point_count(depth: u32) -> usize {
    (1usize << depth) + 1
}

/// Builds a jagged polyline from `start` to `end`.
///
/// Each level displaces the segment midpoint on both axes by
/// `(u - 0.5) * roughness * remaining_depth * scale` with `u` drawn from `rng`, so
/// offsets shrink as the recursion deepens. The result always holds
/// `2^depth + 1` points and begins and ends exactly on the requested endpoints.
pub fn jagged_path<R: Rng + ?Sized>(
    rng: &mut R,
    start: Vec2,
    end: Vec2,
    roughness: f32,
    depth: u32,
    scale: f32,
) -> Vec<Vec2> {
    let mut points = Vec::with_capacity(point_count(depth));
    points.push(start);
    subdivide(rng, &mut points, start, end, roughness * scale, depth);
    points
}

fn subdivide<R: Rng + ?Sized>(
    rng: &mut R,
    points: &mut Vec<Vec2>,
    a: Vec2,
    b: Vec2,
    amplitude: f32,
    depth: u32,
) {
    if depth == 0 {
        points.push(b);
        return;
    }
    let reach = amplitude * depth as f32;
    let offset = Vec2::new(
        (rng.gen::<f32>() - 0.5) * reach,
        (rng.gen::<f32>() - 0.5) * reach,
    );
    let mid = (a + b) * 0.5 + offset;
    subdivide(rng, points, a, mid, amplitude, depth - 1);
    subdivide(rng, points, mid, b, amplitude, depth - 1);
}
