//! Host abstraction traits so `fulgur-core` stays surface-agnostic.

use glam::{Vec2, Vec4};
use serde::{Deserialize, Serialize};

mod recording;

pub use recording::{DrawCommand, RecordingSurface};

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Width and height of a drawing surface or layout region, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Extent {
    pub width: f32,
    pub height: f32,
}

impl Extent {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// True unless both sides are finite and positive.
    pub fn is_empty(&self) -> bool {
        let usable = |side: f32| side.is_finite() && side > 0.0;
        !(usable(self.width) && usable(self.height))
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Everything a surface needs to stroke the current path.
///
/// `color` is straight (non-premultiplied) RGBA in `0..=1`; `alpha` is the global
/// opacity applied on top of it. A `glow_blur` of zero disables the glow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Vec4,
    pub alpha: f32,
    pub width: f32,
    pub glow_blur: f32,
    pub glow_color: Vec4,
    pub cap: LineCap,
    pub join: LineJoin,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillStyle {
    pub color: Vec4,
    pub alpha: f32,
    pub glow_blur: f32,
    pub glow_color: Vec4,
}

/// 2D drawing surface the animation renders into (a canvas, a painter, a recorder).
pub trait RenderSurface {
    fn size(&self) -> Extent;
    fn set_size(&mut self, extent: Extent);
    fn clear_rect(&mut self, origin: Vec2, extent: Extent);
    fn begin_path(&mut self);
    fn move_to(&mut self, point: Vec2);
    fn line_to(&mut self, point: Vec2);
    /// Strokes and ends the current path.
    fn stroke(&mut self, style: &StrokeStyle);
    /// Fills a circular arc from `start_angle` to `end_angle` (radians).
    fn fill_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
        style: &FillStyle,
    );
}

/// The region hosting the surface; queried on initialize and on every resize.
pub trait HostLayout {
    /// Size of the containing region, or `None` when it does not exist.
    fn extent(&self) -> Option<Extent>;

    /// Fallback used when the containing region reports no usable size.
    fn viewport_extent(&self) -> Option<Extent> {
        None
    }
}

/// A layout with a fixed region size, used by headless drivers and tests.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FixedLayout {
    pub region: Option<Extent>,
    pub viewport: Option<Extent>,
}

impl FixedLayout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            region: Some(Extent::new(width, height)),
            viewport: None,
        }
    }

    /// A layout whose containing region is missing entirely.
    pub fn detached() -> Self {
        Self::default()
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Some(Extent::new(width, height));
        self
    }
}

impl HostLayout for FixedLayout {
    fn extent(&self) -> Option<Extent> {
        self.region
    }

    fn viewport_extent(&self) -> Option<Extent> {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_finite_positive_extents_are_usable() {
        assert!(!Extent::new(400.0, 300.0).is_empty());
        assert!(Extent::new(0.0, 300.0).is_empty());
        assert!(Extent::new(400.0, -1.0).is_empty());
        assert!(Extent::new(f32::NAN, 300.0).is_empty());
        assert!(Extent::new(f32::INFINITY, 300.0).is_empty());
        assert!(Extent::new(400.0, f32::INFINITY).is_empty());
    }
}
