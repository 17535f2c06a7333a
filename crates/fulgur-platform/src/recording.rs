use glam::Vec2;
use tracing::debug;

use crate::{Extent, FillStyle, RenderSurface, StrokeStyle};

/// One drawing operation captured by [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear { origin: Vec2, extent: Extent },
    Stroke { points: Vec<Vec2>, style: StrokeStyle },
    FillArc { center: Vec2, radius: f32, style: FillStyle },
}

/// Surface that keeps a log of every stroke and fill instead of rasterizing.
///
/// Path building (`begin_path`/`move_to`/`line_to`) is folded into the `Stroke`
/// command so the log reads one entry per visible primitive.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    extent: Extent,
    path: Vec<Vec2>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the log, leaving the surface size untouched.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    pub fn strokes(&self) -> impl Iterator<Item = (&[Vec2], &StrokeStyle)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Stroke { points, style } => Some((points.as_slice(), style)),
            _ => None,
        })
    }

    pub fn fills(&self) -> impl Iterator<Item = (Vec2, f32, &FillStyle)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::FillArc {
                center,
                radius,
                style,
            } => Some((*center, *radius, style)),
            _ => None,
        })
    }
}

impl RenderSurface for RecordingSurface {
    fn size(&self) -> Extent {
        self.extent
    }

    fn set_size(&mut self, extent: Extent) {
        debug!(width = extent.width, height = extent.height, "recording surface resized");
        self.extent = extent;
    }

    fn clear_rect(&mut self, origin: Vec2, extent: Extent) {
        self.commands.push(DrawCommand::Clear { origin, extent });
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.path.clear();
        self.path.push(point);
    }

    fn line_to(&mut self, point: Vec2) {
        self.path.push(point);
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        let points = std::mem::take(&mut self.path);
        self.commands.push(DrawCommand::Stroke {
            points,
            style: *style,
        });
    }

    fn fill_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        _start_angle: f32,
        _end_angle: f32,
        style: &FillStyle,
    ) {
        self.commands.push(DrawCommand::FillArc {
            center,
            radius,
            style: *style,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn stroke_captures_built_path() {
        let mut surface = RecordingSurface::new();
        surface.begin_path();
        surface.move_to(Vec2::new(1.0, 2.0));
        surface.line_to(Vec2::new(3.0, 4.0));
        surface.stroke(&StrokeStyle {
            color: Vec4::ONE,
            alpha: 0.5,
            width: 2.0,
            glow_blur: 0.0,
            glow_color: Vec4::ONE,
            cap: Default::default(),
            join: Default::default(),
        });

        let strokes: Vec<_> = surface.strokes().collect();
        assert_eq!(strokes.len(), 1);
        assert_eq!(strokes[0].0, &[Vec2::new(1.0, 2.0), Vec2::new(3.0, 4.0)]);
        assert_eq!(strokes[0].1.alpha, 0.5);
    }

    #[test]
    fn take_commands_empties_log() {
        let mut surface = RecordingSurface::new();
        surface.set_size(Extent::new(10.0, 10.0));
        surface.clear_rect(Vec2::ZERO, Extent::new(10.0, 10.0));
        assert_eq!(surface.take_commands().len(), 1);
        assert!(surface.commands().is_empty());
        assert_eq!(surface.size(), Extent::new(10.0, 10.0));
    }
}
