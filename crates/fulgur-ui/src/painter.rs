use egui::{Color32, Painter, Pos2, Rect, Stroke};
use fulgur_platform::{Extent, FillStyle, HostLayout, RenderSurface, StrokeStyle};
use glam::{Vec2, Vec4};

/// Share of the main opacity given to the halo that stands in for shadow blur.
const GLOW_ALPHA: f32 = 0.25;

/// Straight RGBA in `0..=1`, scaled by a global opacity.
pub fn to_color32(color: Vec4, alpha: f32) -> Color32 {
    let channel = |value: f32| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(
        channel(color.x),
        channel(color.y),
        channel(color.z),
        channel(color.w * alpha),
    )
}

/// [`RenderSurface`] over an egui painter, with engine coordinates relative to `rect.min`.
///
/// egui has no shadow blur, so glow is drawn as a wider translucent pass under the
/// shape. Line caps and joins are left to egui's tessellator.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
    background: Color32,
    path: Vec<Pos2>,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect, background: Color32) -> Self {
        Self {
            painter,
            rect,
            background,
            path: Vec::new(),
        }
    }

    fn to_screen(&self, point: Vec2) -> Pos2 {
        self.rect.min + egui::vec2(point.x, point.y)
    }
}

impl RenderSurface for PainterSurface<'_> {
    fn size(&self) -> Extent {
        Extent::new(self.rect.width(), self.rect.height())
    }

    fn set_size(&mut self, extent: Extent) {
        self.rect = Rect::from_min_size(self.rect.min, egui::vec2(extent.width, extent.height));
    }

    fn clear_rect(&mut self, origin: Vec2, extent: Extent) {
        let min = self.to_screen(origin);
        let rect = Rect::from_min_size(min, egui::vec2(extent.width, extent.height));
        self.painter.rect_filled(rect, 0.0, self.background);
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, point: Vec2) {
        self.path.clear();
        self.path.push(self.to_screen(point));
    }

    fn line_to(&mut self, point: Vec2) {
        let point = self.to_screen(point);
        self.path.push(point);
    }

    fn stroke(&mut self, style: &StrokeStyle) {
        let points = std::mem::take(&mut self.path);
        if points.len() < 2 {
            return;
        }
        if style.glow_blur > 0.0 {
            let halo = Stroke::new(
                style.width + style.glow_blur * 0.5,
                to_color32(style.glow_color, style.alpha * GLOW_ALPHA),
            );
            self.painter.add(egui::Shape::line(points.clone(), halo));
        }
        let stroke = Stroke::new(style.width, to_color32(style.color, style.alpha));
        self.painter.add(egui::Shape::line(points, stroke));
    }

    fn fill_arc(
        &mut self,
        center: Vec2,
        radius: f32,
        _start_angle: f32,
        _end_angle: f32,
        style: &FillStyle,
    ) {
        // Every arc the engine fills is a full disc.
        let center = self.to_screen(center);
        if style.glow_blur > 0.0 {
            self.painter.circle_filled(
                center,
                radius + style.glow_blur * 0.5,
                to_color32(style.glow_color, style.alpha * GLOW_ALPHA),
            );
        }
        self.painter
            .circle_filled(center, radius, to_color32(style.color, style.alpha));
    }
}

/// The central panel hosting the preview, with the whole window as fallback.
pub struct PanelLayout {
    pub panel: Rect,
    pub window: Option<Rect>,
}

impl HostLayout for PanelLayout {
    fn extent(&self) -> Option<Extent> {
        Some(Extent::new(self.panel.width(), self.panel.height()))
    }

    fn viewport_extent(&self) -> Option<Extent> {
        self.window
            .map(|rect| Extent::new(rect.width(), rect.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_conversion_scales_alpha() {
        let primary = Vec4::new(0.0, 200.0 / 255.0, 83.0 / 255.0, 1.0);
        assert_eq!(
            to_color32(primary, 1.0),
            Color32::from_rgba_unmultiplied(0, 200, 83, 255)
        );
        assert_eq!(
            to_color32(Vec4::ONE, 0.5),
            Color32::from_rgba_unmultiplied(255, 255, 255, 128)
        );
        assert_eq!(to_color32(Vec4::ONE, -1.0).a(), 0);
    }

    #[test]
    fn panel_layout_reports_panel_then_window() {
        let layout = PanelLayout {
            panel: Rect::from_min_size(Pos2::new(10.0, 20.0), egui::vec2(400.0, 300.0)),
            window: Some(Rect::from_min_size(Pos2::ZERO, egui::vec2(1280.0, 720.0))),
        };
        assert_eq!(layout.extent(), Some(Extent::new(400.0, 300.0)));
        assert_eq!(layout.viewport_extent(), Some(Extent::new(1280.0, 720.0)));
    }
}
