//! [`Canvas2d`] on top of an egui [`egui::Painter`].

use field_core::{render::Canvas2d, types::Rgba};
use glam::Vec2;

/// Number of stacked discs used to approximate a radial gradient.
const HALO_RINGS: usize = 16;

/// Draws field primitives into a painter, offset by the panel origin.
///
/// Field coordinates are logical pixels, which egui calls points, so
/// only a translation is needed; egui applies the pixel ratio itself.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    origin: egui::Pos2,
    background: egui::Color32,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, origin: egui::Pos2, background: egui::Color32) -> Self {
        Self {
            painter,
            origin,
            background,
        }
    }

    fn to_screen(&self, p: Vec2) -> egui::Pos2 {
        self.origin + egui::vec2(p.x, p.y)
    }
}

pub fn color32(c: Rgba) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(c.rgb.r, c.rgb.g, c.rgb.b, c.alpha_u8())
}

impl Canvas2d for EguiCanvas<'_> {
    fn clear(&mut self, size: Vec2) {
        let rect = egui::Rect::from_min_size(self.origin, egui::vec2(size.x, size.y));
        self.painter.rect_filled(rect, 0.0, self.background);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            egui::Stroke::new(width, color32(color)),
        );
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.painter
            .circle_filled(self.to_screen(center), radius, color32(color));
    }

    // egui has no radial gradient fill: stack translucent discs, largest
    // first, so opacity builds up linearly towards the centre.
    fn halo(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let ring = Rgba {
            a: color.a / HALO_RINGS as f32,
            ..color
        };
        let fill = color32(ring);
        let c = self.to_screen(center);
        for i in 0..HALO_RINGS {
            let r = radius * (1.0 - i as f32 / HALO_RINGS as f32);
            self.painter.circle_filled(c, r, fill);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use field_core::types::Rgb;

    #[test]
    fn color32_keeps_channels_and_scales_alpha() {
        let c = color32(Rgb::new(10, 20, 30).with_alpha(0.5));
        assert_eq!(c, egui::Color32::from_rgba_unmultiplied(10, 20, 30, 128));
    }
}
