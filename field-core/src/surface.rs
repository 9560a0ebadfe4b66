use glam::Vec2;

use crate::config::{DENSITY_RATIO_MAX, DENSITY_RATIO_MIN, FieldConfig};

/// What a host reports about its drawing surface on (re)size.
///
/// ### Fields
/// - `css` - Layout size of the surface element in logical pixels.
/// - `viewport` - Viewport size, used per axis when `css` reports zero.
/// - `pixel_ratio` - Device pixels per logical pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Layout {
    pub css: Vec2,
    pub viewport: Vec2,
    pub pixel_ratio: f32,
}

impl Layout {
    pub fn new(css: Vec2, viewport: Vec2, pixel_ratio: f32) -> Self {
        Self {
            css,
            viewport,
            pixel_ratio,
        }
    }
}

/// Logical size of the drawing surface and its pixel density.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Surface {
    pub size: Vec2,
    pub pixel_ratio: f32,
}

impl Surface {
    /// Resolves a [`Layout`] into a surface.
    ///
    /// Each axis that reports zero (or garbage) in `css` falls back to
    /// the viewport. A pixel ratio that is not a positive finite number
    /// is treated as `1.0`.
    pub fn from_layout(layout: Layout) -> Self {
        let pick = |css: f32, viewport: f32| {
            if css.is_finite() && css > 0.0 {
                css
            } else if viewport.is_finite() && viewport > 0.0 {
                viewport
            } else {
                0.0
            }
        };
        let size = Vec2::new(
            pick(layout.css.x, layout.viewport.x),
            pick(layout.css.y, layout.viewport.y),
        );
        let pixel_ratio = if layout.pixel_ratio.is_finite() && layout.pixel_ratio > 0.0 {
            layout.pixel_ratio
        } else {
            1.0
        };
        Self { size, pixel_ratio }
    }

    pub fn width(&self) -> f32 {
        self.size.x
    }

    pub fn height(&self) -> f32 {
        self.size.y
    }

    pub fn area(&self) -> f64 {
        self.size.x as f64 * self.size.y as f64
    }

    /// Size of the backing pixel buffer, `floor(logical * pixel_ratio)` per axis.
    pub fn backing_size(&self) -> (u32, u32) {
        let px = self.size * self.pixel_ratio;
        (px.x.floor() as u32, px.y.floor() as u32)
    }

    /// Number of particles this surface should hold.
    ///
    /// `round(base_count * clamp(area / reference_area, 0.5, 2.2))`, so
    /// density rather than count stays roughly constant across sizes.
    pub fn target_count(&self, cfg: &FieldConfig) -> usize {
        let ratio = (self.area() / FieldConfig::reference_area())
            .clamp(DENSITY_RATIO_MIN, DENSITY_RATIO_MAX);
        (cfg.base_count as f64 * ratio).round() as usize
    }

    pub fn contains_with_margin(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin
            && p.x <= self.size.x + margin
            && p.y >= -margin
            && p.y <= self.size.y + margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{REFERENCE_HEIGHT, REFERENCE_WIDTH};

    fn surface_with_area_factor(factor: f32) -> Surface {
        Surface {
            size: Vec2::new(REFERENCE_WIDTH * factor, REFERENCE_HEIGHT),
            pixel_ratio: 1.0,
        }
    }

    #[test]
    fn target_count_at_reference_area_is_base_count() {
        let mut cfg = FieldConfig::default();
        cfg.base_count = 60;
        assert_eq!(FieldConfig::reference_area(), 1_049_088.0);
        assert_eq!(surface_with_area_factor(1.0).target_count(&cfg), 60);
    }

    #[test]
    fn target_count_clamps_small_and_large_areas() {
        let mut cfg = FieldConfig::default();
        cfg.base_count = 60;
        assert_eq!(surface_with_area_factor(0.3).target_count(&cfg), 30);
        assert_eq!(surface_with_area_factor(5.0).target_count(&cfg), 132);
    }

    #[test]
    fn target_count_scales_inside_clamp_band() {
        let mut cfg = FieldConfig::default();
        cfg.base_count = 60;
        assert_eq!(surface_with_area_factor(1.5).target_count(&cfg), 90);
    }

    #[test]
    fn zero_layout_axis_falls_back_to_viewport() {
        let s = Surface::from_layout(Layout::new(
            Vec2::new(0.0, 300.0),
            Vec2::new(1024.0, 768.0),
            2.0,
        ));
        assert_eq!(s.size, Vec2::new(1024.0, 300.0));
        assert_eq!(s.pixel_ratio, 2.0);
    }

    #[test]
    fn invalid_pixel_ratio_defaults_to_one() {
        for ratio in [0.0, -1.0, f32::NAN] {
            let s = Surface::from_layout(Layout::new(Vec2::splat(10.0), Vec2::ZERO, ratio));
            assert_eq!(s.pixel_ratio, 1.0);
        }
    }

    #[test]
    fn backing_size_scales_and_floors() {
        let s = Surface {
            size: Vec2::new(100.5, 50.0),
            pixel_ratio: 1.5,
        };
        assert_eq!(s.backing_size(), (150, 75));
    }

    #[test]
    fn contains_with_margin_is_inclusive() {
        let s = Surface {
            size: Vec2::new(100.0, 100.0),
            pixel_ratio: 1.0,
        };
        assert!(s.contains_with_margin(Vec2::new(-10.0, 110.0), 10.0));
        assert!(!s.contains_with_margin(Vec2::new(-10.1, 50.0), 10.0));
    }
}
