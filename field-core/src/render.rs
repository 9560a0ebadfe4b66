//! Drawing the field.
//!
//! Hosts implement [`Canvas2d`] on top of whatever immediate-mode 2-D
//! API they have (an egui painter, a browser canvas context). All
//! coordinates handed to a canvas are logical surface coordinates; the
//! host is responsible for the device pixel scale.

use glam::Vec2;

use crate::{
    config::FieldConfig,
    particle::ParticleSet,
    pointer::PointerState,
    surface::Surface,
    types::{ParticleId, Rgba},
};

/// Minimal immediate-mode drawing surface.
pub trait Canvas2d {
    /// Called before drawing whenever the surface geometry changed, so the
    /// host can resize its backing buffer and reset its transform.
    fn set_surface(&mut self, _surface: &Surface) {}

    /// Clears the whole surface of logical size `size`.
    fn clear(&mut self, size: Vec2);

    /// Strokes a straight line.
    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fills a circle.
    fn disc(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Fills a radial gradient from `color` at the centre to fully
    /// transparent at `radius`.
    fn halo(&mut self, center: Vec2, radius: f32, color: Rgba);
}

/// A connecting line between two particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Link {
    pub a: ParticleId,
    pub b: ParticleId,
    pub alpha: f32,
}

/// Opacity of a line between two particles `dist` apart.
///
/// Fades linearly from `max_alpha` at distance 0 to 0 at
/// `connect_distance`; zero at or beyond it.
#[inline]
pub fn link_alpha(dist: f32, connect_distance: f32, max_alpha: f32) -> f32 {
    if dist >= connect_distance {
        0.0
    } else {
        max_alpha * (1.0 - dist / connect_distance)
    }
}

/// Visits every unordered pair closer than `cfg.connect_distance`.
///
/// This is the O(n²) pass; the adaptive particle count keeps `n` small.
pub fn for_each_link(particles: &ParticleSet, cfg: &FieldConfig, mut f: impl FnMut(Link)) {
    let max_d2 = cfg.connect_distance * cfg.connect_distance;
    let pts = &particles.points;
    for i in 0..pts.len() {
        for j in (i + 1)..pts.len() {
            let d2 = pts[i].pos.distance_squared(pts[j].pos);
            if d2 >= max_d2 {
                continue;
            }
            let alpha = link_alpha(d2.sqrt(), cfg.connect_distance, cfg.line_alpha);
            if alpha > 0.0 {
                f(Link { a: i, b: j, alpha });
            }
        }
    }
}

/// Draws one frame: clear, links, particles, then the pointer halo.
pub fn render_frame(
    canvas: &mut impl Canvas2d,
    particles: &ParticleSet,
    pointer: &PointerState,
    surface: &Surface,
    cfg: &FieldConfig,
) {
    canvas.clear(surface.size);

    let pts = &particles.points;
    for_each_link(particles, cfg, |link| {
        canvas.line(
            pts[link.a].pos,
            pts[link.b].pos,
            cfg.line_width,
            cfg.color.with_alpha(link.alpha),
        );
    });

    for p in pts {
        canvas.disc(p.pos, p.size, cfg.color.with_alpha(p.alpha));
    }

    if let Some(at) = pointer.active_pos() {
        canvas.halo(at, cfg.halo_radius(), cfg.color.with_alpha(cfg.halo_alpha));
    }
}
