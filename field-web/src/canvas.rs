use std::f64::consts::TAU;

use field_core::{render::Canvas2d, surface::Surface, types::Rgba};
use glam::Vec2;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// [`Canvas2d`] backed by an HTML canvas and its 2-D context.
///
/// Both handles are references to JS objects, so clones are cheap and
/// draw to the same element.
#[derive(Clone)]
pub struct WebCanvas {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl WebCanvas {
    pub fn new(canvas: HtmlCanvasElement, ctx: CanvasRenderingContext2d) -> Self {
        Self { canvas, ctx }
    }

    pub fn element(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl Canvas2d for WebCanvas {
    fn set_surface(&mut self, surface: &Surface) {
        let (w, h) = surface.backing_size();
        self.canvas.set_width(w);
        self.canvas.set_height(h);
        let dpr = surface.pixel_ratio as f64;
        if let Err(e) = self.ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0) {
            log::warn!("setTransform failed: {e:?}");
        }
    }

    fn clear(&mut self, size: Vec2) {
        self.ctx.clear_rect(0.0, 0.0, size.x as f64, size.y as f64);
    }

    fn line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.ctx.set_stroke_style_str(&color.to_css());
        self.ctx.set_line_width(width as f64);
        self.ctx.begin_path();
        self.ctx.move_to(from.x as f64, from.y as f64);
        self.ctx.line_to(to.x as f64, to.y as f64);
        self.ctx.stroke();
    }

    fn disc(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.ctx.set_fill_style_str(&color.to_css());
        self.ctx.begin_path();
        // Only fails for a negative radius; nothing to draw then.
        if self
            .ctx
            .arc(center.x as f64, center.y as f64, radius as f64, 0.0, TAU)
            .is_ok()
        {
            self.ctx.fill();
        }
    }

    fn halo(&mut self, center: Vec2, radius: f32, color: Rgba) {
        let (x, y, r) = (center.x as f64, center.y as f64, radius as f64);
        let Ok(gradient) = self.ctx.create_radial_gradient(x, y, 0.0, x, y, r) else {
            return;
        };
        let transparent = Rgba { a: 0.0, ..color };
        if gradient.add_color_stop(0.0, &color.to_css()).is_err()
            || gradient.add_color_stop(1.0, &transparent.to_css()).is_err()
        {
            return;
        }
        self.ctx.set_fill_style_canvas_gradient(&gradient);
        self.ctx.begin_path();
        if self.ctx.arc(x, y, r, 0.0, TAU).is_ok() {
            self.ctx.fill();
        }
    }
}
