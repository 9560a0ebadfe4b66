//! Interactive desktop host for the particle field, built with eframe/egui.
//!
//! This module defines [`Viewer`], which owns a
//! [`FieldAnimator`] and implements [`eframe::App`] to feed it pointer,
//! resize and visibility events and draw it into the central panel.

use std::path::PathBuf;

use eframe::App;
use field_core::{
    animator::{FieldAnimator, FieldEvent},
    config::{FieldConfig, Preset},
    error::FieldError,
    schedule::LoopState,
    surface::Layout,
};
use glam::Vec2;
use rand::rngs::ThreadRng;

use crate::canvas::EguiCanvas;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(10, 25, 47);

/// Main application state for the viewer.
///
/// The animator is created lazily on the first frame, once the central
/// panel has a size, and recreated whenever the preset changes.
///
/// ### Fields
/// - `animator` - The running field, `None` until the first frame.
/// - `cfg` - Configuration for the current (and next) session.
/// - `preset` - Preset `cfg` came from, `None` for a loaded file.
/// - `config_path` - Where "Save config" writes `cfg` as JSON.
/// - `force_hidden` - Debug toggle that behaves like a hidden page.
/// - `last_layout` - Layout last reported to the animator.
/// - `last_pointer` - Panel-local pointer position last reported.
pub struct Viewer {
    animator: Option<FieldAnimator<ThreadRng>>,
    cfg: FieldConfig,
    preset: Option<Preset>,
    config_path: PathBuf,
    force_hidden: bool,
    last_layout: Option<Layout>,
    last_pointer: Option<Vec2>,
}

impl Viewer {
    pub fn new(cfg: FieldConfig, preset: Option<Preset>, config_path: PathBuf) -> Self {
        Self {
            animator: None,
            cfg,
            preset,
            config_path,
            force_hidden: false,
            last_layout: None,
            last_pointer: None,
        }
    }

    /// Builds the [`Layout`] the animator sees for a panel.
    ///
    /// ### Parameters
    /// - `rect` - The central panel rectangle, in points.
    /// - `viewport` - The window's inner rectangle, if known; used when
    ///   the panel reports a zero size.
    /// - `pixels_per_point` - egui's device pixel ratio.
    fn layout_for(rect: egui::Rect, viewport: Option<egui::Rect>, pixels_per_point: f32) -> Layout {
        let viewport = viewport.map_or(Vec2::ZERO, |r| Vec2::new(r.width(), r.height()));
        Layout::new(
            Vec2::new(rect.width(), rect.height()),
            viewport,
            pixels_per_point,
        )
    }

    /// Converts a screen position to panel-local field coordinates.
    fn to_local(p: egui::Pos2, rect: egui::Rect) -> Vec2 {
        Vec2::new(p.x - rect.min.x, p.y - rect.min.y)
    }

    /// Switches to a preset and drops the current session.
    fn select_preset(&mut self, preset: Preset) {
        self.cfg = preset.config();
        self.preset = Some(preset);
        self.restart();
    }

    /// Drops the animator; the next frame starts a fresh one.
    fn restart(&mut self) {
        self.animator = None;
        self.last_layout = None;
        self.last_pointer = None;
    }

    /// Writes the active configuration to `config_path`.
    fn save_config(&self) -> Result<(), FieldError> {
        self.cfg.save(&self.config_path)?;
        log::info!("saved field config to {}", self.config_path.display());
        Ok(())
    }

    /// Forwards pointer hover changes to the animator.
    fn sync_pointer(&mut self, hover: Option<egui::Pos2>, rect: egui::Rect, now: f64) {
        let Some(animator) = self.animator.as_mut() else {
            return;
        };
        match hover.map(|p| Self::to_local(p, rect)) {
            Some(local) if self.last_pointer != Some(local) => {
                animator.handle(FieldEvent::PointerMoved(local), now);
                self.last_pointer = Some(local);
            }
            Some(_) => {}
            None => {
                if self.last_pointer.take().is_some() {
                    animator.handle(FieldEvent::PointerLeft, now);
                }
            }
        }
    }

    /// Creates the animator if needed and reports layout changes,
    /// including a pixel density change on another monitor.
    fn sync_layout(&mut self, layout: Layout, now: f64) {
        match self.animator.as_mut() {
            None => {
                self.animator = FieldAnimator::init(self.cfg.clone(), Some(layout), rand::rng());
                self.last_layout = Some(layout);
            }
            Some(animator) => {
                if self.last_layout != Some(layout) {
                    animator.handle(FieldEvent::Resized(layout), now);
                    self.last_layout = Some(layout);
                }
            }
        }
    }

    /// Builds the top panel (visibility toggle, restart, save).
    fn ui_top_panel(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_panel").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.checkbox(&mut self.force_hidden, "Hide page");

                if ui.button("Restart").clicked() {
                    self.restart();
                }

                let save = ui
                    .button("Save config")
                    .on_hover_text(self.config_path.display().to_string());
                if save.clicked() {
                    if let Err(e) = self.save_config() {
                        log::warn!("could not save config: {e}");
                    }
                }
            });
        });
    }

    /// Builds the bottom status bar (loop state, counts).
    fn ui_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                let Some(animator) = &self.animator else {
                    ui.label("not started");
                    return;
                };
                ui.label(format!("frames = {}", animator.frames()));
                ui.label(match animator.state() {
                    LoopState::Running => "running",
                    LoopState::Paused => "paused",
                });
                ui.separator();
                ui.label(format!("target = {}", animator.target_count()));
                ui.label(format!("particles = {}", animator.particles().len()));
                ui.separator();
                ui.label(if animator.pointer().active {
                    "pointer active"
                } else {
                    "pointer idle"
                });
            });
        });
    }

    /// Builds the right-hand panel: preset choice and the read-only config.
    fn ui_config_panel(&mut self, ctx: &egui::Context) {
        egui::SidePanel::right("config_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                ui.heading("Preset");
                let mut chosen = None;
                ui.horizontal(|ui| {
                    for preset in Preset::ALL {
                        if ui
                            .selectable_label(self.preset == Some(preset), preset.name())
                            .clicked()
                        {
                            chosen = Some(preset);
                        }
                    }
                });
                if let Some(preset) = chosen {
                    self.select_preset(preset);
                }

                ui.separator();
                ui.heading("Config");
                let cfg = &self.cfg;
                let rows = [
                    ("base_count", cfg.base_count.to_string()),
                    ("connect_distance", format!("{:.1}", cfg.connect_distance)),
                    ("size", format!("{:.1} .. {:.1}", cfg.size_min, cfg.size_max)),
                    ("speed_range", format!("{:.2}", cfg.speed_range)),
                    (
                        "color",
                        format!("#{:02x}{:02x}{:02x}", cfg.color.r, cfg.color.g, cfg.color.b),
                    ),
                    ("line_alpha", format!("{:.2}", cfg.line_alpha)),
                    ("particle_alpha", format!("{:.2}", cfg.particle_alpha)),
                    ("line_width", format!("{:.1}", cfg.line_width)),
                    ("mouse_radius", format!("{:.1}", cfg.mouse_radius)),
                    ("pointer_mode", format!("{:?}", cfg.pointer_mode)),
                    ("halo_alpha", format!("{:.2}", cfg.halo_alpha)),
                ];
                egui::Grid::new("config_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (name, value) in rows {
                            ui.label(name);
                            ui.monospace(value);
                            ui.end_row();
                        }
                    });
            });
    }

    /// Builds the central panel where the field runs.
    fn ui_central_panel(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default()
            .frame(egui::Frame::new().fill(BACKGROUND))
            .show(ctx, |ui| {
                let response = ui.allocate_response(ui.available_size(), egui::Sense::hover());
                let rect = response.rect;
                let painter = ui.painter_at(rect);

                let (now, viewport, minimized) = ctx.input(|i| {
                    (
                        i.time,
                        i.viewport().inner_rect,
                        i.viewport().minimized.unwrap_or(false),
                    )
                });
                let layout = Self::layout_for(rect, viewport, ctx.pixels_per_point());

                self.sync_layout(layout, now);
                self.sync_pointer(response.hover_pos(), rect, now);

                let visible = !minimized && !self.force_hidden;
                let Some(animator) = self.animator.as_mut() else {
                    return;
                };
                animator.handle(FieldEvent::VisibilityChanged(visible), now);

                let mut canvas = EguiCanvas::new(&painter, rect.min, BACKGROUND);
                if animator.frame(now, &mut canvas) {
                    ctx.request_repaint();
                } else {
                    // Paused: egui still needs this frame painted, but the
                    // field must not advance.
                    animator.render(&mut canvas);
                }
            });
    }
}

impl App for Viewer {
    /// eframe callback that builds all UI panels for each frame.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui_top_panel(ctx);
        self.ui_status_bar(ctx);
        self.ui_config_panel(ctx);
        self.ui_central_panel(ctx);
    }
}
