//! The particle field animator.
//!
//! [`FieldAnimator`] owns everything one animation needs: configuration,
//! particles, pointer state, surface geometry, the frame loop and the
//! resize debouncer. Several animators can coexist; nothing is global.
//!
//! Hosts feed it [`FieldEvent`]s between frames and call
//! [`FieldAnimator::frame`] from their frame signal. Both happen on one
//! thread, so no locking is involved.

use glam::Vec2;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use crate::{
    config::{FieldConfig, RESIZE_DEBOUNCE_SECS},
    particle::{ParticleSet, Reconcile},
    phases,
    pointer::PointerState,
    render::{self, Canvas2d},
    schedule::{Debouncer, FrameLoop, LoopState},
    surface::{Layout, Surface},
};

/// Something the host observed between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldEvent {
    /// Pointer (mouse or first touch) moved, in surface-local coordinates.
    PointerMoved(Vec2),
    /// Pointer left the surface or the touch ended.
    PointerLeft,
    /// The surface or window was resized.
    Resized(Layout),
    /// The page (or window) became visible or hidden.
    VisibilityChanged(bool),
}

/// Main state of one particle field.
///
/// ### Fields
/// - `cfg` - Configuration, fixed for the animator's lifetime.
/// - `particles` - The particles being animated.
/// - `pointer` - Latest pointer sample.
/// - `surface` - Current logical surface size and pixel ratio.
/// - `frame_loop` - Running/Paused state and frame counter.
/// - `resize` - Pending debounced layout.
/// - `last_reconcile` - Branch taken by the most recent resize.
/// - `surface_dirty` - The canvas has not seen the current surface yet.
/// - `rng` - Random source for new particles.
pub struct FieldAnimator<R = SmallRng> {
    cfg: FieldConfig,
    particles: ParticleSet,
    pointer: PointerState,
    surface: Surface,
    frame_loop: FrameLoop,
    resize: Debouncer<Layout>,
    last_reconcile: Reconcile,
    surface_dirty: bool,
    rng: R,
}

impl FieldAnimator<SmallRng> {
    /// [`FieldAnimator::init`] with a seeded [`SmallRng`].
    pub fn init_seeded(cfg: FieldConfig, layout: Option<Layout>, seed: u64) -> Option<Self> {
        Self::init(cfg, layout, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> FieldAnimator<R> {
    /// Creates a running animator for a surface.
    ///
    /// `layout` is `None` when the host has no drawing surface; the
    /// animator then declines to start and nothing else happens.
    /// Otherwise the first resize is performed immediately and the loop
    /// starts in [`LoopState::Running`]; the host attaches its listeners
    /// and requests the first frame.
    pub fn init(cfg: FieldConfig, layout: Option<Layout>, rng: R) -> Option<Self> {
        let Some(layout) = layout else {
            log::debug!("no drawing surface, particle field not started");
            return None;
        };

        let mut animator = Self {
            cfg,
            particles: ParticleSet::default(),
            pointer: PointerState::default(),
            surface: Surface::from_layout(layout),
            frame_loop: FrameLoop::start(),
            resize: Debouncer::new(RESIZE_DEBOUNCE_SECS),
            last_reconcile: Reconcile::Unchanged,
            surface_dirty: true,
            rng,
        };
        animator.resize(layout);
        log::info!(
            "particle field started: {}x{} @{}x, {} particles",
            animator.surface.width(),
            animator.surface.height(),
            animator.surface.pixel_ratio,
            animator.particles.len()
        );
        Some(animator)
    }

    /// Applies a layout immediately: recomputes the surface and
    /// reconciles the particle count against the new target.
    pub fn resize(&mut self, layout: Layout) -> Reconcile {
        self.surface = Surface::from_layout(layout);
        let target = self.surface.target_count(&self.cfg);
        let before = self.particles.len();
        let outcome = self
            .particles
            .reconcile(target, &self.surface, &self.cfg, &mut self.rng);
        log::debug!(
            "resize to {}x{}: target {}, {} -> {} particles ({:?})",
            self.surface.width(),
            self.surface.height(),
            target,
            before,
            self.particles.len(),
            outcome
        );
        self.last_reconcile = outcome;
        self.surface_dirty = true;
        outcome
    }

    /// Handles one host event.
    ///
    /// Pointer events take effect immediately; resizes are debounced and
    /// applied by the first frame after the quiet window.
    ///
    /// ### Returns
    /// `true` if the host must request a frame because a paused loop
    /// just resumed with no frame request outstanding.
    pub fn handle(&mut self, event: FieldEvent, now: f64) -> bool {
        match event {
            FieldEvent::PointerMoved(pos) => {
                self.pointer.move_to(pos);
                false
            }
            FieldEvent::PointerLeft => {
                self.pointer.clear();
                false
            }
            FieldEvent::Resized(layout) => {
                log::trace!("resize requested at {now:.3}s");
                self.resize.trigger(layout, now);
                false
            }
            FieldEvent::VisibilityChanged(visible) => self.frame_loop.set_visible(visible),
        }
    }

    /// Advances the physics by one frame, regardless of the loop state.
    pub fn update(&mut self) {
        phases::step(&mut self.particles, &self.pointer, &self.surface, &self.cfg);
    }

    /// Draws the current state without advancing it.
    pub fn render(&self, canvas: &mut impl Canvas2d) {
        render::render_frame(
            canvas,
            &self.particles,
            &self.pointer,
            &self.surface,
            &self.cfg,
        );
    }

    /// The frame callback.
    ///
    /// While paused this does nothing. While running it applies a due
    /// debounced resize (handing the new surface to the canvas), updates,
    /// renders and counts the frame.
    ///
    /// ### Returns
    /// `true` if the host should request the next frame.
    pub fn frame(&mut self, now: f64, canvas: &mut impl Canvas2d) -> bool {
        if !self.frame_loop.begin_frame() {
            return false;
        }
        if let Some(layout) = self.resize.take_ready(now) {
            self.resize(layout);
        }
        if self.surface_dirty {
            canvas.set_surface(&self.surface);
            self.surface_dirty = false;
        }
        self.update();
        self.render(canvas);
        true
    }

    /// Called by hosts whose frame requests queue up (such as
    /// `requestAnimationFrame`) right before they issue one.
    ///
    /// ### Returns
    /// `true` if the request should be issued; `false` if one is already
    /// outstanding or the loop is paused.
    pub fn request_frame(&mut self) -> bool {
        self.frame_loop.request_frame()
    }

    /// Forgets a request returned by [`FieldAnimator::request_frame`]
    /// that the host could not issue.
    pub fn cancel_frame_request(&mut self) {
        self.frame_loop.cancel_request();
    }

    /// Configuration in use; never modified by the animator.
    pub fn config(&self) -> &FieldConfig {
        &self.cfg
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn state(&self) -> LoopState {
        self.frame_loop.state()
    }

    pub fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    pub fn frames(&self) -> u64 {
        self.frame_loop.frames()
    }

    /// Particle count the current surface asks for.
    pub fn target_count(&self) -> usize {
        self.surface.target_count(&self.cfg)
    }

    pub fn last_reconcile(&self) -> Reconcile {
        self.last_reconcile
    }

    pub fn has_pending_resize(&self) -> bool {
        self.resize.is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{REFERENCE_HEIGHT, REFERENCE_WIDTH},
        render::tests::{Op, Recorder},
    };

    fn layout(w: f32, h: f32) -> Layout {
        Layout::new(Vec2::new(w, h), Vec2::new(w, h), 1.0)
    }

    fn reference_layout() -> Layout {
        layout(REFERENCE_WIDTH, REFERENCE_HEIGHT)
    }

    fn animator() -> FieldAnimator {
        FieldAnimator::init_seeded(FieldConfig::default(), Some(reference_layout()), 42)
            .expect("surface present")
    }

    fn positions(a: &FieldAnimator) -> Vec<Vec2> {
        a.particles().points.iter().map(|p| p.pos).collect()
    }

    #[test]
    fn init_without_surface_is_a_no_op() {
        assert!(FieldAnimator::init_seeded(FieldConfig::default(), None, 1).is_none());
    }

    #[test]
    fn init_fills_to_target_and_runs() {
        let a = animator();
        assert_eq!(a.state(), LoopState::Running);
        assert_eq!(a.particles().len(), 60);
        assert_eq!(a.target_count(), 60);
        assert_eq!(a.last_reconcile(), Reconcile::Filled);
        assert_eq!(a.frames(), 0);
    }

    #[test]
    fn frame_updates_and_renders() {
        let mut a = animator();
        let before = positions(&a);
        let mut rec = Recorder::default();

        assert!(a.frame(0.016, &mut rec));

        assert_eq!(a.frames(), 1);
        assert_ne!(positions(&a), before);
        assert!(!rec.ops.is_empty());
    }

    #[test]
    fn canvas_sees_surface_on_first_frame_and_after_resize_only() {
        let mut a = animator();
        let surface_ops = |rec: &Recorder| {
            rec.ops
                .iter()
                .filter(|op| matches!(op, Op::Surface(..)))
                .count()
        };

        let mut rec = Recorder::default();
        a.frame(0.0, &mut rec);
        assert_eq!(
            rec.ops.first(),
            Some(&Op::Surface(
                Vec2::new(REFERENCE_WIDTH, REFERENCE_HEIGHT),
                1.0
            ))
        );

        let mut rec = Recorder::default();
        a.frame(0.016, &mut rec);
        assert_eq!(surface_ops(&rec), 0);

        a.handle(FieldEvent::Resized(layout(800.0, 600.0)), 0.02);
        let mut rec = Recorder::default();
        a.frame(0.5, &mut rec);
        assert_eq!(rec.ops.first(), Some(&Op::Surface(Vec2::new(800.0, 600.0), 1.0)));
    }

    #[test]
    fn hidden_page_stops_updates_and_resume_continues_from_last_state() {
        let mut a = animator();
        let mut rec = Recorder::default();
        a.frame(0.0, &mut rec);

        assert!(!a.handle(FieldEvent::VisibilityChanged(false), 0.1));
        let frozen = positions(&a);
        let frames = a.frames();

        let mut rec = Recorder::default();
        for i in 0..10 {
            assert!(!a.frame(0.2 + i as f64 * 0.016, &mut rec));
        }
        assert!(rec.ops.is_empty());
        assert_eq!(positions(&a), frozen);
        assert_eq!(a.frames(), frames);

        assert!(a.handle(FieldEvent::VisibilityChanged(true), 1.0));
        assert_eq!(positions(&a), frozen, "resume must not reset positions");

        let mut rec = Recorder::default();
        assert!(a.frame(1.016, &mut rec));
        assert_eq!(a.frames(), frames + 1);
        let moved: Vec<Vec2> = frozen
            .iter()
            .zip(&a.particles().points)
            .map(|(before, p)| p.pos - *before)
            .collect();
        assert!(moved.iter().any(|d| *d != Vec2::ZERO));
        // One small step, not a re-spawn.
        assert!(moved.iter().all(|d| d.length() < 1.0));
    }

    /// Host that queues frame callbacks like `requestAnimationFrame`:
    /// queued callbacks only fire on a display frame while visible.
    struct QueuedHost {
        queued: usize,
        visible: bool,
        now: f64,
    }

    impl QueuedHost {
        fn new() -> Self {
            Self {
                queued: 0,
                visible: true,
                now: 0.0,
            }
        }

        fn request(&mut self, a: &mut FieldAnimator) {
            if a.request_frame() {
                self.queued += 1;
            }
        }

        fn set_visible(&mut self, a: &mut FieldAnimator, visible: bool) {
            self.visible = visible;
            if a.handle(FieldEvent::VisibilityChanged(visible), self.now) {
                self.request(a);
            }
        }

        fn display_frame(&mut self, a: &mut FieldAnimator) {
            self.now += 0.016;
            if !self.visible {
                return;
            }
            let due = std::mem::take(&mut self.queued);
            for _ in 0..due {
                if a.frame(self.now, &mut Recorder::default()) {
                    self.request(a);
                }
            }
        }
    }

    #[test]
    fn hide_and_show_keeps_a_single_frame_chain() {
        let mut a = animator();
        let mut host = QueuedHost::new();
        host.request(&mut a);
        host.display_frame(&mut a);

        for _ in 0..3 {
            host.set_visible(&mut a, false);
            host.display_frame(&mut a);
            host.set_visible(&mut a, true);
        }

        let frames = a.frames();
        for _ in 0..10 {
            host.display_frame(&mut a);
        }
        assert_eq!(host.queued, 1);
        assert_eq!(a.frames(), frames + 10);
    }

    #[test]
    fn show_after_parked_callback_ran_restarts_the_chain() {
        let mut a = animator();
        let mut host = QueuedHost::new();
        host.request(&mut a);

        a.handle(FieldEvent::VisibilityChanged(false), 0.0);
        // Some browsers still flush the queued callback once after hiding.
        assert!(!a.frame(0.016, &mut Recorder::default()));
        host.queued = 0;

        host.set_visible(&mut a, true);
        assert_eq!(host.queued, 1);
        host.display_frame(&mut a);
        assert_eq!(host.queued, 1);
        assert_eq!(a.frames(), 1);
    }

    #[test]
    fn pointer_leave_removes_pointer_force() {
        let mut a = animator();
        let target = a.particles().points[0].pos;
        a.handle(FieldEvent::PointerMoved(target + Vec2::new(1.0, 0.0)), 0.0);
        assert!(a.pointer().active);

        a.handle(FieldEvent::PointerLeft, 0.0);
        assert!(!a.pointer().active);
        assert_eq!(a.pointer().pos, None);

        let mut reference =
            FieldAnimator::init_seeded(FieldConfig::default(), Some(reference_layout()), 42)
                .expect("surface present");
        a.update();
        reference.update();
        assert_eq!(positions(&a), positions(&reference));
        assert_eq!(
            a.particles().points[0].vel,
            reference.particles().points[0].vel
        );
    }

    #[test]
    fn resize_is_debounced_until_quiet_window_elapses() {
        let mut a = animator();
        let mut rec = Recorder::default();

        a.handle(FieldEvent::Resized(layout(REFERENCE_WIDTH * 5.0, REFERENCE_HEIGHT)), 0.00);
        a.handle(FieldEvent::Resized(layout(REFERENCE_WIDTH * 2.0, REFERENCE_HEIGHT)), 0.05);

        a.frame(0.10, &mut rec);
        assert_eq!(a.particles().len(), 60);
        assert!(a.has_pending_resize());

        a.frame(0.20, &mut rec);
        assert!(!a.has_pending_resize());
        // Only the last layout of the burst counts: 2x area -> 120.
        assert_eq!(a.particles().len(), 120);
        assert_eq!(a.surface().width(), REFERENCE_WIDTH * 2.0);
        assert_eq!(a.last_reconcile(), Reconcile::Grown);
    }

    #[test]
    fn resize_while_paused_waits_for_resume() {
        let mut a = animator();
        let mut rec = Recorder::default();

        a.handle(FieldEvent::VisibilityChanged(false), 0.0);
        a.handle(FieldEvent::Resized(layout(REFERENCE_WIDTH * 0.3, REFERENCE_HEIGHT)), 0.0);
        a.frame(1.0, &mut rec);
        assert!(a.has_pending_resize());
        assert_eq!(a.surface().width(), REFERENCE_WIDTH);

        a.handle(FieldEvent::VisibilityChanged(true), 2.0);
        a.frame(2.0, &mut rec);
        assert!(!a.has_pending_resize());
        // Target 30, 60 > 1.4 * 30 -> truncated.
        assert_eq!(a.particles().len(), 30);
        assert_eq!(a.last_reconcile(), Reconcile::Truncated);
    }

    #[test]
    fn small_shrink_inside_hysteresis_keeps_particles() {
        let mut a = animator();
        // 0.8x area -> target 48; 60 <= 1.4 * 48 = 67.2.
        let outcome = a.resize(layout(REFERENCE_WIDTH * 0.8, REFERENCE_HEIGHT));
        assert_eq!(outcome, Reconcile::Unchanged);
        assert_eq!(a.particles().len(), 60);
    }

    #[test]
    fn config_is_not_modified_by_running() {
        let mut a = animator();
        let mut rec = Recorder::default();
        for i in 0..50 {
            a.handle(FieldEvent::PointerMoved(Vec2::new(i as f32 * 10.0, 300.0)), 0.0);
            a.frame(i as f64 * 0.016, &mut rec);
        }
        assert_eq!(a.config(), &FieldConfig::default());
    }

    #[test]
    fn independent_animators_do_not_share_state() {
        let mut a = animator();
        let b = animator();
        a.handle(FieldEvent::PointerMoved(Vec2::new(10.0, 10.0)), 0.0);
        a.handle(FieldEvent::VisibilityChanged(false), 0.0);
        assert!(!b.pointer().active);
        assert!(b.is_running());
    }
}
