//! Frame-loop lifecycle and resize debouncing.
//!
//! The host owns the actual frame signal (a repaint request, a
//! `requestAnimationFrame` callback). [`FrameLoop`] only decides whether
//! the next frame should be requested, and tells the host when a paused
//! loop has to be kicked off again.
//!
//! A browser keeps a queued frame callback parked while the page is
//! hidden and fires it once the page is shown. The loop therefore also
//! tracks whether the host has a request outstanding, so that a restart
//! never queues a second callback next to the parked one.

/// Lifecycle state of the frame loop. There is no terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopState {
    Running,
    Paused,
}

#[derive(Clone, Debug)]
pub struct FrameLoop {
    state: LoopState,
    frames: u64,
    pending: bool,
}

impl FrameLoop {
    /// A loop in the initial `Running` state.
    pub fn start() -> Self {
        Self {
            state: LoopState::Running,
            frames: 0,
            pending: false,
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    /// Number of frames run since the loop was started.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Applies a page visibility change.
    ///
    /// ### Returns
    /// `true` if the loop went from `Paused` to `Running` and no frame
    /// request is outstanding; the host must then request a frame itself,
    /// since the paused loop stopped rescheduling.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        match (self.state, visible) {
            (LoopState::Running, false) => {
                self.state = LoopState::Paused;
                log::debug!("frame loop paused after {} frames", self.frames);
                false
            }
            (LoopState::Paused, true) => {
                self.state = LoopState::Running;
                log::debug!("frame loop resumed (frame pending: {})", self.pending);
                !self.pending
            }
            _ => false,
        }
    }

    /// Whether the host has asked for a frame that has not run yet.
    pub fn is_frame_pending(&self) -> bool {
        self.pending
    }

    /// Records that the host is about to request a frame.
    ///
    /// ### Returns
    /// `true` if the host should issue the request. `false` while paused
    /// or when a request is already outstanding.
    pub fn request_frame(&mut self) -> bool {
        if self.pending || !self.is_running() {
            return false;
        }
        self.pending = true;
        true
    }

    /// Forgets an outstanding request the host failed to issue.
    pub fn cancel_request(&mut self) {
        self.pending = false;
    }

    /// Called at the top of a frame callback.
    ///
    /// ### Returns
    /// `true` if the frame should run (and the next one be requested).
    pub fn begin_frame(&mut self) -> bool {
        self.pending = false;
        if self.is_running() {
            self.frames += 1;
            true
        } else {
            false
        }
    }
}

/// Keeps only the last value of a burst, releasing it once no new value
/// arrived for `window` seconds.
#[derive(Clone, Debug)]
pub struct Debouncer<T> {
    window: f64,
    pending: Option<(T, f64)>,
}

impl<T> Debouncer<T> {
    pub fn new(window: f64) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Replaces any pending value and restarts the quiet window at `now`.
    pub fn trigger(&mut self, value: T, now: f64) {
        self.pending = Some((value, now));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending value if its quiet window has elapsed by `now`.
    pub fn take_ready(&mut self, now: f64) -> Option<T> {
        let ready = matches!(self.pending, Some((_, at)) if now - at >= self.window);
        if ready {
            self.pending.take().map(|(v, _)| v)
        } else {
            None
        }
    }
}
