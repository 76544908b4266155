//! Folding pinch and drag gestures into committed display state.
//!
//! Pinch and drag are tracked independently and may overlap in time. While
//! a gesture is active its live delta is kept apart from the committed
//! state; [`GestureAccumulator::live_state`] combines the two for preview
//! without clamping. Ending a gesture folds the delta in and runs the clamp
//! before returning, so the committed state is always valid.
//!
//! ```text
//! Idle --begin/update--> Active --end--> Idle   (commit + clamp)
//!                          |
//!                          +--cancel / double-tap--> Idle   (delta dropped)
//! ```

use tracing::debug;

use crate::geometry::Offset2D;
use crate::transform::{ClampOutcome, DisplayState, TransformClamp};

/// The two continuous gestures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Pinch,
    Drag,
}

/// Committed display state plus in-flight gesture deltas.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureAccumulator {
    committed: DisplayState,
    /// `Some` while a pinch is active: incoming scale minus one.
    live_zoom_delta: Option<f64>,
    /// `Some` while a drag is active: candidate pan.
    live_pan: Option<Offset2D>,
}

impl GestureAccumulator {
    pub fn new(committed: DisplayState) -> Self {
        Self {
            committed,
            live_zoom_delta: None,
            live_pan: None,
        }
    }

    /// The last committed (clamped) state.
    pub fn committed(&self) -> DisplayState {
        self.committed
    }

    pub fn is_active(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pinch => self.live_zoom_delta.is_some(),
            GestureKind::Drag => self.live_pan.is_some(),
        }
    }

    /// Start a session with a zero delta. Restarting an active session
    /// discards its delta.
    pub fn begin(&mut self, kind: GestureKind) {
        match kind {
            GestureKind::Pinch => self.live_zoom_delta = Some(0.0),
            GestureKind::Drag => self.live_pan = Some(self.committed.pan),
        }
    }

    /// Pinch update with the gesture's cumulative scale (1.0 = unchanged).
    /// Non-finite scales are ignored.
    pub fn pinch_changed(&mut self, scale: f64) {
        if scale.is_finite() {
            self.live_zoom_delta = Some(scale - 1.0);
        }
    }

    /// End the pinch: fold the last delta into the committed zoom and clamp.
    pub fn pinch_ended(&mut self, clamp: &TransformClamp) -> ClampOutcome {
        let delta = self.live_zoom_delta.take().unwrap_or(0.0);
        let zoom = self.committed.zoom + delta;
        debug!(delta, zoom, "Pinch committed");
        self.commit(clamp, zoom, self.committed.pan)
    }

    /// Drag update with the gesture's cumulative translation.
    pub fn drag_changed(&mut self, translation: Offset2D) {
        self.live_pan = Some(translation.sanitized() + self.committed.pan);
    }

    /// End the drag: the final translation becomes the committed pan, then
    /// the clamp runs.
    pub fn drag_ended(&mut self, translation: Offset2D, clamp: &TransformClamp) -> ClampOutcome {
        self.live_pan = None;
        let pan = translation.sanitized() + self.committed.pan;
        debug!(pan_x = pan.x, pan_y = pan.y, "Drag committed");
        self.commit(clamp, self.committed.zoom, pan)
    }

    /// Drop every in-flight session and return to the fit.
    pub fn double_tap(&mut self, clamp: &TransformClamp) -> DisplayState {
        self.cancel_all();
        self.committed = clamp.fit();
        debug!("Double-tap reset to fit");
        self.committed
    }

    /// Abandon one session without committing.
    pub fn cancel(&mut self, kind: GestureKind) {
        match kind {
            GestureKind::Pinch => self.live_zoom_delta = None,
            GestureKind::Drag => self.live_pan = None,
        }
    }

    pub fn cancel_all(&mut self) {
        self.cancel(GestureKind::Pinch);
        self.cancel(GestureKind::Drag);
    }

    /// Committed state with live deltas applied, unclamped.
    pub fn live_state(&self, clamp: &TransformClamp) -> DisplayState {
        let zoom = self.committed.zoom + self.live_zoom_delta.unwrap_or(0.0);
        let pan = self.live_pan.unwrap_or(self.committed.pan);
        clamp.state_at(zoom, pan)
    }

    /// Re-run the clamp on the committed state, e.g. after a viewport change.
    /// In-flight sessions are dropped.
    pub fn reclamp(&mut self, clamp: &TransformClamp) -> ClampOutcome {
        self.cancel_all();
        let outcome = clamp.reclamp(&self.committed);
        self.committed = outcome.state();
        outcome
    }

    fn commit(&mut self, clamp: &TransformClamp, zoom: f64, pan: Offset2D) -> ClampOutcome {
        let outcome = clamp.clamp(zoom, pan);
        self.committed = outcome.state();
        outcome
    }
}
