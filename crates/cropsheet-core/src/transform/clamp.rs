//! Clamping zoom and pan so the image stays behind the cutout.
//!
//! # Display size at a zoom
//!
//! Which axis is scaled from the cutout depends on the viewport orientation,
//! with the threshold at aspect 1.0 (a square viewport counts as portrait):
//!
//! ```text
//! portrait:  r_img >  r_vp  ->  w = d * z,       h = w / r_img
//!            otherwise      ->  h = vp.h * z,    w = h * r_img
//! landscape: r_img <  r_vp  ->  h = d * z,       w = h * r_img
//!            otherwise      ->  w = vp.w * z,    h = w / r_img
//! ```
//!
//! At zoom 1 this matches the fitted size, so zooming feels the same in
//! either orientation.
//!
//! # Degenerate shrink
//!
//! A pinch can shrink the image below the cutout on both axes. Nothing valid
//! can be cropped from that state, so the clamp answers with the fit-reset
//! state instead and reports [`ClampOutcome::Reset`].

use tracing::{debug, warn};

use super::fit::fit_to_viewport;
use super::state::{clamp_bounds, DisplayState};
use super::viewport::ViewportState;
use crate::config::{CropConfig, DEFAULT_MAX_ZOOM};
use crate::geometry::{AspectRatio, Offset2D, Size2D};

/// Result of clamping a requested zoom and pan.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClampOutcome {
    /// The request was sanitized into a valid state.
    Clamped(DisplayState),
    /// The request was degenerate; the state is the fit-reset state.
    Reset(DisplayState),
}

impl ClampOutcome {
    pub fn state(&self) -> DisplayState {
        match *self {
            ClampOutcome::Clamped(state) | ClampOutcome::Reset(state) => state,
        }
    }

    pub fn was_reset(&self) -> bool {
        matches!(self, ClampOutcome::Reset(_))
    }
}

/// Clamp policy for one image in one viewport.
///
/// Cheap to build; rebuilt whenever the image or the viewport changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformClamp {
    image_aspect: AspectRatio,
    viewport: ViewportState,
    max_zoom: f64,
    edge_slack: f64,
    safe_area_compensation: f64,
}

impl TransformClamp {
    /// Values that would fail [`CropConfig::validate`] are replaced: a
    /// non-finite `max_zoom` by the default, a non-finite or negative slack
    /// by 0, a non-finite compensation by 0.
    pub fn new(image_aspect: AspectRatio, viewport: ViewportState, config: &CropConfig) -> Self {
        let max_zoom = if config.max_zoom.is_finite() {
            config.max_zoom.max(1.0)
        } else {
            DEFAULT_MAX_ZOOM
        };
        let edge_slack = if config.edge_slack.is_finite() {
            config.edge_slack.max(0.0)
        } else {
            0.0
        };
        let safe_area_compensation = if config.safe_area_compensation.is_finite() {
            config.safe_area_compensation
        } else {
            0.0
        };
        Self {
            image_aspect,
            viewport,
            max_zoom,
            edge_slack,
            safe_area_compensation,
        }
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn image_aspect(&self) -> AspectRatio {
        self.image_aspect
    }

    pub fn max_zoom(&self) -> f64 {
        self.max_zoom
    }

    /// The fit-reset state for this image and viewport.
    pub fn fit(&self) -> DisplayState {
        fit_to_viewport(self.image_aspect, &self.viewport)
    }

    /// Displayed image size at `zoom`, without any clamping.
    pub fn display_size_at(&self, zoom: f64) -> Size2D {
        let vp = self.viewport.size();
        let d = self.viewport.cutout_diameter();
        let r = self.image_aspect.value();
        let r_vp = self.viewport.aspect().value();

        if self.viewport.is_portrait() {
            if r > r_vp {
                let w = d * zoom;
                Size2D::new(w, w / r)
            } else {
                let h = vp.height * zoom;
                Size2D::new(h * r, h)
            }
        } else if r < r_vp {
            let h = d * zoom;
            Size2D::new(h * r, h)
        } else {
            let w = vp.width * zoom;
            Size2D::new(w, w / r)
        }
    }

    /// Unclamped state for a live preview.
    pub fn state_at(&self, zoom: f64, pan: Offset2D) -> DisplayState {
        DisplayState::new(
            self.display_size_at(zoom),
            zoom,
            pan,
            self.viewport.cutout_diameter(),
        )
    }

    /// True when `size` falls short of the cutout by more than the margin on
    /// both axes.
    pub fn is_degenerate(&self, size: Size2D) -> bool {
        let limit = self.viewport.cutout_diameter() - self.viewport.inset_margin();
        size.width < limit && size.height < limit
    }

    /// Sanitize a requested zoom and pan into a valid display state.
    ///
    /// Zoom is clamped into `[1, max_zoom]`; pan is clamped per axis to the
    /// clamp bounds, or zeroed on an axis where the image is narrower than
    /// the cutout. Non-finite input is treated as zoom 1 / pan 0.
    pub fn clamp(&self, zoom: f64, pan: Offset2D) -> ClampOutcome {
        let requested_zoom = if zoom.is_finite() { zoom } else { 1.0 };
        let pan = pan.sanitized();

        let requested_size = self.display_size_at(requested_zoom);
        if self.is_degenerate(requested_size) {
            warn!(
                zoom = requested_zoom,
                width = requested_size.width,
                height = requested_size.height,
                "Image shrunk below the cutout, resetting to fit"
            );
            return ClampOutcome::Reset(self.fit());
        }

        let zoom = requested_zoom.clamp(1.0, self.max_zoom);
        let display_size = self.display_size_at(zoom);
        let d = self.viewport.cutout_diameter();
        let bounds = clamp_bounds(display_size, d);
        let slack = self.edge_slack;
        let shift = self.safe_area_compensation;

        let x = if display_size.width >= d {
            pan.x.clamp(-bounds.x - slack, bounds.x + slack)
        } else {
            0.0
        };
        let y = if display_size.height >= d {
            pan.y.clamp(-bounds.y - slack - shift, bounds.y + slack - shift)
        } else {
            0.0
        };

        let state = DisplayState {
            display_size,
            clamp_bounds: bounds,
            zoom,
            pan: Offset2D::new(x, y),
        };
        debug!(
            requested_zoom,
            zoom,
            pan_x = x,
            pan_y = y,
            "Clamped display state"
        );
        ClampOutcome::Clamped(state)
    }

    /// Re-clamp an existing state, e.g. after the viewport changed.
    pub fn reclamp(&self, state: &DisplayState) -> ClampOutcome {
        self.clamp(state.zoom, state.pan)
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================
