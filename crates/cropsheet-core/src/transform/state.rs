//! The committed display state.

use serde::{Deserialize, Serialize};

use crate::geometry::{Offset2D, Size2D};

/// What the renderer draws: the image at `display_size`, offset by `pan`
/// from the viewport centre.
///
/// A value type. Commits replace it wholesale; nothing mutates one in place.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayState {
    /// Size of the displayed image at the current zoom (points).
    pub display_size: Size2D,
    /// Largest pan magnitude per axis that keeps the cutout covered.
    /// Zero on an axis where the image is narrower than the cutout.
    pub clamp_bounds: Offset2D,
    /// Zoom relative to the fitted size.
    pub zoom: f64,
    /// Offset of the image centre from the viewport centre (points).
    pub pan: Offset2D,
}

impl DisplayState {
    /// Build a state, deriving the clamp bounds from the cutout diameter.
    pub fn new(display_size: Size2D, zoom: f64, pan: Offset2D, cutout_diameter: f64) -> Self {
        Self {
            display_size,
            clamp_bounds: clamp_bounds(display_size, cutout_diameter),
            zoom,
            pan,
        }
    }

    /// True when the image covers `diameter` on both axes.
    pub fn covers(&self, diameter: f64) -> bool {
        self.display_size.width >= diameter && self.display_size.height >= diameter
    }
}

/// `(display.axis - d) / 2` per axis, floored at zero.
pub fn clamp_bounds(display_size: Size2D, cutout_diameter: f64) -> Offset2D {
    Offset2D::new(
        ((display_size.width - cutout_diameter) / 2.0).max(0.0),
        ((display_size.height - cutout_diameter) / 2.0).max(0.0),
    )
}
