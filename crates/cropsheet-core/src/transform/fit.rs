//! Fitting an image to the viewport.
//!
//! The image is scaled uniformly so that its limiting axis matches the
//! viewport: a relatively wider image matches the viewport width, a taller
//! one matches the viewport height. The same fit, with zoom 1 and no pan, is
//! the reset state used on load, on double-tap and after a degenerate shrink.

use tracing::debug;

use super::state::DisplayState;
use super::viewport::ViewportState;
use crate::error::{CropError, Result};
use crate::geometry::{AspectRatio, Offset2D, Size2D};

/// Fitted display size of an image in a viewport.
///
/// Width is matched when `image_aspect >= viewport_aspect`, height otherwise.
///
/// # Errors
///
/// `CropError::InvalidGeometry` if the viewport has no area.
pub fn fit_display_size(image_aspect: AspectRatio, viewport: Size2D) -> Result<Size2D> {
    if viewport.is_empty() {
        return Err(CropError::geometry(format!(
            "cannot fit into a {}x{} viewport",
            viewport.width, viewport.height
        )));
    }
    let viewport_aspect = AspectRatio::of(viewport)?;
    Ok(fitted(image_aspect, viewport, viewport_aspect))
}

fn fitted(image_aspect: AspectRatio, viewport: Size2D, viewport_aspect: AspectRatio) -> Size2D {
    let r = image_aspect.value();
    if image_aspect >= viewport_aspect {
        Size2D::new(viewport.width, viewport.width / r)
    } else {
        Size2D::new(viewport.height * r, viewport.height)
    }
}

/// The "fit to screen" state: fitted size, zoom 1, pan centred.
pub fn fit_to_viewport(image_aspect: AspectRatio, viewport: &ViewportState) -> DisplayState {
    let display_size = fitted(image_aspect, viewport.size(), viewport.aspect());
    debug!(
        width = display_size.width,
        height = display_size.height,
        "Fitted image to viewport"
    );
    DisplayState::new(display_size, 1.0, Offset2D::ZERO, viewport.cutout_diameter())
}
