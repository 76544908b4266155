//! Projecting the on-screen crop circle back into source pixels.
//!
//! The displayed image spans `display_size` points and is centred on the
//! viewport centre plus `pan`. The crop square is the cutout bounding box
//! shrunk by the inset margin. With `s = image.width / display.width`:
//!
//! ```text
//! side     = (vp_min - 2 * margin) * s
//! origin_x = ((display.w - vp_min) / 2 + margin - pan.x) * s
//! origin_y = ((display.h - vp_min) / 2 + margin - pan.y) * s
//! ```
//!
//! The clamp keeps this rectangle inside the image on every axis the image
//! covers. On an axis it cannot cover (a wide photo in a tall viewport at
//! zoom 1) the rectangle overhangs, and only the part over the image is kept.
//! A rectangle with no area over the image is an error: the upstream clamp
//! failed and cropping would silently produce the wrong picture.

use tracing::{debug, warn};

use super::state::DisplayState;
use super::viewport::ViewportState;
use crate::bitmap::Bitmap;
use crate::error::{CropError, Result};
use crate::geometry::PixelRect;

/// The crop square in source-pixel space, before snapping to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropProjection {
    /// Source pixels per displayed point.
    pub pixel_scale: f64,
    pub x: f64,
    pub y: f64,
    pub side: f64,
}

impl CropProjection {
    /// Compute the projection for an image of `image_width` pixels.
    pub fn new(state: &DisplayState, viewport: &ViewportState, image_width: u32) -> Self {
        let pixel_scale = image_width as f64 / state.display_size.width;
        let vp_min = viewport.cutout_diameter();
        let margin = viewport.inset_margin();

        Self {
            pixel_scale,
            x: ((state.display_size.width - vp_min) / 2.0 + margin - state.pan.x) * pixel_scale,
            y: ((state.display_size.height - vp_min) / 2.0 + margin - state.pan.y) * pixel_scale,
            side: viewport.crop_diameter() * pixel_scale,
        }
    }

    fn invalid(&self, image_width: u32, image_height: u32) -> CropError {
        CropError::InvalidCropRectangle {
            x: self.x,
            y: self.y,
            side: self.side,
            image_width,
            image_height,
        }
    }

    /// Snap to whole pixels and intersect with the image bounds.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidCropRectangle` if any value is non-finite, the side
    /// rounds to zero, or nothing of the square lies over the image.
    pub fn to_pixels(&self, image_width: u32, image_height: u32) -> Result<PixelRect> {
        let finite = [self.pixel_scale, self.x, self.y, self.side]
            .iter()
            .all(|v| v.is_finite());
        let side = self.side.round();
        if !finite || side < 1.0 {
            return Err(self.invalid(image_width, image_height));
        }

        let left = self.x.round();
        let top = self.y.round();
        let right = (left + side).min(image_width as f64);
        let bottom = (top + side).min(image_height as f64);
        let left = left.max(0.0);
        let top = top.max(0.0);

        if right <= left || bottom <= top {
            return Err(self.invalid(image_width, image_height));
        }

        Ok(PixelRect {
            x: left as u32,
            y: top as u32,
            width: (right - left) as u32,
            height: (bottom - top) as u32,
        })
    }
}

/// Pixel rectangle of `image` visible in the crop shape.
///
/// # Errors
///
/// See [`CropProjection::to_pixels`].
pub fn crop_rect(state: &DisplayState, viewport: &ViewportState, image: &Bitmap) -> Result<PixelRect> {
    let projection = CropProjection::new(state, viewport, image.width);
    let rect = projection.to_pixels(image.width, image.height);
    match &rect {
        Ok(rect) => debug!(
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            scale = projection.pixel_scale,
            "Projected crop rectangle"
        ),
        Err(e) => warn!(error = %e, "Crop rectangle rejected"),
    }
    rect
}

/// Crop `image` to what is visible in the crop shape.
///
/// # Errors
///
/// See [`CropProjection::to_pixels`].
pub fn crop(image: &Bitmap, state: &DisplayState, viewport: &ViewportState) -> Result<Bitmap> {
    let rect = crop_rect(state, viewport, image)?;
    Ok(image.extract(rect))
}
