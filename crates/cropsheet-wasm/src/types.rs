//! JavaScript-facing wrappers for bitmaps and confirmed crops.

use cropsheet_core::{Bitmap, ImageAttributes};
use wasm_bindgen::prelude::*;

/// An RGB bitmap held in WASM memory.
///
/// `pixels()` copies the buffer out to a `Uint8Array`; keep the bitmap on
/// the WASM side when it only needs to be passed back in.
#[wasm_bindgen]
#[derive(Clone)]
pub struct JsBitmap {
    inner: Bitmap,
}

#[wasm_bindgen]
impl JsBitmap {
    /// Wrap RGB pixel data (3 bytes per pixel, row-major).
    ///
    /// # Errors
    /// Returns an error if the buffer length is not `width * height * 3`.
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsBitmap, JsValue> {
        let expected = width as usize * height as usize * 3;
        if pixels.len() != expected {
            return Err(crate::js_error(format!(
                "Expected {expected} bytes for a {width}x{height} bitmap, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            inner: Bitmap::new(width, height, pixels),
        })
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// Copy of the RGB pixel data.
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }

    /// Explicitly free WASM memory.
    ///
    /// Optional; wasm-bindgen's finalizer handles cleanup otherwise.
    pub fn free(self) {}
}

impl JsBitmap {
    pub(crate) fn from_bitmap(inner: Bitmap) -> Self {
        Self { inner }
    }

    pub(crate) fn into_bitmap(self) -> Bitmap {
        self.inner
    }
}

/// Result of a confirmed crop.
///
/// Holds the original and cropped bitmaps plus the zoom and pan needed to
/// reopen the sheet where the user left it.
#[wasm_bindgen]
pub struct JsCropResult {
    inner: ImageAttributes,
}

#[wasm_bindgen]
impl JsCropResult {
    /// The square crop.
    pub fn cropped(&self) -> JsBitmap {
        JsBitmap::from_bitmap(self.inner.cropped_image().clone())
    }

    /// The full image the crop was taken from.
    pub fn original(&self) -> JsBitmap {
        JsBitmap::from_bitmap(self.inner.original_image().clone())
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.scale()
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> f64 {
        self.inner.pan_offset().x
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> f64 {
        self.inner.pan_offset().y
    }

    /// `{zoom, pan_x, pan_y}` as a plain object, ready to persist and pass
    /// back to `JsCropSheet.restore`.
    ///
    /// # Errors
    /// Returns an error if serialization fails.
    pub fn transform(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.inner.transform()).map_err(crate::js_error)
    }
}

impl JsCropResult {
    pub(crate) fn from_attributes(inner: ImageAttributes) -> Self {
        Self { inner }
    }
}
