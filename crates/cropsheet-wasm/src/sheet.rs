//! Crop sheet bindings.
//!
//! The JavaScript host plays the picker, the renderer and the persistence
//! layer: it feeds layout passes and gesture events in, draws whatever the
//! live getters report, and stores the `JsCropResult` from `confirm`.
//!
//! # Example (TypeScript)
//! ```typescript
//! const sheet = new JsCropSheet(window.innerWidth, window.innerHeight);
//! sheet.load_image(decode_image(bytes));
//!
//! // pointer handlers
//! sheet.pinch_changed(event.scale);
//! sheet.pinch_ended();
//!
//! const result = sheet.confirm();
//! localStorage.setItem('crop', JSON.stringify(result.transform()));
//! ```

use cropsheet_core::{
    ClampOutcome, CropConfig, CropSheet, DisplayState, GestureKind, Offset2D, SafeAreaInsets,
    SavedTransform, Size2D,
};
use wasm_bindgen::prelude::*;

use crate::types::{JsBitmap, JsCropResult};

/// Interactive crop session for one viewport.
#[wasm_bindgen]
pub struct JsCropSheet {
    inner: CropSheet,
}

#[wasm_bindgen]
impl JsCropSheet {
    /// Create a sheet with the default configuration.
    ///
    /// # Errors
    /// Returns an error if the viewport is too small to hold a cutout.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64) -> Result<JsCropSheet, JsValue> {
        CropSheet::new(CropConfig::default(), Size2D::new(width, height))
            .map(Self::from_sheet)
            .map_err(crate::js_error)
    }

    /// Create a sheet from a partial config object, e.g. `{ max_zoom: 6 }`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be deserialized or is out of
    /// range, or if the viewport is too small.
    pub fn with_config(config: JsValue, width: f64, height: f64) -> Result<JsCropSheet, JsValue> {
        let config: CropConfig = serde_wasm_bindgen::from_value(config)
            .map_err(|e| crate::js_error(format!("Invalid crop config: {e}")))?;
        CropSheet::new(config, Size2D::new(width, height))
            .map(Self::from_sheet)
            .map_err(crate::js_error)
    }

    /// New layout pass. Returns `true` when the committed state had to be
    /// reset to the fit.
    ///
    /// # Errors
    /// Returns an error if the new size is unusable; the sheet is unchanged.
    pub fn set_viewport(&mut self, width: f64, height: f64) -> Result<bool, JsValue> {
        self.inner
            .set_viewport(Size2D::new(width, height))
            .map(|outcome| was_reset(outcome.as_ref()))
            .map_err(crate::js_error)
    }

    /// Picker completion. `undefined` (cancelled) keeps the current image.
    /// Returns `true` if an image was loaded.
    ///
    /// # Errors
    /// Returns an error if the bitmap has no pixels.
    pub fn load_image(&mut self, image: Option<JsBitmap>) -> Result<bool, JsValue> {
        self.inner
            .on_image_picked(image.map(JsBitmap::into_bitmap))
            .map(|state| state.is_some())
            .map_err(crate::js_error)
    }

    /// Reopen a confirmed crop from its original bitmap and the object
    /// returned by `JsCropResult.transform()`. Returns `true` when the saved
    /// state no longer fit and the sheet fell back to the fit.
    ///
    /// # Errors
    /// Returns an error if `transform` cannot be deserialized or the bitmap
    /// has no pixels.
    pub fn restore(&mut self, image: JsBitmap, transform: JsValue) -> Result<bool, JsValue> {
        let saved: SavedTransform = serde_wasm_bindgen::from_value(transform)
            .map_err(|e| crate::js_error(format!("Invalid saved transform: {e}")))?;
        self.inner
            .restore_parts(image.into_bitmap(), saved)
            .map(|outcome| outcome.was_reset())
            .map_err(crate::js_error)
    }

    #[wasm_bindgen(getter)]
    pub fn has_image(&self) -> bool {
        self.inner.has_image()
    }

    pub fn pinch_began(&mut self) {
        self.inner.begin_gesture(GestureKind::Pinch);
    }

    /// `scale` is the gesture's cumulative scale, 1.0 at the start.
    pub fn pinch_changed(&mut self, scale: f64) {
        self.inner.pinch_changed(scale);
    }

    /// Returns `true` if the pinch shrank the image too far and the sheet
    /// reset to the fit.
    pub fn pinch_ended(&mut self) -> bool {
        let outcome = self.inner.pinch_ended();
        was_reset(outcome.as_ref())
    }

    pub fn drag_began(&mut self) {
        self.inner.begin_gesture(GestureKind::Drag);
    }

    /// Cumulative translation since the drag began, in points.
    pub fn drag_changed(&mut self, dx: f64, dy: f64) {
        self.inner.drag_changed(Offset2D::new(dx, dy));
    }

    pub fn drag_ended(&mut self, dx: f64, dy: f64) -> bool {
        let outcome = self.inner.drag_ended(Offset2D::new(dx, dy));
        was_reset(outcome.as_ref())
    }

    /// Drop in-flight gestures without committing them.
    pub fn cancel_gestures(&mut self) {
        self.inner.cancel_gestures();
    }

    pub fn double_tap(&mut self) {
        self.inner.reset_to_fit();
    }

    /// Live zoom for drawing; `undefined` before an image is loaded.
    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> Option<f64> {
        self.live().map(|s| s.zoom)
    }

    #[wasm_bindgen(getter)]
    pub fn pan_x(&self) -> Option<f64> {
        self.live().map(|s| s.pan.x)
    }

    #[wasm_bindgen(getter)]
    pub fn pan_y(&self) -> Option<f64> {
        self.live().map(|s| s.pan.y)
    }

    #[wasm_bindgen(getter)]
    pub fn display_width(&self) -> Option<f64> {
        self.live().map(|s| s.display_size.width)
    }

    #[wasm_bindgen(getter)]
    pub fn display_height(&self) -> Option<f64> {
        self.live().map(|s| s.display_size.height)
    }

    #[wasm_bindgen(getter)]
    pub fn cutout_diameter(&self) -> f64 {
        self.inner.viewport().cutout_diameter()
    }

    #[wasm_bindgen(getter)]
    pub fn crop_diameter(&self) -> f64 {
        self.inner.viewport().crop_diameter()
    }

    /// Whether the overlay dims the point `(x, y)`, with no safe-area insets.
    pub fn is_dimmed(&self, x: f64, y: f64) -> bool {
        self.inner.mask(SafeAreaInsets::default()).is_dimmed(x, y)
    }

    /// Overlay coverage mask, one byte per pixel, 255 where dimmed.
    /// `insets` is an optional `{top, leading, bottom, trailing}` object.
    ///
    /// # Errors
    /// Returns an error if `insets` cannot be deserialized, `scale` is not
    /// positive, or the mask would be too large to allocate.
    pub fn mask_alpha(&self, scale: f64, insets: JsValue) -> Result<Vec<u8>, JsValue> {
        let insets = if insets.is_undefined() || insets.is_null() {
            SafeAreaInsets::default()
        } else {
            serde_wasm_bindgen::from_value(insets)
                .map_err(|e| crate::js_error(format!("Invalid safe-area insets: {e}")))?
        };
        self.inner
            .mask(insets)
            .render_alpha(scale)
            .map(|alpha| alpha.into_raw())
            .map_err(crate::js_error)
    }

    /// `[x, y, width, height]` of the committed crop in source pixels.
    ///
    /// # Errors
    /// Returns an error if no image is loaded or the crop is invalid.
    pub fn crop_rect(&self) -> Result<Vec<u32>, JsValue> {
        self.inner
            .crop_rect()
            .map(|r| vec![r.x, r.y, r.width, r.height])
            .map_err(crate::js_error)
    }

    /// Crop the committed state.
    ///
    /// # Errors
    /// Returns an error if no image is loaded or the crop is invalid; the
    /// host should keep its previous result.
    pub fn confirm(&self) -> Result<JsCropResult, JsValue> {
        self.inner
            .confirm()
            .map(JsCropResult::from_attributes)
            .map_err(|e| {
                crate::console_warn(&format!("Crop not confirmed: {e}"));
                crate::js_error(e)
            })
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsCropSheet {
    pub(crate) fn from_sheet(inner: CropSheet) -> Self {
        Self { inner }
    }

    fn live(&self) -> Option<DisplayState> {
        self.inner.live_state()
    }
}

fn was_reset(outcome: Option<&ClampOutcome>) -> bool {
    outcome.is_some_and(ClampOutcome::was_reset)
}
