//! Image decoding bindings.
//!
//! ```typescript
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const image = decode_image(bytes);
//! sheet.load_image(image);
//! ```

use crate::types::JsBitmap;
use cropsheet_core::decode;
use wasm_bindgen::prelude::*;

/// Decode JPEG or PNG bytes into an RGB bitmap, applying EXIF orientation.
///
/// # Errors
///
/// Returns an error if the format is not recognised or the data is corrupt.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsBitmap, JsValue> {
    decode::decode_image(bytes)
        .map(JsBitmap::from_bitmap)
        .map_err(crate::js_error)
}

/// EXIF orientation tag (1-8) of the image, 1 when absent.
#[wasm_bindgen]
pub fn exif_orientation(bytes: &[u8]) -> u8 {
    decode::read_orientation(bytes).exif_tag()
}
