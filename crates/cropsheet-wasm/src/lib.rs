//! Cropsheet WASM - WebAssembly bindings for the crop engine
//!
//! This crate exposes `cropsheet-core` to a JavaScript host, which supplies
//! picked images, draws the sheet and stores confirmed crops.
//!
//! # Module Structure
//!
//! - `sheet` - The interactive crop session
//! - `types` - Bitmap and crop result wrappers
//! - `decode` - Decoding picked image bytes
//!
//! # Usage
//!
//! ```typescript
//! import init, { decode_image, JsCropSheet } from '@cropsheet/wasm';
//!
//! await init();
//!
//! const sheet = new JsCropSheet(width, height);
//! sheet.load_image(decode_image(new Uint8Array(await file.arrayBuffer())));
//! ```

use wasm_bindgen::prelude::*;

mod decode;
mod sheet;
mod types;

pub use decode::{decode_image, exif_orientation};
pub use sheet::JsCropSheet;
pub use types::{JsBitmap, JsCropResult};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Map any displayable error to a JavaScript `Error`.
pub(crate) fn js_error(err: impl std::fmt::Display) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

pub(crate) fn console_warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(message));
}
