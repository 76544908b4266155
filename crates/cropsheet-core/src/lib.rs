//! Cropsheet Core - circular crop engine
//!
//! This crate fits a picked image behind a circular (or square) cutout,
//! tracks pinch and drag gestures while keeping the cutout covered, and
//! projects the result back into source pixels to produce a square crop.
//!
//! [`CropSheet`] ties the pieces together; the [`transform`] module holds the
//! pure geometry it is built from.

pub mod attributes;
pub mod bitmap;
pub mod config;
pub mod decode;
pub mod error;
pub mod geometry;
pub mod gesture;
pub mod session;
pub mod source;
pub mod transform;

pub use attributes::{ImageAttributes, SavedTransform};
pub use bitmap::Bitmap;
pub use config::{CropConfig, CutoutShape};
pub use decode::decode_image;
pub use error::{CropError, Result};
pub use geometry::{AspectRatio, Offset2D, PixelRect, Rect, Size2D};
pub use gesture::{GestureAccumulator, GestureKind};
pub use session::CropSheet;
pub use source::{request_image, ImageSource, PickCallback};
pub use transform::{ClampOutcome, DisplayState, MaskGeometry, SafeAreaInsets, ViewportState};
