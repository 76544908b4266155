//! Error types for the crop engine.

use thiserror::Error;

/// Errors surfaced by the crop engine.
///
/// Geometry and clamp code sanitizes its inputs wherever a valid fallback
/// exists, so only precondition violations and the terminal crop step ever
/// produce one of these.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CropError {
    /// A non-positive aspect ratio or a zero-sized viewport.
    #[error("Invalid geometry: {reason}")]
    InvalidGeometry { reason: String },

    /// The projected crop rectangle is empty or entirely outside the source.
    #[error(
        "Invalid crop rectangle ({x:.2}, {y:.2}, side {side:.2}) for {image_width}x{image_height} image"
    )]
    InvalidCropRectangle {
        x: f64,
        y: f64,
        side: f64,
        image_width: u32,
        image_height: u32,
    },

    /// A configuration value is out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Confirm was requested before any image was loaded.
    #[error("No image loaded")]
    NoImage,

    /// Picked image bytes could not be decoded.
    #[error("Failed to decode image: {0}")]
    Decode(String),
}

impl CropError {
    pub(crate) fn geometry(reason: impl Into<String>) -> Self {
        CropError::InvalidGeometry {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, CropError>;
