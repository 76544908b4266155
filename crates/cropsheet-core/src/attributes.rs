//! The record handed back to the caller on confirm.

use serde::{Deserialize, Serialize};

use crate::bitmap::Bitmap;
use crate::geometry::Offset2D;

/// Zoom and pan at confirm time; everything needed to reopen the sheet
/// where the user left it, apart from the bitmaps.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavedTransform {
    pub zoom: f64,
    pub pan_x: f64,
    pub pan_y: f64,
}

impl SavedTransform {
    pub fn pan(&self) -> Offset2D {
        Offset2D::new(self.pan_x, self.pan_y)
    }
}

impl Default for SavedTransform {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Result of a confirmed crop. Replaced, never edited, by the next confirm.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageAttributes {
    original_image: Bitmap,
    cropped_image: Bitmap,
    transform: SavedTransform,
}

impl ImageAttributes {
    pub fn new(original_image: Bitmap, cropped_image: Bitmap, transform: SavedTransform) -> Self {
        Self {
            original_image,
            cropped_image,
            transform,
        }
    }

    pub fn original_image(&self) -> &Bitmap {
        &self.original_image
    }

    pub fn cropped_image(&self) -> &Bitmap {
        &self.cropped_image
    }

    pub fn transform(&self) -> SavedTransform {
        self.transform
    }

    /// Committed zoom at confirm time.
    pub fn scale(&self) -> f64 {
        self.transform.zoom
    }

    pub fn pan_offset(&self) -> Offset2D {
        self.transform.pan()
    }

    /// Split into `(original, cropped, transform)`.
    pub fn into_parts(self) -> (Bitmap, Bitmap, SavedTransform) {
        (self.original_image, self.cropped_image, self.transform)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_saved_transform_json() {
        let saved = SavedTransform {
            zoom: 2.25,
            pan_x: -40.0,
            pan_y: 12.5,
        };
        let json = serde_json::to_string(&saved).unwrap();
        assert_eq!(json, r#"{"zoom":2.25,"pan_x":-40.0,"pan_y":12.5}"#);
        let back: SavedTransform = serde_json::from_str(&json).unwrap();
        assert_eq!(back, saved);
    }

    #[test]
    fn test_attributes_accessors() {
        let original = Bitmap::filled(4, 4, [1, 2, 3]);
        let cropped = Bitmap::filled(2, 2, [1, 2, 3]);
        let attrs = ImageAttributes::new(
            original.clone(),
            cropped,
            SavedTransform {
                zoom: 1.5,
                pan_x: 3.0,
                pan_y: -4.0,
            },
        );
        assert_eq!(attrs.scale(), 1.5);
        assert_eq!(attrs.pan_offset(), Offset2D::new(3.0, -4.0));
        assert_eq!(attrs.original_image(), &original);
        assert_eq!(attrs.cropped_image().width, 2);

        let (orig, _, transform) = attrs.into_parts();
        assert_eq!(orig, original);
        assert_eq!(transform.zoom, 1.5);
    }
}
