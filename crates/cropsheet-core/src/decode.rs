//! Decoding picked image bytes into a [`Bitmap`].
//!
//! Photos from phone cameras are usually stored sideways with an EXIF
//! orientation tag. The tag is applied here, before anything measures the
//! aspect ratio, so the fitter sees the image the way the user does.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};
use tracing::debug;

use crate::bitmap::Bitmap;
use crate::error::{CropError, Result};

/// How a stored image must be turned to appear upright: clockwise quarter
/// turns, then an optional horizontal mirror. Covers all eight EXIF
/// orientation tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    quarter_turns: u8,
    mirrored: bool,
}

impl Orientation {
    pub const UPRIGHT: Orientation = Orientation {
        quarter_turns: 0,
        mirrored: false,
    };

    /// Decode an EXIF orientation tag; unknown values are upright.
    pub fn from_exif(tag: u32) -> Self {
        let (quarter_turns, mirrored) = match tag {
            2 => (0, true),
            3 => (2, false),
            4 => (2, true),
            5 => (1, true),
            6 => (1, false),
            7 => (3, true),
            8 => (3, false),
            _ => (0, false),
        };
        Self {
            quarter_turns,
            mirrored,
        }
    }

    /// The EXIF tag (1-8) this orientation corresponds to.
    pub fn exif_tag(self) -> u8 {
        match (self.quarter_turns, self.mirrored) {
            (0, true) => 2,
            (2, false) => 3,
            (2, true) => 4,
            (1, true) => 5,
            (1, false) => 6,
            (3, true) => 7,
            (3, false) => 8,
            _ => 1,
        }
    }

    /// True when width and height trade places once upright.
    pub fn swaps_axes(self) -> bool {
        self.quarter_turns % 2 == 1
    }

    fn apply(self, img: DynamicImage) -> DynamicImage {
        let turned = match self.quarter_turns {
            1 => img.rotate90(),
            2 => img.rotate180(),
            3 => img.rotate270(),
            _ => img,
        };
        if self.mirrored {
            turned.fliph()
        } else {
            turned
        }
    }
}

/// Decode JPEG or PNG bytes, applying any EXIF orientation.
///
/// # Errors
///
/// `CropError::Decode` if the format is unknown or the data is corrupt.
pub fn decode_image(bytes: &[u8]) -> Result<Bitmap> {
    let orientation = read_orientation(bytes);

    let img = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CropError::Decode(e.to_string()))?
        .decode()
        .map_err(|e| CropError::Decode(e.to_string()))?;

    let oriented = orientation.apply(img);
    let bitmap = Bitmap::from_rgb_image(oriented.into_rgb8());
    debug!(
        width = bitmap.width,
        height = bitmap.height,
        ?orientation,
        "Decoded picked image"
    );
    Ok(bitmap)
}

/// Orientation of the primary image, upright when the tag is absent or
/// unreadable.
pub fn read_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from_exif)
        .unwrap_or_default()
}
