//! Owned RGB pixel buffers.

use crate::error::{CropError, Result};
use crate::geometry::PixelRect;

/// An RGB image held in memory, 3 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// RGB pixel data. Length is `width * height * 3`.
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap from dimensions and pixel data.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(
            pixels.len(),
            width as usize * height as usize * 3,
            "Pixel buffer size mismatch"
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// A bitmap filled with a single colour.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixels = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }

    /// Convert to an `image::RgbImage`. `None` if the buffer length is wrong.
    pub fn to_rgb_image(&self) -> Option<image::RgbImage> {
        image::RgbImage::from_raw(self.width, self.height, self.pixels.clone())
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    /// Check that the bitmap has pixels and that the buffer matches the
    /// dimensions.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidGeometry` for an empty bitmap or a buffer whose
    /// length is not `width * height * 3`.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(CropError::geometry(format!(
                "{}x{} bitmap has no pixels",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * 3;
        if self.pixels.len() != expected {
            return Err(CropError::geometry(format!(
                "{}x{} bitmap holds {} bytes, expected {expected}",
                self.width,
                self.height,
                self.pixels.len()
            )));
        }
        Ok(())
    }

    /// RGB value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 3;
        let px = self.pixels.get(idx..idx + 3)?;
        Some([px[0], px[1], px[2]])
    }

    /// Copy out a pixel rectangle.
    ///
    /// The rectangle is clipped to the image; callers are expected to pass a
    /// rectangle already inside the bounds. Rows missing from a short buffer
    /// come out black.
    pub fn extract(&self, rect: PixelRect) -> Bitmap {
        let left = rect.x.min(self.width);
        let top = rect.y.min(self.height);
        let right = rect.x.saturating_add(rect.width).min(self.width);
        let bottom = rect.y.saturating_add(rect.height).min(self.height);
        let out_width = right - left;
        let out_height = bottom - top;

        let row_bytes = out_width as usize * 3;
        let mut output = Vec::with_capacity(row_bytes * out_height as usize);

        // Whole rows are contiguous in the source, so copy a slice per row
        for y in top..bottom {
            let start = (y as usize * self.width as usize + left as usize) * 3;
            match self.pixels.get(start..start + row_bytes) {
                Some(row) => output.extend_from_slice(row),
                None => output.resize(output.len() + row_bytes, 0),
            }
        }

        Bitmap {
            width: out_width,
            height: out_height,
            pixels: output,
        }
    }
}
