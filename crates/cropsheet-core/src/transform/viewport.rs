//! Viewport and cutout geometry.
//!
//! The cutout is the square bounding box of the largest circle that fits the
//! viewport, centred in it. The visible crop circle sits inside the cutout,
//! inset by the margin on every side. Only the diameters feed the clamp and
//! projection math; the [`MaskGeometry`] is for the dimming overlay.

use serde::{Deserialize, Serialize};

use crate::config::CutoutShape;
use crate::error::{CropError, Result};
use crate::geometry::{AspectRatio, Rect, Size2D};

/// Viewport size and inset margin for one layout pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    size: Size2D,
    inset_margin: f64,
    aspect: AspectRatio,
}

impl ViewportState {
    /// # Errors
    ///
    /// `CropError::InvalidGeometry` for a zero-sized viewport or a margin that
    /// leaves no room for the crop circle.
    pub fn new(size: Size2D, inset_margin: f64) -> Result<Self> {
        if size.is_empty() {
            return Err(CropError::geometry(format!(
                "viewport {}x{} has no area",
                size.width, size.height
            )));
        }
        if !inset_margin.is_finite() || inset_margin < 0.0 {
            return Err(CropError::geometry(format!(
                "inset margin {inset_margin} is not a non-negative number"
            )));
        }
        if size.min_side() <= inset_margin * 2.0 {
            return Err(CropError::geometry(format!(
                "inset margin {inset_margin} leaves no room in a {}x{} viewport",
                size.width, size.height
            )));
        }
        Ok(Self {
            size,
            inset_margin,
            aspect: AspectRatio::of(size)?,
        })
    }

    #[inline]
    pub fn size(&self) -> Size2D {
        self.size
    }

    #[inline]
    pub fn inset_margin(&self) -> f64 {
        self.inset_margin
    }

    #[inline]
    pub fn aspect(&self) -> AspectRatio {
        self.aspect
    }

    /// Portrait includes the square case.
    #[inline]
    pub fn is_portrait(&self) -> bool {
        self.aspect.value() <= 1.0
    }

    /// Side of the cutout bounding box: the shorter viewport dimension.
    #[inline]
    pub fn cutout_diameter(&self) -> f64 {
        self.size.min_side()
    }

    /// Diameter of the visible crop shape, inside the margin.
    #[inline]
    pub fn crop_diameter(&self) -> f64 {
        self.cutout_diameter() - 2.0 * self.inset_margin
    }

    /// Cutout bounding box, centred in the viewport.
    pub fn cutout_bounds(&self) -> Rect {
        let d = self.cutout_diameter();
        Rect::new(
            (self.size.width - d) / 2.0,
            (self.size.height - d) / 2.0,
            d,
            d,
        )
    }

    /// Bounding box of the visible crop shape.
    pub fn crop_bounds(&self) -> Rect {
        let cutout = self.cutout_bounds();
        let m = self.inset_margin;
        Rect::new(cutout.x + m, cutout.y + m, cutout.width - 2.0 * m, cutout.height - 2.0 * m)
    }
}

/// Largest coverage mask `render_alpha` will allocate (64 megapixels).
pub const MAX_MASK_PIXELS: u64 = 1 << 26;

/// Safe-area insets of the host window, in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SafeAreaInsets {
    pub top: f64,
    pub leading: f64,
    pub bottom: f64,
    pub trailing: f64,
}

/// Dimming overlay: the full window rectangle with the cutout shape removed
/// under even-odd fill.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskGeometry {
    outer: Rect,
    hole: Rect,
    shape: CutoutShape,
}

impl MaskGeometry {
    pub fn new(viewport: &ViewportState, shape: CutoutShape, insets: SafeAreaInsets) -> Self {
        let size = viewport.size();
        let m = viewport.inset_margin();
        let total_w = size.width + insets.leading + insets.trailing;
        let total_h = size.height + insets.top + insets.bottom;
        let h_diff = insets.leading - insets.trailing;
        let v_diff = insets.top - insets.bottom;

        // The hole is the largest square centred in the inset frame
        let frame = Rect::new(
            m + h_diff,
            m + v_diff,
            total_w - 2.0 * m - h_diff,
            total_h - 2.0 * m - v_diff,
        );
        let side = frame.width.min(frame.height).max(0.0);
        let center = frame.center();

        Self {
            outer: Rect::new(0.0, 0.0, total_w, total_h),
            hole: Rect::new(center.x - side / 2.0, center.y - side / 2.0, side, side),
            shape,
        }
    }

    /// The full overlay rectangle.
    pub fn outer(&self) -> Rect {
        self.outer
    }

    /// Bounding box of the undimmed hole.
    pub fn hole(&self) -> Rect {
        self.hole
    }

    fn hole_contains(&self, x: f64, y: f64) -> bool {
        match self.shape {
            CutoutShape::Square => self.hole.contains(x, y),
            CutoutShape::Circle => {
                let c = self.hole.center();
                let r = self.hole.width / 2.0;
                let (dx, dy) = (x - c.x, y - c.y);
                dx * dx + dy * dy < r * r
            }
        }
    }

    /// Even-odd fill test: inside the outer rectangle and outside the hole.
    pub fn is_dimmed(&self, x: f64, y: f64) -> bool {
        let crossings = self.outer.contains(x, y) as u8 + self.hole_contains(x, y) as u8;
        crossings % 2 == 1
    }

    /// Rasterise the overlay into an 8-bit coverage mask, 255 where dimmed.
    /// `scale` is the number of pixels per point.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidGeometry` if `scale` is not a positive finite
    /// number or the mask would exceed [`MAX_MASK_PIXELS`].
    pub fn render_alpha(&self, scale: f64) -> Result<image::GrayImage> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(CropError::geometry(format!(
                "mask scale {scale} is not a positive number"
            )));
        }
        let width = (self.outer.width * scale).ceil().max(0.0);
        let height = (self.outer.height * scale).ceil().max(0.0);
        let pixels = width * height;
        if !pixels.is_finite() || pixels > MAX_MASK_PIXELS as f64 {
            return Err(CropError::geometry(format!(
                "{width}x{height} mask exceeds {MAX_MASK_PIXELS} pixels"
            )));
        }

        Ok(image::GrayImage::from_fn(width as u32, height as u32, |px, py| {
            let x = (px as f64 + 0.5) / scale;
            let y = (py as f64 + 0.5) / scale;
            image::Luma([if self.is_dimmed(x, y) { 255 } else { 0 }])
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(w: f64, h: f64) -> ViewportState {
        ViewportState::new(Size2D::new(w, h), 15.0).unwrap()
    }

    #[test]
    fn test_cutout_diameter_is_short_side() {
        let vp = viewport(400.0, 800.0);
        assert_eq!(vp.cutout_diameter(), 400.0);
        assert_eq!(vp.crop_diameter(), 370.0);
        assert!(vp.is_portrait());

        let vp = viewport(800.0, 400.0);
        assert_eq!(vp.cutout_diameter(), 400.0);
        assert!(!vp.is_portrait());
    }

    #[test]
    fn test_cutout_centered() {
        let vp = viewport(400.0, 800.0);
        assert_eq!(vp.cutout_bounds(), Rect::new(0.0, 200.0, 400.0, 400.0));
        assert_eq!(vp.crop_bounds(), Rect::new(15.0, 215.0, 370.0, 370.0));
    }

    #[test]
    fn test_zero_viewport_rejected() {
        assert!(matches!(
            ViewportState::new(Size2D::new(0.0, 800.0), 15.0),
            Err(CropError::InvalidGeometry { .. })
        ));
    }

    #[test]
    fn test_margin_too_large_rejected() {
        assert!(ViewportState::new(Size2D::new(30.0, 800.0), 15.0).is_err());
        assert!(ViewportState::new(Size2D::new(31.0, 800.0), 15.0).is_ok());
    }

    #[test]
    fn test_mask_even_odd() {
        let vp = viewport(400.0, 800.0);
        let mask = MaskGeometry::new(&vp, CutoutShape::Circle, SafeAreaInsets::default());

        // Centre of the viewport is inside the hole
        assert!(!mask.is_dimmed(200.0, 400.0));
        // Corner of the viewport is dimmed
        assert!(mask.is_dimmed(2.0, 2.0));
        // Corner of the hole's bounding box is outside the circle
        assert!(mask.is_dimmed(16.0, 216.0));
        // Outside the overlay entirely
        assert!(!mask.is_dimmed(-5.0, 400.0));
    }

    #[test]
    fn test_mask_square_hole() {
        let vp = viewport(400.0, 800.0);
        let mask = MaskGeometry::new(&vp, CutoutShape::Square, SafeAreaInsets::default());
        assert_eq!(mask.hole(), Rect::new(15.0, 215.0, 370.0, 370.0));
        assert!(!mask.is_dimmed(16.0, 216.0));
    }

    #[test]
    fn test_mask_with_safe_area() {
        let vp = viewport(400.0, 800.0);
        let insets = SafeAreaInsets {
            top: 40.0,
            bottom: 20.0,
            ..Default::default()
        };
        let mask = MaskGeometry::new(&vp, CutoutShape::Circle, insets);
        assert_eq!(mask.outer(), Rect::new(0.0, 0.0, 400.0, 860.0));
        // Hole shifts down by the top/bottom difference
        assert!(mask.hole().center().y > 400.0);
    }

    #[test]
    fn test_render_alpha() {
        let vp = viewport(100.0, 100.0);
        let mask = MaskGeometry::new(&vp, CutoutShape::Circle, SafeAreaInsets::default());
        let alpha = mask.render_alpha(1.0).unwrap();
        assert_eq!(alpha.dimensions(), (100, 100));
        assert_eq!(alpha.get_pixel(0, 0).0, [255]);
        assert_eq!(alpha.get_pixel(50, 50).0, [0]);

        let doubled = mask.render_alpha(2.0).unwrap();
        assert_eq!(doubled.dimensions(), (200, 200));
    }

    #[test]
    fn test_render_alpha_rejects_bad_scale() {
        let vp = viewport(400.0, 800.0);
        let mask = MaskGeometry::new(&vp, CutoutShape::Circle, SafeAreaInsets::default());
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                mask.render_alpha(scale),
                Err(CropError::InvalidGeometry { .. })
            ));
        }
    }

    #[test]
    fn test_render_alpha_rejects_oversized_mask() {
        let vp = viewport(400.0, 800.0);
        let mask = MaskGeometry::new(&vp, CutoutShape::Circle, SafeAreaInsets::default());
        assert!(mask.render_alpha(1.0e7).is_err());

        let huge_insets = SafeAreaInsets {
            bottom: 1.0e12,
            ..Default::default()
        };
        let tall = MaskGeometry::new(&vp, CutoutShape::Circle, huge_insets);
        assert!(tall.render_alpha(1.0).is_err());
    }
}
