//! Plain geometry value types shared by every stage of the engine.
//!
//! All on-screen quantities are in layout points (`f64`); only
//! [`PixelRect`] is expressed in source-image pixels.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

/// A width/height pair. Components are never negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size2D {
    pub width: f64,
    pub height: f64,
}

impl Size2D {
    /// Create a size, flooring negative components at zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// The shorter of the two sides.
    #[inline]
    pub fn min_side(&self) -> f64 {
        self.width.min(self.height)
    }

    /// True when either side is zero or not a finite number.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }

    /// Uniformly scale both sides.
    #[inline]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// A signed two-dimensional offset (pan position, gesture translation).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Offset2D {
    pub x: f64,
    pub y: f64,
}

impl Offset2D {
    pub const ZERO: Offset2D = Offset2D { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Replace non-finite components with zero.
    pub fn sanitized(self) -> Self {
        let fix = |v: f64| if v.is_finite() { v } else { 0.0 };
        Self::new(fix(self.x), fix(self.y))
    }
}

impl std::ops::Add for Offset2D {
    type Output = Offset2D;

    fn add(self, rhs: Offset2D) -> Offset2D {
        Offset2D::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// Width divided by height. Always finite and strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct AspectRatio(f64);

impl AspectRatio {
    /// Wrap a raw ratio.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidGeometry` if the ratio is not finite or not positive.
    pub fn new(ratio: f64) -> Result<Self> {
        if ratio.is_finite() && ratio > 0.0 {
            Ok(Self(ratio))
        } else {
            Err(CropError::geometry(format!("aspect ratio {ratio} is not positive")))
        }
    }

    /// Ratio of a size. Fails when the height is zero.
    pub fn of(size: Size2D) -> Result<Self> {
        if size.height <= 0.0 {
            return Err(CropError::geometry("height is zero"));
        }
        Self::new(size.width / size.height)
    }

    /// Ratio of integer pixel dimensions.
    pub fn of_pixels(width: u32, height: u32) -> Result<Self> {
        Self::of(Size2D::new(width as f64, height as f64))
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

/// An axis-aligned rectangle in layout points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> Offset2D {
        Offset2D::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Half-open containment test (`[x, x + width)`).
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// An integer rectangle in source-image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}
