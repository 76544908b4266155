//! Engine configuration.
//!
//! Every field has a default, so hosts only pass what they want to change;
//! a JSON object such as `{"max_zoom": 6.0}` is a complete configuration.

use serde::{Deserialize, Serialize};

use crate::error::{CropError, Result};

/// Padding between the viewport edge and the crop cutout, in points.
pub const DEFAULT_INSET_MARGIN: f64 = 15.0;

/// Largest zoom factor a pinch may commit.
pub const DEFAULT_MAX_ZOOM: f64 = 4.0;

/// Shape of the visible cutout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutoutShape {
    #[default]
    Circle,
    Square,
}

/// Tunable constants for fitting, clamping and cropping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    /// Padding between the viewport edge and the crop cutout (points).
    pub inset_margin: f64,
    /// Upper zoom limit; the lower limit is always 1.0.
    pub max_zoom: f64,
    /// Cutout shape; only affects the dimming mask.
    pub shape: CutoutShape,
    /// Vertical shift applied to the pan clamp range. Some hosts embed the
    /// sheet in a container that offsets layout vertically; 0 otherwise.
    pub safe_area_compensation: f64,
    /// Extra pan allowed past each clamp edge (points).
    pub edge_slack: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            inset_margin: DEFAULT_INSET_MARGIN,
            max_zoom: DEFAULT_MAX_ZOOM,
            shape: CutoutShape::Circle,
            safe_area_compensation: 0.0,
            edge_slack: 0.0,
        }
    }
}

impl CropConfig {
    /// Check that every value is finite and in range.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        let non_negative = [
            ("inset_margin", self.inset_margin),
            ("edge_slack", self.edge_slack),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(CropError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !self.max_zoom.is_finite() || self.max_zoom < 1.0 {
            return Err(CropError::InvalidConfig(format!(
                "max_zoom must be at least 1.0, got {}",
                self.max_zoom
            )));
        }
        if !self.safe_area_compensation.is_finite() {
            return Err(CropError::InvalidConfig(
                "safe_area_compensation must be finite".to_string(),
            ));
        }
        Ok(())
    }
}
