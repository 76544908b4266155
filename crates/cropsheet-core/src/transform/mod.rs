//! The geometry pipeline: fit, cutout, clamp, project.
//!
//! # Pipeline
//!
//! 1. [`fit`] scales the image so its limiting axis matches the viewport
//! 2. [`viewport`] derives the cutout and crop diameters
//! 3. [`clamp`] keeps committed zoom and pan inside valid ranges, falling
//!    back to the fit when the image shrinks below the cutout
//! 4. [`project`] maps the committed state to source pixels and crops
//!
//! # Coordinate System
//!
//! - Sizes and offsets are in layout points unless a type says pixels
//! - Pan is the offset of the image centre from the viewport centre
//! - Origin is top-left; positive y points down

pub mod clamp;
pub mod fit;
pub mod project;
pub mod state;
pub mod viewport;

pub use clamp::{ClampOutcome, TransformClamp};
pub use fit::{fit_display_size, fit_to_viewport};
pub use project::{crop, crop_rect, CropProjection};
pub use state::DisplayState;
pub use viewport::{MaskGeometry, SafeAreaInsets, ViewportState, MAX_MASK_PIXELS};
