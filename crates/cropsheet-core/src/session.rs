//! The crop sheet: one image, one viewport, and the gesture state between them.
//!
//! [`CropSheet`] is the only owner of the committed [`DisplayState`]. Hosts
//! forward layout passes and gesture events to it, draw whatever
//! [`CropSheet::live_state`] returns, and call [`CropSheet::confirm`] when
//! the user accepts the crop.

use tracing::{debug, info};

use crate::attributes::{ImageAttributes, SavedTransform};
use crate::bitmap::Bitmap;
use crate::config::CropConfig;
use crate::error::{CropError, Result};
use crate::geometry::{AspectRatio, Offset2D, PixelRect, Size2D};
use crate::gesture::{GestureAccumulator, GestureKind};
use crate::transform::{
    crop_rect, ClampOutcome, DisplayState, MaskGeometry, SafeAreaInsets, TransformClamp,
    ViewportState,
};

#[derive(Debug, Clone)]
struct LoadedImage {
    image: Bitmap,
    clamp: TransformClamp,
    gestures: GestureAccumulator,
}

/// Interactive crop session.
#[derive(Debug, Clone)]
pub struct CropSheet {
    config: CropConfig,
    viewport: ViewportState,
    loaded: Option<LoadedImage>,
}

impl CropSheet {
    /// Create an empty sheet for a viewport.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidConfig` or `CropError::InvalidGeometry`.
    pub fn new(config: CropConfig, viewport_size: Size2D) -> Result<Self> {
        config.validate()?;
        let viewport = ViewportState::new(viewport_size, config.inset_margin)?;
        Ok(Self {
            config,
            viewport,
            loaded: None,
        })
    }

    pub fn config(&self) -> &CropConfig {
        &self.config
    }

    pub fn viewport(&self) -> &ViewportState {
        &self.viewport
    }

    pub fn image(&self) -> Option<&Bitmap> {
        self.loaded.as_ref().map(|l| &l.image)
    }

    pub fn has_image(&self) -> bool {
        self.loaded.is_some()
    }

    fn prepare(&self, image: &Bitmap) -> Result<TransformClamp> {
        image.validate()?;
        let aspect = AspectRatio::of_pixels(image.width, image.height)?;
        Ok(TransformClamp::new(aspect, self.viewport, &self.config))
    }

    /// Load a new image and fit it to the viewport.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidGeometry` for an image with no pixels or a pixel
    /// buffer that does not match its dimensions; the previous image, if
    /// any, stays loaded.
    pub fn load_image(&mut self, image: Bitmap) -> Result<DisplayState> {
        let clamp = self.prepare(&image)?;
        let state = clamp.fit();
        info!(width = image.width, height = image.height, "Image loaded");
        self.loaded = Some(LoadedImage {
            image,
            clamp,
            gestures: GestureAccumulator::new(state),
        });
        Ok(state)
    }

    /// Completion handler for the picker. `None` (cancelled) changes nothing.
    pub fn on_image_picked(&mut self, picked: Option<Bitmap>) -> Result<Option<DisplayState>> {
        match picked {
            Some(image) => self.load_image(image).map(Some),
            None => {
                debug!("Image pick cancelled");
                Ok(None)
            }
        }
    }

    /// Reopen a previously confirmed crop. The saved zoom and pan are
    /// re-clamped against the current viewport, which may differ from the
    /// one at confirm time.
    pub fn restore(&mut self, attributes: &ImageAttributes) -> Result<ClampOutcome> {
        self.restore_parts(attributes.original_image().clone(), attributes.transform())
    }

    /// [`CropSheet::restore`] from separately persisted parts.
    pub fn restore_parts(&mut self, image: Bitmap, saved: SavedTransform) -> Result<ClampOutcome> {
        let clamp = self.prepare(&image)?;
        let outcome = clamp.clamp(saved.zoom, saved.pan());
        info!(
            zoom = saved.zoom,
            reset = outcome.was_reset(),
            "Restored saved crop"
        );
        self.loaded = Some(LoadedImage {
            image,
            clamp,
            gestures: GestureAccumulator::new(outcome.state()),
        });
        Ok(outcome)
    }

    /// New layout pass (resize or rotation). The committed state is
    /// re-clamped and in-flight gestures are dropped.
    ///
    /// # Errors
    ///
    /// `CropError::InvalidGeometry` for an unusable size; nothing changes.
    pub fn set_viewport(&mut self, size: Size2D) -> Result<Option<ClampOutcome>> {
        let viewport = ViewportState::new(size, self.config.inset_margin)?;
        if viewport == self.viewport {
            return Ok(None);
        }
        self.viewport = viewport;
        debug!(width = size.width, height = size.height, "Viewport changed");

        let config = &self.config;
        Ok(self.loaded.as_mut().map(|loaded| {
            loaded.clamp = TransformClamp::new(loaded.clamp.image_aspect(), viewport, config);
            loaded.gestures.reclamp(&loaded.clamp)
        }))
    }

    /// Last committed state.
    pub fn display_state(&self) -> Option<DisplayState> {
        self.loaded.as_ref().map(|l| l.gestures.committed())
    }

    /// What to draw this frame: committed state plus live gesture deltas.
    pub fn live_state(&self) -> Option<DisplayState> {
        self.loaded
            .as_ref()
            .map(|l| l.gestures.live_state(&l.clamp))
    }

    /// Dimming overlay for the current viewport.
    pub fn mask(&self, insets: SafeAreaInsets) -> MaskGeometry {
        MaskGeometry::new(&self.viewport, self.config.shape, insets)
    }

    pub fn begin_gesture(&mut self, kind: GestureKind) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.gestures.begin(kind);
        }
    }

    pub fn pinch_changed(&mut self, scale: f64) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.gestures.pinch_changed(scale);
        }
    }

    pub fn pinch_ended(&mut self) -> Option<ClampOutcome> {
        self.loaded
            .as_mut()
            .map(|l| l.gestures.pinch_ended(&l.clamp))
    }

    pub fn drag_changed(&mut self, translation: Offset2D) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.gestures.drag_changed(translation);
        }
    }

    pub fn drag_ended(&mut self, translation: Offset2D) -> Option<ClampOutcome> {
        self.loaded
            .as_mut()
            .map(|l| l.gestures.drag_ended(translation, &l.clamp))
    }

    /// Abandon a gesture without committing (system interruption).
    pub fn cancel_gesture(&mut self, kind: GestureKind) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.gestures.cancel(kind);
        }
    }

    pub fn cancel_gestures(&mut self) {
        if let Some(loaded) = self.loaded.as_mut() {
            loaded.gestures.cancel_all();
        }
    }

    /// Double-tap: back to the fit, dropping in-flight gestures.
    pub fn reset_to_fit(&mut self) -> Option<DisplayState> {
        self.loaded
            .as_mut()
            .map(|l| l.gestures.double_tap(&l.clamp))
    }

    /// Source-pixel rectangle the confirm would crop.
    pub fn crop_rect(&self) -> Result<PixelRect> {
        let loaded = self.loaded.as_ref().ok_or(CropError::NoImage)?;
        crop_rect(&loaded.gestures.committed(), &self.viewport, &loaded.image)
    }

    /// Crop the committed state and package the result.
    ///
    /// # Errors
    ///
    /// `CropError::NoImage`, or `CropError::InvalidCropRectangle` if the
    /// committed state does not project onto the image. Either way nothing
    /// is produced and the caller keeps its previous attributes.
    pub fn confirm(&self) -> Result<ImageAttributes> {
        let loaded = self.loaded.as_ref().ok_or(CropError::NoImage)?;
        let state = loaded.gestures.committed();
        let rect = crop_rect(&state, &self.viewport, &loaded.image)?;
        let cropped = loaded.image.extract(rect);
        info!(
            width = cropped.width,
            height = cropped.height,
            zoom = state.zoom,
            "Crop confirmed"
        );
        Ok(ImageAttributes::new(
            loaded.image.clone(),
            cropped,
            SavedTransform {
                zoom: state.zoom,
                pan_x: state.pan.x,
                pan_y: state.pan.y,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sheet(w: f64, h: f64) -> CropSheet {
        CropSheet::new(CropConfig::default(), Size2D::new(w, h)).unwrap()
    }

    fn image(width: u32, height: u32) -> Bitmap {
        let mut pixels = Vec::with_capacity((width * height * 3) as usize);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&[(x % 256) as u8, (y % 256) as u8, 7]);
            }
        }
        Bitmap::new(width, height, pixels)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = CropConfig {
            max_zoom: 0.0,
            ..CropConfig::default()
        };
        assert!(CropSheet::new(config, Size2D::new(400.0, 800.0)).is_err());
        assert!(CropSheet::new(CropConfig::default(), Size2D::new(0.0, 0.0)).is_err());
    }

    #[test]
    fn test_empty_sheet() {
        let mut sheet = sheet(400.0, 800.0);
        assert!(!sheet.has_image());
        assert_eq!(sheet.display_state(), None);
        assert_eq!(sheet.pinch_ended(), None);
        assert_eq!(sheet.reset_to_fit(), None);
        assert_eq!(sheet.confirm().unwrap_err(), CropError::NoImage);
    }

    #[test]
    fn test_load_fits_landscape_image() {
        let mut sheet = sheet(500.0, 500.0);
        let state = sheet.load_image(image(200, 100)).unwrap();
        assert_eq!(state.display_size, Size2D::new(500.0, 250.0));
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.pan, Offset2D::ZERO);
    }

    #[test]
    fn test_load_rejects_empty_image() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(10, 10)).unwrap();
        assert!(sheet.load_image(Bitmap::new(0, 0, vec![])).is_err());
        // Previous image is kept
        assert_eq!(sheet.image().map(|i| i.width), Some(10));
    }

    #[test]
    fn test_mismatched_buffer_rejected() {
        let mut sheet = sheet(400.0, 800.0);
        let short = Bitmap {
            width: 100,
            height: 100,
            pixels: vec![0; 30],
        };
        assert!(matches!(
            sheet.load_image(short.clone()),
            Err(CropError::InvalidGeometry { .. })
        ));
        assert!(sheet
            .restore_parts(short, SavedTransform::default())
            .is_err());
        assert!(!sheet.has_image());
        assert_eq!(sheet.confirm().unwrap_err(), CropError::NoImage);
    }

    #[test]
    fn test_pick_cancel_is_noop() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(10, 20)).unwrap();
        sheet.pinch_changed(2.0);
        sheet.pinch_ended();
        let before = sheet.display_state();

        assert_eq!(sheet.on_image_picked(None).unwrap(), None);
        assert_eq!(sheet.display_state(), before);
    }

    #[test]
    fn test_confirm_after_fit_is_centered() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(800, 800)).unwrap();
        let attrs = sheet.confirm().unwrap();

        let cropped = attrs.cropped_image();
        assert_eq!((cropped.width, cropped.height), (740, 740));
        assert_eq!(cropped.pixel(0, 0), Some([30, 30, 7]));
        assert_eq!(attrs.scale(), 1.0);
        assert_eq!(attrs.pan_offset(), Offset2D::ZERO);
        assert_eq!(attrs.original_image().width, 800);
    }

    #[test]
    fn test_gestures_then_confirm() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(600, 600)).unwrap();

        sheet.begin_gesture(GestureKind::Pinch);
        sheet.pinch_changed(1.5);
        sheet.pinch_ended();
        sheet.begin_gesture(GestureKind::Drag);
        sheet.drag_changed(Offset2D::new(500.0, 0.0));
        sheet.drag_ended(Offset2D::new(500.0, 0.0));

        let state = sheet.display_state().unwrap();
        assert_eq!(state.zoom, 1.5);
        assert_eq!(state.pan, Offset2D::new(100.0, 0.0));

        // 600px image displayed at 600pt: one pixel per point
        let rect = sheet.crop_rect().unwrap();
        assert_eq!(
            rect,
            PixelRect {
                x: 15,
                y: 115,
                width: 370,
                height: 370
            }
        );
    }

    #[test]
    fn test_screenshot_shrink_resets_before_crop() {
        // Image with exactly the viewport's pixel size
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(400, 800)).unwrap();

        sheet.pinch_changed(0.4);
        let outcome = sheet.pinch_ended().unwrap();
        assert!(outcome.was_reset());

        let state = sheet.display_state().unwrap();
        assert_eq!(state.zoom, 1.0);
        assert_eq!(state.display_size, Size2D::new(400.0, 800.0));

        let attrs = sheet.confirm().unwrap();
        assert_eq!(attrs.cropped_image().width, 370);
        assert_eq!(attrs.cropped_image().height, 370);
    }

    #[test]
    fn test_restore_reproduces_crop() {
        let mut first = sheet(400.0, 800.0);
        first.load_image(image(900, 600)).unwrap();
        first.pinch_changed(2.2);
        first.pinch_ended();
        first.drag_ended(Offset2D::new(-120.0, 45.0));
        let attrs = first.confirm().unwrap();
        let rect = first.crop_rect().unwrap();

        let mut reopened = sheet(400.0, 800.0);
        let outcome = reopened.restore(&attrs).unwrap();
        assert!(!outcome.was_reset());
        assert_eq!(reopened.display_state(), first.display_state());
        assert_eq!(reopened.crop_rect().unwrap(), rect);
        assert_eq!(reopened.confirm().unwrap().cropped_image(), attrs.cropped_image());
    }

    #[test]
    fn test_restore_in_rotated_viewport_reclamps() {
        let mut first = sheet(400.0, 800.0);
        first.load_image(image(400, 800)).unwrap();
        first.drag_ended(Offset2D::new(0.0, 400.0));
        let attrs = first.confirm().unwrap();
        assert_eq!(attrs.pan_offset().y, 200.0);

        // Landscape: the tall image now matches the 400pt cutout height
        let mut rotated = sheet(800.0, 400.0);
        rotated.restore(&attrs).unwrap();
        let state = rotated.display_state().unwrap();
        assert_relative_eq!(state.display_size.width, 200.0);
        assert_relative_eq!(state.display_size.height, 400.0);
        assert_eq!(state.pan, Offset2D::ZERO);
        assert!(rotated.confirm().is_ok());
    }

    #[test]
    fn test_viewport_change_reclamps() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(100, 100)).unwrap();
        sheet.pinch_changed(2.0);
        sheet.pinch_ended();
        sheet.drag_ended(Offset2D::new(200.0, 200.0));
        assert_eq!(sheet.display_state().unwrap().pan, Offset2D::new(200.0, 200.0));

        // Smaller viewport: cutout 300, display 600, bound 150
        let outcome = sheet.set_viewport(Size2D::new(300.0, 600.0)).unwrap().unwrap();
        let state = outcome.state();
        assert_eq!(state.zoom, 2.0);
        assert_eq!(state.display_size, Size2D::new(600.0, 600.0));
        assert_eq!(state.pan, Offset2D::new(150.0, 150.0));
        assert_eq!(sheet.display_state(), Some(state));
    }

    #[test]
    fn test_same_viewport_is_noop() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(100, 100)).unwrap();
        assert_eq!(sheet.set_viewport(Size2D::new(400.0, 800.0)).unwrap(), None);
    }

    #[test]
    fn test_invalid_viewport_keeps_previous() {
        let mut sheet = sheet(400.0, 800.0);
        assert!(sheet.set_viewport(Size2D::new(0.0, 800.0)).is_err());
        assert_eq!(sheet.viewport().size(), Size2D::new(400.0, 800.0));
    }

    #[test]
    fn test_live_state_tracks_gesture() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(100, 100)).unwrap();
        sheet.begin_gesture(GestureKind::Drag);
        sheet.drag_changed(Offset2D::new(0.0, -30.0));
        assert_eq!(sheet.live_state().unwrap().pan, Offset2D::new(0.0, -30.0));

        sheet.cancel_gesture(GestureKind::Drag);
        assert_eq!(sheet.live_state().unwrap().pan, Offset2D::ZERO);
    }

    #[test]
    fn test_confirm_ignores_live_deltas() {
        let mut sheet = sheet(400.0, 800.0);
        sheet.load_image(image(800, 800)).unwrap();
        let committed_rect = sheet.crop_rect().unwrap();
        sheet.pinch_changed(3.0);
        sheet.drag_changed(Offset2D::new(90.0, 90.0));
        assert_eq!(sheet.crop_rect().unwrap(), committed_rect);
    }

    #[test]
    fn test_mask_uses_configured_shape() {
        let config = CropConfig {
            shape: crate::config::CutoutShape::Square,
            ..CropConfig::default()
        };
        let sheet = CropSheet::new(config, Size2D::new(400.0, 800.0)).unwrap();
        let mask = sheet.mask(SafeAreaInsets::default());
        // Just inside the square hole's corner
        assert!(!mask.is_dimmed(16.0, 216.0));
        assert!(mask.is_dimmed(14.0, 214.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Event {
        Pinch(f64),
        Drag(f64, f64),
        DoubleTap,
        Cancel,
        Rotate,
    }

    fn event_strategy() -> impl Strategy<Value = Event> {
        prop_oneof![
            (0.05f64..=6.0).prop_map(Event::Pinch),
            (-2000.0f64..=2000.0, -2000.0f64..=2000.0).prop_map(|(x, y)| Event::Drag(x, y)),
            Just(Event::DoubleTap),
            Just(Event::Cancel),
            Just(Event::Rotate),
        ]
    }

    proptest! {
        /// Property: any sequence of committed gestures leaves a state that
        /// crops successfully to a square inside the image.
        #[test]
        fn prop_any_gesture_sequence_crops(
            img_w in 20u32..=300,
            img_h in 20u32..=300,
            events in proptest::collection::vec(event_strategy(), 0..20),
        ) {
            let mut sheet = CropSheet::new(CropConfig::default(), Size2D::new(390.0, 844.0)).unwrap();
            sheet.load_image(Bitmap::filled(img_w, img_h, [9, 9, 9])).unwrap();
            let mut portrait = true;

            for event in events {
                match event {
                    Event::Pinch(scale) => {
                        sheet.pinch_changed(scale);
                        sheet.pinch_ended();
                    }
                    Event::Drag(x, y) => {
                        sheet.drag_changed(Offset2D::new(x, y));
                        sheet.drag_ended(Offset2D::new(x, y));
                    }
                    Event::DoubleTap => {
                        sheet.reset_to_fit();
                    }
                    Event::Cancel => {
                        sheet.pinch_changed(3.0);
                        sheet.cancel_gestures();
                    }
                    Event::Rotate => {
                        portrait = !portrait;
                        let size = if portrait { Size2D::new(390.0, 844.0) } else { Size2D::new(844.0, 390.0) };
                        sheet.set_viewport(size).unwrap();
                    }
                }
                let state = sheet.display_state().unwrap();
                prop_assert!(state.zoom >= 1.0 && state.zoom <= 4.0);
            }

            let rect = sheet.crop_rect();
            prop_assert!(rect.is_ok(), "crop failed: {:?}", rect);
            let rect = rect.unwrap();
            prop_assert!(rect.x + rect.width <= img_w);
            prop_assert!(rect.y + rect.height <= img_h);
        }
    }
}
