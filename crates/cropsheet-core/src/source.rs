//! Boundary with whatever supplies the source image.
//!
//! A picker may answer immediately or long after the call returns, so the
//! sheet is handed over as `Rc<RefCell<_>>` and borrowed only when the
//! answer arrives.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::warn;

use crate::bitmap::Bitmap;
use crate::session::CropSheet;

/// One-shot completion: `Some` with the picked bitmap, `None` if cancelled.
pub type PickCallback = Box<dyn FnOnce(Option<Bitmap>)>;

/// Something that can ask the user for an image.
pub trait ImageSource {
    /// Start a pick. `on_picked` must be called at most once.
    fn pick_image(&mut self, on_picked: PickCallback);
}

/// Ask `source` for an image and load it into `sheet` when it arrives.
///
/// Failures at completion time (an image with no pixels, or the sheet
/// already borrowed by a synchronous caller) are logged and dropped.
pub fn request_image<S>(source: &mut S, sheet: &Rc<RefCell<CropSheet>>)
where
    S: ImageSource + ?Sized,
{
    let sheet = Rc::clone(sheet);
    source.pick_image(Box::new(move |picked| {
        let Ok(mut sheet) = sheet.try_borrow_mut() else {
            warn!("Crop sheet busy, dropping picked image");
            return;
        };
        if let Err(e) = sheet.on_image_picked(picked) {
            warn!(error = %e, "Picked image rejected");
        }
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CropConfig;
    use crate::geometry::Size2D;

    /// Answers synchronously with a fixed result.
    struct Immediate(Option<Bitmap>);

    impl ImageSource for Immediate {
        fn pick_image(&mut self, on_picked: PickCallback) {
            on_picked(self.0.take());
        }
    }

    /// Holds the callback until the test releases it.
    #[derive(Default)]
    struct Deferred {
        pending: Option<PickCallback>,
    }

    impl ImageSource for Deferred {
        fn pick_image(&mut self, on_picked: PickCallback) {
            self.pending = Some(on_picked);
        }
    }

    impl Deferred {
        fn complete(&mut self, picked: Option<Bitmap>) {
            if let Some(callback) = self.pending.take() {
                callback(picked);
            }
        }
    }

    fn shared_sheet() -> Rc<RefCell<CropSheet>> {
        let sheet = CropSheet::new(CropConfig::default(), Size2D::new(400.0, 800.0)).unwrap();
        Rc::new(RefCell::new(sheet))
    }

    #[test]
    fn test_immediate_pick_loads() {
        let sheet = shared_sheet();
        let mut source = Immediate(Some(Bitmap::filled(300, 200, [1, 1, 1])));
        request_image(&mut source, &sheet);

        let sheet = sheet.borrow();
        assert!(sheet.has_image());
        assert_eq!(sheet.display_state().unwrap().display_size.width, 400.0);
    }

    #[test]
    fn test_cancelled_pick_keeps_state() {
        let sheet = shared_sheet();
        sheet
            .borrow_mut()
            .load_image(Bitmap::filled(10, 10, [0, 0, 0]))
            .unwrap();

        request_image(&mut Immediate(None), &sheet);
        assert_eq!(sheet.borrow().image().map(|i| i.width), Some(10));
    }

    #[test]
    fn test_deferred_pick_loads_later() {
        let sheet = shared_sheet();
        let mut source = Deferred::default();
        request_image(&mut source, &sheet);
        assert!(!sheet.borrow().has_image());

        source.complete(Some(Bitmap::filled(50, 100, [5, 5, 5])));
        assert_eq!(sheet.borrow().image().map(|i| i.height), Some(100));
    }

    #[test]
    fn test_busy_sheet_drops_pick() {
        let sheet = shared_sheet();
        let mut source = Deferred::default();
        request_image(&mut source, &sheet);

        let guard = sheet.borrow();
        source.complete(Some(Bitmap::filled(50, 100, [5, 5, 5])));
        assert!(!guard.has_image());
    }

    #[test]
    fn test_empty_bitmap_rejected() {
        let sheet = shared_sheet();
        request_image(&mut Immediate(Some(Bitmap::new(0, 0, Vec::new()))), &sheet);
        assert!(!sheet.borrow().has_image());
    }
}
