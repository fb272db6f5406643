//! Browser scroll surface and animation-frame scheduler.

use gloo::render::request_animation_frame;
use reorder_core::{FrameHandle, FrameScheduler, ScrollSurface};
use web_sys::HtmlElement;

/// A horizontally scrolling container element.
pub struct DomScroll {
    element: HtmlElement,
}

impl DomScroll {
    pub fn new(element: HtmlElement) -> Self {
        DomScroll { element }
    }
}

impl ScrollSurface for DomScroll {
    fn horizontal_bounds(&self) -> (f64, f64) {
        let rect = self.element.get_bounding_client_rect();
        (rect.left(), rect.right())
    }

    fn scroll_left(&self) -> f64 {
        self.element.scroll_left() as f64
    }

    fn max_scroll_left(&self) -> f64 {
        (self.element.scroll_width() - self.element.client_width()).max(0) as f64
    }

    fn set_scroll_left(&self, value: f64) {
        self.element.set_scroll_left(value.round() as i32);
    }
}

/// `requestAnimationFrame` through gloo; the returned handle owns the
/// [`gloo::render::AnimationFrame`], so dropping it cancels the frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct RafScheduler;

impl FrameScheduler for RafScheduler {
    fn request_frame(&self, step: Box<dyn FnOnce(f64)>) -> FrameHandle {
        FrameHandle::new(request_animation_frame(step))
    }
}
