//! Edge auto-scroll for horizontally scrolling containers.
//!
//! While the pointer sits inside an edge band the container scrolls at a
//! velocity that ramps linearly from `min_speed` at the band's inner edge to
//! `max_speed` at the boundary. A single frame callback applies the velocity
//! and re-arms itself only while the velocity is non-zero.

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use crate::config::EdgeZone;

/// The scrollable element being driven.
pub trait ScrollSurface {
    /// Left and right viewport edges of the scroll container.
    fn horizontal_bounds(&self) -> (f64, f64);
    fn scroll_left(&self) -> f64;
    /// `scrollWidth - clientWidth`, never negative.
    fn max_scroll_left(&self) -> f64;
    fn set_scroll_left(&self, value: f64);
}

/// Animation-frame source. Dropping the returned handle cancels the frame.
pub trait FrameScheduler {
    fn request_frame(&self, step: Box<dyn FnOnce(f64)>) -> FrameHandle;
}

/// Keeps a scheduled frame alive; dropping it cancels the frame.
pub struct FrameHandle {
    _guard: Box<dyn Any>,
}

impl FrameHandle {
    pub fn new<G: 'static>(guard: G) -> Self {
        FrameHandle {
            _guard: Box::new(guard),
        }
    }
}

impl std::fmt::Debug for FrameHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("FrameHandle")
    }
}

/// Velocity in pixels per frame for a pointer at `x` over a container
/// spanning `left..right`. Negative scrolls left.
pub fn velocity_for(x: f64, left: f64, right: f64, zone: &EdgeZone) -> f64 {
    if right <= left || zone.width <= 0.0 {
        return 0.0;
    }
    let from_left = x - left;
    let from_right = right - x;
    let in_left = from_left < zone.width;
    let in_right = from_right < zone.width;

    let ramp = |distance: f64| {
        let t = 1.0 - (distance.max(0.0) / zone.width).min(1.0);
        zone.min_speed + (zone.max_speed - zone.min_speed) * t
    };

    match (in_left, in_right) {
        (false, false) => 0.0,
        (true, false) => -ramp(from_left),
        (false, true) => ramp(from_right),
        // Narrow container: both bands overlap, the nearer edge wins.
        (true, true) if from_left <= from_right => -ramp(from_left),
        (true, true) => ramp(from_right),
    }
}

#[derive(Debug, Default)]
struct ScrollState {
    velocity: f64,
    frame: Option<FrameHandle>,
}

/// Drives one scroll container from pointer updates.
pub struct EdgeScroller {
    zone: EdgeZone,
    surface: Rc<dyn ScrollSurface>,
    frames: Rc<dyn FrameScheduler>,
    state: RefCell<ScrollState>,
}

impl EdgeScroller {
    pub fn new(
        zone: EdgeZone,
        surface: Rc<dyn ScrollSurface>,
        frames: Rc<dyn FrameScheduler>,
    ) -> Rc<Self> {
        Rc::new(EdgeScroller {
            zone,
            surface,
            frames,
            state: RefCell::new(ScrollState::default()),
        })
    }

    pub fn velocity(&self) -> f64 {
        self.state.borrow().velocity
    }

    pub fn is_running(&self) -> bool {
        self.state.borrow().frame.is_some()
    }

    /// Recomputes the velocity for a pointer at `x`.
    pub fn update(self: &Rc<Self>, x: f64) {
        let (left, right) = self.surface.horizontal_bounds();
        let mut velocity = velocity_for(x, left, right, &self.zone);
        if self.at_extreme(velocity) {
            velocity = 0.0;
        }

        let mut state = self.state.borrow_mut();
        state.velocity = velocity;
        if velocity == 0.0 {
            state.frame.take();
            return;
        }
        if state.frame.is_none() {
            drop(state);
            self.ensure_frame();
        }
    }

    /// Zeroes the velocity and cancels any pending frame. Safe to repeat.
    pub fn stop(&self) {
        let mut state = self.state.borrow_mut();
        state.velocity = 0.0;
        state.frame.take();
    }

    fn at_extreme(&self, velocity: f64) -> bool {
        let position = self.surface.scroll_left();
        (velocity < 0.0 && position <= 0.0)
            || (velocity > 0.0 && position >= self.surface.max_scroll_left())
    }

    fn ensure_frame(self: &Rc<Self>) {
        if self.state.borrow().frame.is_some() {
            return;
        }
        let scroller = Rc::downgrade(self);
        let handle = self.frames.request_frame(Box::new(move |_timestamp| {
            if let Some(scroller) = scroller.upgrade() {
                scroller.step();
            }
        }));
        self.state.borrow_mut().frame = Some(handle);
    }

    fn step(self: &Rc<Self>) {
        let velocity = {
            let mut state = self.state.borrow_mut();
            state.frame.take();
            state.velocity
        };
        if velocity == 0.0 {
            return;
        }

        let max = self.surface.max_scroll_left().max(0.0);
        let next = (self.surface.scroll_left() + velocity).clamp(0.0, max);
        self.surface.set_scroll_left(next);

        if next <= 0.0 || next >= max {
            self.stop();
            return;
        }
        self.ensure_frame();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct FakeSurface {
        left: f64,
        right: f64,
        position: Cell<f64>,
        max: f64,
    }

    impl ScrollSurface for FakeSurface {
        fn horizontal_bounds(&self) -> (f64, f64) {
            (self.left, self.right)
        }
        fn scroll_left(&self) -> f64 {
            self.position.get()
        }
        fn max_scroll_left(&self) -> f64 {
            self.max
        }
        fn set_scroll_left(&self, value: f64) {
            self.position.set(value);
        }
    }

    type Pending = Rc<RefCell<Vec<(Rc<Cell<bool>>, Box<dyn FnOnce(f64)>)>>>;

    /// Frames run only when the test pumps them; dropped handles cancel.
    #[derive(Default)]
    struct ManualFrames {
        pending: Pending,
        requested: Cell<usize>,
    }

    struct Cancel(Rc<Cell<bool>>);

    impl Drop for Cancel {
        fn drop(&mut self) {
            self.0.set(true);
        }
    }

    impl ManualFrames {
        fn live(&self) -> usize {
            self.pending.borrow().iter().filter(|(c, _)| !c.get()).count()
        }

        fn pump(&self) {
            let frames: Vec<_> = self.pending.borrow_mut().drain(..).collect();
            for (cancelled, step) in frames {
                if !cancelled.get() {
                    step(16.0);
                }
            }
        }
    }

    impl FrameScheduler for ManualFrames {
        fn request_frame(&self, step: Box<dyn FnOnce(f64)>) -> FrameHandle {
            self.requested.set(self.requested.get() + 1);
            let cancelled = Rc::new(Cell::new(false));
            self.pending.borrow_mut().push((cancelled.clone(), step));
            FrameHandle::new(Cancel(cancelled))
        }
    }

    fn scroller(position: f64) -> (Rc<EdgeScroller>, Rc<FakeSurface>, Rc<ManualFrames>) {
        let surface = Rc::new(FakeSurface {
            left: 0.0,
            right: 400.0,
            position: Cell::new(position),
            max: 1000.0,
        });
        let frames = Rc::new(ManualFrames::default());
        let scroller = EdgeScroller::new(EdgeZone::CARDS, surface.clone(), frames.clone());
        (scroller, surface, frames)
    }

    #[test]
    fn test_velocity_zero_outside_zones() {
        let zone = EdgeZone::CARDS;
        for x in [80.0, 150.0, 200.0, 320.0] {
            assert_eq!(velocity_for(x, 0.0, 400.0, &zone), 0.0, "x = {x}");
        }
    }

    #[test]
    fn test_velocity_sign_and_bounds() {
        let zone = EdgeZone::CARDS;
        assert_eq!(velocity_for(0.0, 0.0, 400.0, &zone), -zone.max_speed);
        assert_eq!(velocity_for(400.0, 0.0, 400.0, &zone), zone.max_speed);
        assert_eq!(velocity_for(-50.0, 0.0, 400.0, &zone), -zone.max_speed);
        assert!(velocity_for(79.0, 0.0, 400.0, &zone) < 0.0);
        assert!(velocity_for(321.0, 0.0, 400.0, &zone) > 0.0);
        assert!(velocity_for(79.999, 0.0, 400.0, &zone).abs() >= zone.min_speed);
    }

    #[test]
    fn test_velocity_monotonic_toward_boundary() {
        let zone = EdgeZone::CHIPS;
        let mut previous = 0.0;
        for step in 0..=50 {
            let x = 50.0 - step as f64;
            let speed = velocity_for(x, 0.0, 300.0, &zone).abs();
            assert!(speed >= previous, "speed dropped at x = {x}");
            previous = speed;
        }
        let mut previous = 0.0;
        for step in 0..=50 {
            let x = 250.0 + step as f64;
            let speed = velocity_for(x, 0.0, 300.0, &zone);
            assert!(speed >= previous, "speed dropped at x = {x}");
            previous = speed;
        }
    }

    #[test]
    fn test_overlapping_zones_prefer_nearer_edge() {
        let zone = EdgeZone::CARDS;
        assert!(velocity_for(20.0, 0.0, 100.0, &zone) < 0.0);
        assert!(velocity_for(80.0, 0.0, 100.0, &zone) > 0.0);
    }

    #[test]
    fn test_loop_scrolls_until_pointer_leaves() {
        let (scroller, surface, frames) = scroller(500.0);
        scroller.update(390.0);
        assert!(scroller.velocity() > 0.0);
        assert_eq!(frames.live(), 1);

        frames.pump();
        assert!(surface.position.get() > 500.0);
        assert_eq!(frames.live(), 1, "loop re-arms while velocity is non-zero");

        scroller.update(200.0);
        assert_eq!(scroller.velocity(), 0.0);
        assert!(!scroller.is_running());
        assert_eq!(frames.live(), 0);

        let position = surface.position.get();
        frames.pump();
        assert_eq!(surface.position.get(), position);
        assert_eq!(frames.live(), 0);
    }

    #[test]
    fn test_repeated_updates_do_not_duplicate_loop() {
        let (scroller, _surface, frames) = scroller(500.0);
        scroller.update(5.0);
        scroller.update(6.0);
        scroller.update(7.0);
        assert_eq!(frames.requested.get(), 1);
        assert_eq!(frames.live(), 1);
    }

    #[test]
    fn test_stops_at_extremes() {
        let (scroller, surface, frames) = scroller(0.0);
        scroller.update(5.0);
        assert_eq!(scroller.velocity(), 0.0, "already at the left extreme");
        assert_eq!(frames.live(), 0);

        surface.position.set(10.0);
        scroller.update(0.0);
        frames.pump();
        assert_eq!(surface.position.get(), 0.0);
        assert!(!scroller.is_running());
        assert_eq!(frames.live(), 0);
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (scroller, _surface, frames) = scroller(500.0);
        scroller.update(395.0);
        scroller.stop();
        scroller.stop();
        assert_eq!(scroller.velocity(), 0.0);
        assert_eq!(frames.live(), 0);
    }
}
