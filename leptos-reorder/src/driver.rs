//! Feeds browser events into a [`DragSession`].
//!
//! Pointer tracking listeners exist only while a drag is live. They hold a
//! weak reference back to the driver, so a dropped driver silences them.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions};
use reorder_core::{DragSession, ItemId, OrderSnapshot, Point, Result, SessionPhase};
use web_sys::{Event, EventTarget};

use crate::sortable::pointer_of;

pub struct SessionDriver {
    session: RefCell<DragSession>,
    listeners: RefCell<Vec<EventListener>>,
}

impl SessionDriver {
    pub fn new(session: DragSession) -> Rc<Self> {
        Rc::new(SessionDriver {
            session: RefCell::new(session),
            listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.session
            .try_borrow()
            .map(|session| session.phase())
            .unwrap_or(SessionPhase::Settling)
    }

    pub fn is_tracking(&self) -> bool {
        !self.listeners.borrow().is_empty()
    }

    pub fn choose(&self, item: ItemId, origin: Point) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.choose(item, origin);
        }
    }

    pub fn unchoose(&self) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.unchoose();
        }
    }

    pub fn start(self: &Rc<Self>) {
        let dragging = match self.session.try_borrow_mut() {
            Ok(mut session) => {
                session.start();
                session.is_dragging()
            }
            Err(_) => false,
        };
        if dragging {
            self.track();
        }
    }

    pub fn pointer_moved(&self, point: Point) {
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.pointer_moved(point);
        }
    }

    pub fn end(&self) -> Result<Option<OrderSnapshot>> {
        self.untrack();
        match self.session.try_borrow_mut() {
            Ok(mut session) => session.end(),
            Err(_) => Ok(None),
        }
    }

    /// Cancels whatever is live. A session that is busy committing is left
    /// to finish on its own.
    pub fn cancel(&self) {
        self.untrack();
        if let Ok(mut session) = self.session.try_borrow_mut() {
            session.cancel();
        }
    }

    fn track(self: &Rc<Self>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let target: &EventTarget = &window;
        let listeners = vec![
            listen(target, "mousemove", Rc::downgrade(self), on_pointer_move),
            listen(target, "touchmove", Rc::downgrade(self), on_pointer_move),
            listen(target, "touchcancel", Rc::downgrade(self), on_touch_cancel),
        ];
        *self.listeners.borrow_mut() = listeners;
    }

    fn untrack(&self) {
        // Dropping a gloo listener removes it.
        self.listeners.borrow_mut().clear();
    }
}

fn listen(
    target: &EventTarget,
    event: &'static str,
    driver: Weak<SessionDriver>,
    handle: fn(&SessionDriver, &Event),
) -> EventListener {
    EventListener::new_with_options(
        target,
        event,
        EventListenerOptions::run_in_capture_phase(),
        move |event| {
            if let Some(driver) = driver.upgrade() {
                handle(&driver, event);
            }
        },
    )
}

fn on_pointer_move(driver: &SessionDriver, event: &Event) {
    if let Some(point) = pointer_of(event) {
        driver.pointer_moved(point);
    }
}

fn on_touch_cancel(driver: &SessionDriver, _event: &Event) {
    log::debug!("touch cancelled mid-drag");
    driver.cancel();
}
