//! Leptos signals mirroring the shared reordering flag.

use gloo::timers::callback::Timeout;
use leptos::prelude::*;
use reorder_core::{ListenerError, ReorderFlag};

/// How long taps stay suppressed after a drag ends, in ms.
pub const JUST_ENDED_MS: u32 = 100;

/// Reordering state signals
#[derive(Clone, Copy)]
pub struct ReorderSignals {
    pub reordering_read: ReadSignal<bool>,
    pub reordering_write: WriteSignal<bool>,
    /// True for [`JUST_ENDED_MS`] after a drag so the trailing click of a
    /// drop does not open the item.
    pub just_ended_read: ReadSignal<bool>,
    pub just_ended_write: WriteSignal<bool>,
    pending_clear: StoredValue<Option<Timeout>, LocalStorage>,
}

impl ReorderSignals {
    /// Whether a tap on an item should be ignored right now.
    pub fn suppresses_taps(&self) -> bool {
        self.reordering_read.try_get_untracked().unwrap_or(false)
            || self.just_ended_read.try_get_untracked().unwrap_or(false)
    }

    fn mirror(&self, active: bool) -> Result<(), ListenerError> {
        if self.reordering_write.try_set(active).is_some() {
            return Err(ListenerError::new("reorder signals were disposed"));
        }
        if !active {
            let _ = self.just_ended_write.try_set(true);
            let clear = self.just_ended_write;
            // Replacing the slot drops, and so cancels, the previous timeout.
            self.pending_clear.try_update_value(|slot| {
                *slot = Some(Timeout::new(JUST_ENDED_MS, move || {
                    let _ = clear.try_set(false);
                }));
            });
        }
        Ok(())
    }
}

/// Creates signals that follow `flag` until the current owner is cleaned up.
pub fn create_reorder_signals(flag: &ReorderFlag) -> ReorderSignals {
    let (reordering_read, reordering_write) = signal(flag.get());
    let (just_ended_read, just_ended_write) = signal(false);
    let signals = ReorderSignals {
        reordering_read,
        reordering_write,
        just_ended_read,
        just_ended_write,
        pending_clear: StoredValue::new_local(None),
    };

    let id = flag.subscribe(move |active| signals.mirror(active));
    let subscription = StoredValue::new_local((flag.clone(), id));
    on_cleanup(move || {
        subscription.try_with_value(|(flag, id)| flag.unsubscribe(*id));
        signals.pending_clear.try_update_value(|slot| slot.take());
    });

    signals
}

/// Wraps an item tap handler so it does nothing while reordering or just
/// after a drop.
pub fn guard_tap<E, F>(signals: ReorderSignals, handler: F) -> impl Fn(E) + 'static
where
    E: 'static,
    F: Fn(E) + 'static,
{
    move |ev: E| {
        if signals.suppresses_taps() {
            log::debug!("tap suppressed by reorder");
            return;
        }
        handler(ev);
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn pending(signals: &ReorderSignals) -> Option<bool> {
        signals.pending_clear.try_with_value(Option::is_some)
    }

    #[wasm_bindgen_test]
    fn test_drag_end_keeps_one_pending_clear() {
        let owner = Owner::new();
        let flag = ReorderFlag::new();
        let signals = owner.with(|| create_reorder_signals(&flag));
        assert_eq!(pending(&signals), Some(false));

        for _ in 0..3 {
            flag.set(true);
            assert!(signals.suppresses_taps());
            flag.set(false);
        }
        assert!(signals.just_ended_read.get_untracked());
        assert_eq!(pending(&signals), Some(true));

        owner.cleanup();
        assert_ne!(pending(&signals), Some(true));

        // Unsubscribed: later drags no longer reach the disposed signals.
        flag.set(true);
        flag.set(false);
        assert_ne!(pending(&signals), Some(true));
    }
}
