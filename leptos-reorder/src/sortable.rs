//! SortableJS binding
//!
//! The library is expected as the global `Sortable` (script tag or bundler
//! shim). Calls go through `catch` so a missing global surfaces as an error
//! instead of a trap.

use js_sys::{Function, Reflect};
use reorder_core::{Point, ReorderError, Result, SensorOptions};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlElement, MouseEvent, TouchEvent};

#[wasm_bindgen]
extern "C" {
    /// One SortableJS instance bound to a container element.
    pub type Sortable;

    #[wasm_bindgen(static_method_of = Sortable, js_name = create, catch)]
    fn create_raw(el: &HtmlElement, options: &JsValue) -> std::result::Result<Sortable, JsValue>;

    #[wasm_bindgen(method, catch)]
    fn destroy(this: &Sortable) -> std::result::Result<(), JsValue>;
}

/// Lifecycle callbacks handed to the library.
pub type SortableCallback = Closure<dyn FnMut(JsValue)>;

#[derive(Default)]
pub struct SortableCallbacks {
    pub on_choose: Option<SortableCallback>,
    pub on_unchoose: Option<SortableCallback>,
    pub on_start: Option<SortableCallback>,
    pub on_end: Option<SortableCallback>,
}

impl SortableCallbacks {
    fn install(&self, options: &JsValue) -> Result<()> {
        let slots = [
            ("onChoose", &self.on_choose),
            ("onUnchoose", &self.on_unchoose),
            ("onStart", &self.on_start),
            ("onEnd", &self.on_end),
        ];
        for (name, callback) in slots {
            if let Some(callback) = callback {
                let function: &Function = callback.as_ref().unchecked_ref();
                Reflect::set(options, &JsValue::from_str(name), function)
                    .map_err(|e| ReorderError::Config(js_message(&e)))?;
            }
        }
        Ok(())
    }
}

/// A live instance plus the closures it calls. Dropping it destroys the
/// instance before the closures are freed.
pub struct SortableHandle {
    sortable: Option<Sortable>,
    _callbacks: SortableCallbacks,
}

impl SortableHandle {
    pub fn create(el: &HtmlElement, options: &SensorOptions, callbacks: SortableCallbacks) -> Result<Self> {
        let js_options =
            serde_wasm_bindgen::to_value(options).map_err(|e| ReorderError::Config(e.to_string()))?;
        callbacks.install(&js_options)?;
        let sortable =
            Sortable::create_raw(el, &js_options).map_err(|e| ReorderError::SensorUnavailable(js_message(&e)))?;
        Ok(SortableHandle {
            sortable: Some(sortable),
            _callbacks: callbacks,
        })
    }

    /// Destroys the instance. Safe to repeat.
    pub fn destroy(&mut self) {
        if let Some(sortable) = self.sortable.take() {
            if let Err(e) = sortable.destroy() {
                log::debug!("sortable destroy failed: {}", js_message(&e));
            }
        }
    }
}

impl Drop for SortableHandle {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// The dragged element of a SortableJS event.
pub fn event_item(evt: &JsValue) -> Option<Element> {
    Reflect::get(evt, &JsValue::from_str("item"))
        .ok()?
        .dyn_into::<Element>()
        .ok()
}

/// Pointer position of the DOM event behind a SortableJS event, if the
/// library passed one along.
pub fn event_pointer(evt: &JsValue) -> Option<Point> {
    let original = Reflect::get(evt, &JsValue::from_str("originalEvent")).ok()?;
    pointer_of(original.dyn_ref::<Event>()?)
}

/// Viewport position of a mouse, pointer or touch event.
pub fn pointer_of(event: &Event) -> Option<Point> {
    if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
        return Some(Point::new(mouse.client_x() as f64, mouse.client_y() as f64));
    }
    let touch_event = event.dyn_ref::<TouchEvent>()?;
    let touch = touch_event
        .touches()
        .get(0)
        .or_else(|| touch_event.changed_touches().get(0))?;
    Some(Point::new(touch.client_x() as f64, touch.client_y() as f64))
}

pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| value.dyn_ref::<js_sys::Error>().map(|e| String::from(e.message())))
        .unwrap_or_else(|| format!("{:?}", value))
}
