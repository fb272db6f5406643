//! DOM-backed container and source nodes.

use js_sys::{Function, Reflect};
use reorder_core::clone::{ImageState, NodeKind};
use reorder_core::container::{CONTROL_SELECTOR, ITEM_KIND_ATTR};
use reorder_core::{
    plan_clone, CloneBody, CloneError, ClonePlan, ContainerKind, ContainerSurface, ItemId, ItemKind,
    Lift, Placement, Point, Rect, SourceNode,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, HtmlElement, HtmlImageElement, Node};

use crate::sortable::js_message;

/// Class toggled on the item while it is being dragged.
pub const DRAGGING_CLASS: &str = "reorder-dragging";

/// Class hiding an item's controls while any drag in the container is live.
pub const CONTROLS_HIDDEN_CLASS: &str = "reorder-controls-hidden";

/// Item hook resumed after a camera card settles.
const RECONNECT_HOOK: &str = "reconnectStream";

pub fn element_rect(el: &Element) -> Rect {
    let rect = el.get_bounding_client_rect();
    Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
}

/// Reads an item's identifier using the container kind's attribute order.
pub fn item_id_of(el: &Element, kind: ContainerKind) -> Option<ItemId> {
    kind.id_attributes()
        .iter()
        .find_map(|attr| el.get_attribute(attr).filter(|id| !id.is_empty()))
        .map(ItemId)
}

/// One reorderable region in the document.
pub struct DomContainer {
    element: HtmlElement,
    kind: ContainerKind,
    /// Class of the library's own drag image, which may sit among the items.
    fallback_class: String,
}

impl DomContainer {
    pub fn new(element: HtmlElement, kind: ContainerKind, fallback_class: &str) -> Self {
        DomContainer {
            element,
            kind,
            fallback_class: fallback_class.to_string(),
        }
    }

    pub fn element(&self) -> &HtmlElement {
        &self.element
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    fn items(&self) -> Vec<(ItemId, Element)> {
        let children = self.element.children();
        (0..children.length())
            .filter_map(|i| children.item(i))
            .filter(|el| self.fallback_class.is_empty() || !el.class_list().contains(&self.fallback_class))
            .filter_map(|el| item_id_of(&el, self.kind).map(|id| (id, el)))
            .collect()
    }

    fn find_item(&self, item: &ItemId) -> Option<Element> {
        self.items().into_iter().find(|(id, _)| id == item).map(|(_, el)| el)
    }

    pub fn item_id(&self, el: &Element) -> Option<ItemId> {
        item_id_of(el, self.kind)
    }
}

impl ContainerSurface for DomContainer {
    fn item_order(&self) -> Vec<ItemId> {
        self.items().into_iter().map(|(id, _)| id).collect()
    }

    fn restore_order(&self, order: &[ItemId]) {
        let items = self.items();
        for id in order {
            if let Some((_, el)) = items.iter().find(|(existing, _)| existing == id) {
                // Appending an attached node moves it.
                if let Err(e) = self.element.append_child(el) {
                    log::warn!("failed to restore {} in {}: {}", id, self.kind, js_message(&e));
                }
            }
        }
    }

    fn item_kind(&self, item: &ItemId) -> ItemKind {
        let marker = self.find_item(item).and_then(|el| el.get_attribute(ITEM_KIND_ATTR));
        ItemKind::classify(self.kind, marker.as_deref())
    }

    fn set_dragging(&self, item: &ItemId, dragging: bool) {
        if let Some(el) = self.find_item(item) {
            let classes = el.class_list();
            let _ = if dragging {
                classes.add_1(DRAGGING_CLASS)
            } else {
                classes.remove_1(DRAGGING_CLASS)
            };
        }
    }

    fn set_controls_hidden(&self, hidden: bool) {
        let Ok(controls) = self.element.query_selector_all(CONTROL_SELECTOR) else {
            return;
        };
        for i in 0..controls.length() {
            let Some(control) = controls.get(i).and_then(|n| n.dyn_into::<Element>().ok()) else {
                continue;
            };
            let classes = control.class_list();
            let _ = if hidden {
                classes.add_1(CONTROLS_HIDDEN_CLASS)
            } else {
                classes.remove_1(CONTROLS_HIDDEN_CLASS)
            };
        }
    }

    fn clone_plan(&self, item: &ItemId, kind: ItemKind, pointer: Point, lift: Lift) -> ClonePlan {
        match self.find_item(item) {
            Some(el) => {
                let rect = element_rect(&el);
                plan_clone(&DomNode::from(el), rect, kind, pointer, lift)
            }
            None => {
                log::debug!("{} not found in {}, using a flat clone", item, self.kind);
                let size = Default::default();
                ClonePlan {
                    kind,
                    body: CloneBody::Flat {
                        background: reorder_core::clone::FALLBACK_BACKGROUND.to_string(),
                    },
                    size,
                    placement: Placement::centered(pointer, size),
                    lift,
                    fallback_background: reorder_core::clone::FALLBACK_BACKGROUND.to_string(),
                }
            }
        }
    }

    fn reconnect_stream(&self, item: &ItemId) {
        let Some(el) = self.find_item(item) else {
            return;
        };
        let hook = match Reflect::get(&el, &JsValue::from_str(RECONNECT_HOOK)) {
            Ok(hook) => hook,
            Err(_) => return,
        };
        if let Some(hook) = hook.dyn_ref::<Function>() {
            if let Err(e) = hook.call0(&el) {
                log::warn!("{} on {} failed: {}", RECONNECT_HOOK, item, js_message(&e));
            }
        }
    }

    fn vibrate(&self, duration_ms: u32) {
        if let Some(window) = web_sys::window() {
            window.navigator().vibrate_with_duration(duration_ms);
        }
    }
}

/// Live DOM node viewed through [`SourceNode`].
#[derive(Clone)]
pub struct DomNode(pub Node);

impl From<Element> for DomNode {
    fn from(el: Element) -> Self {
        DomNode(el.into())
    }
}

impl DomNode {
    fn element(&self) -> Option<&Element> {
        self.0.dyn_ref::<Element>()
    }
}

impl SourceNode for DomNode {
    fn node_kind(&self) -> NodeKind {
        match self.0.node_type() {
            Node::ELEMENT_NODE => match self.element() {
                Some(el) => NodeKind::Element(el.tag_name().to_lowercase()),
                None => NodeKind::Other,
            },
            Node::TEXT_NODE => NodeKind::Text(self.0.text_content().unwrap_or_default()),
            _ => NodeKind::Other,
        }
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.element()?.get_attribute(name)
    }

    fn children(&self) -> Vec<Self> {
        let nodes = self.0.child_nodes();
        (0..nodes.length())
            .filter_map(|i| nodes.get(i))
            .map(DomNode)
            .collect()
    }

    fn computed_style(&self, property: &str) -> Result<String, CloneError> {
        let el = self.element().ok_or_else(|| CloneError::new("not an element"))?;
        let window = web_sys::window().ok_or_else(|| CloneError::new("no window"))?;
        let style = window
            .get_computed_style(el)
            .map_err(|e| CloneError::new(js_message(&e)))?
            .ok_or_else(|| CloneError::new("computed style unavailable"))?;
        style
            .get_property_value(property)
            .map_err(|e| CloneError::new(js_message(&e)))
    }

    fn find(&self, selector: &str) -> Option<Self> {
        if self.matches(selector) {
            return Some(self.clone());
        }
        let found = self.element()?.query_selector(selector).ok()??;
        Some(DomNode::from(found))
    }

    fn matches(&self, selector: &str) -> bool {
        self.element()
            .map(|el| el.matches(selector).unwrap_or(false))
            .unwrap_or(false)
    }

    fn image_state(&self) -> Option<ImageState> {
        let img = self.0.dyn_ref::<HtmlImageElement>()?;
        Some(if !img.complete() {
            ImageState::Pending
        } else if img.natural_width() == 0 {
            ImageState::Broken
        } else {
            ImageState::Loaded(img.current_src())
        })
    }

    fn text_content(&self) -> String {
        self.0.text_content().unwrap_or_default()
    }
}
