//! Discovers reorderable regions under a root and binds SortableJS to them.

use std::rc::Rc;

use reorder_core::container::{AREA_ATTR, CHIP_ROW_ATTR, RENDER_CONTEXT_ATTR, ROLE_ATTR, SECTION_ATTR};
use reorder_core::{
    Attachment, ContainerContext, ContainerKind, ContainerSurface, DragSession, EdgeScroller,
    EngineContext, OrderStore, Region, RegionBinder, ReorderError, Result,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlElement};

use crate::dom::{element_rect, DomContainer};
use crate::driver::SessionDriver;
use crate::scroll::{DomScroll, RafScheduler};
use crate::sortable::{event_item, event_pointer, SortableCallbacks, SortableHandle};

/// SortableJS instance plus the session it drives.
pub struct SortableAttachment {
    sortable: SortableHandle,
    driver: Rc<SessionDriver>,
}

impl SortableAttachment {
    pub fn driver(&self) -> &Rc<SessionDriver> {
        &self.driver
    }
}

impl Attachment for SortableAttachment {
    fn detach(&mut self) {
        // A drag in flight is rolled back before the library lets go.
        self.driver.cancel();
        self.sortable.destroy();
    }
}

pub struct DomBinder {
    root: HtmlElement,
    engine: EngineContext,
    store: Rc<dyn OrderStore>,
}

impl DomBinder {
    pub fn new(root: HtmlElement, engine: EngineContext, store: Rc<dyn OrderStore>) -> Self {
        DomBinder { root, engine, store }
    }

    fn region_of(&self, el: Element) -> Option<Region<HtmlElement>> {
        let role = el.get_attribute(ROLE_ATTR)?;
        let kind = ContainerKind::classify(&role, el.has_attribute(CHIP_ROW_ATTR))?;
        let area_id = el
            .closest(&format!("[{}]", AREA_ATTR))
            .ok()
            .flatten()
            .and_then(|area| area.get_attribute(AREA_ATTR));
        let context = ContainerContext {
            area_id,
            section_type: el.get_attribute(SECTION_ATTR),
            render_context: self.root.get_attribute(RENDER_CONTEXT_ATTR),
        };
        let handle = el.dyn_into::<HtmlElement>().ok()?;
        Some(Region { kind, context, handle })
    }
}

impl RegionBinder for DomBinder {
    type Handle = HtmlElement;
    type Attachment = SortableAttachment;

    fn discover(&self) -> Vec<Region<HtmlElement>> {
        let mut regions = Vec::new();
        if let Some(region) = self.region_of(self.root.clone().into()) {
            regions.push(region);
        }
        let Ok(found) = self.root.query_selector_all(&format!("[{}]", ROLE_ATTR)) else {
            return regions;
        };
        for i in 0..found.length() {
            if let Some(el) = found.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                regions.extend(self.region_of(el));
            }
        }
        regions
    }

    fn bind(&self, region: &Region<HtmlElement>) -> Result<SortableAttachment> {
        let sensor = self.engine.config.sensor(region.kind);
        let container = Rc::new(DomContainer::new(
            region.handle.clone(),
            region.kind,
            &sensor.fallback_class,
        ));
        if container.item_order().is_empty() {
            return Err(ReorderError::EmptyContainer);
        }

        let mut session = DragSession::new(
            region.kind,
            region.context.clone(),
            container.clone(),
            self.store.clone(),
            self.engine.clone(),
        );
        if let Some(zone) = self.engine.config.edge_zone(region.kind) {
            let scroll = Rc::new(DomScroll::new(region.handle.clone()));
            session = session.with_scroller(EdgeScroller::new(zone, scroll, Rc::new(RafScheduler)));
        }
        let driver = SessionDriver::new(session);

        let callbacks = callbacks(&driver, &container);
        let sortable = SortableHandle::create(&region.handle, sensor, callbacks)?;
        log::debug!(
            "bound {} region {:?} with {} items",
            region.kind,
            region.context.area_id,
            container.item_order().len()
        );
        Ok(SortableAttachment { sortable, driver })
    }
}

fn callbacks(driver: &Rc<SessionDriver>, container: &Rc<DomContainer>) -> SortableCallbacks {
    let on_choose = {
        let driver = Rc::downgrade(driver);
        let container = Rc::downgrade(container);
        Closure::<dyn FnMut(JsValue)>::new(move |evt: JsValue| {
            let (Some(driver), Some(container)) = (driver.upgrade(), container.upgrade()) else {
                return;
            };
            let Some(item) = event_item(&evt) else {
                return;
            };
            let Some(id) = container.item_id(&item) else {
                log::debug!("chosen element in {} has no item id", container.kind());
                return;
            };
            let origin = event_pointer(&evt).unwrap_or_else(|| element_rect(&item).center());
            driver.choose(id, origin);
        })
    };

    let on_unchoose = {
        let driver = Rc::downgrade(driver);
        Closure::<dyn FnMut(JsValue)>::new(move |_evt: JsValue| {
            if let Some(driver) = driver.upgrade() {
                driver.unchoose();
            }
        })
    };

    let on_start = {
        let driver = Rc::downgrade(driver);
        Closure::<dyn FnMut(JsValue)>::new(move |_evt: JsValue| {
            if let Some(driver) = driver.upgrade() {
                driver.start();
            }
        })
    };

    let on_end = {
        let driver = Rc::downgrade(driver);
        Closure::<dyn FnMut(JsValue)>::new(move |_evt: JsValue| {
            if let Some(driver) = driver.upgrade() {
                // Failures are logged by the session; the library still has
                // to finish its own drop handling.
                let _ = driver.end();
            }
        })
    };

    SortableCallbacks {
        on_choose: Some(on_choose),
        on_unchoose: Some(on_unchoose),
        on_start: Some(on_start),
        on_end: Some(on_end),
    }
}
