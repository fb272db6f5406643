//! Host-facing entry point.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::html::Div;
use leptos::prelude::*;
use reorder_core::registry::RootKey;
use reorder_core::{
    EngineContext, OrderStore, Registry, ReorderConfig, ReorderError, ReorderFlag, Result,
    VisualClone,
};
use web_sys::{Document, HtmlElement};

use crate::binder::{DomBinder, SortableAttachment};
use crate::clone_dom::DomCloneSurface;
use crate::styles;

/// Attribute carrying the key a root was registered under.
pub const ROOT_KEY_ATTR: &str = "data-reorder-root";

struct Inner {
    document: Document,
    engine: EngineContext,
    store: Rc<dyn OrderStore>,
    registry: RefCell<Registry<SortableAttachment>>,
    next_root: Cell<u64>,
}

/// Enables drag-to-reorder on dashboard roots.
///
/// Clones share one engine: one reordering flag, one floating clone and
/// one stylesheet for every root attached through them.
#[derive(Clone)]
pub struct Reorderer {
    inner: Rc<Inner>,
}

impl Reorderer {
    pub fn new(config: ReorderConfig, store: impl OrderStore + 'static) -> Result<Self> {
        config.validate()?;
        let document = web_sys::window()
            .and_then(|window| window.document())
            .ok_or_else(|| ReorderError::Config("no document available".to_string()))?;
        let clone = VisualClone::new(Rc::new(DomCloneSurface::new(document.clone())));
        Ok(Reorderer {
            inner: Rc::new(Inner {
                document,
                engine: EngineContext {
                    config: Rc::new(config),
                    flag: ReorderFlag::new(),
                    clone: Rc::new(clone),
                },
                store: Rc::new(store),
                registry: RefCell::new(Registry::new()),
                next_root: Cell::new(0),
            }),
        })
    }

    /// Shared flag; true while any drag is live.
    pub fn flag(&self) -> ReorderFlag {
        self.inner.engine.flag.clone()
    }

    pub fn is_reordering(&self) -> bool {
        self.inner.engine.flag.get()
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.inner.engine.config
    }

    /// Binds every reorderable region under `root`, replacing earlier
    /// bindings of the same root. Returns the number of regions bound.
    pub fn attach(&self, root: &HtmlElement) -> usize {
        let key = self.root_key(root);
        let binder = DomBinder::new(root.clone(), self.inner.engine.clone(), self.inner.store.clone());
        let Ok(mut registry) = self.inner.registry.try_borrow_mut() else {
            log::warn!("attach called re-entrantly, ignoring {:?}", key);
            return 0;
        };
        registry.install_styles_once(|| styles::install(&self.inner.document, &self.inner.engine.config));
        registry.attach(key, &binder)
    }

    /// Tears down every binding under `root`. Unknown roots are ignored.
    pub fn detach(&self, root: &HtmlElement) -> usize {
        let Some(key) = root.get_attribute(ROOT_KEY_ATTR).map(RootKey) else {
            return 0;
        };
        match self.inner.registry.try_borrow_mut() {
            Ok(mut registry) => registry.detach(&key),
            Err(_) => 0,
        }
    }

    pub fn detach_all(&self) {
        if let Ok(mut registry) = self.inner.registry.try_borrow_mut() {
            registry.detach_all();
        }
    }

    fn root_key(&self, root: &HtmlElement) -> RootKey {
        if let Some(key) = root.get_attribute(ROOT_KEY_ATTR) {
            return RootKey(key);
        }
        let n = self.inner.next_root.get();
        self.inner.next_root.set(n + 1);
        let key = format!("root-{}", n);
        let _ = root.set_attribute(ROOT_KEY_ATTR, &key);
        RootKey(key)
    }
}

/// Attaches `reorderer` to the node once it mounts and detaches it when
/// the owner is cleaned up.
pub fn use_reorder(node_ref: NodeRef<Div>, reorderer: Reorderer) {
    let handle = StoredValue::new_local(reorderer);
    Effect::new(move |_| {
        if let Some(root) = node_ref.get() {
            handle.try_with_value(|reorderer| reorderer.attach(&root));
        }
    });
    on_cleanup(move || {
        if let Some(root) = node_ref.get_untracked() {
            handle.try_with_value(|reorderer| reorderer.detach(&root));
        }
    });
}
