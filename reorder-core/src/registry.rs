//! Tracks which roots have reorderable regions attached.
//!
//! A root is any element the host enables reordering on. Attaching it again
//! tears down the previous attachments first, so hosts can re-run
//! `attach` after every render without leaking sensing-library instances.

use std::collections::HashMap;

use crate::container::{ContainerContext, ContainerKind};
use crate::error::Result;

/// Opaque key the host assigns to a root.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RootKey(pub String);

impl RootKey {
    pub fn new(key: impl Into<String>) -> Self {
        RootKey(key.into())
    }
}

/// A reorderable region found under a root.
#[derive(Debug, Clone)]
pub struct Region<H> {
    pub kind: ContainerKind,
    pub context: ContainerContext,
    pub handle: H,
}

/// A live sensing-library binding plus its session.
pub trait Attachment {
    /// Releases the binding. Must be safe to call more than once.
    fn detach(&mut self);
}

/// Finds regions under one root and binds each one.
pub trait RegionBinder {
    type Handle;
    type Attachment: Attachment;

    fn discover(&self) -> Vec<Region<Self::Handle>>;
    fn bind(&self, region: &Region<Self::Handle>) -> Result<Self::Attachment>;
}

pub struct Registry<A: Attachment> {
    roots: HashMap<RootKey, Vec<A>>,
    styles_installed: bool,
}

impl<A: Attachment> Default for Registry<A> {
    fn default() -> Self {
        Registry {
            roots: HashMap::new(),
            styles_installed: false,
        }
    }
}

impl<A: Attachment> Registry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every region the binder discovers under `root`, replacing any
    /// previous attachments. Regions that fail to bind are skipped.
    /// Returns the number of regions now attached.
    pub fn attach<B>(&mut self, root: RootKey, binder: &B) -> usize
    where
        B: RegionBinder<Attachment = A>,
    {
        self.detach(&root);

        let mut attachments = Vec::new();
        for region in binder.discover() {
            match binder.bind(&region) {
                Ok(attachment) => attachments.push(attachment),
                Err(e) => log::debug!("skipping {} region {:?}: {}", region.kind, region.context.area_id, e),
            }
        }

        let count = attachments.len();
        log::debug!("attached {} regions under {:?}", count, root);
        if count > 0 {
            self.roots.insert(root, attachments);
        }
        count
    }

    /// Tears down everything under `root`. Unknown roots are ignored.
    pub fn detach(&mut self, root: &RootKey) -> usize {
        match self.roots.remove(root) {
            Some(mut attachments) => {
                for attachment in attachments.iter_mut() {
                    attachment.detach();
                }
                attachments.len()
            }
            None => 0,
        }
    }

    pub fn detach_all(&mut self) {
        let keys: Vec<RootKey> = self.roots.keys().cloned().collect();
        for key in keys {
            self.detach(&key);
        }
    }

    pub fn is_attached(&self, root: &RootKey) -> bool {
        self.roots.contains_key(root)
    }

    pub fn attachment_count(&self) -> usize {
        self.roots.values().map(Vec::len).sum()
    }

    /// Runs `install` the first time it is called; later calls are no-ops.
    /// A failed install is retried on the next call.
    pub fn install_styles_once<F>(&mut self, install: F)
    where
        F: FnOnce() -> Result<()>,
    {
        if self.styles_installed {
            return;
        }
        match install() {
            Ok(()) => self.styles_installed = true,
            Err(e) => log::warn!("failed to install reorder styles: {}", e),
        }
    }

    pub fn styles_installed(&self) -> bool {
        self.styles_installed
    }
}

impl<A: Attachment> Drop for Registry<A> {
    fn drop(&mut self) {
        self.detach_all();
    }
}
