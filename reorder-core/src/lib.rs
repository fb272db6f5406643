//! Reorder Core
//!
//! Host-independent drag-to-reorder engine for card grids, horizontal
//! carousels and chip rows. A sensing library decides when a drag starts
//! and reorders nodes live; this crate runs everything around it: the
//! session lifecycle, the floating clone, edge auto-scroll, the shared
//! "reordering" flag and the one-shot order commit.
//!
//! Hosts plug in through small traits ([`ContainerSurface`],
//! [`CloneSurface`], [`ScrollSurface`], [`FrameScheduler`],
//! [`RegionBinder`], [`OrderStore`]). The browser backend lives in the
//! `leptos-reorder` crate.

pub mod autoscroll;
pub mod clone;
pub mod config;
pub mod container;
pub mod error;
pub mod flag;
pub mod geometry;
pub mod registry;
pub mod session;

pub use autoscroll::{velocity_for, EdgeScroller, FrameHandle, FrameScheduler, ScrollSurface};
pub use clone::{plan_clone, CloneBody, ClonePlan, CloneSurface, CloneTree, SourceNode, VisualClone};
pub use config::{Direction, EdgeZone, Haptic, Haptics, Lift, ReorderConfig, SensorOptions};
pub use container::{
    ContainerContext, ContainerKind, ItemId, ItemKind, OrderCommit, OrderSnapshot, OrderStore,
};
pub use error::{CloneError, ListenerError, PersistError, ReorderError, Result};
pub use flag::{ListenerId, ReorderFlag};
pub use geometry::{Placement, Point, Rect, Size};
pub use registry::{Attachment, Region, RegionBinder, Registry, RootKey};
pub use session::{ContainerSurface, DragSession, EngineContext, SessionPhase};
