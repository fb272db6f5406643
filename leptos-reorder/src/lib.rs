//! Leptos Reorder
//!
//! Browser backend for `reorder-core`. Binds SortableJS to the grids,
//! carousels and chip rows found under a root, renders the floating clone
//! into the document, drives edge auto-scroll from animation frames and
//! mirrors the reordering flag into leptos signals.
//!
//! SortableJS must be loaded as the global `Sortable` before `attach` is
//! called; regions are skipped otherwise.

pub mod binder;
pub mod clone_dom;
pub mod dom;
pub mod driver;
pub mod reorderer;
pub mod scroll;
pub mod signals;
pub mod sortable;
pub mod styles;

pub use reorder_core;
pub use reorder_core::{OrderCommit, OrderStore, PersistError, ReorderConfig, ReorderError, ReorderFlag};
pub use reorderer::{use_reorder, Reorderer};
pub use signals::{create_reorder_signals, guard_tap, ReorderSignals};
