//! One drag at a time on one container.
//!
//! The sensing library drives the phases: `choose` arms the session,
//! `start` begins the drag, `end` settles and commits, `cancel` rolls back.
//! The library reorders nodes live while the pointer moves; the session
//! only reads the final order once the drag ends.

use std::rc::Rc;

use crate::autoscroll::EdgeScroller;
use crate::clone::{ClonePlan, VisualClone};
use crate::config::{Haptic, Lift, ReorderConfig};
use crate::container::{ContainerContext, ContainerKind, ItemId, ItemKind, OrderCommit, OrderSnapshot, OrderStore};
use crate::error::Result;
use crate::flag::ReorderFlag;
use crate::geometry::Point;

/// The container a session runs on, as seen by the engine.
pub trait ContainerSurface {
    /// Item identifiers in current DOM order.
    fn item_order(&self) -> Vec<ItemId>;
    /// Puts the items back into `order`.
    fn restore_order(&self, order: &[ItemId]);
    fn item_kind(&self, item: &ItemId) -> ItemKind;
    fn set_dragging(&self, item: &ItemId, dragging: bool);
    /// Hides or shows every control sub-element in the container.
    fn set_controls_hidden(&self, hidden: bool);
    fn clone_plan(&self, item: &ItemId, kind: ItemKind, pointer: Point, lift: Lift) -> ClonePlan;
    /// Resumes a live stream the clone may have interrupted.
    fn reconnect_stream(&self, item: &ItemId);
    fn vibrate(&self, duration_ms: u32);
}

/// Shared by every session an engine creates.
#[derive(Clone)]
pub struct EngineContext {
    pub config: Rc<ReorderConfig>,
    pub flag: ReorderFlag,
    pub clone: Rc<VisualClone>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Armed,
    Dragging,
    Settling,
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Armed {
        item: ItemId,
        origin: Point,
    },
    Dragging {
        item: ItemId,
        kind: ItemKind,
        pointer: Point,
        initial: Vec<ItemId>,
    },
    Settling,
}

pub struct DragSession {
    kind: ContainerKind,
    context: ContainerContext,
    surface: Rc<dyn ContainerSurface>,
    store: Rc<dyn OrderStore>,
    scroller: Option<Rc<EdgeScroller>>,
    engine: EngineContext,
    phase: Phase,
}

impl DragSession {
    pub fn new(
        kind: ContainerKind,
        context: ContainerContext,
        surface: Rc<dyn ContainerSurface>,
        store: Rc<dyn OrderStore>,
        engine: EngineContext,
    ) -> Self {
        DragSession {
            kind,
            context,
            surface,
            store,
            scroller: None,
            engine,
            phase: Phase::Idle,
        }
    }

    /// Attaches the auto-scroll controller used while dragging.
    pub fn with_scroller(mut self, scroller: Rc<EdgeScroller>) -> Self {
        self.scroller = Some(scroller);
        self
    }

    pub fn kind(&self) -> ContainerKind {
        self.kind
    }

    pub fn context(&self) -> &ContainerContext {
        &self.context
    }

    pub fn phase(&self) -> SessionPhase {
        match self.phase {
            Phase::Idle => SessionPhase::Idle,
            Phase::Armed { .. } => SessionPhase::Armed,
            Phase::Dragging { .. } => SessionPhase::Dragging,
            Phase::Settling => SessionPhase::Settling,
        }
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.phase, Phase::Dragging { .. })
    }

    /// Last pointer position seen during the drag.
    pub fn pointer(&self) -> Option<Point> {
        match &self.phase {
            Phase::Armed { origin, .. } => Some(*origin),
            Phase::Dragging { pointer, .. } => Some(*pointer),
            _ => None,
        }
    }

    /// The gesture picked an item; nothing visible happens yet.
    pub fn choose(&mut self, item: ItemId, origin: Point) {
        match self.phase {
            Phase::Idle | Phase::Armed { .. } => {
                log::debug!("{} armed on {}", self.kind, item);
                self.phase = Phase::Armed { item, origin };
            }
            _ => log::debug!("{} ignoring choose of {} while busy", self.kind, item),
        }
    }

    /// Press released before the drag began.
    pub fn unchoose(&mut self) {
        if let Phase::Armed { .. } = self.phase {
            self.phase = Phase::Idle;
        }
    }

    /// Begins the drag on the armed item.
    pub fn start(&mut self) {
        let (item, origin) = match &self.phase {
            Phase::Armed { item, origin } => (item.clone(), *origin),
            _ => {
                log::debug!("{} start without an armed item", self.kind);
                return;
            }
        };

        let kind = self.surface.item_kind(&item);
        let initial = self.surface.item_order();
        log::debug!("{} drag started on {} ({:?})", self.kind, item, kind);

        self.surface.set_dragging(&item, true);
        self.surface.set_controls_hidden(true);

        let plan = self.surface.clone_plan(&item, kind, origin, self.engine.config.lift);
        self.engine.clone.create(&plan);

        self.engine.flag.set(true);
        self.pulse(Haptic::Lift);

        self.phase = Phase::Dragging {
            item,
            kind,
            pointer: origin,
            initial,
        };
    }

    pub fn pointer_moved(&mut self, point: Point) {
        let Phase::Dragging { pointer, .. } = &mut self.phase else {
            return;
        };
        *pointer = point;
        self.engine.clone.update_position(point);
        if let Some(scroller) = &self.scroller {
            scroller.update(point.x);
        }
    }

    /// Drop: tears the drag down, then commits the order exactly once.
    ///
    /// Returns `Ok(None)` when no drag was live. A store failure is
    /// returned after teardown; the session is idle either way.
    pub fn end(&mut self) -> Result<Option<OrderSnapshot>> {
        let (item, kind) = match std::mem::replace(&mut self.phase, Phase::Settling) {
            Phase::Dragging { item, kind, .. } => (item, kind),
            Phase::Armed { .. } | Phase::Idle | Phase::Settling => {
                self.phase = Phase::Idle;
                return Ok(None);
            }
        };

        self.teardown(&item);
        self.pulse(Haptic::Settle);
        if kind == ItemKind::Camera {
            self.surface.reconnect_stream(&item);
        }

        let order = OrderSnapshot(self.surface.item_order());
        self.phase = Phase::Idle;

        let commit = OrderCommit::new(self.kind, &self.context, order.clone());
        log::debug!("{} committing {} items", self.kind, order.ids().len());
        if let Err(e) = self.store.order_changed(&commit) {
            log::error!("failed to persist {} order: {}", self.kind, e);
            return Err(e.into());
        }
        Ok(Some(order))
    }

    /// Abandons the gesture without committing and restores the order
    /// captured at drag start.
    ///
    /// Only a live drag owns the shared clone and flag; cancelling any other
    /// phase just returns this session to idle.
    pub fn cancel(&mut self) {
        if let Phase::Dragging { item, initial, .. } = std::mem::replace(&mut self.phase, Phase::Idle) {
            log::debug!("{} drag on {} cancelled", self.kind, item);
            self.teardown(&item);
            if self.surface.item_order() != initial {
                self.surface.restore_order(&initial);
            }
        }
    }

    fn teardown(&self, item: &ItemId) {
        self.surface.set_dragging(item, false);
        self.surface.set_controls_hidden(false);
        self.engine.clone.destroy();
        if let Some(scroller) = &self.scroller {
            scroller.stop();
        }
        self.engine.flag.set(false);
    }

    fn pulse(&self, pulse: Haptic) {
        let duration = self.engine.config.haptics.duration(pulse);
        if duration > 0 {
            self.surface.vibrate(duration);
        }
    }
}
