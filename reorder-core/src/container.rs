//! Container and item vocabulary plus the DOM contract hosts must follow.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PersistError;

/// Attribute carrying a region's structural role.
pub const ROLE_ATTR: &str = "data-reorder-role";
/// Marks the carousel row that holds chips.
pub const CHIP_ROW_ATTR: &str = "data-chip-row";
pub const AREA_ATTR: &str = "data-area-id";
pub const SECTION_ATTR: &str = "data-section-type";
/// Read from the attached root and passed through to carousel commits.
pub const RENDER_CONTEXT_ATTR: &str = "data-render-context";
pub const ENTITY_ID_ATTR: &str = "data-entity-id";
pub const CHIP_ID_ATTR: &str = "data-chip-id";
pub const ITEM_ID_ATTR: &str = "data-item-id";
pub const ITEM_KIND_ATTR: &str = "data-item-kind";
/// Per-item interactive controls, hidden while a drag is live.
pub const CONTROL_SELECTOR: &str = ".card-actions, [data-reorder-control]";
pub const CAMERA_FRAME_SELECTOR: &str = ".camera-frame";
pub const CAMERA_UNAVAILABLE_SELECTOR: &str = ".camera-unavailable";
pub const ENTITY_NAME_SELECTOR: &str = ".entity-name";
pub const ENTITY_NAME_ATTR: &str = "data-entity-name";

/// The three kinds of region the engine manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContainerKind {
    /// Free-flow area of cards.
    Grid,
    /// Horizontally scrollable row of cards.
    Carousel,
    /// Horizontally scrollable row of compact chips.
    ChipRow,
}

impl ContainerKind {
    /// Maps a role marker to a kind. A carousel flagged as the chip row
    /// is the chip row, never a card carousel.
    pub fn classify(role: &str, is_chip_row: bool) -> Option<Self> {
        match role.trim() {
            "chip-row" => Some(ContainerKind::ChipRow),
            "carousel" if is_chip_row => Some(ContainerKind::ChipRow),
            "carousel" => Some(ContainerKind::Carousel),
            "grid" => Some(ContainerKind::Grid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContainerKind::Grid => "grid",
            ContainerKind::Carousel => "carousel",
            ContainerKind::ChipRow => "chip-row",
        }
    }

    /// Attributes an item identifier is read from, in priority order.
    pub fn id_attributes(&self) -> &'static [&'static str] {
        match self {
            ContainerKind::ChipRow => &[CHIP_ID_ATTR, ITEM_ID_ATTR],
            ContainerKind::Grid | ContainerKind::Carousel => &[ENTITY_ID_ATTR, ITEM_ID_ATTR],
        }
    }

    /// Whether the kind scrolls horizontally and therefore auto-scrolls.
    pub fn scrolls(&self) -> bool {
        !matches!(self, ContainerKind::Grid)
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identifier of one draggable item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        ItemId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId(id.to_string())
    }
}

/// Item variants that get distinct clone strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemKind {
    Plain,
    Card,
    Camera,
    Chip,
}

impl ItemKind {
    /// Chooses the kind from the container and the item's `data-item-kind`
    /// marker. Unmarked items in card containers are cards.
    pub fn classify(container: ContainerKind, marker: Option<&str>) -> Self {
        if container == ContainerKind::ChipRow {
            return ItemKind::Chip;
        }
        match marker.map(str::trim) {
            Some("camera") => ItemKind::Camera,
            Some("plain") => ItemKind::Plain,
            _ => ItemKind::Card,
        }
    }
}

/// Identifies a container to the persistence layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerContext {
    pub area_id: Option<String>,
    pub section_type: Option<String>,
    pub render_context: Option<String>,
}

/// Item identifiers in DOM order, read once a session ends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderSnapshot(pub Vec<ItemId>);

impl OrderSnapshot {
    pub fn ids(&self) -> &[ItemId] {
        &self.0
    }

    pub fn into_ids(self) -> Vec<ItemId> {
        self.0
    }
}

impl<S: Into<String>> FromIterator<S> for OrderSnapshot {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        OrderSnapshot(iter.into_iter().map(|id| ItemId(id.into())).collect())
    }
}

/// What the host receives when a drag completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum OrderCommit {
    /// The host typically re-reads the area itself; the snapshot is
    /// included for convenience.
    Grid {
        area_id: String,
        item_ids: Vec<ItemId>,
    },
    Carousel {
        area_id: String,
        section_type: Option<String>,
        item_ids: Vec<ItemId>,
        render_context: Option<String>,
    },
    Chips {
        chip_ids: Vec<ItemId>,
    },
}

impl OrderCommit {
    pub fn new(kind: ContainerKind, context: &ContainerContext, order: OrderSnapshot) -> Self {
        let area_id = context.area_id.clone().unwrap_or_default();
        match kind {
            ContainerKind::Grid => OrderCommit::Grid {
                area_id,
                item_ids: order.into_ids(),
            },
            ContainerKind::Carousel => OrderCommit::Carousel {
                area_id,
                section_type: context.section_type.clone(),
                item_ids: order.into_ids(),
                render_context: context.render_context.clone(),
            },
            ContainerKind::ChipRow => OrderCommit::Chips {
                chip_ids: order.into_ids(),
            },
        }
    }

    pub fn item_ids(&self) -> &[ItemId] {
        match self {
            OrderCommit::Grid { item_ids, .. } | OrderCommit::Carousel { item_ids, .. } => item_ids,
            OrderCommit::Chips { chip_ids } => chip_ids,
        }
    }
}

/// Persistence seam into the dashboard's configuration store.
pub trait OrderStore {
    fn order_changed(&self, commit: &OrderCommit) -> Result<(), PersistError>;
}

impl<F> OrderStore for F
where
    F: Fn(&OrderCommit) -> Result<(), PersistError>,
{
    fn order_changed(&self, commit: &OrderCommit) -> Result<(), PersistError> {
        self(commit)
    }
}
