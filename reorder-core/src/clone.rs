//! Floating clone of the dragged item.
//!
//! Building a clone happens in two steps. [`plan_clone`] walks the live item
//! through the [`SourceNode`] trait and captures what the clone must look
//! like: a fixed allow-list of computed styles per node, icon identifiers,
//! current image sources, or a camera placeholder. A [`CloneSurface`] then
//! renders that plan as one detached node. [`VisualClone`] owns the node's
//! lifecycle and guarantees at most one exists.

use std::cell::Cell;
use std::rc::Rc;

use crate::config::Lift;
use crate::container::{
    ItemKind, CAMERA_FRAME_SELECTOR, CAMERA_UNAVAILABLE_SELECTOR, CONTROL_SELECTOR,
    ENTITY_NAME_ATTR, ENTITY_NAME_SELECTOR,
};
use crate::error::CloneError;
use crate::geometry::{Placement, Point, Rect, Size};

/// Subtrees deeper than this are cut off.
pub const MAX_CAPTURE_DEPTH: usize = 12;

/// Used when the source background cannot be read or is transparent.
pub const FALLBACK_BACKGROUND: &str = "rgba(127, 127, 127, 0.4)";

pub const CLONE_Z_INDEX: u32 = 10_000;

/// Layout and color only, for plain items.
pub const PLAIN_PROPERTIES: &[&str] = &[
    "display",
    "flex-direction",
    "align-items",
    "justify-content",
    "gap",
    "padding",
    "box-sizing",
    "width",
    "height",
    "color",
    "background-color",
    "border-radius",
];

/// Layout, typography, color, background and radius for card nodes.
pub const CARD_PROPERTIES: &[&str] = &[
    "display",
    "flex-direction",
    "flex-wrap",
    "align-items",
    "justify-content",
    "gap",
    "padding",
    "margin",
    "box-sizing",
    "width",
    "height",
    "overflow",
    "font-family",
    "font-size",
    "font-weight",
    "line-height",
    "letter-spacing",
    "text-align",
    "text-overflow",
    "white-space",
    "color",
    "opacity",
    "background-color",
    "background-image",
    "border",
    "border-radius",
    "box-shadow",
];

pub const ICON_PROPERTIES: &[&str] = &["width", "height", "color", "--mdc-icon-size"];

pub const IMAGE_PROPERTIES: &[&str] = &["width", "height", "object-fit", "border-radius"];

pub const CHIP_FRAME_PROPERTIES: &[&str] = &[
    "display",
    "align-items",
    "gap",
    "padding",
    "box-sizing",
    "background-color",
    "backdrop-filter",
    "-webkit-backdrop-filter",
    "border",
    "border-radius",
    "box-shadow",
];

const INLINE_TAGS: &[&str] = &["span", "b", "strong", "em", "i", "small", "sup", "sub"];

/// Coarse node classification a host reports for each source node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Lowercase tag name.
    Element(String),
    Text(String),
    /// Comments and anything else that never renders.
    Other,
}

/// Load state of an `<img>` at capture time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    /// Fully decoded; carries the current source.
    Loaded(String),
    Pending,
    Broken,
}

/// Read-only view of the live item being cloned.
pub trait SourceNode: Sized {
    fn node_kind(&self) -> NodeKind;
    fn attribute(&self, name: &str) -> Option<String>;
    /// Child nodes, text included, in document order.
    fn children(&self) -> Vec<Self>;
    fn computed_style(&self, property: &str) -> Result<String, CloneError>;
    /// First descendant (or self) matching a CSS selector.
    fn find(&self, selector: &str) -> Option<Self>;
    fn matches(&self, selector: &str) -> bool;
    /// `None` for anything that is not an image.
    fn image_state(&self) -> Option<ImageState>;
    fn text_content(&self) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleDecl {
    pub property: &'static str,
    pub value: String,
}

/// Captured structure of a card or chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneTree {
    /// Rendered with a neutral tag (`div` or an inline tag) so no
    /// component logic runs inside the clone.
    Element {
        tag: String,
        styles: Vec<StyleDecl>,
        children: Vec<CloneTree>,
    },
    /// Icon element re-created from its identifier alone.
    Icon {
        tag: String,
        icon: String,
        styles: Vec<StyleDecl>,
    },
    /// Static copy of the currently displayed pixels.
    Image { src: String, styles: Vec<StyleDecl> },
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraFrame {
    Snapshot { src: String },
    Unavailable,
    NoSnapshot,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraClone {
    pub frame: CameraFrame,
    /// Entity name shown as an overlay.
    pub name: String,
    pub frame_styles: Vec<StyleDecl>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneBody {
    Tree(CloneTree),
    Camera(CameraClone),
    Chip {
        frame: Vec<StyleDecl>,
        content: Vec<CloneTree>,
    },
    /// Lowest-fidelity clone: a block in the item's color.
    Flat { background: String },
}

/// Everything a surface needs to render the clone.
#[derive(Debug, Clone, PartialEq)]
pub struct ClonePlan {
    pub kind: ItemKind,
    pub body: CloneBody,
    pub size: Size,
    pub placement: Placement,
    pub lift: Lift,
    pub fallback_background: String,
}

impl ClonePlan {
    /// Same box, flat body.
    pub fn flattened(&self) -> ClonePlan {
        ClonePlan {
            body: CloneBody::Flat {
                background: self.fallback_background.clone(),
            },
            ..self.clone()
        }
    }

    pub fn is_flat(&self) -> bool {
        matches!(self.body, CloneBody::Flat { .. })
    }
}

/// Captures `source` into a plan sized like `rect` and centered on
/// `pointer`. Capture failures degrade to a flat block.
pub fn plan_clone<N: SourceNode>(
    source: &N,
    rect: Rect,
    kind: ItemKind,
    pointer: Point,
    lift: Lift,
) -> ClonePlan {
    let size = rect.size();
    let fallback_background = source
        .computed_style("background-color")
        .ok()
        .filter(|color| is_visible_color(color))
        .unwrap_or_else(|| FALLBACK_BACKGROUND.to_string());

    let captured = match kind {
        ItemKind::Plain => capture_root(source, PLAIN_PROPERTIES),
        ItemKind::Card => capture_root(source, CARD_PROPERTIES),
        ItemKind::Camera => Ok(CloneBody::Camera(capture_camera(source))),
        ItemKind::Chip => capture_chip(source),
    };
    let body = captured.unwrap_or_else(|e| {
        log::warn!("degrading {:?} clone to a flat block: {}", kind, e);
        CloneBody::Flat {
            background: fallback_background.clone(),
        }
    });

    ClonePlan {
        kind,
        body,
        size,
        placement: Placement::centered(pointer, size),
        lift,
        fallback_background,
    }
}

fn is_visible_color(color: &str) -> bool {
    let color = color.trim();
    !(color.is_empty() || color == "transparent" || color == "rgba(0, 0, 0, 0)")
}

fn capture_root<N: SourceNode>(source: &N, properties: &[&'static str]) -> Result<CloneBody, CloneError> {
    capture_tree(source, properties, 0)?
        .map(CloneBody::Tree)
        .ok_or_else(|| CloneError::new("item has no renderable content"))
}

fn capture_chip<N: SourceNode>(source: &N) -> Result<CloneBody, CloneError> {
    let frame = copy_styles(source, CHIP_FRAME_PROPERTIES)?;
    let mut content = Vec::new();
    for child in source.children() {
        if let Some(tree) = capture_tree(&child, CARD_PROPERTIES, 1)? {
            content.push(tree);
        }
    }
    Ok(CloneBody::Chip { frame, content })
}

fn capture_camera<N: SourceNode>(source: &N) -> CameraClone {
    let frame = match source.find(CAMERA_FRAME_SELECTOR) {
        None => CameraFrame::NoSnapshot,
        Some(region) if region.find(CAMERA_UNAVAILABLE_SELECTOR).is_some() => CameraFrame::Unavailable,
        Some(region) => match region.find("img").and_then(|img| img.image_state()) {
            Some(ImageState::Loaded(src)) if !src.is_empty() => CameraFrame::Snapshot { src },
            Some(ImageState::Broken) => CameraFrame::Unavailable,
            _ => CameraFrame::NoSnapshot,
        },
    };

    let name = source
        .find(ENTITY_NAME_SELECTOR)
        .map(|node| node.text_content().trim().to_string())
        .filter(|name| !name.is_empty())
        .or_else(|| source.attribute(ENTITY_NAME_ATTR))
        .unwrap_or_default();

    // Placeholders still look right without the frame styles.
    let frame_styles = copy_styles(source, &["border-radius", "background-color"]).unwrap_or_default();

    CameraClone {
        frame,
        name,
        frame_styles,
    }
}

fn capture_tree<N: SourceNode>(
    node: &N,
    properties: &[&'static str],
    depth: usize,
) -> Result<Option<CloneTree>, CloneError> {
    let tag = match node.node_kind() {
        NodeKind::Other => return Ok(None),
        NodeKind::Text(text) if text.trim().is_empty() => return Ok(None),
        NodeKind::Text(text) => return Ok(Some(CloneTree::Text(text))),
        NodeKind::Element(tag) => tag,
    };

    // Controls are hidden during the drag; the clone leaves them out.
    if node.matches(CONTROL_SELECTOR) {
        return Ok(None);
    }

    if let Some(icon) = icon_name(&tag, node) {
        return Ok(Some(CloneTree::Icon {
            tag,
            icon,
            styles: copy_styles(node, ICON_PROPERTIES)?,
        }));
    }

    if tag == "img" {
        return match node.image_state() {
            Some(ImageState::Loaded(src)) => Ok(Some(CloneTree::Image {
                src,
                styles: copy_styles(node, IMAGE_PROPERTIES)?,
            })),
            _ => Ok(None),
        };
    }

    let styles = copy_styles(node, properties)?;
    let mut children = Vec::new();
    if depth < MAX_CAPTURE_DEPTH {
        for child in node.children() {
            if let Some(tree) = capture_tree(&child, properties, depth + 1)? {
                children.push(tree);
            }
        }
    }

    Ok(Some(CloneTree::Element {
        tag: neutral_tag(&tag).to_string(),
        styles,
        children,
    }))
}

fn icon_name<N: SourceNode>(tag: &str, node: &N) -> Option<String> {
    if !tag.ends_with("-icon") {
        return None;
    }
    node.attribute("icon").filter(|icon| !icon.is_empty())
}

fn neutral_tag(tag: &str) -> &'static str {
    INLINE_TAGS
        .iter()
        .copied()
        .find(|inline| *inline == tag)
        .unwrap_or("div")
}

fn copy_styles<N: SourceNode>(node: &N, properties: &[&'static str]) -> Result<Vec<StyleDecl>, CloneError> {
    let mut styles = Vec::with_capacity(properties.len());
    for &property in properties {
        let value = node.computed_style(property)?;
        if !value.is_empty() {
            styles.push(StyleDecl { property, value });
        }
    }
    Ok(styles)
}

/// Renders a [`ClonePlan`] as a single detached node.
///
/// A surface holds at most one node; `unmount` must be safe to call when
/// nothing is mounted.
pub trait CloneSurface {
    fn mount(&self, plan: &ClonePlan) -> Result<(), CloneError>;
    fn move_to(&self, placement: Placement);
    fn unmount(&self);
}

/// Lifecycle owner for the one floating clone in the document.
pub struct VisualClone {
    surface: Rc<dyn CloneSurface>,
    size: Cell<Option<Size>>,
}

impl VisualClone {
    pub fn new(surface: Rc<dyn CloneSurface>) -> Self {
        VisualClone {
            surface,
            size: Cell::new(None),
        }
    }

    pub fn is_active(&self) -> bool {
        self.size.get().is_some()
    }

    /// Mounts the plan, replacing any existing clone. Falls back to a flat
    /// block if the full plan cannot be rendered. Returns whether a clone
    /// is showing.
    pub fn create(&self, plan: &ClonePlan) -> bool {
        self.destroy();

        let mounted = match self.surface.mount(plan) {
            Ok(()) => true,
            Err(e) if !plan.is_flat() => {
                log::warn!("clone mount failed, retrying flat: {}", e);
                self.surface.unmount();
                match self.surface.mount(&plan.flattened()) {
                    Ok(()) => true,
                    Err(e) => {
                        log::warn!("flat clone mount failed: {}", e);
                        false
                    }
                }
            }
            Err(e) => {
                log::warn!("flat clone mount failed: {}", e);
                false
            }
        };

        if mounted {
            self.size.set(Some(plan.size));
        } else {
            self.surface.unmount();
        }
        mounted
    }

    /// Re-centers the clone on the pointer. No-op without a clone.
    pub fn update_position(&self, pointer: Point) {
        if let Some(size) = self.size.get() {
            self.surface.move_to(Placement::centered(pointer, size));
        }
    }

    /// Removes the clone synchronously. Safe to repeat.
    pub fn destroy(&self) {
        self.size.set(None);
        self.surface.unmount();
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// In-memory element tree. Selectors support `.class`, `[attr]`, `tag`
    /// and comma-separated lists of those.
    #[derive(Debug, Clone, Default)]
    pub(crate) struct FakeNode {
        pub tag: String,
        pub text: Option<String>,
        pub classes: Vec<String>,
        pub attrs: HashMap<String, String>,
        pub styles: HashMap<String, String>,
        pub children: Vec<FakeNode>,
        pub image: Option<ImageState>,
        pub unreadable: bool,
    }

    impl FakeNode {
        pub fn element(tag: &str) -> Self {
            FakeNode {
                tag: tag.to_string(),
                ..Default::default()
            }
        }

        pub fn text(text: &str) -> Self {
            FakeNode {
                text: Some(text.to_string()),
                ..Default::default()
            }
        }

        pub fn class(mut self, class: &str) -> Self {
            self.classes.push(class.to_string());
            self
        }

        pub fn attr(mut self, name: &str, value: &str) -> Self {
            self.attrs.insert(name.to_string(), value.to_string());
            self
        }

        pub fn style(mut self, property: &str, value: &str) -> Self {
            self.styles.insert(property.to_string(), value.to_string());
            self
        }

        pub fn child(mut self, child: FakeNode) -> Self {
            self.children.push(child);
            self
        }

        pub fn image(mut self, state: ImageState) -> Self {
            self.image = Some(state);
            self
        }

        fn matches_one(&self, selector: &str) -> bool {
            if self.text.is_some() {
                return false;
            }
            if let Some(class) = selector.strip_prefix('.') {
                self.classes.iter().any(|c| c == class)
            } else if let Some(attr) = selector.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
                self.attrs.contains_key(attr)
            } else {
                self.tag == selector
            }
        }
    }

    impl SourceNode for FakeNode {
        fn node_kind(&self) -> NodeKind {
            match &self.text {
                Some(text) => NodeKind::Text(text.clone()),
                None => NodeKind::Element(self.tag.clone()),
            }
        }

        fn attribute(&self, name: &str) -> Option<String> {
            self.attrs.get(name).cloned()
        }

        fn children(&self) -> Vec<Self> {
            self.children.clone()
        }

        fn computed_style(&self, property: &str) -> Result<String, CloneError> {
            if self.unreadable {
                return Err(CloneError::new("computed style unavailable"));
            }
            Ok(self.styles.get(property).cloned().unwrap_or_default())
        }

        fn find(&self, selector: &str) -> Option<Self> {
            if self.matches(selector) {
                return Some(self.clone());
            }
            self.children.iter().find_map(|child| child.find(selector))
        }

        fn matches(&self, selector: &str) -> bool {
            selector.split(',').any(|part| self.matches_one(part.trim()))
        }

        fn image_state(&self) -> Option<ImageState> {
            self.image.clone()
        }

        fn text_content(&self) -> String {
            match &self.text {
                Some(text) => text.clone(),
                None => self.children.iter().map(|c| c.text_content()).collect(),
            }
        }
    }

    /// Counts live nodes the way a document would.
    #[derive(Default)]
    pub(crate) struct FakeCloneSurface {
        pub mounted: RefCell<Option<ClonePlan>>,
        pub placements: RefCell<Vec<Placement>>,
        pub reject_rich: bool,
        pub reject_all: bool,
    }

    impl FakeCloneSurface {
        pub fn count(&self) -> usize {
            usize::from(self.mounted.borrow().is_some())
        }
    }

    impl CloneSurface for FakeCloneSurface {
        fn mount(&self, plan: &ClonePlan) -> Result<(), CloneError> {
            if self.reject_all || (self.reject_rich && !plan.is_flat()) {
                return Err(CloneError::new("cannot render"));
            }
            assert!(self.mounted.borrow().is_none(), "second clone mounted");
            *self.mounted.borrow_mut() = Some(plan.clone());
            Ok(())
        }

        fn move_to(&self, placement: Placement) {
            self.placements.borrow_mut().push(placement);
        }

        fn unmount(&self) {
            self.mounted.borrow_mut().take();
        }
    }

    fn card() -> FakeNode {
        FakeNode::element("entity-card")
            .style("background-color", "rgb(20, 20, 20)")
            .style("border-radius", "12px")
            .child(
                FakeNode::element("ha-state-icon")
                    .attr("icon", "mdi:lightbulb")
                    .style("color", "rgb(255, 200, 0)")
                    .style("width", "24px")
                    .child(FakeNode::element("svg")),
            )
            .child(FakeNode::element("span").class("entity-name").child(FakeNode::text("Desk lamp")))
            .child(FakeNode::text("   "))
            .child(FakeNode::element("img").image(ImageState::Loaded("/api/thumb.png".into())))
            .child(FakeNode::element("img").image(ImageState::Pending))
            .child(FakeNode::element("div").class("card-actions").child(FakeNode::element("button")))
    }

    fn rect() -> Rect {
        Rect::new(10.0, 10.0, 120.0, 80.0)
    }

    #[test]
    fn test_card_capture_uses_allow_list() {
        let plan = plan_clone(&card(), rect(), ItemKind::Card, Point::new(100.0, 100.0), Lift::default());
        let CloneBody::Tree(CloneTree::Element { tag, styles, children }) = &plan.body else {
            panic!("expected a tree, got {:?}", plan.body);
        };
        assert_eq!(tag, "div");
        assert!(styles.iter().all(|s| CARD_PROPERTIES.contains(&s.property)));
        assert!(styles.contains(&StyleDecl {
            property: "border-radius",
            value: "12px".into()
        }));

        // icon, name span, loaded image; whitespace, pending image and
        // controls are dropped
        assert_eq!(children.len(), 3);
        assert_eq!(
            children[0],
            CloneTree::Icon {
                tag: "ha-state-icon".into(),
                icon: "mdi:lightbulb".into(),
                styles: vec![
                    StyleDecl { property: "width", value: "24px".into() },
                    StyleDecl { property: "color", value: "rgb(255, 200, 0)".into() },
                ],
            }
        );
        assert!(matches!(&children[1], CloneTree::Element { tag, children, .. }
            if tag == "span" && children == &vec![CloneTree::Text("Desk lamp".into())]));
        assert!(matches!(&children[2], CloneTree::Image { src, .. } if src == "/api/thumb.png"));
    }

    #[test]
    fn test_plan_is_sized_and_centered() {
        let plan = plan_clone(&card(), rect(), ItemKind::Card, Point::new(100.0, 100.0), Lift::default());
        assert_eq!(plan.size, Size { width: 120.0, height: 80.0 });
        assert_eq!(plan.placement, Placement { left: 40.0, top: 60.0 });
        assert_eq!(plan.fallback_background, "rgb(20, 20, 20)");
    }

    #[test]
    fn test_unreadable_style_degrades_to_flat() {
        let mut node = card();
        node.unreadable = true;
        let plan = plan_clone(&node, rect(), ItemKind::Card, Point::default(), Lift::default());
        assert_eq!(
            plan.body,
            CloneBody::Flat {
                background: FALLBACK_BACKGROUND.into()
            }
        );
    }

    #[test]
    fn test_depth_is_bounded() {
        let mut node = FakeNode::element("div");
        for _ in 0..(MAX_CAPTURE_DEPTH + 5) {
            node = FakeNode::element("div").child(node);
        }
        let plan = plan_clone(&node, rect(), ItemKind::Plain, Point::default(), Lift::default());
        let CloneBody::Tree(mut tree) = plan.body else {
            panic!("expected a tree");
        };
        let mut depth = 0;
        while let CloneTree::Element { mut children, .. } = tree {
            match children.pop() {
                Some(child) => {
                    tree = child;
                    depth += 1;
                }
                None => break,
            }
        }
        assert_eq!(depth, MAX_CAPTURE_DEPTH);
    }

    fn camera(frame: FakeNode) -> FakeNode {
        FakeNode::element("camera-card")
            .attr("data-item-kind", "camera")
            .attr("data-entity-name", "Porch")
            .child(frame)
    }

    #[test]
    fn test_camera_without_snapshot_uses_placeholder() {
        let node = camera(FakeNode::element("div").class("camera-frame").child(
            FakeNode::element("img").image(ImageState::Pending),
        ));
        let plan = plan_clone(&node, rect(), ItemKind::Camera, Point::default(), Lift::default());
        let CloneBody::Camera(camera) = plan.body else {
            panic!("expected a camera clone");
        };
        assert_eq!(camera.frame, CameraFrame::NoSnapshot);
        assert_eq!(camera.name, "Porch");
    }

    #[test]
    fn test_camera_frame_states() {
        let loaded = camera(FakeNode::element("div").class("camera-frame").child(
            FakeNode::element("img").image(ImageState::Loaded("blob:frame".into())),
        ));
        let unavailable = camera(
            FakeNode::element("div")
                .class("camera-frame")
                .child(FakeNode::element("div").class("camera-unavailable")),
        );
        let broken = camera(FakeNode::element("div").class("camera-frame").child(
            FakeNode::element("img").image(ImageState::Broken),
        ));
        let missing = camera(FakeNode::element("div"));

        let frame_of = |node: &FakeNode| match plan_clone(node, rect(), ItemKind::Camera, Point::default(), Lift::default()).body {
            CloneBody::Camera(camera) => camera.frame,
            other => panic!("expected camera, got {:?}", other),
        };
        assert_eq!(frame_of(&loaded), CameraFrame::Snapshot { src: "blob:frame".into() });
        assert_eq!(frame_of(&unavailable), CameraFrame::Unavailable);
        assert_eq!(frame_of(&broken), CameraFrame::Unavailable);
        assert_eq!(frame_of(&missing), CameraFrame::NoSnapshot);
    }

    #[test]
    fn test_camera_name_prefers_visible_label() {
        let node = camera(FakeNode::element("div")).child(
            FakeNode::element("div").class("entity-name").child(FakeNode::text(" Back yard ")),
        );
        let plan = plan_clone(&node, rect(), ItemKind::Camera, Point::default(), Lift::default());
        assert!(matches!(plan.body, CloneBody::Camera(CameraClone { ref name, .. }) if name == "Back yard"));
    }

    #[test]
    fn test_chip_copies_frame_and_content() {
        let chip = FakeNode::element("status-chip")
            .style("background-color", "rgba(0, 0, 0, 0.3)")
            .style("backdrop-filter", "blur(8px)")
            .style("border-radius", "999px")
            .child(FakeNode::element("ha-icon").attr("icon", "mdi:thermometer"))
            .child(FakeNode::element("span").child(FakeNode::text("21 °C")));
        let plan = plan_clone(&chip, rect(), ItemKind::Chip, Point::default(), Lift::default());
        let CloneBody::Chip { frame, content } = plan.body else {
            panic!("expected a chip clone");
        };
        let props: Vec<_> = frame.iter().map(|s| s.property).collect();
        assert_eq!(props, vec!["background-color", "backdrop-filter", "border-radius"]);
        assert_eq!(content.len(), 2);
        assert!(matches!(&content[0], CloneTree::Icon { icon, .. } if icon == "mdi:thermometer"));
    }

    #[test]
    fn test_create_then_destroy_leaves_nothing() {
        let surface = Rc::new(FakeCloneSurface::default());
        let clone = VisualClone::new(surface.clone());
        let plan = plan_clone(&card(), rect(), ItemKind::Card, Point::default(), Lift::default());

        assert!(clone.create(&plan));
        assert_eq!(surface.count(), 1);
        clone.destroy();
        clone.destroy();
        assert_eq!(surface.count(), 0);
        assert!(!clone.is_active());
    }

    #[test]
    fn test_create_replaces_existing_clone() {
        let surface = Rc::new(FakeCloneSurface::default());
        let clone = VisualClone::new(surface.clone());
        let plan = plan_clone(&card(), rect(), ItemKind::Card, Point::default(), Lift::default());
        assert!(clone.create(&plan));
        assert!(clone.create(&plan));
        assert_eq!(surface.count(), 1);
    }

    #[test]
    fn test_mount_failure_falls_back_to_flat() {
        let surface = Rc::new(FakeCloneSurface {
            reject_rich: true,
            ..Default::default()
        });
        let clone = VisualClone::new(surface.clone());
        let plan = plan_clone(&card(), rect(), ItemKind::Card, Point::default(), Lift::default());
        assert!(clone.create(&plan));
        assert!(surface.mounted.borrow().as_ref().unwrap().is_flat());

        let surface = Rc::new(FakeCloneSurface {
            reject_all: true,
            ..Default::default()
        });
        let clone = VisualClone::new(surface.clone());
        assert!(!clone.create(&plan));
        assert_eq!(surface.count(), 0);
        clone.update_position(Point::new(5.0, 5.0));
        assert!(surface.placements.borrow().is_empty());
    }

    #[test]
    fn test_update_position_recenters() {
        let surface = Rc::new(FakeCloneSurface::default());
        let clone = VisualClone::new(surface.clone());
        let plan = plan_clone(&card(), rect(), ItemKind::Card, Point::default(), Lift::default());
        clone.create(&plan);
        clone.update_position(Point::new(300.0, 200.0));
        assert_eq!(surface.placements.borrow().last(), Some(&Placement { left: 240.0, top: 160.0 }));
    }
}
