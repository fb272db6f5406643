//! Renders clone plans as a fixed-position node on `document.body`.

use std::cell::RefCell;

use reorder_core::clone::{CameraClone, CameraFrame, StyleDecl, CLONE_Z_INDEX};
use reorder_core::{CloneBody, CloneError, ClonePlan, CloneSurface, CloneTree, Placement};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, Node};

use crate::sortable::js_message;

pub const CLONE_CLASS: &str = "reorder-clone";
pub const CAMERA_PLACEHOLDER_CLASS: &str = "reorder-camera-placeholder";
pub const CLONE_NAME_CLASS: &str = "reorder-clone-name";

const UNAVAILABLE_TEXT: &str = "Camera unavailable";
const NO_SNAPSHOT_TEXT: &str = "No snapshot";

fn clone_error(e: JsValue) -> CloneError {
    CloneError::new(js_message(&e))
}

pub struct DomCloneSurface {
    document: Document,
    node: RefCell<Option<HtmlElement>>,
}

impl DomCloneSurface {
    pub fn new(document: Document) -> Self {
        DomCloneSurface {
            document,
            node: RefCell::new(None),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.node.borrow().is_some()
    }

    fn create(&self, tag: &str) -> Result<Element, CloneError> {
        self.document.create_element(tag).map_err(clone_error)
    }

    fn create_html(&self, tag: &str) -> Result<HtmlElement, CloneError> {
        self.create(tag)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| CloneError::new(format!("<{}> is not an HTML element", tag)))
    }

    fn build_root(&self, plan: &ClonePlan) -> Result<HtmlElement, CloneError> {
        let root = self.create_html("div")?;
        root.set_class_name(CLONE_CLASS);
        set_styles(
            &root,
            &[
                ("position", "fixed".to_string()),
                ("margin", "0".to_string()),
                ("box-sizing", "border-box".to_string()),
                ("pointer-events", "none".to_string()),
                ("z-index", CLONE_Z_INDEX.to_string()),
                ("width", px(plan.size.width)),
                ("height", px(plan.size.height)),
                ("left", px(plan.placement.left)),
                ("top", px(plan.placement.top)),
                ("transform", plan.lift.transform()),
                ("transform-origin", "center center".to_string()),
                ("overflow", "hidden".to_string()),
            ],
        )?;

        match &plan.body {
            CloneBody::Tree(tree) => {
                let node = self.render_tree(tree)?;
                root.append_child(&node).map_err(clone_error)?;
            }
            CloneBody::Camera(camera) => self.render_camera(&root, camera)?,
            CloneBody::Chip { frame, content } => {
                apply_decls(&root, frame)?;
                for tree in content {
                    let node = self.render_tree(tree)?;
                    root.append_child(&node).map_err(clone_error)?;
                }
            }
            CloneBody::Flat { background } => {
                set_styles(
                    &root,
                    &[
                        ("background-color", background.clone()),
                        ("border-radius", "12px".to_string()),
                    ],
                )?;
            }
        }
        Ok(root)
    }

    fn render_tree(&self, tree: &CloneTree) -> Result<Node, CloneError> {
        match tree {
            CloneTree::Text(text) => Ok(self.document.create_text_node(text).into()),
            CloneTree::Element { tag, styles, children } => {
                let el = self.create_html(tag)?;
                apply_decls(&el, styles)?;
                for child in children {
                    let node = self.render_tree(child)?;
                    el.append_child(&node).map_err(clone_error)?;
                }
                Ok(el.into())
            }
            CloneTree::Icon { tag, icon, styles } => {
                let el = self.create(tag)?;
                el.set_attribute("icon", icon).map_err(clone_error)?;
                if let Some(html) = el.dyn_ref::<HtmlElement>() {
                    apply_decls(html, styles)?;
                }
                Ok(el.into())
            }
            CloneTree::Image { src, styles } => {
                let img = self.create_html("img")?;
                img.set_attribute("src", src).map_err(clone_error)?;
                img.set_attribute("draggable", "false").map_err(clone_error)?;
                apply_decls(&img, styles)?;
                Ok(img.into())
            }
        }
    }

    fn render_camera(&self, root: &HtmlElement, camera: &CameraClone) -> Result<(), CloneError> {
        apply_decls(root, &camera.frame_styles)?;

        let frame: HtmlElement = match &camera.frame {
            CameraFrame::Snapshot { src } => {
                let img = self.create_html("img")?;
                img.set_attribute("src", src).map_err(clone_error)?;
                set_styles(
                    &img,
                    &[
                        ("width", "100%".to_string()),
                        ("height", "100%".to_string()),
                        ("object-fit", "cover".to_string()),
                    ],
                )?;
                img
            }
            CameraFrame::Unavailable => self.placeholder(UNAVAILABLE_TEXT)?,
            CameraFrame::NoSnapshot => self.placeholder(NO_SNAPSHOT_TEXT)?,
        };
        root.append_child(&frame).map_err(clone_error)?;

        if !camera.name.is_empty() {
            let name = self.create_html("div")?;
            name.set_class_name(CLONE_NAME_CLASS);
            name.set_text_content(Some(&camera.name));
            root.append_child(&name).map_err(clone_error)?;
        }
        Ok(())
    }

    fn placeholder(&self, text: &str) -> Result<HtmlElement, CloneError> {
        let el = self.create_html("div")?;
        el.set_class_name(CAMERA_PLACEHOLDER_CLASS);
        el.set_text_content(Some(text));
        Ok(el)
    }
}

impl CloneSurface for DomCloneSurface {
    fn mount(&self, plan: &ClonePlan) -> Result<(), CloneError> {
        self.unmount();
        let root = self.build_root(plan)?;
        let body = self
            .document
            .body()
            .ok_or_else(|| CloneError::new("document has no body"))?;
        body.append_child(&root).map_err(clone_error)?;
        *self.node.borrow_mut() = Some(root);
        Ok(())
    }

    fn move_to(&self, placement: Placement) {
        if let Some(node) = self.node.borrow().as_ref() {
            let style = node.style();
            let _ = style.set_property("left", &px(placement.left));
            let _ = style.set_property("top", &px(placement.top));
        }
    }

    fn unmount(&self) {
        if let Some(node) = self.node.borrow_mut().take() {
            node.remove();
        }
    }
}

fn px(value: f64) -> String {
    format!("{}px", value)
}

fn set_styles(el: &HtmlElement, styles: &[(&str, String)]) -> Result<(), CloneError> {
    let style = el.style();
    for (property, value) in styles {
        style.set_property(property, value).map_err(clone_error)?;
    }
    Ok(())
}

fn apply_decls(el: &HtmlElement, decls: &[StyleDecl]) -> Result<(), CloneError> {
    let style = el.style();
    for decl in decls {
        style.set_property(decl.property, &decl.value).map_err(clone_error)?;
    }
    Ok(())
}
