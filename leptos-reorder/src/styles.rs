//! Document-level stylesheet for clones, placeholders and state classes.

use reorder_core::{ReorderConfig, ReorderError, Result};
use web_sys::Document;

use crate::clone_dom::{CAMERA_PLACEHOLDER_CLASS, CLONE_CLASS, CLONE_NAME_CLASS};
use crate::dom::{CONTROLS_HIDDEN_CLASS, DRAGGING_CLASS};
use crate::sortable::js_message;

/// Id of the injected `<style>` element.
pub const STYLE_ELEMENT_ID: &str = "reorder-styles";

pub fn stylesheet(config: &ReorderConfig) -> String {
    let mut css = String::new();

    // The library's placeholder and chosen classes can differ per kind.
    for sensor in [&config.grid, &config.carousel, &config.chips] {
        css.push_str(&format!(
            ".{ghost} {{ opacity: 0.35; }}\n\
             .{fallback} {{ opacity: 0 !important; }}\n\
             .{chosen} {{ cursor: grabbing; }}\n",
            ghost = sensor.ghost_class,
            fallback = sensor.fallback_class,
            chosen = sensor.chosen_class,
        ));
    }

    css.push_str(&format!(
        ".{DRAGGING_CLASS} {{ opacity: 0.4; }}\n\
         .{CONTROLS_HIDDEN_CLASS} {{ visibility: hidden !important; }}\n\
         .{CLONE_CLASS} {{ will-change: left, top; box-shadow: 0 12px 28px rgba(0, 0, 0, 0.3); }}\n\
         .{CLONE_CLASS} img {{ display: block; }}\n\
         .{CAMERA_PLACEHOLDER_CLASS} {{ display: flex; align-items: center; justify-content: center; \
         width: 100%; height: 100%; font-size: 0.85em; opacity: 0.7; background: rgba(0, 0, 0, 0.6); color: #fff; }}\n\
         .{CLONE_NAME_CLASS} {{ position: absolute; left: 0; right: 0; bottom: 0; padding: 4px 8px; \
         font-size: 0.85em; color: #fff; background: linear-gradient(transparent, rgba(0, 0, 0, 0.6)); }}\n"
    ));
    css
}

/// Injects the stylesheet unless an element with [`STYLE_ELEMENT_ID`] is
/// already present.
pub fn install(document: &Document, config: &ReorderConfig) -> Result<()> {
    if document.get_element_by_id(STYLE_ELEMENT_ID).is_some() {
        return Ok(());
    }
    let head = document
        .head()
        .ok_or_else(|| ReorderError::Config("document has no <head>".to_string()))?;
    let style = document
        .create_element("style")
        .map_err(|e| ReorderError::Config(js_message(&e)))?;
    style.set_id(STYLE_ELEMENT_ID);
    style.set_text_content(Some(&stylesheet(config)));
    head.append_child(&style)
        .map_err(|e| ReorderError::Config(js_message(&e)))?;
    log::debug!("installed reorder stylesheet");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stylesheet_uses_configured_classes() {
        let mut config = ReorderConfig::default();
        config.chips.ghost_class = "chip-ghost".to_string();
        let css = stylesheet(&config);
        assert!(css.contains(".reorder-ghost { opacity: 0.35; }"));
        assert!(css.contains(".chip-ghost { opacity: 0.35; }"));
        assert!(css.contains(".reorder-fallback { opacity: 0 !important; }"));
        assert!(css.contains(".reorder-clone-name"));
    }

    #[test]
    fn test_stylesheet_hides_controls_by_class() {
        let css = stylesheet(&ReorderConfig::default());
        assert!(css.contains(".reorder-controls-hidden { visibility: hidden !important; }"));
    }
}
