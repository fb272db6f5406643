//! Tunables for the sensing library, auto-scroll, lift and haptics.
//!
//! Every field has a default, so a host can override only what it needs:
//!
//! ```
//! use reorder_core::ReorderConfig;
//!
//! let config = ReorderConfig::from_json(r#"{ "chipScroll": { "maxSpeed": 8.0 } }"#).unwrap();
//! assert_eq!(config.chip_scroll.max_speed, 8.0);
//! assert_eq!(config.card_scroll.width, 80.0);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::container::ContainerKind;
use crate::error::{ReorderError, Result};

/// Controls excluded from starting a drag.
pub const DEFAULT_FILTER: &str = ".card-actions, [data-reorder-control], [data-reorder-ignore]";

/// Axis lock passed to the sensing library. Grids leave it unset (free).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Horizontal,
    Vertical,
}

/// Options handed to the sensing library for one container.
///
/// Serializes with the library's own camelCase option names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SensorOptions {
    /// Sibling shuffle animation in ms.
    pub animation: u32,
    /// Press-and-hold delay in ms before a drag is recognized.
    pub delay: u32,
    pub delay_on_touch_only: bool,
    /// Pixels the pointer may travel during `delay` before the press is
    /// treated as a scroll instead.
    pub touch_start_threshold: u32,
    pub ghost_class: String,
    pub chosen_class: String,
    pub drag_class: String,
    pub fallback_class: String,
    pub force_fallback: bool,
    pub filter: String,
    pub prevent_on_filter: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<Direction>,
    /// Fraction of a neighbour the pointer must cover before swapping.
    pub swap_threshold: f64,
}

impl Default for SensorOptions {
    fn default() -> Self {
        SensorOptions {
            animation: 200,
            delay: 300,
            delay_on_touch_only: true,
            touch_start_threshold: 5,
            ghost_class: "reorder-ghost".to_string(),
            chosen_class: "reorder-chosen".to_string(),
            drag_class: "reorder-drag".to_string(),
            fallback_class: "reorder-fallback".to_string(),
            force_fallback: true,
            filter: DEFAULT_FILTER.to_string(),
            prevent_on_filter: false,
            direction: None,
            swap_threshold: 0.65,
        }
    }
}

impl SensorOptions {
    pub fn horizontal() -> Self {
        SensorOptions {
            direction: Some(Direction::Horizontal),
            ..SensorOptions::default()
        }
    }

    fn validate(&self, label: &str) -> Result<()> {
        if !(self.swap_threshold > 0.0 && self.swap_threshold <= 1.0) {
            return Err(ReorderError::Config(format!(
                "{label}.swapThreshold must be in (0, 1], got {}",
                self.swap_threshold
            )));
        }
        Ok(())
    }
}

/// Edge band that triggers auto-scroll, and the speeds inside it in
/// pixels per frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EdgeZone {
    pub width: f64,
    pub min_speed: f64,
    pub max_speed: f64,
}

impl EdgeZone {
    pub const CARDS: EdgeZone = EdgeZone {
        width: 80.0,
        min_speed: 2.0,
        max_speed: 20.0,
    };

    pub const CHIPS: EdgeZone = EdgeZone {
        width: 50.0,
        min_speed: 2.0,
        max_speed: 12.0,
    };

    fn validate(&self, label: &str) -> Result<()> {
        if self.width <= 0.0 {
            return Err(ReorderError::Config(format!("{label}.width must be positive")));
        }
        if self.min_speed < 0.0 || self.min_speed > self.max_speed {
            return Err(ReorderError::Config(format!(
                "{label} needs 0 <= minSpeed <= maxSpeed, got {} and {}",
                self.min_speed, self.max_speed
            )));
        }
        Ok(())
    }
}

impl Default for EdgeZone {
    fn default() -> Self {
        EdgeZone::CARDS
    }
}

/// "Lifted" look of the floating clone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Lift {
    pub scale: f64,
    pub rotate_deg: f64,
}

impl Default for Lift {
    fn default() -> Self {
        Lift {
            scale: 1.05,
            rotate_deg: 2.0,
        }
    }
}

impl Lift {
    pub fn transform(&self) -> String {
        format!("scale({}) rotate({}deg)", self.scale, self.rotate_deg)
    }
}

/// Vibration pulse lengths in ms. Zero disables a pulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Haptics {
    pub lift_ms: u32,
    pub settle_ms: u32,
}

impl Default for Haptics {
    fn default() -> Self {
        Haptics {
            lift_ms: 20,
            settle_ms: 10,
        }
    }
}

/// Which pulse to fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Haptic {
    Lift,
    Settle,
}

impl Haptics {
    pub fn duration(&self, pulse: Haptic) -> u32 {
        match pulse {
            Haptic::Lift => self.lift_ms,
            Haptic::Settle => self.settle_ms,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReorderConfig {
    pub grid: SensorOptions,
    pub carousel: SensorOptions,
    pub chips: SensorOptions,
    pub card_scroll: EdgeZone,
    pub chip_scroll: EdgeZone,
    pub lift: Lift,
    pub haptics: Haptics,
}

impl Default for ReorderConfig {
    fn default() -> Self {
        ReorderConfig {
            grid: SensorOptions::default(),
            carousel: SensorOptions::horizontal(),
            chips: SensorOptions::horizontal(),
            card_scroll: EdgeZone::CARDS,
            chip_scroll: EdgeZone::CHIPS,
            lift: Lift::default(),
            haptics: Haptics::default(),
        }
    }
}

impl ReorderConfig {
    /// Parses a partial JSON document over the defaults and validates it.
    ///
    /// Overrides are merged key by key, so a partial `chipScroll` keeps
    /// the chip defaults rather than falling back to the card zone.
    pub fn from_json(json: &str) -> Result<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        let mut merged = serde_json::to_value(ReorderConfig::default())?;
        merge(&mut merged, overrides);
        let config: ReorderConfig = serde_json::from_value(merged)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.grid.validate("grid")?;
        self.carousel.validate("carousel")?;
        self.chips.validate("chips")?;
        self.card_scroll.validate("cardScroll")?;
        self.chip_scroll.validate("chipScroll")?;
        if self.lift.scale <= 0.0 {
            return Err(ReorderError::Config("lift.scale must be positive".to_string()));
        }
        Ok(())
    }

    pub fn sensor(&self, kind: ContainerKind) -> &SensorOptions {
        match kind {
            ContainerKind::Grid => &self.grid,
            ContainerKind::Carousel => &self.carousel,
            ContainerKind::ChipRow => &self.chips,
        }
    }

    /// `None` for kinds that do not auto-scroll.
    pub fn edge_zone(&self, kind: ContainerKind) -> Option<EdgeZone> {
        match kind {
            ContainerKind::Grid => None,
            ContainerKind::Carousel => Some(self.card_scroll),
            ContainerKind::ChipRow => Some(self.chip_scroll),
        }
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_kind() {
        let config = ReorderConfig::default();
        assert_eq!(config.sensor(ContainerKind::Grid).direction, None);
        assert_eq!(
            config.sensor(ContainerKind::ChipRow).direction,
            Some(Direction::Horizontal)
        );
        assert!(config.edge_zone(ContainerKind::Grid).is_none());

        let cards = config.edge_zone(ContainerKind::Carousel).unwrap();
        let chips = config.edge_zone(ContainerKind::ChipRow).unwrap();
        assert!(cards.width > chips.width);
        assert!(cards.max_speed > chips.max_speed);
    }

    #[test]
    fn test_sensor_options_serialize_camel_case() {
        let value = serde_json::to_value(SensorOptions::default()).unwrap();
        assert_eq!(value["delayOnTouchOnly"], true);
        assert_eq!(value["touchStartThreshold"], 5);
        assert!(value.get("direction").is_none());

        let value = serde_json::to_value(SensorOptions::horizontal()).unwrap();
        assert_eq!(value["direction"], "horizontal");
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = ReorderConfig::from_json(r#"{ "grid": { "delay": 500 } }"#).unwrap();
        assert_eq!(config.grid.delay, 500);
        assert_eq!(config.grid.animation, 200);
        assert_eq!(config.carousel, SensorOptions::horizontal());

        let config = ReorderConfig::from_json(r#"{ "chipScroll": { "maxSpeed": 8.0 } }"#).unwrap();
        assert_eq!(config.chip_scroll.width, EdgeZone::CHIPS.width);
        assert_eq!(config.chip_scroll.max_speed, 8.0);

        let config = ReorderConfig::from_json(r#"{ "chips": { "delay": 0 } }"#).unwrap();
        assert_eq!(config.chips.direction, Some(Direction::Horizontal));
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = ReorderConfig::from_json(r#"{ "chips": { "swapThreshold": 0 } }"#).unwrap_err();
        assert!(matches!(err, ReorderError::Config(_)));

        let err = ReorderConfig::from_json(r#"{ "cardScroll": { "minSpeed": 30 } }"#).unwrap_err();
        assert!(err.to_string().contains("cardScroll"));

        assert!(matches!(
            ReorderConfig::from_json("not json"),
            Err(ReorderError::Parse(_))
        ));
    }

    #[test]
    fn test_lift_transform() {
        assert_eq!(Lift::default().transform(), "scale(1.05) rotate(2deg)");
    }
}
