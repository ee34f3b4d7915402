//! Scene tuning
//!
//! Every random range, probability and start-sequence delay lives here.
//! Defaults reproduce the stock scene; a JSON override may replace any subset.

use serde::{Deserialize, Serialize};

use crate::consts::{BASE_WIDTH, EDGE_PADDING, MAX_RESTING};
use crate::error::ConfigError;

/// Closed interval sampled uniformly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub min: f32,
    pub max: f32,
}

impl Span {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    fn check(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min <= self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Scene configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Resting shapes allowed before the oldest is pushed off
    pub capacity: usize,

    // === Spawner ===
    pub left_labels: Vec<String>,
    pub right_labels: Vec<String>,
    /// Probability a random shape carries a label
    pub label_chance: f32,
    /// Probability a random shape is a circle
    pub circle_chance: f32,
    pub weight: Span,
    /// Seconds between random spawns
    pub spawn_delay: Span,

    // === Placement (percent of layer width) ===
    pub left_band: Span,
    pub right_band: Span,

    // === Dimensions (px) ===
    pub big_size: Span,
    pub circle_size: Span,
    pub square_size: Span,

    // === Start sequence (seconds after reset) ===
    pub brand_delay: f32,
    pub graphic_delay: f32,
    pub spawn_start_delay: f32,

    // === Drop layer ===
    pub layer_width: f32,
    pub edge_padding: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let labels = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            capacity: MAX_RESTING,

            left_labels: labels(&["Brand", "In-house", "Leader", "Company"]),
            right_labels: labels(&["Graphic", "Agency", "Member", "Creator"]),
            label_chance: 0.55,
            circle_chance: 0.30,
            weight: Span::new(0.7, 1.35),
            spawn_delay: Span::new(0.9, 1.6),

            left_band: Span::new(6.0, 47.0),
            right_band: Span::new(53.0, 94.0),

            big_size: Span::new(220.0, 260.0),
            circle_size: Span::new(70.0, 150.0),
            square_size: Span::new(70.0, 160.0),

            brand_delay: 0.8,
            graphic_delay: 1.8,
            spawn_start_delay: 3.1,

            layer_width: BASE_WIDTH,
            edge_padding: EDGE_PADDING,
        }
    }
}

impl SceneConfig {
    /// Parse a JSON override; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        for (field, value) in [
            ("label_chance", self.label_chance),
            ("circle_chance", self.circle_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidProbability { field, value });
            }
        }
        self.weight.check("weight")?;
        self.spawn_delay.check("spawn_delay")?;
        self.left_band.check("left_band")?;
        self.right_band.check("right_band")?;
        self.big_size.check("big_size")?;
        self.circle_size.check("circle_size")?;
        self.square_size.check("square_size")?;
        if self.weight.min <= 0.0 {
            return Err(ConfigError::InvalidRange {
                field: "weight",
                min: self.weight.min,
                max: self.weight.max,
            });
        }
        Ok(())
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "seesaw_config";

    /// Load an override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded scene config from LocalStorage");
                        return config;
                    }
                    Err(e) => log::warn!("Ignoring stored scene config: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.capacity, 11);
        assert_eq!(config.left_labels.len(), 4);
        assert_eq!(config.right_labels.len(), 4);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let config = SceneConfig::from_json(r#"{ "capacity": 5, "label_chance": 0.0 }"#)
            .expect("valid override");
        assert_eq!(config.capacity, 5);
        assert_eq!(config.label_chance, 0.0);
        assert_eq!(config.spawn_delay, Span::new(0.9, 1.6));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SceneConfig::from_json(r#"{ "capacity": 0 }"#),
            Err(ConfigError::ZeroCapacity)
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "circle_chance": 1.5 }"#),
            Err(ConfigError::InvalidProbability { field: "circle_chance", .. })
        ));
        assert!(matches!(
            SceneConfig::from_json(r#"{ "spawn_delay": { "min": 2.0, "max": 1.0 } }"#),
            Err(ConfigError::InvalidRange { field: "spawn_delay", .. })
        ));
        assert!(matches!(
            SceneConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }
}
