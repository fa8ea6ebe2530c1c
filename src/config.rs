//! Engine configuration.
//!
//! DESIGN
//! ======
//! Configuration is passed by value into [`crate::engine::Engine::new`]; no
//! module reads globals. Three sources, all producing the same validated
//! [`EngineConfig`]:
//! - `Default`: the stock pen (four colors, centimetre-scale distances).
//! - JSON via [`EngineConfig::from_json`]: missing fields fall back to defaults.
//! - Environment via [`EngineConfig::from_env`]: `INKLINE_*` variables
//!   override individual defaults; unparsable values are logged and ignored.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CHECK_ERASE_FREQUENCY_SECS, DEFAULT_ERASE_RADIUS, DEFAULT_ERASER_TRAIL_CAPACITY, DEFAULT_MIN_MOVE_DISTANCE,
    DEFAULT_PIXEL_ERASE_RADIUS, DEFAULT_PIXEL_ERASER_MIN_MOVE_DISTANCE, DEFAULT_SIMPLIFY_TOLERANCE,
};

// =============================================================================
// ERROR TYPE
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("at least one pen color is required")]
    NoColors,
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidDistance { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero")]
    ZeroCapacity { field: &'static str },
    #[error("invalid config json: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// TYPES
// =============================================================================

/// Linear RGBA color handed to the renderer for one color slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// How a partial erase splices a line that the eraser crosses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartialEraseMode {
    /// Every intersecting segment toggles whether later points are kept.
    /// An even number of crossings resumes keeping points on the same line.
    #[default]
    Toggle,
    /// Every intersecting segment cuts the line; the kept runs become
    /// separate polylines.
    Split,
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// One entry per color slot; its length is the color count.
    pub colors: Vec<Color>,
    /// Minimum tip travel before a new stroke point is recorded.
    pub min_move_distance: f64,
    /// Tolerance of the simplification applied on commit.
    pub simplify_tolerance: f64,
    /// Minimum eraser travel before partial erase recomputes.
    pub pixel_eraser_min_move_distance: f64,
    /// Radius of the whole-line / clear-all eraser.
    pub erase_radius: f64,
    /// Radius of the partial eraser.
    pub pixel_erase_radius: f64,
    /// Seconds between line-marking passes while the eraser is held.
    pub check_erase_frequency: f64,
    /// Capacity of the eraser trail ring buffer.
    pub eraser_trail_capacity: usize,
    /// Erase trigger clears every line instead of the touched one.
    pub clear_all: bool,
    pub partial_erase_mode: PartialEraseMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            colors: vec![
                Color::rgb(1.0, 1.0, 1.0),
                Color::rgb(0.9, 0.2, 0.2),
                Color::rgb(0.2, 0.8, 0.3),
                Color::rgb(0.2, 0.4, 0.95),
            ],
            min_move_distance: DEFAULT_MIN_MOVE_DISTANCE,
            simplify_tolerance: DEFAULT_SIMPLIFY_TOLERANCE,
            pixel_eraser_min_move_distance: DEFAULT_PIXEL_ERASER_MIN_MOVE_DISTANCE,
            erase_radius: DEFAULT_ERASE_RADIUS,
            pixel_erase_radius: DEFAULT_PIXEL_ERASE_RADIUS,
            check_erase_frequency: DEFAULT_CHECK_ERASE_FREQUENCY_SECS,
            eraser_trail_capacity: DEFAULT_ERASER_TRAIL_CAPACITY,
            clear_all: false,
            partial_erase_mode: PartialEraseMode::Toggle,
        }
    }
}

impl EngineConfig {
    /// Parse a JSON document; absent fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `INKLINE_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let d = Self::default();
        let config = Self {
            colors: d.colors,
            min_move_distance: env_parse("INKLINE_MIN_MOVE_DISTANCE", d.min_move_distance),
            simplify_tolerance: env_parse("INKLINE_SIMPLIFY_TOLERANCE", d.simplify_tolerance),
            pixel_eraser_min_move_distance: env_parse(
                "INKLINE_PIXEL_ERASER_MIN_MOVE_DISTANCE",
                d.pixel_eraser_min_move_distance,
            ),
            erase_radius: env_parse("INKLINE_ERASE_RADIUS", d.erase_radius),
            pixel_erase_radius: env_parse("INKLINE_PIXEL_ERASE_RADIUS", d.pixel_erase_radius),
            check_erase_frequency: env_parse("INKLINE_CHECK_ERASE_FREQUENCY", d.check_erase_frequency),
            eraser_trail_capacity: env_parse("INKLINE_ERASER_TRAIL_CAPACITY", d.eraser_trail_capacity),
            clear_all: env_parse("INKLINE_CLEAR_ALL", d.clear_all),
            partial_erase_mode: match std::env::var("INKLINE_PARTIAL_ERASE_MODE").as_deref() {
                Ok("split") => PartialEraseMode::Split,
                Ok("toggle") | Err(_) => PartialEraseMode::Toggle,
                Ok(other) => {
                    tracing::warn!(value = other, "unknown INKLINE_PARTIAL_ERASE_MODE, using toggle");
                    PartialEraseMode::Toggle
                }
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every field the engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.colors.is_empty() {
            return Err(ConfigError::NoColors);
        }
        let distances = [
            ("min_move_distance", self.min_move_distance),
            ("simplify_tolerance", self.simplify_tolerance),
            ("pixel_eraser_min_move_distance", self.pixel_eraser_min_move_distance),
            ("erase_radius", self.erase_radius),
            ("pixel_erase_radius", self.pixel_erase_radius),
            ("check_erase_frequency", self.check_erase_frequency),
        ];
        for (field, value) in distances {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistance { field, value });
            }
        }
        if self.eraser_trail_capacity == 0 {
            return Err(ConfigError::ZeroCapacity { field: "eraser_trail_capacity" });
        }
        Ok(())
    }

    /// Number of color slots.
    #[must_use]
    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    /// Line-marking throttle interval.
    #[must_use]
    pub fn check_erase_interval(&self) -> Duration {
        Duration::try_from_secs_f64(self.check_erase_frequency).unwrap_or(Duration::ZERO)
    }
}

fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    let Ok(raw) = std::env::var(key) else {
        return default;
    };
    if let Ok(value) = raw.parse::<T>() {
        value
    } else {
        tracing::warn!(key, value = %raw, "ignoring unparsable config value");
        default
    }
}
