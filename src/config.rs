//! Grid configuration file support.
//!
//! Reads grid settings from TOML. Every field has a default, so an empty
//! file (or no file) yields the stock grid: 50/100/150/200 px slots, a
//! 30 px bar floor, 20 rows per bay.
//!
//! ```toml
//! [timeline]
//! week_width = 120.0
//!
//! [rows]
//! default_row_count = 8
//! cell_height = 160.0
//!
//! [store]
//! base_url = "http://localhost:5000"
//! timeout_secs = 15
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::layout::DEFAULT_MIN_BAR_WIDTH;
use crate::models::{SlotWidths, DEFAULT_ROW_COUNT};

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete grid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub timeline: TimelineSettings,
    #[serde(default)]
    pub rows: RowSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

/// Slot widths and bar floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    #[serde(default = "default_day_width")]
    pub day_width: f64,
    #[serde(default = "default_week_width")]
    pub week_width: f64,
    #[serde(default = "default_month_width")]
    pub month_width: f64,
    #[serde(default = "default_quarter_width")]
    pub quarter_width: f64,
    #[serde(default = "default_min_bar_width")]
    pub min_bar_width: f64,
}

/// Bay row layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSettings {
    /// Rows for a bay whose registry record does not say.
    #[serde(default = "default_row_count")]
    pub default_row_count: u32,
    /// Pixel height of a bay cell.
    #[serde(default = "default_cell_height")]
    pub cell_height: f64,
}

/// Schedule Store connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout; `None` keeps the HTTP client default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_day_width() -> f64 {
    50.0
}

fn default_week_width() -> f64 {
    100.0
}

fn default_month_width() -> f64 {
    150.0
}

fn default_quarter_width() -> f64 {
    200.0
}

fn default_min_bar_width() -> f64 {
    DEFAULT_MIN_BAR_WIDTH
}

fn default_row_count() -> u32 {
    DEFAULT_ROW_COUNT
}

fn default_cell_height() -> f64 {
    200.0
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            day_width: default_day_width(),
            week_width: default_week_width(),
            month_width: default_month_width(),
            quarter_width: default_quarter_width(),
            min_bar_width: default_min_bar_width(),
        }
    }
}

impl Default for RowSettings {
    fn default() -> Self {
        Self {
            default_row_count: default_row_count(),
            cell_height: default_cell_height(),
        }
    }
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: None,
        }
    }
}

impl TimelineSettings {
    pub fn slot_widths(&self) -> SlotWidths {
        SlotWidths {
            day: self.day_width,
            week: self.week_width,
            month: self.month_width,
            quarter: self.quarter_width,
        }
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("must be a positive number, got {value}"),
        })
    }
}

impl GridConfig {
    /// Loads and validates a config file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        content.parse()
    }

    /// Rejects settings that would produce an unusable grid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("timeline.day_width", self.timeline.day_width)?;
        positive("timeline.week_width", self.timeline.week_width)?;
        positive("timeline.month_width", self.timeline.month_width)?;
        positive("timeline.quarter_width", self.timeline.quarter_width)?;
        if !self.timeline.min_bar_width.is_finite() || self.timeline.min_bar_width < 0.0 {
            return Err(ConfigError::Invalid {
                field: "timeline.min_bar_width",
                reason: "must be zero or positive".to_string(),
            });
        }
        positive("rows.cell_height", self.rows.cell_height)?;
        if self.rows.default_row_count == 0 {
            return Err(ConfigError::Invalid {
                field: "rows.default_row_count",
                reason: "a bay needs at least one row".to_string(),
            });
        }
        if self.store.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "store.base_url",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

impl FromStr for GridConfig {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: GridConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: GridConfig = "".parse().unwrap();
        assert_eq!(config, GridConfig::default());
        assert_eq!(config.timeline.slot_widths(), SlotWidths::default());
        assert_eq!(config.rows.default_row_count, 20);
        assert!((config.timeline.min_bar_width - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
[timeline]
week_width = 120.0

[rows]
default_row_count = 8

[store]
base_url = "http://schedules.internal:8080"
timeout_secs = 15
"#;
        let config: GridConfig = toml.parse().unwrap();
        assert!((config.timeline.week_width - 120.0).abs() < 1e-10);
        assert!((config.timeline.day_width - 50.0).abs() < 1e-10);
        assert_eq!(config.rows.default_row_count, 8);
        assert_eq!(config.store.timeout_secs, Some(15));
    }

    #[test]
    fn test_zero_width_rejected() {
        let err = "[timeline]\nday_width = 0.0\n".parse::<GridConfig>().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "timeline.day_width",
                ..
            }
        ));
    }

    #[test]
    fn test_zero_rows_rejected() {
        assert!("[rows]\ndefault_row_count = 0\n".parse::<GridConfig>().is_err());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            "[timeline\n".parse::<GridConfig>(),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[rows]\ncell_height = 120.0").unwrap();
        let config = GridConfig::from_file(file.path()).unwrap();
        assert!((config.rows.cell_height - 120.0).abs() < 1e-10);

        assert!(matches!(
            GridConfig::from_file("/nonexistent/grid.toml"),
            Err(ConfigError::Io(_))
        ));
    }
}
