//! Tunable limits for the summary index and the viewport session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};
use crate::pyramid::builder::MAX_SUMMARY_LEVEL;

/// Environment variable consulted when no explicit config path is given.
pub const CONFIG_ENV_VAR: &str = "AUDIOPLOT_CONFIG";

/// All tunables in one place.
///
/// Every field has a default, so a JSON file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Maximum number of summary levels above full resolution.
    pub max_detail_levels: usize,
    /// Construction stops once a level has fewer points than this.
    /// Also the point budget for level selection.
    pub min_detail_level_points: usize,
    /// Markers are drawn when fewer points than this are visible.
    pub marker_threshold: usize,
    /// Fraction of the visible X span added or removed per zoom step.
    pub x_zoom_fraction: f64,
    /// Fraction of the visible X span moved per pan step.
    pub pan_fraction: f64,
    /// Y half-range at zoom level `n` is `y_zoom_base^-n`.
    pub y_zoom_base: f64,
    /// Headroom multiplier applied when fitting Y to the data.
    pub y_fit_margin: f64,
    /// Large cursor steps move by `frame_count / cursor_large_step_divisor`.
    pub cursor_large_step_divisor: usize,
    /// Frames shown on each side of the cursor in the value table.
    pub cursor_context_frames: usize,
    /// Loads with more traces than this start in combined mode.
    pub spread_max_traces: usize,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            max_detail_levels: 16,
            min_detail_level_points: 32768,
            marker_threshold: 250,
            x_zoom_fraction: 0.2,
            pan_fraction: 0.2,
            y_zoom_base: 1.2,
            y_fit_margin: 1.05,
            cursor_large_step_divisor: 100,
            cursor_context_frames: 3,
            spread_max_traces: 8,
        }
    }
}

impl PlotConfig {
    /// Read a JSON config file and validate it.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: PlotConfig = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate()?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Resolve the config from an explicit path, then `AUDIOPLOT_CONFIG`,
    /// then defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => std::env::var(CONFIG_ENV_VAR).ok().map(PathBuf::from),
        };
        match path {
            Some(p) => Self::load(&p),
            None => Ok(Self::default()),
        }
    }

    /// Reject values that would stall construction or level selection.
    pub fn validate(&self) -> PlotResult<()> {
        if self.max_detail_levels == 0 || self.max_detail_levels > MAX_SUMMARY_LEVEL {
            return Err(PlotError::InvalidConfig(format!(
                "max_detail_levels must be in 1..={}, got {}",
                MAX_SUMMARY_LEVEL, self.max_detail_levels
            )));
        }
        if self.min_detail_level_points < 2 {
            return Err(PlotError::InvalidConfig(
                "min_detail_level_points must be at least 2".into(),
            ));
        }
        if self.cursor_large_step_divisor == 0 {
            return Err(PlotError::InvalidConfig(
                "cursor_large_step_divisor must be non-zero".into(),
            ));
        }
        if !(self.y_zoom_base.is_finite() && self.y_zoom_base > 1.0) {
            return Err(PlotError::InvalidConfig(format!(
                "y_zoom_base must be greater than 1, got {}",
                self.y_zoom_base
            )));
        }
        for (name, value) in [
            ("x_zoom_fraction", self.x_zoom_fraction),
            ("pan_fraction", self.pan_fraction),
        ] {
            if !(value.is_finite() && value > 0.0 && value < 0.5) {
                return Err(PlotError::InvalidConfig(format!(
                    "{} must be in (0, 0.5), got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }

    /// Half of the point budget; the hysteresis threshold for level selection.
    pub fn level_switch_threshold(&self) -> usize {
        self.min_detail_level_points / 2
    }
}
