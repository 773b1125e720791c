//! Chart engine configuration
//!
//! Defaults reproduce the dashboard: a 20-level depth window, five price
//! intervals, four volume intervals and roughly six time labels. Every struct
//! is `#[serde(default)]`, so a config file only names what it overrides.

use serde::{Deserialize, Serialize};

/// Errors returned by [`ChartConfig::validate`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("depth window must be at least 1 level")]
    ZeroDepthWindow,

    #[error("{axis} axis needs at least 1 tick interval")]
    ZeroTickCount { axis: &'static str },

    #[error("time label target must be at least 1")]
    ZeroTimeLabelTarget,
}

/// Depth aggregator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepthConfig {
    /// Levels per side considered for bar sizing and spreads.
    pub window: usize,
}

impl Default for DepthConfig {
    fn default() -> Self {
        Self { window: 20 }
    }
}

/// Candle scaler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalerConfig {
    /// Intervals on the price axis (yields `price_ticks + 1` labels).
    pub price_ticks: usize,
    /// Intervals on the volume axis (yields `volume_ticks + 1` labels).
    pub volume_ticks: usize,
    /// Approximate number of time labels along the x axis.
    pub time_label_target: usize,
}

impl Default for ScalerConfig {
    fn default() -> Self {
        Self {
            price_ticks: 5,
            volume_ticks: 4,
            time_label_target: 6,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub depth: DepthConfig,
    pub scaler: ScalerConfig,
}

impl ChartConfig {
    /// Reject settings that would produce empty axes or an empty book.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth.window == 0 {
            return Err(ConfigError::ZeroDepthWindow);
        }
        if self.scaler.price_ticks == 0 {
            return Err(ConfigError::ZeroTickCount { axis: "price" });
        }
        if self.scaler.volume_ticks == 0 {
            return Err(ConfigError::ZeroTickCount { axis: "volume" });
        }
        if self.scaler.time_label_target == 0 {
            return Err(ConfigError::ZeroTimeLabelTarget);
        }
        Ok(())
    }
}
