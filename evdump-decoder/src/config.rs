//! Decoder configuration types
//!
//! This module defines the knobs of the alignment and coloring stages.
//! Everything here is plain data with serde support so the application layer
//! can embed it directly in its TOML configuration.

use crate::types::{DumpError, Result};
use serde::{Deserialize, Serialize};

/// Abscissa used when interpolating gaps and differentiating pressure
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeAxis {
    /// Use the merged timestamps
    Timestamp,
    /// Treat frame rows as equally spaced (row position 0, 1, 2...)
    #[default]
    SampleIndex,
}

/// Quantity that drives the position inside a color range
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorDriver {
    /// Pressure magnitude, scaled by the session maximum pressure
    #[default]
    Pressure,
    /// Absolute pressure derivative, scaled by the session maximum |dp/dt|
    Derivative,
}

/// Configuration for channel alignment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignConfig {
    /// Abscissa for interpolation and gradient
    #[serde(default)]
    pub time_axis: TimeAxis,

    /// Code name of the horizontal position channel
    #[serde(default = "default_x_channel")]
    pub x_channel: String,

    /// Code name of the vertical position channel
    #[serde(default = "default_y_channel")]
    pub y_channel: String,

    /// Code name of the pressure channel
    #[serde(default = "default_pressure_channel")]
    pub pressure_channel: String,
}

fn default_x_channel() -> String {
    "ABS_X".to_string()
}

fn default_y_channel() -> String {
    "ABS_Y".to_string()
}

fn default_pressure_channel() -> String {
    "ABS_PRESSURE".to_string()
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            time_axis: TimeAxis::default(),
            x_channel: default_x_channel(),
            y_channel: default_y_channel(),
            pressure_channel: default_pressure_channel(),
        }
    }
}

impl AlignConfig {
    /// Create an alignment configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the interpolation abscissa
    pub fn with_time_axis(mut self, time_axis: TimeAxis) -> Self {
        self.time_axis = time_axis;
        self
    }

    /// Builder method: override the three channel names
    pub fn with_channels(
        mut self,
        x: impl Into<String>,
        y: impl Into<String>,
        pressure: impl Into<String>,
    ) -> Self {
        self.x_channel = x.into();
        self.y_channel = y.into();
        self.pressure_channel = pressure.into();
        self
    }
}

/// Color ranges for rising and falling pressure
///
/// Both ranges live in the `[0, 1]` domain of a single colormap and must not
/// overlap, so that the two trends stay distinguishable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorScale {
    /// Which quantity positions a point inside its range
    #[serde(default)]
    pub driver: ColorDriver,

    /// `[low, high]` used while pressure increases
    #[serde(default = "default_rising")]
    pub rising: [f64; 2],

    /// `[low, high]` used while pressure decreases
    #[serde(default = "default_falling")]
    pub falling: [f64; 2],
}

fn default_rising() -> [f64; 2] {
    [0.25, 0.4]
}

fn default_falling() -> [f64; 2] {
    [0.75, 0.9]
}

impl Default for ColorScale {
    fn default() -> Self {
        Self {
            driver: ColorDriver::default(),
            rising: default_rising(),
            falling: default_falling(),
        }
    }
}

impl ColorScale {
    /// Create a color scale with the default ranges
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: select the driving quantity
    pub fn with_driver(mut self, driver: ColorDriver) -> Self {
        self.driver = driver;
        self
    }

    /// Builder method: set the rising-pressure range
    pub fn with_rising(mut self, low: f64, high: f64) -> Self {
        self.rising = [low, high];
        self
    }

    /// Builder method: set the falling-pressure range
    pub fn with_falling(mut self, low: f64, high: f64) -> Self {
        self.falling = [low, high];
        self
    }

    /// Sentinel color for points where pressure is flat
    pub fn neutral(&self) -> f64 {
        self.falling[0] - self.rising[1]
    }

    /// Check that both ranges are well formed and disjoint
    pub fn validate(&self) -> Result<()> {
        for (label, [low, high]) in [("rising", self.rising), ("falling", self.falling)] {
            if !(0.0..=1.0).contains(&low) || !(0.0..=1.0).contains(&high) {
                return Err(DumpError::InvalidColorScale(format!(
                    "{} range [{}, {}] is outside [0, 1]",
                    label, low, high
                )));
            }
            if low > high {
                return Err(DumpError::InvalidColorScale(format!(
                    "{} range [{}, {}] has low above high",
                    label, low, high
                )));
            }
        }

        let [rise_low, rise_high] = self.rising;
        let [fall_low, fall_high] = self.falling;
        if rise_low <= fall_high && fall_low <= rise_high {
            return Err(DumpError::InvalidColorScale(format!(
                "rising range {:?} overlaps falling range {:?}",
                self.rising, self.falling
            )));
        }

        Ok(())
    }
}

/// Full configuration for turning a parsed dump into a pressure trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default)]
    pub align: AlignConfig,
    #[serde(default)]
    pub color: ColorScale,
}

impl TraceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: replace the alignment settings
    pub fn with_align(mut self, align: AlignConfig) -> Self {
        self.align = align;
        self
    }

    /// Builder method: replace the color scale
    pub fn with_color(mut self, color: ColorScale) -> Self {
        self.color = color;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_config_builder() {
        let config = AlignConfig::new()
            .with_time_axis(TimeAxis::Timestamp)
            .with_channels("ABS_MT_POSITION_X", "ABS_MT_POSITION_Y", "ABS_MT_PRESSURE");

        assert_eq!(config.time_axis, TimeAxis::Timestamp);
        assert_eq!(config.x_channel, "ABS_MT_POSITION_X");
        assert_eq!(config.pressure_channel, "ABS_MT_PRESSURE");
    }

    #[test]
    fn test_default_channels() {
        let config = AlignConfig::default();
        assert_eq!(config.time_axis, TimeAxis::SampleIndex);
        assert_eq!(config.x_channel, "ABS_X");
        assert_eq!(config.y_channel, "ABS_Y");
        assert_eq!(config.pressure_channel, "ABS_PRESSURE");
    }

    #[test]
    fn test_default_scale_is_valid() {
        let scale = ColorScale::default();
        assert!(scale.validate().is_ok());
        assert_eq!(scale.driver, ColorDriver::Pressure);
        assert!((scale.neutral() - 0.35).abs() < 1e-12);
    }

    #[test]
    fn test_overlapping_ranges_rejected() {
        let scale = ColorScale::new().with_rising(0.2, 0.6).with_falling(0.5, 0.9);
        assert!(matches!(
            scale.validate(),
            Err(DumpError::InvalidColorScale(_))
        ));
    }

    #[test]
    fn test_out_of_domain_and_inverted_ranges_rejected() {
        assert!(ColorScale::new().with_rising(-0.1, 0.2).validate().is_err());
        assert!(ColorScale::new().with_falling(0.9, 0.75).validate().is_err());
        assert!(ColorScale::new()
            .with_rising(0.75, 0.9)
            .with_falling(0.1, 0.2)
            .validate()
            .is_ok());
    }
}
