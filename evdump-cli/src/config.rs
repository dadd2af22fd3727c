//! Configuration loading and parsing

use anyhow::{Context, Result};
use evdump_decoder::{AlignConfig, ColorScale, TraceConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub align: AlignConfig,
    #[serde(default)]
    pub color: ColorScale,
    #[serde(default)]
    pub plot: PlotConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub dump: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Csv,
}

/// Rendering hints passed through to the plotting side untouched
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PlotConfig {
    /// Upper axis bounds for X, Y and pressure
    #[serde(default = "default_bounds")]
    pub bounds: [f64; 3],
    #[serde(default = "default_colormap")]
    pub colormap: String,
    #[serde(default = "default_azimuth")]
    pub azimuth: f64,
    #[serde(default = "default_elevation")]
    pub elevation: f64,
    /// Figure width and height in inches
    #[serde(default = "default_figure_size")]
    pub figure_size: [f64; 2],
    #[serde(default = "default_dpi")]
    pub dpi: u32,
}

fn default_bounds() -> [f64; 3] {
    [8000.0, 6000.0, 255.0]
}

fn default_colormap() -> String {
    "nipy_spectral_r".to_string()
}

fn default_azimuth() -> f64 {
    -35.0
}

fn default_elevation() -> f64 {
    -145.0
}

fn default_figure_size() -> [f64; 2] {
    [6.0, 6.0]
}

fn default_dpi() -> u32 {
    200
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
            colormap: default_colormap(),
            azimuth: default_azimuth(),
            elevation: default_elevation(),
            figure_size: default_figure_size(),
            dpi: default_dpi(),
        }
    }
}

impl AppConfig {
    /// Configuration for a single dump with every other setting at its default
    pub fn for_dump(dump: PathBuf) -> Self {
        Self {
            input: InputConfig { dump },
            output: OutputConfig::default(),
            align: AlignConfig::default(),
            color: ColorScale::default(),
            plot: PlotConfig::default(),
        }
    }

    /// Settings handed to the decoder library
    pub fn trace_config(&self) -> TraceConfig {
        TraceConfig::new()
            .with_align(self.align.clone())
            .with_color(self.color.clone())
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    config
        .color
        .validate()
        .with_context(|| format!("Invalid [color] section in {:?}", path))?;

    // Relative dump and output paths are taken relative to the config file
    if let Some(base) = path.parent() {
        if config.input.dump.is_relative() {
            config.input.dump = base.join(&config.input.dump);
        }
        if let Some(out) = config.output.path.as_mut() {
            if out.is_relative() {
                *out = base.join(&*out);
            }
        }
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdump_decoder::{ColorDriver, TimeAxis};

    #[test]
    fn test_config_deserialization() {
        let toml_content = r#"
            [input]
            dump = "session.yml"

            [output]
            path = "trace.csv"
            format = "csv"

            [align]
            time_axis = "timestamp"
            pressure_channel = "ABS_MT_PRESSURE"

            [color]
            driver = "derivative"
            rising = [0.1, 0.2]
        "#;

        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.input.dump, PathBuf::from("session.yml"));
        assert_eq!(config.output.format, OutputFormat::Csv);
        assert_eq!(config.align.time_axis, TimeAxis::Timestamp);
        assert_eq!(config.align.x_channel, "ABS_X");
        assert_eq!(config.align.pressure_channel, "ABS_MT_PRESSURE");
        assert_eq!(config.color.driver, ColorDriver::Derivative);
        assert_eq!(config.color.rising, [0.1, 0.2]);
        assert_eq!(config.color.falling, [0.75, 0.9]);
        assert_eq!(config.plot, PlotConfig::default());
    }

    #[test]
    fn test_minimal_config() {
        let config: AppConfig = toml::from_str("[input]\ndump = \"a.yml\"\n").unwrap();
        assert!(config.output.path.is_none());
        assert_eq!(config.output.format, OutputFormat::Json);
        assert_eq!(config.trace_config(), TraceConfig::default());
    }

    #[test]
    fn test_load_config_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[input]\ndump = \"session.yml\"\n[output]\npath = \"out.json\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.input.dump, dir.path().join("session.yml"));
        assert_eq!(config.output.path, Some(dir.path().join("out.json")));
    }

    #[test]
    fn test_load_config_rejects_overlapping_colors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[input]\ndump = \"s.yml\"\n[color]\nrising = [0.7, 0.8]\n").unwrap();

        assert!(load_config(&path).is_err());
    }
}
