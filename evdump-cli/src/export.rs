//! Renderer hand-off
//!
//! Writes the pressure trace in a form an external plotting tool can load
//! directly: JSON with the plot hints attached, or a flat CSV table.

use crate::config::{OutputFormat, PlotConfig};
use anyhow::{Context, Result};
use evdump_decoder::{ColorDriver, PressureTrace, TimeAxis, TracePoint};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Serialize)]
struct TraceExport<'a> {
    plot: &'a PlotConfig,
    time_axis: TimeAxis,
    color_driver: ColorDriver,
    max_pressure: f64,
    points: Vec<TracePoint>,
}

/// Write a trace to `writer` in the requested format
pub fn write_trace<W: Write>(
    writer: &mut W,
    trace: &PressureTrace,
    driver: ColorDriver,
    plot: &PlotConfig,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            let export = TraceExport {
                plot,
                time_axis: trace.frame.time_axis,
                color_driver: driver,
                max_pressure: trace.max_pressure,
                points: trace.points().collect(),
            };
            serde_json::to_writer_pretty(&mut *writer, &export)
                .context("Failed to serialize trace")?;
            writeln!(writer)?;
        }
        OutputFormat::Csv => {
            writeln!(writer, "t,x,y,pressure,dpdt,color")?;
            for p in trace.points() {
                writeln!(
                    writer,
                    "{},{},{},{},{},{}",
                    p.t, p.x, p.y, p.pressure, p.dpdt, p.color
                )?;
            }
        }
    }
    Ok(())
}

/// Write a trace to a file, creating or truncating it
pub fn export_trace(
    path: &Path,
    trace: &PressureTrace,
    driver: ColorDriver,
    plot: &PlotConfig,
    format: OutputFormat,
) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_trace(&mut writer, trace, driver, plot, format)?;
    writer
        .flush()
        .with_context(|| format!("Failed to write output file: {:?}", path))?;

    log::info!("Wrote {} points to {:?}", trace.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdump_decoder::Decoder;

    const DUMP: &str = "\
# Event type 3 (EV_ABS)
# Event code 0 (ABS_X)
# Event code 1 (ABS_Y)
# Event code 24 (ABS_PRESSURE)
- [0, 0, 3, 0, 10] # EV_ABS / ABS_X 10
- [0, 0, 3, 1, 20] # EV_ABS / ABS_Y 20
- [0, 0, 3, 24, 5] # EV_ABS / ABS_PRESSURE 5
- [1, 0, 3, 24, 9] # EV_ABS / ABS_PRESSURE 9
";

    fn trace() -> PressureTrace {
        Decoder::new().decode_str(DUMP).unwrap()
    }

    #[test]
    fn test_csv_export() {
        let mut out = Vec::new();
        write_trace(
            &mut out,
            &trace(),
            ColorDriver::Pressure,
            &PlotConfig::default(),
            OutputFormat::Csv,
        )
        .unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "t,x,y,pressure,dpdt,color");
        assert!(lines[1].starts_with("0,10,20,5,4,"));
        assert!(lines[2].starts_with("1,10,20,9,4,"));
    }

    #[test]
    fn test_json_export() {
        let mut out = Vec::new();
        write_trace(
            &mut out,
            &trace(),
            ColorDriver::Pressure,
            &PlotConfig::default(),
            OutputFormat::Json,
        )
        .unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["max_pressure"], 9.0);
        assert_eq!(value["time_axis"], "sample_index");
        assert_eq!(value["color_driver"], "pressure");
        assert_eq!(value["plot"]["colormap"], "nipy_spectral_r");
        assert_eq!(value["points"].as_array().map(|p| p.len()), Some(2));
        assert_eq!(value["points"][1]["pressure"], 9.0);
    }

    #[test]
    fn test_export_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        export_trace(
            &path,
            &trace(),
            ColorDriver::Pressure,
            &PlotConfig::default(),
            OutputFormat::Json,
        )
        .unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"points\""));
    }
}
