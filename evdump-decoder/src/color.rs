//! Pressure trend coloring
//!
//! Maps each frame row to a scalar for a diverging colormap. The sign of the
//! pressure derivative picks the range (rising or falling); the driving
//! quantity positions the point inside that range. Rows where pressure is
//! flat get the scale's neutral sentinel.

use crate::align::AlignedFrame;
use crate::config::{ColorDriver, ColorScale};
use crate::types::{DumpError, Result};

/// Color value for a single point
///
/// `magnitude` is the driving quantity (pressure, or |dp/dt|) and `max` its
/// session maximum. `max` must be positive whenever `dpdt` is non-zero.
pub fn trend_color(magnitude: f64, dpdt: f64, max: f64, scale: &ColorScale) -> f64 {
    if dpdt > 0.0 {
        let [low, high] = scale.rising;
        low + magnitude * (high - low) / max
    } else if dpdt < 0.0 {
        let [low, high] = scale.falling;
        low + magnitude * (high - low) / max
    } else {
        scale.neutral()
    }
}

/// Color every row of an aligned frame
pub fn color_track(frame: &AlignedFrame, scale: &ColorScale) -> Result<Vec<f64>> {
    scale.validate()?;

    let magnitudes: Vec<f64> = match scale.driver {
        ColorDriver::Pressure => frame.pressure.clone(),
        ColorDriver::Derivative => frame.dpdt.iter().map(|d| d.abs()).collect(),
    };
    let max = magnitudes.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if max <= 0.0 && frame.dpdt.iter().any(|d| *d != 0.0) {
        return Err(DumpError::DegenerateSession(format!(
            "maximum {:?} value is {}, cannot scale colors",
            scale.driver, max
        )));
    }

    let colors: Vec<f64> = magnitudes
        .iter()
        .zip(&frame.dpdt)
        .map(|(&magnitude, &dpdt)| trend_color(magnitude, dpdt, max, scale))
        .collect();

    log::debug!("Colored {} rows (driver: {:?}, max {})", colors.len(), scale.driver, max);
    Ok(colors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimeAxis;

    fn frame(pressure: &[f64], dpdt: &[f64]) -> AlignedFrame {
        let n = pressure.len();
        AlignedFrame {
            index: (0..n).map(|i| i as f64).collect(),
            x: vec![0.0; n],
            y: vec![0.0; n],
            pressure: pressure.to_vec(),
            dpdt: dpdt.to_vec(),
            time_axis: TimeAxis::Timestamp,
        }
    }

    #[test]
    fn test_rising_and_falling_formula() {
        let scale = ColorScale::default();
        assert!((trend_color(0.0, 1.0, 255.0, &scale) - 0.25).abs() < 1e-12);
        assert!((trend_color(255.0, 1.0, 255.0, &scale) - 0.4).abs() < 1e-12);
        assert!((trend_color(0.0, -1.0, 255.0, &scale) - 0.75).abs() < 1e-12);
        assert!((trend_color(127.5, -3.0, 255.0, &scale) - 0.825).abs() < 1e-12);
    }

    #[test]
    fn test_flat_pressure_always_neutral() {
        let scale = ColorScale::default();
        for p in [0.0, 1.0, 128.0, 255.0, 10_000.0] {
            assert_eq!(trend_color(p, 0.0, 255.0, &scale), scale.neutral());
        }
    }

    #[test]
    fn test_rising_and_falling_ranges_are_disjoint() {
        let scale = ColorScale::default();
        let max_p = 255.0;
        let mut highest_rising = f64::NEG_INFINITY;
        let mut lowest_falling = f64::INFINITY;

        for step in 0..=1000 {
            let p = max_p * step as f64 / 1000.0;
            let rising = trend_color(p, 0.5, max_p, &scale);
            let falling = trend_color(p, -0.5, max_p, &scale);
            assert!(rising >= 0.25 - 1e-12 && rising <= 0.4 + 1e-12);
            assert!(falling >= 0.75 - 1e-12 && falling <= 0.9 + 1e-12);
            highest_rising = highest_rising.max(rising);
            lowest_falling = lowest_falling.min(falling);
        }
        assert!(highest_rising < lowest_falling);
    }

    #[test]
    fn test_color_track_pressure_driver() {
        let colors = color_track(
            &frame(&[0.0, 100.0, 200.0, 200.0], &[100.0, 100.0, 50.0, -10.0]),
            &ColorScale::default(),
        )
        .unwrap();

        assert_eq!(colors.len(), 4);
        assert!((colors[0] - 0.25).abs() < 1e-12);
        assert!((colors[2] - 0.4).abs() < 1e-12);
        assert!((colors[3] - 0.9).abs() < 1e-12);
    }

    #[test]
    fn test_color_track_derivative_driver() {
        let scale = ColorScale::new().with_driver(ColorDriver::Derivative);
        let colors = color_track(&frame(&[10.0, 20.0, 10.0], &[10.0, 0.0, -5.0]), &scale).unwrap();

        assert!((colors[0] - 0.4).abs() < 1e-12);
        assert_eq!(colors[1], scale.neutral());
        assert!((colors[2] - 0.825).abs() < 1e-12);
    }

    #[test]
    fn test_flat_session_is_all_neutral() {
        let scale = ColorScale::default();
        let colors = color_track(&frame(&[0.0, 0.0, 0.0], &[0.0, 0.0, 0.0]), &scale).unwrap();
        assert!(colors.iter().all(|c| *c == scale.neutral()));
    }

    #[test]
    fn test_degenerate_session() {
        let result = color_track(&frame(&[0.0, -4.0], &[-4.0, -4.0]), &ColorScale::default());
        assert!(matches!(result, Err(DumpError::DegenerateSession(_))));
    }

    #[test]
    fn test_invalid_scale_rejected() {
        let scale = ColorScale::new().with_rising(0.5, 0.8);
        let result = color_track(&frame(&[1.0], &[0.0]), &scale);
        assert!(matches!(result, Err(DumpError::InvalidColorScale(_))));
    }
}
