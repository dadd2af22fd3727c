//! Channel alignment and interpolation
//!
//! The position and pressure channels are sampled independently and at
//! uneven rates. They are merged onto the union of their timestamps so that
//! no original sample is lost; the gaps this leaves in each column are then
//! filled by linear interpolation between the column's own known values,
//! with leading and trailing gaps taking the nearest known value.

use crate::color::color_track;
use crate::config::{ColorScale, TimeAxis};
use crate::types::{ChannelSeries, DumpError, Result};
use serde::Serialize;

/// Three channels on a common time index, plus the pressure derivative
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedFrame {
    /// Sorted, de-duplicated union of all channel timestamps
    pub index: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub pressure: Vec<f64>,
    /// Discrete derivative of `pressure` along the chosen time axis
    pub dpdt: Vec<f64>,
    /// Abscissa used for interpolation and differentiation
    pub time_axis: TimeAxis,
}

/// One row of an aligned frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameRow {
    pub t: f64,
    pub x: f64,
    pub y: f64,
    pub pressure: f64,
    pub dpdt: f64,
}

impl AlignedFrame {
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Largest pressure value in the frame
    pub fn max_pressure(&self) -> Option<f64> {
        self.pressure.iter().copied().reduce(f64::max)
    }

    /// Color every row with the given scale
    pub fn colors(&self, scale: &ColorScale) -> Result<Vec<f64>> {
        color_track(self, scale)
    }

    /// Iterate over frame rows in time order
    pub fn rows(&self) -> impl Iterator<Item = FrameRow> + '_ {
        (0..self.len()).map(move |i| FrameRow {
            t: self.index[i],
            x: self.x[i],
            y: self.y[i],
            pressure: self.pressure[i],
            dpdt: self.dpdt[i],
        })
    }
}

/// Sorted union of the timestamps of all given series
pub fn union_index(series: &[&ChannelSeries]) -> Vec<f64> {
    let mut index: Vec<f64> = series
        .iter()
        .flat_map(|s| s.samples.iter().map(|sample| sample.timestamp))
        .collect();
    index.sort_by(f64::total_cmp);
    index.dedup();
    index
}

/// Place a series' values on `index`, leaving `None` where it has no sample
///
/// If a series holds several samples with the same timestamp the last one wins.
pub fn project(series: &ChannelSeries, index: &[f64]) -> Vec<Option<f64>> {
    let mut column = vec![None; index.len()];
    for sample in &series.samples {
        match index.binary_search_by(|t| t.total_cmp(&sample.timestamp)) {
            Ok(pos) => column[pos] = Some(sample.value as f64),
            Err(_) => log::warn!(
                "{} sample at {:.6} is not on the frame index",
                series.code_name,
                sample.timestamp
            ),
        }
    }
    column
}

/// Fill gaps in `column` by linear interpolation over `abscissa`
///
/// Interior gaps are interpolated between the nearest known neighbours.
/// Gaps before the first or after the last known value take that value.
/// Returns `None` if the column has no known value at all.
pub fn fill_gaps(abscissa: &[f64], column: &[Option<f64>]) -> Option<Vec<f64>> {
    debug_assert_eq!(abscissa.len(), column.len());

    let known: Vec<(usize, f64)> = column
        .iter()
        .enumerate()
        .filter_map(|(i, value)| value.map(|v| (i, v)))
        .collect();
    let &(first, first_value) = known.first()?;
    let &(last, last_value) = known.last()?;

    let mut filled: Vec<f64> = column.iter().map(|v| v.unwrap_or(f64::NAN)).collect();
    filled[..first].fill(first_value);
    filled[last + 1..].fill(last_value);

    for pair in known.windows(2) {
        let (i0, v0) = pair[0];
        let (i1, v1) = pair[1];
        let (x0, x1) = (abscissa[i0], abscissa[i1]);
        for i in i0 + 1..i1 {
            let frac = (abscissa[i] - x0) / (x1 - x0);
            filled[i] = v0 + (v1 - v0) * frac;
        }
    }

    Some(filled)
}

/// Discrete gradient of `values` over `abscissa`
///
/// Central differences in the interior, one-sided differences at both ends.
/// A single value has a gradient of zero.
pub fn gradient(abscissa: &[f64], values: &[f64]) -> Vec<f64> {
    debug_assert_eq!(abscissa.len(), values.len());

    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                let lo = i.saturating_sub(1);
                let hi = (i + 1).min(n - 1);
                (values[hi] - values[lo]) / (abscissa[hi] - abscissa[lo])
            })
            .collect(),
    }
}

/// Merge three channels onto their union index and fill every gap
pub fn align(
    x: &ChannelSeries,
    y: &ChannelSeries,
    pressure: &ChannelSeries,
    time_axis: TimeAxis,
) -> Result<AlignedFrame> {
    for series in [x, y, pressure] {
        if series.is_empty() {
            return Err(DumpError::MissingChannel(series.code_name.clone()));
        }
    }

    let index = union_index(&[x, y, pressure]);
    let abscissa: Vec<f64> = match time_axis {
        TimeAxis::Timestamp => index.clone(),
        TimeAxis::SampleIndex => (0..index.len()).map(|i| i as f64).collect(),
    };

    let fill = |series: &ChannelSeries| {
        fill_gaps(&abscissa, &project(series, &index))
            .ok_or_else(|| DumpError::MissingChannel(series.code_name.clone()))
    };
    let x_col = fill(x)?;
    let y_col = fill(y)?;
    let pressure_col = fill(pressure)?;
    let dpdt = gradient(&abscissa, &pressure_col);

    log::info!(
        "Aligned {} + {} + {} samples onto {} rows",
        x.len(),
        y.len(),
        pressure.len(),
        index.len()
    );

    Ok(AlignedFrame {
        index,
        x: x_col,
        y: y_col,
        pressure: pressure_col,
        dpdt,
        time_axis,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(code: &str, pairs: &[(f64, i64)]) -> ChannelSeries {
        ChannelSeries::from_pairs("EV_ABS", code, pairs)
    }

    #[test]
    fn test_union_index_sorted_and_unique() {
        let a = series("ABS_X", &[(1.0, 0), (3.0, 0)]);
        let b = series("ABS_Y", &[(2.0, 0), (3.0, 0)]);
        let c = series("ABS_PRESSURE", &[(0.5, 0)]);
        assert_eq!(union_index(&[&a, &b, &c]), vec![0.5, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_project_leaves_gaps() {
        let a = series("ABS_X", &[(1.0, 10), (3.0, 30)]);
        let column = project(&a, &[1.0, 2.0, 3.0]);
        assert_eq!(column, vec![Some(10.0), None, Some(30.0)]);
    }

    #[test]
    fn test_fill_gaps_interpolates_over_abscissa() {
        let column = [Some(0.0), None, None, Some(30.0)];
        let filled = fill_gaps(&[0.0, 1.0, 2.0, 3.0], &column).unwrap();
        assert_eq!(filled, vec![0.0, 10.0, 20.0, 30.0]);

        // Uneven spacing follows the abscissa, not the row position
        let filled = fill_gaps(&[0.0, 2.5, 3.0], &[Some(0.0), None, Some(30.0)]).unwrap();
        assert!((filled[1] - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_fill_gaps_extends_edges_with_nearest_value() {
        let column = [None, None, Some(5.0), None, Some(9.0), None];
        let filled = fill_gaps(&[0.0, 1.0, 2.0, 3.0, 4.0, 5.0], &column).unwrap();
        assert_eq!(filled, vec![5.0, 5.0, 5.0, 7.0, 9.0, 9.0]);
    }

    #[test]
    fn test_fill_gaps_empty_column() {
        assert_eq!(fill_gaps(&[0.0, 1.0], &[None, None]), None);
    }

    #[test]
    fn test_gradient() {
        let grad = gradient(&[0.0, 1.0, 2.0, 3.0], &[0.0, 1.0, 4.0, 9.0]);
        assert_eq!(grad, vec![1.0, 2.0, 4.0, 5.0]);
        assert_eq!(gradient(&[4.0], &[12.0]), vec![0.0]);
        assert!(gradient(&[], &[]).is_empty());
    }

    #[test]
    fn test_gradient_of_constant_is_zero() {
        let abscissa = [0.0, 0.013, 0.02, 0.5, 0.51];
        let grad = gradient(&abscissa, &[87.0; 5]);
        assert!(grad.iter().all(|g| *g == 0.0));
    }

    #[test]
    fn test_single_sample_aligned_with_itself() {
        let only = series("ABS_PRESSURE", &[(4.25, 77)]);
        let frame = align(&only, &only, &only, TimeAxis::Timestamp).unwrap();

        assert_eq!(frame.index, vec![4.25]);
        assert_eq!(frame.x, vec![77.0]);
        assert_eq!(frame.y, vec![77.0]);
        assert_eq!(frame.pressure, vec![77.0]);
        assert_eq!(frame.dpdt, vec![0.0]);
    }

    #[test]
    fn test_three_singletons_produce_three_rows() {
        let x = series("ABS_X", &[(1.0, 100)]);
        let y = series("ABS_Y", &[(2.0, 200)]);
        let p = series("ABS_PRESSURE", &[(3.0, 30)]);
        let frame = align(&x, &y, &p, TimeAxis::Timestamp).unwrap();

        assert_eq!(frame.len(), 3);
        assert_eq!(frame.x, vec![100.0; 3]);
        assert_eq!(frame.y, vec![200.0; 3]);
        assert_eq!(frame.pressure, vec![30.0; 3]);
        assert_eq!(frame.dpdt, vec![0.0; 3]);
    }

    #[test]
    fn test_sample_index_axis_ignores_spacing() {
        let x = series("ABS_X", &[(0.0, 0), (10.0, 30)]);
        let y = series("ABS_Y", &[(9.0, 1)]);
        let p = series("ABS_PRESSURE", &[(0.0, 0), (9.0, 10), (10.0, 20)]);

        let by_time = align(&x, &y, &p, TimeAxis::Timestamp).unwrap();
        assert!((by_time.x[1] - 27.0).abs() < 1e-9);

        let by_row = align(&x, &y, &p, TimeAxis::SampleIndex).unwrap();
        assert!((by_row.x[1] - 15.0).abs() < 1e-9);
        assert_eq!(by_row.dpdt, vec![10.0, 10.0, 10.0]);
    }

    #[test]
    fn test_empty_series_is_missing_channel() {
        let x = series("ABS_X", &[(0.0, 0)]);
        let empty = ChannelSeries::new("EV_ABS", "ABS_PRESSURE", true);
        assert!(matches!(
            align(&x, &x, &empty, TimeAxis::Timestamp),
            Err(DumpError::MissingChannel(name)) if name == "ABS_PRESSURE"
        ));
    }

    #[test]
    fn test_rows_and_max_pressure() {
        let x = series("ABS_X", &[(0.0, 1), (1.0, 2)]);
        let p = series("ABS_PRESSURE", &[(0.0, 50), (1.0, 80)]);
        let frame = align(&x, &x, &p, TimeAxis::Timestamp).unwrap();

        let rows: Vec<FrameRow> = frame.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].pressure, 80.0);
        assert_eq!(rows[0].dpdt, 30.0);
        assert_eq!(frame.max_pressure(), Some(80.0));
    }

    #[test]
    fn test_frame_colors() {
        let x = series("ABS_X", &[(0.0, 1), (1.0, 2), (2.0, 3)]);
        let p = series("ABS_PRESSURE", &[(0.0, 0), (1.0, 60), (2.0, 60)]);
        let frame = align(&x, &x, &p, TimeAxis::SampleIndex).unwrap();
        let scale = ColorScale::default();

        let colors = frame.colors(&scale).unwrap();
        assert_eq!(colors, color_track(&frame, &scale).unwrap());
        assert_eq!(frame.dpdt, vec![60.0, 30.0, 0.0]);
        assert!((colors[0] - 0.25).abs() < 1e-12);
        assert!((colors[1] - 0.4).abs() < 1e-12);
        assert_eq!(colors[2], scale.neutral());
    }
}
