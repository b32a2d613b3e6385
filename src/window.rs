use crate::models::SeriesPoint;
use crate::week::{WeekKey, normalize};
use serde::Serialize;
use tracing::debug;

pub const TRAILING_WEEKS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlignedPoint {
    pub label: String,
    pub week: WeekKey,
    pub value: f64,
    pub is_current_week: bool,
}

/// A target week and up to four weeks that precede it in its series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonWindow {
    pub target: WeekKey,
    pub current: AlignedPoint,
    pub trailing: Vec<AlignedPoint>,
}

impl ComparisonWindow {
    /// Trailing points followed by the current one, in chart order.
    pub fn points(&self) -> impl Iterator<Item = &AlignedPoint> {
        self.trailing.iter().chain(std::iter::once(&self.current))
    }

    pub fn trailing_values(&self) -> Vec<f64> {
        self.trailing.iter().map(|point| point.value).collect()
    }
}

fn keyed(series: &[SeriesPoint], reference_year: i32) -> Vec<(WeekKey, &SeriesPoint)> {
    series
        .iter()
        .filter_map(|point| match normalize(&point.label, reference_year) {
            Ok(week) => Some((week, point)),
            Err(err) => {
                debug!("skipping series point: {err}");
                None
            }
        })
        .collect()
}

fn aligned(week: WeekKey, point: &SeriesPoint, target: WeekKey) -> AlignedPoint {
    AlignedPoint {
        label: point.label.clone(),
        week,
        value: point.value,
        is_current_week: week == target,
    }
}

/// Locates `target` in `series` and collects the points before it. Returns
/// `None` when the series has no entry for that week.
pub fn build_window(
    series: &[SeriesPoint],
    target: WeekKey,
    reference_year: i32,
) -> Option<ComparisonWindow> {
    let keyed = keyed(series, reference_year);
    let index = keyed.iter().position(|(week, _)| *week == target)?;
    let start = index.saturating_sub(TRAILING_WEEKS);

    let trailing = keyed[start..index]
        .iter()
        .map(|(week, point)| aligned(*week, point, target))
        .collect();
    let (week, point) = keyed[index];

    Some(ComparisonWindow {
        target,
        current: aligned(week, point, target),
        trailing,
    })
}

/// Joins a secondary series onto the weeks of `window`. Weeks without a
/// matching entry are left out.
pub fn align_secondary(
    window: &ComparisonWindow,
    secondary: &[SeriesPoint],
    reference_year: i32,
) -> Vec<AlignedPoint> {
    let keyed = keyed(secondary, reference_year);
    window
        .points()
        .filter_map(|primary| {
            keyed
                .iter()
                .find(|(week, _)| *week == primary.week)
                .map(|(week, point)| aligned(*week, point, window.target))
        })
        .collect()
}

/// Splits aligned points into the target week's point and the ones before it.
/// `None` when the target week itself has no entry.
pub fn split_current(points: Vec<AlignedPoint>) -> Option<(AlignedPoint, Vec<AlignedPoint>)> {
    let mut points = points;
    let index = points.iter().position(|point| point.is_current_week)?;
    let current = points.remove(index);
    points.truncate(index);
    Some((current, points))
}
