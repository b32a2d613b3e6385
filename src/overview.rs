use crate::models::{DashboardData, HabitId};
use crate::trend::{BandTable, DeltaPolicy, TrendAnalysis};
use crate::week::WeekKey;
use crate::window::{AlignedPoint, align_secondary, build_window, split_current};
use serde::Serialize;

/// Band tables and delta policies used to read a week.
#[derive(Debug, Clone)]
pub struct Classifiers {
    pub completion_bands: BandTable,
    pub habit_bands: BandTable,
    pub completion_policy: DeltaPolicy,
    pub weight_policy: DeltaPolicy,
}

impl Default for Classifiers {
    fn default() -> Self {
        Self {
            completion_bands: BandTable::completion(),
            habit_bands: BandTable::habit(),
            completion_policy: DeltaPolicy::completion(),
            weight_policy: DeltaPolicy::weight(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SeriesOverview {
    pub points: Vec<AlignedPoint>,
    pub analysis: Option<TrendAnalysis>,
    pub summary: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HabitOverview {
    pub habit: HabitId,
    pub label: &'static str,
    pub description: &'static str,
    pub analysis: Option<TrendAnalysis>,
    pub summary: Option<String>,
}

/// Everything the debrief shows about one week. Absent series mean there is
/// not enough data for that week.
#[derive(Debug, Serialize)]
pub struct WeekOverview {
    pub week: WeekKey,
    pub label: String,
    pub completion: Option<SeriesOverview>,
    pub weight: Option<SeriesOverview>,
    pub habits: Vec<HabitOverview>,
}

fn summarize(analysis: &TrendAnalysis, unit: &str) -> Option<String> {
    let narrative = analysis.narrative?;
    let delta = analysis.delta?;
    let prefix = analysis
        .classification
        .as_ref()
        .map(|classification| format!("{} ", classification.emoji))
        .unwrap_or_default();
    Some(format!("{prefix}{} ({delta:+.1} {unit})", narrative.label()))
}

pub fn build_overview(
    data: &DashboardData,
    week: WeekKey,
    reference_year: i32,
    classifiers: &Classifiers,
) -> WeekOverview {
    let completion_window = build_window(&data.weekly_completion, week, reference_year);

    let completion = completion_window.as_ref().map(|window| {
        let analysis = TrendAnalysis::from_window(
            window,
            &classifiers.completion_bands,
            &classifiers.completion_policy,
        );
        SeriesOverview {
            points: window.points().cloned().collect(),
            summary: summarize(&analysis, "pp"),
            analysis: Some(analysis),
        }
    });

    let weight = completion_window.as_ref().and_then(|window| {
        let points = align_secondary(window, &data.weight, reference_year);
        if points.is_empty() {
            return None;
        }
        let analysis = split_current(points.clone()).map(|(current, trailing)| {
            let trailing: Vec<f64> = trailing.iter().map(|point| point.value).collect();
            TrendAnalysis::from_values(current.value, &trailing, None, &classifiers.weight_policy)
        });
        Some(SeriesOverview {
            points,
            summary: analysis.as_ref().and_then(|analysis| summarize(analysis, "kg")),
            analysis,
        })
    });

    let habits = HabitId::ALL
        .iter()
        .map(|&habit| {
            let series = data.habits.get(&habit).map(Vec::as_slice).unwrap_or_default();
            let analysis = build_window(series, week, reference_year).map(|window| {
                TrendAnalysis::from_window(
                    &window,
                    &classifiers.habit_bands,
                    &classifiers.completion_policy,
                )
            });
            HabitOverview {
                habit,
                label: habit.label(),
                description: habit.description(),
                summary: analysis.as_ref().and_then(|analysis| summarize(analysis, "pp")),
                analysis,
            }
        })
        .collect();

    WeekOverview {
        week,
        label: week.label(),
        completion,
        weight,
        habits,
    }
}
