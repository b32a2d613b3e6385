//! Value bands and week-over-week narratives. Thresholds live in tables owned
//! by each classifier instance; call sites never compare against literals.

use crate::window::ComparisonWindow;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Critical,
    NeedsAttention,
    OnTrack,
    Excellent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub band: Band,
    pub label: &'static str,
    pub emoji: &'static str,
}

#[derive(Debug, Clone)]
struct BandRule {
    min: f64,
    classification: Classification,
}

/// Ordered partition of the value range. A value falls in the first rule whose
/// lower bound it reaches; anything below every bound (NaN included) lands on
/// the floor band.
#[derive(Debug, Clone)]
pub struct BandTable {
    rules: Vec<BandRule>,
    floor: Classification,
}

impl BandTable {
    /// Rules are `(lower bound, band, label, emoji)`, any order.
    pub fn new(
        rules: &[(f64, Band, &'static str, &'static str)],
        floor: (Band, &'static str, &'static str),
    ) -> Self {
        let mut rules: Vec<BandRule> = rules
            .iter()
            .map(|&(min, band, label, emoji)| BandRule {
                min,
                classification: Classification { band, label, emoji },
            })
            .collect();
        rules.sort_by(|a, b| b.min.total_cmp(&a.min));
        let (band, label, emoji) = floor;
        Self {
            rules,
            floor: Classification { band, label, emoji },
        }
    }

    /// Bands for the overall weekly completion rate.
    pub fn completion() -> Self {
        Self::new(
            &[
                (80.0, Band::Excellent, "Excellent", "🏆"),
                (60.0, Band::OnTrack, "On track", "✅"),
                (40.0, Band::NeedsAttention, "Needs attention", "⚠️"),
            ],
            (Band::Critical, "Critical", "🚨"),
        )
    }

    /// Bands for a single habit's completion.
    pub fn habit() -> Self {
        Self::new(
            &[
                (85.0, Band::Excellent, "Excellent", "🟢"),
                (70.0, Band::OnTrack, "Good", "🔵"),
                (50.0, Band::NeedsAttention, "Needs attention", "🟡"),
            ],
            (Band::Critical, "Critical", "🔴"),
        )
    }

    pub fn classify(&self, value: f64) -> Classification {
        self.rules
            .iter()
            .find(|rule| value >= rule.min)
            .map(|rule| rule.classification.clone())
            .unwrap_or_else(|| self.floor.clone())
    }
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// `current` minus the mean of `trailing`; `None` without history.
pub fn trend_delta(current: f64, trailing: &[f64]) -> Option<f64> {
    mean(trailing).map(|average| current - average)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Narrative {
    StrongImprovement,
    MildImprovement,
    StrongRegression,
    Stable,
}

impl Narrative {
    pub fn label(self) -> &'static str {
        match self {
            Narrative::StrongImprovement => "strong improvement",
            Narrative::MildImprovement => "mild improvement",
            Narrative::StrongRegression => "strong regression",
            Narrative::Stable => "stable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy)]
pub struct DeltaPolicy {
    pub threshold: f64,
    pub polarity: Polarity,
    /// Whether small moves in the good direction count as mild improvement
    /// rather than stable.
    pub mild_band: bool,
}

impl DeltaPolicy {
    /// Percentage points, for completion rates.
    pub fn completion() -> Self {
        Self {
            threshold: 5.0,
            polarity: Polarity::HigherIsBetter,
            mild_band: true,
        }
    }

    /// Kilograms; losing weight is the good direction.
    pub fn weight() -> Self {
        Self {
            threshold: 0.5,
            polarity: Polarity::LowerIsBetter,
            mild_band: false,
        }
    }

    pub fn narrative(&self, delta: f64) -> Narrative {
        let gain = match self.polarity {
            Polarity::HigherIsBetter => delta,
            Polarity::LowerIsBetter => -delta,
        };
        if gain > self.threshold {
            Narrative::StrongImprovement
        } else if gain < -self.threshold {
            Narrative::StrongRegression
        } else if self.mild_band && gain > 0.0 {
            Narrative::MildImprovement
        } else {
            Narrative::Stable
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendAnalysis {
    pub current: f64,
    pub average: Option<f64>,
    pub delta: Option<f64>,
    pub classification: Option<Classification>,
    pub narrative: Option<Narrative>,
}

impl TrendAnalysis {
    pub fn from_values(
        current: f64,
        trailing: &[f64],
        bands: Option<&BandTable>,
        policy: &DeltaPolicy,
    ) -> Self {
        let average = mean(trailing);
        let delta = trend_delta(current, trailing);
        Self {
            current,
            average,
            delta,
            classification: bands.map(|table| table.classify(current)),
            narrative: delta.map(|delta| policy.narrative(delta)),
        }
    }

    pub fn from_window(window: &ComparisonWindow, bands: &BandTable, policy: &DeltaPolicy) -> Self {
        Self::from_values(
            window.current.value,
            &window.trailing_values(),
            Some(bands),
            policy,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeriesPoint;
    use crate::week::normalize;
    use crate::window::build_window;

    #[test]
    fn bands_cover_zero_to_hundred_without_gaps() {
        for table in [BandTable::completion(), BandTable::habit()] {
            let mut previous = table.classify(0.0).band;
            for step in 0..=1000 {
                let band = table.classify(step as f64 / 10.0).band;
                assert!(band >= previous, "bands must not go backwards");
                previous = band;
            }
            assert_eq!(table.classify(0.0).band, Band::Critical);
            assert_eq!(table.classify(100.0).band, Band::Excellent);
        }
    }

    #[test]
    fn band_edges_belong_to_the_upper_band() {
        let table = BandTable::completion();
        assert_eq!(table.classify(79.999).band, Band::OnTrack);
        assert_eq!(table.classify(80.0).band, Band::Excellent);
        assert_eq!(table.classify(-3.0).band, Band::Critical);
        assert_eq!(table.classify(f64::NAN).band, Band::Critical);
    }

    #[test]
    fn delta_is_current_minus_mean() {
        assert_eq!(trend_delta(60.0, &[70.0, 75.0]), Some(-12.5));
        assert_eq!(trend_delta(50.0, &[40.0]), Some(10.0));
        assert_eq!(trend_delta(50.0, &[]), None);
    }

    #[test]
    fn completion_policy_table() {
        let policy = DeltaPolicy::completion();
        assert_eq!(policy.narrative(5.1), Narrative::StrongImprovement);
        assert_eq!(policy.narrative(5.0), Narrative::MildImprovement);
        assert_eq!(policy.narrative(0.1), Narrative::MildImprovement);
        assert_eq!(policy.narrative(0.0), Narrative::Stable);
        assert_eq!(policy.narrative(-5.0), Narrative::Stable);
        assert_eq!(policy.narrative(-5.1), Narrative::StrongRegression);
    }

    #[test]
    fn weight_policy_inverts_direction() {
        let policy = DeltaPolicy::weight();
        assert_eq!(policy.narrative(-0.6), Narrative::StrongImprovement);
        assert_eq!(policy.narrative(-0.2), Narrative::Stable);
        assert_eq!(policy.narrative(0.5), Narrative::Stable);
        assert_eq!(policy.narrative(0.7), Narrative::StrongRegression);
    }

    #[test]
    fn completion_scenario_is_a_strong_regression() {
        let series = vec![
            SeriesPoint::new("02/06", 70.0),
            SeriesPoint::new("09/06", 75.0),
            SeriesPoint::new("16/06", 60.0),
        ];
        let window = build_window(&series, normalize("16/06", 2025).unwrap(), 2025).unwrap();
        let analysis =
            TrendAnalysis::from_window(&window, &BandTable::completion(), &DeltaPolicy::completion());

        assert_eq!(analysis.current, 60.0);
        assert_eq!(analysis.average, Some(72.5));
        assert_eq!(analysis.delta, Some(-12.5));
        assert_eq!(analysis.delta, trend_delta(60.0, &window.trailing_values()));
        assert_eq!(analysis.narrative, Some(Narrative::StrongRegression));
        assert_eq!(analysis.classification.unwrap().band, Band::OnTrack);
    }

    #[test]
    fn weight_scenario_is_stable() {
        let series = vec![SeriesPoint::new("02/06", 85.0), SeriesPoint::new("09/06", 84.8)];
        let window = build_window(&series, normalize("09/06", 2025).unwrap(), 2025).unwrap();
        let analysis = TrendAnalysis::from_values(
            window.current.value,
            &window.trailing_values(),
            None,
            &DeltaPolicy::weight(),
        );

        let delta = analysis.delta.unwrap();
        assert!((delta + 0.2).abs() < 1e-9);
        assert_eq!(analysis.narrative, Some(Narrative::Stable));
    }

    #[test]
    fn no_history_means_no_narrative() {
        let analysis =
            TrendAnalysis::from_values(90.0, &[], Some(&BandTable::completion()), &DeltaPolicy::completion());
        assert_eq!(analysis.delta, None);
        assert_eq!(analysis.average, None);
        assert_eq!(analysis.narrative, None);
        assert_eq!(analysis.classification.unwrap().band, Band::Excellent);
    }
}
