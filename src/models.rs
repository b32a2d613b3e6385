use crate::autosave::SaveStatus;
use crate::week::WeekKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitId {
    Meditate,
    Medicate,
    Exercise,
    Communicate,
    Eat,
    Study,
    Rest,
}

impl HabitId {
    pub const ALL: [HabitId; 7] = [
        HabitId::Meditate,
        HabitId::Medicate,
        HabitId::Exercise,
        HabitId::Communicate,
        HabitId::Eat,
        HabitId::Study,
        HabitId::Rest,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HabitId::Meditate => "🧘 Meditate",
            HabitId::Medicate => "💊 Medicate",
            HabitId::Exercise => "🏃 Exercise",
            HabitId::Communicate => "💬 Communicate",
            HabitId::Eat => "🍎 Eat well",
            HabitId::Study => "📚 Study",
            HabitId::Rest => "😴 Rest",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            HabitId::Meditate => "Meditation or mindfulness",
            HabitId::Medicate => "Take medication",
            HabitId::Exercise => "Physical activity",
            HabitId::Communicate => "Important communication",
            HabitId::Eat => "Healthy eating",
            HabitId::Study => "Study or learning",
            HabitId::Rest => "Proper rest",
        }
    }
}

/// One `(label, value)` pair as the data source records it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardData {
    #[serde(default)]
    pub weekly_completion: Vec<SeriesPoint>,
    #[serde(default)]
    pub weight: Vec<SeriesPoint>,
    #[serde(default)]
    pub habits: BTreeMap<HabitId, Vec<SeriesPoint>>,
}

/// Week rating, 1 (very bad) to 5 (very good).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("week rating must be between 1 and 5, got {value}"))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebriefStatus {
    #[default]
    Draft,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DebriefRecord {
    pub week: WeekKey,
    #[serde(default)]
    pub habit_comments: BTreeMap<HabitId, String>,
    #[serde(default)]
    pub week_rating: Option<Rating>,
    #[serde(default)]
    pub proud_of: String,
    #[serde(default)]
    pub not_so_good: String,
    #[serde(default)]
    pub improve_next: String,
    #[serde(default)]
    pub status: DebriefStatus,
}

impl DebriefRecord {
    pub fn empty(week: WeekKey) -> Self {
        Self {
            week,
            habit_comments: BTreeMap::new(),
            week_rating: None,
            proud_of: String::new(),
            not_so_good: String::new(),
            improve_next: String::new(),
            status: DebriefStatus::Draft,
        }
    }

    pub fn comment(&self, habit: HabitId) -> &str {
        self.habit_comments.get(&habit).map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectWeekRequest {
    pub week: WeekKey,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionResponse {
    pub week: Option<WeekKey>,
    pub record: Option<DebriefRecord>,
    pub save_status: SaveStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekOption {
    pub week: WeekKey,
    pub label: String,
    pub status: Option<DebriefStatus>,
}
