//! Week keys: every series label and every stored debrief is joined on the
//! Saturday that closes its week. Weeks run Sunday through Saturday.

use crate::errors::DebriefError;
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WeekKey(NaiveDate);

impl WeekKey {
    /// Key of the week that contains `date`. `None` when that week's
    /// Saturday is past the last representable date.
    pub fn containing(date: NaiveDate) -> Option<Self> {
        let days_to_saturday = 6 - date.weekday().num_days_from_sunday();
        date.checked_add_days(Days::new(u64::from(days_to_saturday))).map(Self)
    }

    /// Short `DD/MM` label of the Saturday, the same convention the series use.
    pub fn label(&self) -> String {
        self.0.format("%d/%m").to_string()
    }

    pub fn previous(&self) -> Option<Self> {
        self.0.checked_sub_days(Days::new(7)).map(Self)
    }
}

/// Parses a `DD/MM` label in `reference_year` and returns its week key.
pub fn normalize(label: &str, reference_year: i32) -> Result<WeekKey, DebriefError> {
    let invalid = || DebriefError::InvalidLabel(label.to_string());

    let (day, month) = label.trim().split_once('/').ok_or_else(invalid)?;
    let day: u32 = day.trim().parse().map_err(|_| invalid())?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let date = NaiveDate::from_ymd_opt(reference_year, month, day).ok_or_else(invalid)?;

    WeekKey::containing(date).ok_or_else(invalid)
}

/// The `count` most recent weeks up to and including the one holding `today`,
/// newest first.
pub fn recent_weeks(today: NaiveDate, count: usize) -> Vec<WeekKey> {
    let mut weeks = Vec::with_capacity(count);
    let mut week = WeekKey::containing(today);
    while let Some(current) = week {
        if weeks.len() == count {
            break;
        }
        weeks.push(current);
        week = current.previous();
    }
    weeks
}

impl fmt::Display for WeekKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for WeekKey {
    type Err = DebriefError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .ok()
            .and_then(WeekKey::containing)
            .ok_or_else(|| DebriefError::InvalidLabel(value.to_string()))
    }
}

impl TryFrom<String> for WeekKey {
    type Error = DebriefError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeekKey> for String {
    fn from(week: WeekKey) -> Self {
        week.to_string()
    }
}
