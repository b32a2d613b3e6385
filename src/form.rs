use crate::models::{DebriefRecord, DebriefStatus, HabitId, Rating};
use crate::week::WeekKey;
use serde::{Deserialize, Serialize};

/// A single field change coming from the debrief form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum FormEdit {
    HabitComment { habit: HabitId, value: String },
    WeekRating { value: Option<Rating> },
    ProudOf { value: String },
    NotSoGood { value: String },
    ImproveNext { value: String },
}

/// Returns `current` with `edit` applied. Only the named field changes.
pub fn update(current: &DebriefRecord, edit: FormEdit) -> DebriefRecord {
    let mut next = current.clone();
    match edit {
        FormEdit::HabitComment { habit, value } => {
            next.habit_comments.insert(habit, value);
        }
        FormEdit::WeekRating { value } => next.week_rating = value,
        FormEdit::ProudOf { value } => next.proud_of = value,
        FormEdit::NotSoGood { value } => next.not_so_good = value,
        FormEdit::ImproveNext { value } => next.improve_next = value,
    }
    next
}

/// The stored record for `week`, or a blank draft when there is none.
pub fn load(week: WeekKey, remote: Option<DebriefRecord>) -> DebriefRecord {
    match remote {
        Some(record) => DebriefRecord { week, ..record },
        None => DebriefRecord::empty(week),
    }
}

pub fn mark_complete(record: &DebriefRecord) -> DebriefRecord {
    DebriefRecord {
        status: DebriefStatus::Completed,
        ..record.clone()
    }
}
