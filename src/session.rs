use crate::autosave::{Autosave, AutosaveConfig, SaveStatus};
use crate::errors::DebriefError;
use crate::form::{self, FormEdit};
use crate::models::DebriefRecord;
use crate::storage::DebriefStore;
use crate::week::WeekKey;
use std::sync::Arc;
use tracing::{info, warn};

/// One open debrief: the selected week, its record and the autosave timer
/// that belongs to them.
pub struct DebriefSession<S> {
    store: Arc<S>,
    autosave: Autosave<S>,
    week: Option<WeekKey>,
    record: Option<DebriefRecord>,
}

impl<S: DebriefStore> DebriefSession<S> {
    pub fn new(store: Arc<S>, config: AutosaveConfig) -> Self {
        Self {
            autosave: Autosave::new(Arc::clone(&store), config),
            store,
            week: None,
            record: None,
        }
    }

    pub fn week(&self) -> Option<WeekKey> {
        self.week
    }

    pub fn record(&self) -> Option<&DebriefRecord> {
        self.record.as_ref()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosave.status()
    }

    /// Opens `week`, dropping any edit of the previous week that has not been
    /// saved yet.
    pub async fn select_week(&mut self, week: WeekKey) -> &DebriefRecord {
        if self.autosave.cancel() {
            if let Some(previous) = self.week {
                info!("discarded unsaved edits for week {previous}");
            }
        }
        self.week = Some(week);
        self.record = None;

        let remote = match self.store.load(week).await {
            Ok(remote) => remote,
            Err(err) => {
                warn!("failed to load debrief for week {week}: {err}");
                self.autosave.report_failure();
                None
            }
        };
        self.record.insert(form::load(week, remote))
    }

    pub fn edit(&mut self, edit: FormEdit) -> Result<&DebriefRecord, DebriefError> {
        let (Some(week), Some(current)) = (self.week, self.record.as_ref()) else {
            return Err(DebriefError::NoActiveWeek);
        };
        let next = form::update(current, edit);
        self.autosave.schedule(week, next.clone());
        Ok(&*self.record.insert(next))
    }

    /// Saves the record as completed right away and asks the store to
    /// finalize the week.
    pub async fn finalize(&mut self) -> Result<&DebriefRecord, DebriefError> {
        let (Some(week), Some(current)) = (self.week, self.record.as_ref()) else {
            return Err(DebriefError::NoActiveWeek);
        };
        let completed = form::mark_complete(current);
        self.autosave.save_now(week, &completed).await?;
        let record = self.record.insert(completed);
        self.store.finalize(week).await?;
        info!("debrief for week {week} completed");
        Ok(&*record)
    }

    pub fn close(&mut self) {
        if self.autosave.cancel() {
            info!("session closed with unsaved edits");
        }
        self.week = None;
        self.record = None;
    }
}
