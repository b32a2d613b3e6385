//! Debounced persistence of the debrief being edited.
//!
//! Every edit re-arms a quiet-period timer; only the edit that survives the
//! quiet period reaches the store. Saves never overlap: a timer that fires
//! while another save is in flight waits for it. Status transitions go
//! `idle -> pending -> saving -> saved | failed`, and the two outcomes fall
//! back to `idle` after their display interval unless a newer edit has
//! taken over.

use crate::errors::PersistError;
use crate::models::DebriefRecord;
use crate::storage::DebriefStore;
use crate::week::WeekKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveStatus {
    #[default]
    Idle,
    Pending,
    Saving,
    Saved,
    Failed,
}

#[derive(Debug, Clone, Copy)]
pub struct AutosaveConfig {
    pub quiet: Duration,
    pub saved_display: Duration,
    pub failed_display: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            quiet: Duration::from_millis(1500),
            saved_display: Duration::from_secs(2),
            failed_display: Duration::from_secs(3),
        }
    }
}

struct Shared<S> {
    store: Arc<S>,
    config: AutosaveConfig,
    status: watch::Sender<SaveStatus>,
    /// Bumped on every edit or explicit save; status updates from older
    /// generations are ignored.
    generation: AtomicU64,
    /// Generation of the timer that has not fired yet, 0 when none.
    armed: AtomicU64,
    save_lock: Mutex<()>,
}

impl<S: DebriefStore> Shared<S> {
    fn show(&self, generation: u64, next: SaveStatus) -> bool {
        let mut shown = false;
        self.status.send_if_modified(|current| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            shown = true;
            let changed = *current != next;
            *current = next;
            changed
        });
        shown
    }

    async fn persist(
        self: &Arc<Self>,
        week: WeekKey,
        record: &DebriefRecord,
        generation: u64,
    ) -> Result<(), PersistError> {
        let result = {
            let _guard = self.save_lock.lock().await;
            self.show(generation, SaveStatus::Saving);
            debug!("saving debrief for week {week}");
            self.store.save(week, record).await
        };

        let (outcome, display) = match &result {
            Ok(()) => (SaveStatus::Saved, self.config.saved_display),
            Err(err) => {
                warn!("autosave for week {week} failed: {err}");
                (SaveStatus::Failed, self.config.failed_display)
            }
        };

        if self.show(generation, outcome) {
            let shared = Arc::clone(self);
            tokio::spawn(async move {
                sleep(display).await;
                shared.status.send_if_modified(|current| {
                    if *current == outcome && shared.generation.load(Ordering::SeqCst) == generation {
                        *current = SaveStatus::Idle;
                        true
                    } else {
                        false
                    }
                });
            });
        }

        result
    }
}

pub struct Autosave<S> {
    shared: Arc<Shared<S>>,
    timer: Option<JoinHandle<()>>,
}

impl<S: DebriefStore> Autosave<S> {
    pub fn new(store: Arc<S>, config: AutosaveConfig) -> Self {
        let (status, _) = watch::channel(SaveStatus::Idle);
        Self {
            shared: Arc::new(Shared {
                store,
                config,
                status,
                generation: AtomicU64::new(0),
                armed: AtomicU64::new(0),
                save_lock: Mutex::new(()),
            }),
            timer: None,
        }
    }

    pub fn status(&self) -> SaveStatus {
        *self.shared.status.borrow()
    }

    /// Marks the last operation as failed without a save, e.g. when loading
    /// the week's record did not work.
    pub fn report_failure(&self) {
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let shared = Arc::clone(&self.shared);
        if shared.show(generation, SaveStatus::Failed) {
            let display = shared.config.failed_display;
            tokio::spawn(async move {
                sleep(display).await;
                shared.show(generation, SaveStatus::Idle);
            });
        }
    }

    /// Re-arms the quiet-period timer with `record` as the state to save.
    pub fn schedule(&mut self, week: WeekKey, record: DebriefRecord) {
        self.cancel();

        let shared = Arc::clone(&self.shared);
        let generation = shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        shared.armed.store(generation, Ordering::SeqCst);
        shared.show(generation, SaveStatus::Pending);
        debug!("autosave armed for week {week}");

        self.timer = Some(tokio::spawn(async move {
            sleep(shared.config.quiet).await;
            if shared
                .armed
                .compare_exchange(generation, 0, Ordering::SeqCst, Ordering::SeqCst)
                .is_err()
            {
                return;
            }
            // The outcome is reported through the status channel.
            let _ = shared.persist(week, &record, generation).await;
        }));
    }

    /// Disarms a timer that has not fired yet. A save already in flight is
    /// left to finish. Returns whether a pending save was dropped.
    pub fn cancel(&mut self) -> bool {
        let armed = self.shared.armed.swap(0, Ordering::SeqCst);
        let timer = self.timer.take();
        if armed == 0 {
            return false;
        }
        if let Some(timer) = timer {
            timer.abort();
        }
        self.shared.status.send_if_modified(|current| {
            if *current == SaveStatus::Pending {
                *current = SaveStatus::Idle;
                true
            } else {
                false
            }
        });
        debug!("pending autosave cancelled");
        true
    }

    /// Saves immediately, after any save already in flight.
    pub async fn save_now(&mut self, week: WeekKey, record: &DebriefRecord) -> Result<(), PersistError> {
        self.cancel();
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.persist(week, record, generation).await
    }
}

impl<S> Drop for Autosave<S> {
    fn drop(&mut self) {
        let armed = self.shared.armed.swap(0, Ordering::SeqCst);
        if let Some(timer) = self.timer.take() {
            if armed != 0 {
                timer.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FormEdit, update};
    use crate::storage::memory::MemoryStore;
    use tokio::time::Instant;

    fn week(key: &str) -> WeekKey {
        key.parse().unwrap()
    }

    fn proud_of(base: &DebriefRecord, text: &str) -> DebriefRecord {
        update(base, FormEdit::ProudOf { value: text.into() })
    }

    #[tokio::test(start_paused = true)]
    async fn rapid_edits_coalesce_into_one_save() {
        let store = Arc::new(MemoryStore::default());
        let mut autosave = Autosave::new(Arc::clone(&store), AutosaveConfig::default());
        let target = week("2025-06-21");
        let blank = DebriefRecord::empty(target);
        let start = Instant::now();

        autosave.schedule(target, proud_of(&blank, "e1"));
        sleep(Duration::from_millis(500)).await;
        autosave.schedule(target, proud_of(&blank, "e2"));
        assert_eq!(autosave.status(), SaveStatus::Pending);

        sleep(Duration::from_millis(1499)).await;
        assert!(store.saves().is_empty());

        sleep(Duration::from_millis(101)).await;
        let saves = store.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].at - start, Duration::from_millis(2000));
        assert_eq!(saves[0].week, target);
        assert_eq!(saves[0].record.proud_of, "e2");
        assert_eq!(autosave.status(), SaveStatus::Saved);

        sleep(Duration::from_secs(2)).await;
        assert_eq!(autosave.status(), SaveStatus::Idle);
        assert_eq!(store.saves().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_timer_never_saves() {
        let store = Arc::new(MemoryStore::default());
        let mut autosave = Autosave::new(Arc::clone(&store), AutosaveConfig::default());
        let target = week("2025-06-21");

        autosave.schedule(target, proud_of(&DebriefRecord::empty(target), "abandoned"));
        sleep(Duration::from_millis(1000)).await;
        assert!(autosave.cancel());
        assert_eq!(autosave.status(), SaveStatus::Idle);

        sleep(Duration::from_secs(5)).await;
        assert!(store.saves().is_empty());
        assert!(!autosave.cancel());
    }

    #[tokio::test(start_paused = true)]
    async fn failure_is_shown_then_cleared() {
        let store = Arc::new(MemoryStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let mut autosave = Autosave::new(Arc::clone(&store), AutosaveConfig::default());
        let target = week("2025-06-21");

        autosave.schedule(target, DebriefRecord::empty(target));
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(autosave.status(), SaveStatus::Failed);

        sleep(Duration::from_millis(2800)).await;
        assert_eq!(autosave.status(), SaveStatus::Failed);
        sleep(Duration::from_millis(200)).await;
        assert_eq!(autosave.status(), SaveStatus::Idle);

        store.fail.store(false, Ordering::SeqCst);
        autosave.schedule(target, DebriefRecord::empty(target));
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(autosave.status(), SaveStatus::Saved);
        assert_eq!(store.saves().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn saves_never_overlap() {
        let store = Arc::new(MemoryStore::with_latency(Duration::from_secs(2)));
        let mut autosave = Autosave::new(Arc::clone(&store), AutosaveConfig::default());
        let target = week("2025-06-21");
        let blank = DebriefRecord::empty(target);
        let start = Instant::now();

        autosave.schedule(target, proud_of(&blank, "first"));
        sleep(Duration::from_millis(1600)).await;
        assert_eq!(autosave.status(), SaveStatus::Saving);

        // Fires at 3100 while the first save runs until 3500.
        autosave.schedule(target, proud_of(&blank, "second"));
        assert_eq!(autosave.status(), SaveStatus::Pending);
        // Second save runs 3500..5500, its status clears at 7500.
        sleep(Duration::from_secs(7)).await;

        let saves = store.saves();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[1].record.proud_of, "second");
        assert_eq!(saves[1].at - start, Duration::from_millis(3500));
        assert_eq!(store.max_active.load(Ordering::SeqCst), 1);
        assert_eq!(autosave.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn save_now_skips_the_quiet_period() {
        let store = Arc::new(MemoryStore::default());
        let mut autosave = Autosave::new(Arc::clone(&store), AutosaveConfig::default());
        let target = week("2025-06-21");
        let record = proud_of(&DebriefRecord::empty(target), "final");

        autosave.schedule(target, proud_of(&record, "stale"));
        autosave.save_now(target, &record).await.unwrap();
        assert_eq!(autosave.status(), SaveStatus::Saved);

        sleep(Duration::from_secs(3)).await;
        let saves = store.saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].record.proud_of, "final");
    }
}
