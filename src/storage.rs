use crate::errors::PersistError;
use crate::models::{DashboardData, DebriefRecord, DebriefStatus};
use crate::week::WeekKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, future::Future, path::Path, path::PathBuf};
use tokio::{fs, sync::Mutex};
use tracing::{error, info};

/// Where debriefs are kept between sessions.
pub trait DebriefStore: Send + Sync + 'static {
    fn load(&self, week: WeekKey) -> impl Future<Output = Result<Option<DebriefRecord>, PersistError>> + Send;

    fn save(
        &self,
        week: WeekKey,
        record: &DebriefRecord,
    ) -> impl Future<Output = Result<(), PersistError>> + Send;

    fn finalize(&self, week: WeekKey) -> impl Future<Output = Result<(), PersistError>> + Send;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredDebrief {
    pub record: DebriefRecord,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreData {
    #[serde(default)]
    pub debriefs: BTreeMap<WeekKey, StoredDebrief>,
}

/// A single JSON document holding every week's debrief.
pub struct JsonFileStore {
    path: PathBuf,
    data: Mutex<StoreData>,
}

impl JsonFileStore {
    pub async fn open(path: PathBuf) -> Self {
        let data = read_json_or_default(&path, "debrief store").await;
        Self {
            path,
            data: Mutex::new(data),
        }
    }

    pub async fn statuses(&self) -> BTreeMap<WeekKey, DebriefStatus> {
        let data = self.data.lock().await;
        data.debriefs
            .iter()
            .map(|(week, stored)| (*week, stored.record.status))
            .collect()
    }

    async fn persist(&self, data: &StoreData) -> Result<(), PersistError> {
        let payload = serde_json::to_vec_pretty(data)?;
        fs::write(&self.path, payload).await?;
        Ok(())
    }
}

impl DebriefStore for JsonFileStore {
    async fn load(&self, week: WeekKey) -> Result<Option<DebriefRecord>, PersistError> {
        let data = self.data.lock().await;
        Ok(data.debriefs.get(&week).map(|stored| stored.record.clone()))
    }

    async fn save(&self, week: WeekKey, record: &DebriefRecord) -> Result<(), PersistError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let completed_at = next.debriefs.get(&week).and_then(|stored| stored.completed_at);
        next.debriefs.insert(
            week,
            StoredDebrief {
                record: DebriefRecord {
                    week,
                    ..record.clone()
                },
                updated_at: Utc::now(),
                completed_at,
            },
        );
        self.persist(&next).await?;
        *data = next;
        info!("saved debrief for week {week}");
        Ok(())
    }

    async fn finalize(&self, week: WeekKey) -> Result<(), PersistError> {
        let mut data = self.data.lock().await;
        let mut next = data.clone();
        let stored = next
            .debriefs
            .get_mut(&week)
            .ok_or_else(|| PersistError::Missing(week.to_string()))?;
        let now = Utc::now();
        stored.record.status = DebriefStatus::Completed;
        stored.updated_at = now;
        stored.completed_at = Some(now);
        self.persist(&next).await?;
        *data = next;
        info!("finalized debrief for week {week}");
        Ok(())
    }
}

pub async fn load_dashboard(path: &Path) -> DashboardData {
    read_json_or_default(path, "dashboard data").await
}

async fn read_json_or_default<T>(path: &Path, what: &str) -> T
where
    T: Default + for<'de> Deserialize<'de>,
{
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse {what} file {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {what} file {}: {err}", path.display());
            T::default()
        }
    }
}
