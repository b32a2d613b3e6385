use crate::config::Config;
use crate::models::DashboardData;
use crate::overview::Classifiers;
use crate::session::DebriefSession;
use crate::storage::JsonFileStore;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<JsonFileStore>,
    pub dashboard: Arc<DashboardData>,
    pub classifiers: Arc<Classifiers>,
    pub session: Arc<Mutex<DebriefSession<JsonFileStore>>>,
    pub reference_year: i32,
}

impl AppState {
    pub fn new(config: &Config, store: JsonFileStore, dashboard: DashboardData) -> Self {
        let store = Arc::new(store);
        Self {
            session: Arc::new(Mutex::new(DebriefSession::new(
                Arc::clone(&store),
                config.autosave,
            ))),
            store,
            dashboard: Arc::new(dashboard),
            classifiers: Arc::new(Classifiers::default()),
            reference_year: config.reference_year,
        }
    }
}
