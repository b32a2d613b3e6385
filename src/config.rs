use crate::autosave::AutosaveConfig;
use chrono::{Datelike, Local};
use std::{env, path::PathBuf, time::Duration};
use tracing::warn;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    pub dashboard_path: PathBuf,
    /// Year used to place `DD/MM` series labels on the calendar.
    pub reference_year: i32,
    pub autosave: AutosaveConfig,
}

impl Config {
    pub fn from_env() -> Self {
        let mut autosave = AutosaveConfig::default();
        if let Some(ms) = parsed::<u64>("AUTOSAVE_QUIET_MS") {
            autosave.quiet = Duration::from_millis(ms);
        }

        Self {
            port: parsed("PORT").unwrap_or(8080),
            data_path: path_or("APP_DATA_PATH", "data/debriefs.json"),
            dashboard_path: path_or("DASHBOARD_DATA_PATH", "data/dashboard.json"),
            reference_year: parsed("REFERENCE_YEAR").unwrap_or_else(|| Local::now().year()),
            autosave,
        }
    }
}

fn path_or(key: &str, default: &str) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

fn parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let value = env::var(key).ok()?;
    match value.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warn!("ignoring unparseable {key}={value}");
            None
        }
    }
}
