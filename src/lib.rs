pub mod app;
pub mod autosave;
pub mod config;
pub mod errors;
pub mod form;
pub mod handlers;
pub mod models;
pub mod overview;
pub mod session;
pub mod state;
pub mod storage;
pub mod trend;
pub mod week;
pub mod window;

pub use app::router;
pub use config::Config;
pub use session::DebriefSession;
pub use state::AppState;
pub use storage::{DebriefStore, JsonFileStore, load_dashboard};
