use std::net::SocketAddr;
use tokio::fs;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use weekly_debrief::{AppState, Config, JsonFileStore, load_dashboard, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let store = JsonFileStore::open(config.data_path.clone()).await;
    let dashboard = load_dashboard(&config.dashboard_path).await;
    info!(
        "loaded {} completion weeks, reference year {}",
        dashboard.weekly_completion.len(),
        config.reference_year
    );

    let state = AppState::new(&config, store, dashboard);
    let session = state.session.clone();
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = tokio::signal::ctrl_c().await;
            session.lock().await.close();
            info!("shutting down");
        })
        .await?;

    Ok(())
}
