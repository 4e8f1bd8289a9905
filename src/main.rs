use iseeu_dashboard::dashboard::DashboardState;
use iseeu_dashboard::{api, config, refresh, source};
use std::net::SocketAddr;
use std::sync::{Arc, RwLock};

fn init_tracing(level: tracing::Level) {
    let subscriber = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(level)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::load_default()?;
    init_tracing(config.log_level());
    tracing::info!(
        config_path = config::DEFAULT_CONFIG_PATH,
        app = %config.app.name,
        "iseeu-dashboard starting"
    );

    let offset = config.utc_offset()?;
    let dashboard = Arc::new(RwLock::new(DashboardState::new(offset)));
    let record_source = source::create_source(&config);
    tracing::info!(source = ?record_source, %offset, "Record source configured");

    // Initial load; a failure still leaves an empty view to serve
    match refresh::refresh_now(&dashboard, Arc::clone(&record_source)).await {
        Ok(_) => tracing::info!("Initial dashboard load complete"),
        Err(err) => tracing::warn!(error = %err, "Initial dashboard load failed"),
    }

    let _refresh_handle = match config.refresh_interval() {
        Some(interval) => Some(refresh::spawn_refresh_loop(
            Arc::clone(&dashboard),
            Arc::clone(&record_source),
            interval,
        )),
        None => {
            tracing::info!("Periodic refresh disabled");
            None
        }
    };

    let app = api::router(Arc::clone(&dashboard), record_source);
    let port = config.server_port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "API server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
