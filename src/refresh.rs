use crate::dashboard::{DashboardState, RefreshTicket};
use crate::error::AppError;
use crate::source::RecordSource;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Fetch on the blocking pool, then apply the result under `ticket`.
///
/// No lock is held while the fetch is in flight. Returns `false` when a newer
/// selection superseded this fetch.
pub async fn run_refresh(
    dashboard: &Arc<RwLock<DashboardState>>,
    source: Arc<dyn RecordSource>,
    ticket: RefreshTicket,
) -> Result<bool, AppError> {
    let result = tokio::task::spawn_blocking(move || source.fetch_records())
        .await
        .map_err(|err| AppError::RefreshTask(err.to_string()))?;

    let mut guard = dashboard.write().map_err(|_| AppError::StateLock)?;
    Ok(guard.complete_refresh(ticket, result, OffsetDateTime::now_utc()))
}

/// Start a new refresh generation and run it.
pub async fn refresh_now(
    dashboard: &Arc<RwLock<DashboardState>>,
    source: Arc<dyn RecordSource>,
) -> Result<bool, AppError> {
    let ticket = {
        let mut guard = dashboard.write().map_err(|_| AppError::StateLock)?;
        guard.begin_refresh()
    };
    run_refresh(dashboard, source, ticket).await
}

/// Periodically refetch so "today" keeps up with new count buckets.
pub fn spawn_refresh_loop(
    dashboard: Arc<RwLock<DashboardState>>,
    source: Arc<dyn RecordSource>,
    interval: Duration,
) -> JoinHandle<()> {
    info!(
        interval_secs = interval.as_secs(),
        "Starting dashboard refresh loop"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        // the first tick fires immediately and startup already loaded once
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match refresh_now(&dashboard, Arc::clone(&source)).await {
                Ok(true) => debug!("Periodic refresh applied"),
                Ok(false) => debug!("Periodic refresh superseded by newer selection"),
                Err(err) => warn!(error = %err, "Periodic refresh failed"),
            }
        }
    })
}
