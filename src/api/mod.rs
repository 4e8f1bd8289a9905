use crate::dashboard::DashboardState;
use crate::source::RecordSource;
use axum::Router;
use axum::routing::{get, post};
use std::sync::{Arc, RwLock};

pub mod handlers;
pub mod responses;

#[derive(Clone)]
pub struct ApiState {
    pub dashboard: Arc<RwLock<DashboardState>>,
    pub source: Arc<dyn RecordSource>,
}

pub fn router(dashboard: Arc<RwLock<DashboardState>>, source: Arc<dyn RecordSource>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::get_health))
        .route("/api/cameras", get(handlers::get_cameras))
        .route("/api/dashboard", get(handlers::get_dashboard))
        .route("/api/selection", post(handlers::post_selection))
        .route("/api/chart/next", post(handlers::post_next_chart))
        .route("/api/chart/prev", post(handlers::post_previous_chart))
        .with_state(ApiState { dashboard, source })
}
