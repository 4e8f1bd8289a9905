use crate::api::responses::{
    CamerasSuccessResponse, DashboardSuccessResponse, ErrorCode, ErrorResponse, HealthStatus,
    HealthSuccessResponse, NO_DATA_DETAIL, NO_DATA_NOTICE, SelectionRequest, StatsResponse,
};
use crate::api::ApiState;
use crate::camera::{camera_label, parse_camera_label};
use crate::dashboard::{DashboardState, DashboardView, RefreshTicket};
use crate::error::AppError;
use crate::period::PeriodWindow;
use crate::record::CameraId;
use crate::refresh::run_refresh;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::{Arc, RwLock};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{error, warn};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const FALLBACK_TIMESTAMP: &str = "1970-01-01T00:00:00Z";

pub enum ApiResponse<T> {
    Success(T),
    Error {
        status: StatusCode,
        body: ErrorResponse,
    },
}

impl<T: serde::Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            ApiResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn get_health() -> impl IntoResponse {
    ApiResponse::Success(HealthSuccessResponse {
        status: HealthStatus::Ok,
        timestamp: format_timestamp(OffsetDateTime::now_utc()),
    })
}

pub async fn get_cameras(State(state): State<ApiState>) -> impl IntoResponse {
    build_cameras_response(&state.dashboard, OffsetDateTime::now_utc())
}

pub async fn get_dashboard(State(state): State<ApiState>) -> impl IntoResponse {
    build_dashboard_response(&state.dashboard, OffsetDateTime::now_utc())
}

pub async fn post_selection(
    State(state): State<ApiState>,
    Json(request): Json<SelectionRequest>,
) -> ApiResponse<DashboardSuccessResponse> {
    let (camera, period) = match parse_selection(&request) {
        Ok(parsed) => parsed,
        Err(err) => return invalid_selection(&err),
    };
    let ticket = match state.dashboard.write() {
        Ok(mut guard) => guard.select(camera, period),
        Err(_) => return internal_error("state lock poisoned while selecting"),
    };
    refresh_and_respond(&state, ticket).await
}

pub async fn post_next_chart(
    State(state): State<ApiState>,
) -> ApiResponse<DashboardSuccessResponse> {
    let ticket = match state.dashboard.write() {
        Ok(mut guard) => guard.next_chart(),
        Err(_) => return internal_error("state lock poisoned while changing chart"),
    };
    refresh_and_respond(&state, ticket).await
}

pub async fn post_previous_chart(
    State(state): State<ApiState>,
) -> ApiResponse<DashboardSuccessResponse> {
    let ticket = match state.dashboard.write() {
        Ok(mut guard) => guard.previous_chart(),
        Err(_) => return internal_error("state lock poisoned while changing chart"),
    };
    refresh_and_respond(&state, ticket).await
}

async fn refresh_and_respond(
    state: &ApiState,
    ticket: RefreshTicket,
) -> ApiResponse<DashboardSuccessResponse> {
    // a superseded refresh still answers with whatever the newer request shows
    if let Err(err) = run_refresh(&state.dashboard, Arc::clone(&state.source), ticket).await {
        error!(error = %err, "Refresh failed while handling request");
        return internal_error("refresh failed");
    }
    build_dashboard_response(&state.dashboard, OffsetDateTime::now_utc())
}

pub(crate) fn parse_selection(
    request: &SelectionRequest,
) -> Result<(Option<CameraId>, Option<PeriodWindow>), AppError> {
    let camera = request
        .camera
        .as_deref()
        .map(|label| {
            parse_camera_label(label)
                .ok_or_else(|| AppError::InvalidSelection(format!("unknown camera: {label}")))
        })
        .transpose()?;
    let period = request
        .period
        .as_deref()
        .map(|label| label.parse::<PeriodWindow>().map_err(AppError::InvalidSelection))
        .transpose()?;
    Ok((camera, period))
}

pub(crate) fn build_cameras_response(
    dashboard: &Arc<RwLock<DashboardState>>,
    now: OffsetDateTime,
) -> ApiResponse<CamerasSuccessResponse> {
    let cameras = match dashboard.read() {
        Ok(guard) => guard.cameras(),
        Err(_) => return internal_error("state lock poisoned while reading cameras"),
    };
    ApiResponse::Success(CamerasSuccessResponse {
        cameras: cameras.into_iter().map(camera_label).collect(),
        timestamp: format_timestamp(now),
    })
}

pub(crate) fn build_dashboard_response(
    dashboard: &Arc<RwLock<DashboardState>>,
    now: OffsetDateTime,
) -> ApiResponse<DashboardSuccessResponse> {
    let view = match dashboard.read() {
        Ok(guard) => guard.view().cloned(),
        Err(_) => return internal_error("state lock poisoned while reading view"),
    };

    match view {
        Some(view) => ApiResponse::Success(dashboard_body(view)),
        None => ApiResponse::Error {
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: ErrorResponse {
                error_code: ErrorCode::NoData,
                error_message: "Dashboard has not loaded any data yet".to_string(),
                timestamp: format_timestamp(now),
            },
        },
    }
}

fn dashboard_body(view: DashboardView) -> DashboardSuccessResponse {
    let has_data = view.has_data();
    let selection = view.selection;
    DashboardSuccessResponse {
        camera: camera_label(selection.camera),
        period: selection.period.name().to_string(),
        period_label: selection.period.label().to_string(),
        chart_mode: selection.chart_mode.name().to_string(),
        chart_title: selection.chart_mode.title().to_string(),
        cameras: view.cameras.iter().copied().map(camera_label).collect(),
        stats: StatsResponse {
            total_visitors: view.stats.total_visitors,
            peak_time: view.stats.peak_time.clone(),
            main_age_range: view.stats.main_age_range_label().to_string(),
            main_gender: view.stats.main_gender_label().to_string(),
        },
        has_data,
        notice: (!has_data).then(|| NO_DATA_NOTICE.to_string()),
        notice_detail: (!has_data).then(|| NO_DATA_DETAIL.to_string()),
        chart: view.chart,
        timestamp: format_timestamp(view.refreshed_at),
    }
}

fn invalid_selection<T>(err: &AppError) -> ApiResponse<T> {
    warn!(error = %err, "Rejected selection request");
    ApiResponse::Error {
        status: StatusCode::BAD_REQUEST,
        body: ErrorResponse {
            error_code: ErrorCode::InvalidSelection,
            error_message: err.to_string(),
            timestamp: format_timestamp(OffsetDateTime::now_utc()),
        },
    }
}

fn internal_error<T>(message: &str) -> ApiResponse<T> {
    error!(message = message, "Internal error while handling dashboard request");
    ApiResponse::Error {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        body: ErrorResponse {
            error_code: ErrorCode::InternalError,
            error_message: INTERNAL_ERROR_MESSAGE.to_string(),
            timestamp: format_timestamp(OffsetDateTime::now_utc()),
        },
    }
}

fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp.format(&Rfc3339).unwrap_or_else(|err| {
        error!(error = %err, "Failed to format response timestamp");
        FALLBACK_TIMESTAMP.to_string()
    })
}
