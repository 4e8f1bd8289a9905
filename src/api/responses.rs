use crate::render::ChartSpec;
use serde::{Deserialize, Serialize};

pub const NO_DATA_NOTICE: &str = "데이터를 불러올 수 없습니다. CCTV 연결 상태를 확인해 주세요.";
/// Second line shown under the no-data warning and the empty chart.
pub const NO_DATA_DETAIL: &str = "심야 시간대(00시~01시)는 데이터가 제한될 수 있습니다.";

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthSuccessResponse {
    pub status: HealthStatus,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CamerasSuccessResponse {
    pub cameras: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct StatsResponse {
    pub total_visitors: u64,
    pub peak_time: String,
    pub main_age_range: String,
    pub main_gender: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DashboardSuccessResponse {
    pub camera: String,
    pub period: String,
    pub period_label: String,
    pub chart_mode: String,
    pub chart_title: String,
    pub cameras: Vec<String>,
    pub stats: StatsResponse,
    pub has_data: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice_detail: Option<String>,
    pub chart: ChartSpec,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ErrorResponse {
    pub error_code: ErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NoData,
    InvalidSelection,
    InternalError,
}

/// Body of `POST /api/selection`; either field may be omitted.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionRequest {
    /// `"CCTV {n}"` label or bare id
    pub camera: Option<String>,
    /// `today`/`yesterday`/`7d`/`30d` or the button label
    pub period: Option<String>,
}
