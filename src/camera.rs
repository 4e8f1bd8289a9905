use crate::record::{CameraId, CountRecord};

pub const CAMERA_LABEL_PREFIX: &str = "CCTV ";
pub const DEFAULT_CAMERA_ID: CameraId = 1;

pub fn camera_label(id: CameraId) -> String {
    format!("{CAMERA_LABEL_PREFIX}{id}")
}

/// Parse a `"CCTV {n}"` button label (or a bare number) into a camera id.
pub fn parse_camera_label(label: &str) -> Option<CameraId> {
    let trimmed = label.trim();
    let number = trimmed.strip_prefix(CAMERA_LABEL_PREFIX).unwrap_or(trimmed);
    number.trim().parse().ok()
}

/// Distinct camera ids in first-seen order.
pub fn camera_ids(records: &[CountRecord]) -> Vec<CameraId> {
    let mut ids = Vec::new();
    for record in records {
        if !ids.contains(&record.cctv_id) {
            ids.push(record.cctv_id);
        }
    }
    ids
}

pub fn filter_by_camera(records: &[CountRecord], camera: CameraId) -> Vec<CountRecord> {
    records
        .iter()
        .filter(|record| record.cctv_id == camera)
        .cloned()
        .collect()
}
