pub mod analytics;
pub mod api;
pub mod camera;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod period;
pub mod record;
pub mod refresh;
pub mod render;
pub mod source;
