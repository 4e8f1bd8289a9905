//! Visitor analytics over filtered count records.
//!
//! Everything here is a pure function of its input slice: summary statistics,
//! the hourly series behind the line chart and the gender split behind the pie
//! chart.

use serde::Serialize;
use std::fmt;

pub mod hourly;
pub mod ratio;
pub mod summary;

pub use hourly::{HOURS_PER_DAY, HourlySeries, build_hourly_series};
pub use ratio::{GenderRatio, build_gender_ratio};
pub use summary::{SummaryStats, summarize};

pub const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AgeBracket {
    /// 0–19
    Minor,
    /// 20–59
    YoungAdult,
    /// 60+
    MiddleAged,
}

impl AgeBracket {
    pub fn label(self) -> &'static str {
        match self {
            AgeBracket::Minor => "청소년층(19세 이하)",
            AgeBracket::YoungAdult => "성인층 (20세~59세)",
            AgeBracket::MiddleAged => "노인층 (60세 이상)",
        }
    }

    /// Short series name used in chart legends.
    pub fn series_name(self) -> &'static str {
        match self {
            AgeBracket::Minor => "청소년층",
            AgeBracket::YoungAdult => "성인층",
            AgeBracket::MiddleAged => "노년층",
        }
    }
}

impl fmt::Display for AgeBracket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(self) -> &'static str {
        match self {
            Gender::Male => "남성",
            Gender::Female => "여성",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
