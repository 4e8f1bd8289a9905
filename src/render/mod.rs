use crate::analytics::{AgeBracket, Gender, build_gender_ratio, build_hourly_series};
use crate::record::CountRecord;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use time::UtcOffset;

pub mod canvas;

pub use canvas::ChartCanvas;

pub const TOTAL_SERIES_NAME: &str = "총 방문자";
pub const GENDER_SERIES_NAME: &str = "성별 비율";

const TOTAL_COLOR: &str = "#5470c6";
const MINOR_COLOR: &str = "#ee6666";
const YOUNG_ADULT_COLOR: &str = "#73c0de";
const MIDDLE_AGED_COLOR: &str = "#3ba272";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartMode {
    #[serde(rename = "time")]
    TimeSeries,
    #[serde(rename = "gender")]
    GenderRatio,
}

impl ChartMode {
    pub const ALL: [ChartMode; 2] = [ChartMode::TimeSeries, ChartMode::GenderRatio];

    pub fn name(self) -> &'static str {
        match self {
            ChartMode::TimeSeries => "time",
            ChartMode::GenderRatio => "gender",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ChartMode::TimeSeries => "시간대별 방문자 통계",
            ChartMode::GenderRatio => "성별 비율",
        }
    }

    fn index(self) -> usize {
        match self {
            ChartMode::TimeSeries => 0,
            ChartMode::GenderRatio => 1,
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn previous(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ChartMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ChartMode {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        ChartMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown chart mode: {trimmed}"))
    }
}

/// Declarative chart option handed to the browser charting library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChartSpec {
    Line(LineChart),
    Pie(PieChart),
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Line(chart) => &chart.title,
            ChartSpec::Pie(chart) => &chart.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineChart {
    pub title: String,
    pub x_axis: Vec<String>,
    pub legend: Vec<String>,
    pub series: Vec<LineSeries>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineSeries {
    pub name: String,
    pub color: String,
    pub smooth: bool,
    pub data: Vec<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieChart {
    pub title: String,
    pub series_name: String,
    pub legend: Vec<String>,
    pub slices: Vec<PieSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub name: String,
    pub value: u64,
}

/// Drawing target owned by the rendering layer.
pub trait ChartSurface {
    fn set_option(&mut self, spec: ChartSpec);
    fn clear(&mut self);
}

/// Full option replacement: the surface never merges with a previous chart.
pub fn redraw<S: ChartSurface + ?Sized>(surface: &mut S, spec: ChartSpec) {
    surface.clear();
    surface.set_option(spec);
}

pub fn build_chart(mode: ChartMode, records: &[CountRecord], offset: UtcOffset) -> ChartSpec {
    match mode {
        ChartMode::TimeSeries => ChartSpec::Line(build_line_chart(records, offset)),
        ChartMode::GenderRatio => ChartSpec::Pie(build_pie_chart(records)),
    }
}

fn line_series(name: &str, color: &str, data: &[u64]) -> LineSeries {
    LineSeries {
        name: name.to_string(),
        color: color.to_string(),
        smooth: true,
        data: data.to_vec(),
    }
}

fn build_line_chart(records: &[CountRecord], offset: UtcOffset) -> LineChart {
    let hourly = build_hourly_series(records, offset);
    let series = vec![
        line_series(TOTAL_SERIES_NAME, TOTAL_COLOR, &hourly.total),
        line_series(AgeBracket::Minor.series_name(), MINOR_COLOR, &hourly.minor),
        line_series(
            AgeBracket::YoungAdult.series_name(),
            YOUNG_ADULT_COLOR,
            &hourly.young_adult,
        ),
        line_series(
            AgeBracket::MiddleAged.series_name(),
            MIDDLE_AGED_COLOR,
            &hourly.middle_aged,
        ),
    ];

    LineChart {
        title: ChartMode::TimeSeries.title().to_string(),
        x_axis: hourly.labels,
        legend: series.iter().map(|s| s.name.clone()).collect(),
        series,
    }
}

fn build_pie_chart(records: &[CountRecord]) -> PieChart {
    let ratio = build_gender_ratio(records);
    let slices: Vec<PieSlice> = [Gender::Male, Gender::Female]
        .into_iter()
        .map(|gender| PieSlice {
            name: ratio.slice_label(gender),
            value: ratio.count(gender),
        })
        .collect();

    PieChart {
        title: ChartMode::GenderRatio.title().to_string(),
        series_name: GENDER_SERIES_NAME.to_string(),
        legend: slices.iter().map(|slice| slice.name.clone()).collect(),
        slices,
    }
}
