use crate::record::CountRecord;
use time::UtcOffset;

pub const HOURS_PER_DAY: usize = 24;

/// Per-hour visitor counts behind the time series chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourlySeries {
    pub labels: Vec<String>,
    pub total: [u64; HOURS_PER_DAY],
    pub minor: [u64; HOURS_PER_DAY],
    pub young_adult: [u64; HOURS_PER_DAY],
    pub middle_aged: [u64; HOURS_PER_DAY],
}

/// Axis labels `"   0시"` .. `"  23시"`, space padded to width 4.
pub fn hour_labels() -> Vec<String> {
    (0..HOURS_PER_DAY).map(|hour| format!("{hour:>4}시")).collect()
}

pub fn build_hourly_series(records: &[CountRecord], offset: UtcOffset) -> HourlySeries {
    let mut series = HourlySeries {
        labels: hour_labels(),
        total: [0; HOURS_PER_DAY],
        minor: [0; HOURS_PER_DAY],
        young_adult: [0; HOURS_PER_DAY],
        middle_aged: [0; HOURS_PER_DAY],
    };

    for record in records {
        let hour = usize::from(record.hour(offset));
        if hour >= HOURS_PER_DAY {
            continue;
        }
        let (minor, young_adult, middle_aged) =
            (record.minor(), record.young_adult(), record.middle_aged());
        series.total[hour] += minor + young_adult + middle_aged;
        series.minor[hour] += minor;
        series.young_adult[hour] += young_adult;
        series.middle_aged[hour] += middle_aged;
    }

    series
}
