use crate::analytics::{AgeBracket, Gender, NOT_AVAILABLE};
use crate::record::CountRecord;
use time::UtcOffset;

pub const EMPTY_PEAK_TIME: &str = "00:00-00:00";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryStats {
    pub total_visitors: u64,
    pub peak_time: String,
    pub main_age_range: Option<AgeBracket>,
    pub main_gender: Option<Gender>,
}

impl SummaryStats {
    pub fn empty() -> Self {
        Self {
            total_visitors: 0,
            peak_time: EMPTY_PEAK_TIME.to_string(),
            main_age_range: None,
            main_gender: None,
        }
    }

    pub fn main_age_range_label(&self) -> &'static str {
        self.main_age_range
            .map(AgeBracket::label)
            .unwrap_or(NOT_AVAILABLE)
    }

    pub fn main_gender_label(&self) -> &'static str {
        self.main_gender.map(Gender::label).unwrap_or(NOT_AVAILABLE)
    }
}

impl Default for SummaryStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// `"HH:00 - HH+1:00"`, wrapping 23 to `00`.
pub fn peak_hour_label(hour: u8) -> String {
    format!("{:02}:00 - {:02}:00", hour, (hour + 1) % 24)
}

/// Single-pass summary over an already filtered record set.
///
/// The peak hour follows the busiest individual record, not the busiest
/// aggregated hour: two records in the same hour never combine to move it.
pub fn summarize(records: &[CountRecord], offset: UtcOffset) -> SummaryStats {
    let mut total = 0u64;
    let mut peak_count = 0u64;
    let mut peak_time = String::new();
    let mut male = 0u64;
    let mut female = 0u64;
    let mut minor = 0u64;
    let mut young_adult = 0u64;
    let mut middle_aged = 0u64;

    for record in records {
        let record_total = record.total();
        total += record_total;

        if record_total > peak_count {
            peak_count = record_total;
            peak_time = peak_hour_label(record.hour(offset));
        }

        male += record.male();
        female += record.female();
        minor += record.minor();
        young_adult += record.young_adult();
        middle_aged += record.middle_aged();
    }

    if total == 0 {
        return SummaryStats::empty();
    }

    let main_gender = if male > female {
        Gender::Male
    } else {
        Gender::Female
    };

    let main_age_range = if young_adult >= middle_aged && young_adult >= minor {
        AgeBracket::YoungAdult
    } else if middle_aged >= minor {
        AgeBracket::MiddleAged
    } else {
        AgeBracket::Minor
    };

    SummaryStats {
        total_visitors: total,
        peak_time,
        main_age_range: Some(main_age_range),
        main_gender: Some(main_gender),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RecordTime;
    use time::PrimitiveDateTime;
    use time::macros::{datetime, offset};

    fn record(at: PrimitiveDateTime) -> CountRecord {
        CountRecord {
            cctv_id: 1,
            timestamp: RecordTime::Local(at),
            male_minor: 0,
            female_minor: 0,
            male_young_adult: 0,
            female_young_adult: 0,
            male_middle_aged: 0,
            female_middle_aged: 0,
        }
    }

    #[test]
    fn empty_input_yields_not_available() {
        let stats = summarize(&[], offset!(+9));
        assert_eq!(stats, SummaryStats::empty());
        assert_eq!(stats.peak_time, "00:00-00:00");
        assert_eq!(stats.main_age_range_label(), "N/A");
        assert_eq!(stats.main_gender_label(), "N/A");
    }

    #[test]
    fn all_zero_records_short_circuit() {
        let records = vec![record(datetime!(2025-02-18 10:00))];
        assert_eq!(summarize(&records, offset!(+9)), SummaryStats::empty());
    }

    #[test]
    fn two_record_scenario() {
        let records = vec![
            CountRecord {
                male_young_adult: 5,
                female_young_adult: 3,
                ..record(datetime!(2025-02-18 08:15))
            },
            CountRecord {
                male_minor: 10,
                ..record(datetime!(2025-02-18 14:40))
            },
        ];

        let stats = summarize(&records, offset!(+9));

        assert_eq!(stats.total_visitors, 18);
        assert_eq!(stats.peak_time, "14:00 - 15:00");
        assert_eq!(stats.main_age_range, Some(AgeBracket::Minor));
        assert_eq!(stats.main_gender, Some(Gender::Male));
    }

    #[test]
    fn peak_follows_single_record_not_hour_total() {
        // Hour 9 holds 6 + 6 = 12 visitors, but no single record beats the 10 at hour 17.
        let records = vec![
            CountRecord {
                female_young_adult: 6,
                ..record(datetime!(2025-02-18 09:00))
            },
            CountRecord {
                female_young_adult: 6,
                ..record(datetime!(2025-02-18 09:30))
            },
            CountRecord {
                male_young_adult: 10,
                ..record(datetime!(2025-02-18 17:00))
            },
        ];

        let stats = summarize(&records, offset!(+9));
        assert_eq!(stats.peak_time, "17:00 - 18:00");
    }

    #[test]
    fn first_record_wins_peak_ties() {
        let records = vec![
            CountRecord {
                male_minor: 4,
                ..record(datetime!(2025-02-18 11:00))
            },
            CountRecord {
                male_minor: 4,
                ..record(datetime!(2025-02-18 12:00))
            },
        ];
        assert_eq!(summarize(&records, offset!(+9)).peak_time, "11:00 - 12:00");
    }

    #[test]
    fn hour_twenty_three_wraps() {
        assert_eq!(peak_hour_label(23), "23:00 - 00:00");
        assert_eq!(peak_hour_label(0), "00:00 - 01:00");
    }

    #[test]
    fn gender_tie_reports_female() {
        let records = vec![CountRecord {
            male_minor: 2,
            female_minor: 2,
            ..record(datetime!(2025-02-18 10:00))
        }];
        assert_eq!(summarize(&records, offset!(+9)).main_gender, Some(Gender::Female));
    }

    #[test]
    fn age_ties_prefer_young_adult_then_middle_aged() {
        let all_equal = vec![CountRecord {
            male_minor: 3,
            male_young_adult: 3,
            male_middle_aged: 3,
            ..record(datetime!(2025-02-18 10:00))
        }];
        assert_eq!(
            summarize(&all_equal, offset!(+9)).main_age_range,
            Some(AgeBracket::YoungAdult)
        );

        let middle_ties_minor = vec![CountRecord {
            male_minor: 3,
            male_young_adult: 1,
            female_middle_aged: 3,
            ..record(datetime!(2025-02-18 10:00))
        }];
        assert_eq!(
            summarize(&middle_ties_minor, offset!(+9)).main_age_range,
            Some(AgeBracket::MiddleAged)
        );
    }

    #[test]
    fn summarize_is_idempotent() {
        let records = vec![CountRecord {
            male_young_adult: 7,
            female_middle_aged: 2,
            ..record(datetime!(2025-02-18 19:05))
        }];
        assert_eq!(
            summarize(&records, offset!(+9)),
            summarize(&records, offset!(+9))
        );
    }
}
