use crate::record::CountRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::macros::time;
use time::{Date, Duration, PrimitiveDateTime, UtcOffset};

const END_OF_DAY: time::Time = time!(23:59:59);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodWindow {
    Today,
    Yesterday,
    #[serde(rename = "7d")]
    Past7Days,
    #[serde(rename = "30d")]
    Past30Days,
}

impl PeriodWindow {
    pub const ALL: [PeriodWindow; 4] = [
        PeriodWindow::Today,
        PeriodWindow::Yesterday,
        PeriodWindow::Past7Days,
        PeriodWindow::Past30Days,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PeriodWindow::Today => "today",
            PeriodWindow::Yesterday => "yesterday",
            PeriodWindow::Past7Days => "7d",
            PeriodWindow::Past30Days => "30d",
        }
    }

    /// Button label shown in the dashboard.
    pub fn label(self) -> &'static str {
        match self {
            PeriodWindow::Today => "오늘",
            PeriodWindow::Yesterday => "어제",
            PeriodWindow::Past7Days => "1주일",
            PeriodWindow::Past30Days => "1달",
        }
    }

    /// Inclusive local bounds of the window anchored on `now`.
    pub fn bounds(self, now: PrimitiveDateTime) -> (PrimitiveDateTime, PrimitiveDateTime) {
        let today = now.date();
        let end_of_today = PrimitiveDateTime::new(today, END_OF_DAY);
        match self {
            PeriodWindow::Today => (today.midnight(), end_of_today),
            PeriodWindow::Yesterday => {
                let yesterday = today.previous_day().unwrap_or(today);
                (
                    yesterday.midnight(),
                    PrimitiveDateTime::new(yesterday, END_OF_DAY),
                )
            }
            PeriodWindow::Past7Days => (
                today.saturating_sub(Duration::days(7)).midnight(),
                end_of_today,
            ),
            PeriodWindow::Past30Days => (one_month_before(today).midnight(), end_of_today),
        }
    }
}

impl fmt::Display for PeriodWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PeriodWindow {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        PeriodWindow::ALL
            .into_iter()
            .find(|period| {
                period.name().eq_ignore_ascii_case(trimmed) || period.label() == trimmed
            })
            .ok_or_else(|| format!("unknown period: {trimmed}"))
    }
}

// Same day-of-month one month earlier. A day the shorter month lacks rolls
// over into the following month: 31 Mar gives 3 Mar in a 28-day year.
fn one_month_before(date: Date) -> Date {
    let month = date.month().previous();
    let year = if month == time::Month::December {
        date.year() - 1
    } else {
        date.year()
    };
    Date::from_calendar_date(year, month, 1)
        .map(|first| first.saturating_add(Duration::days(i64::from(date.day()) - 1)))
        .unwrap_or(date)
}

/// Records whose local timestamp falls inside `window` evaluated at `now`.
pub fn filter_by_period(
    records: &[CountRecord],
    window: PeriodWindow,
    now: PrimitiveDateTime,
    offset: UtcOffset,
) -> Vec<CountRecord> {
    let (start, end) = window.bounds(now);
    records
        .iter()
        .filter(|record| {
            let at = record.timestamp.local(offset);
            at >= start && at <= end
        })
        .cloned()
        .collect()
}
