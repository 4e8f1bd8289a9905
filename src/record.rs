use serde::Deserialize;
use std::fmt;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

pub type CameraId = u32;

/// Timestamp of a count bucket as sent by the backend.
///
/// The backend emits naive ISO-8601 values for its own wall clock, so only
/// offset-qualified values need converting before comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum RecordTime {
    Zoned(OffsetDateTime),
    Local(PrimitiveDateTime),
}

impl RecordTime {
    /// Wall-clock date-time at the given display offset.
    pub fn local(&self, offset: UtcOffset) -> PrimitiveDateTime {
        match self {
            RecordTime::Zoned(datetime) => {
                let local = datetime.to_offset(offset);
                PrimitiveDateTime::new(local.date(), local.time())
            }
            RecordTime::Local(datetime) => *datetime,
        }
    }

    pub fn parse(value: &str) -> Result<Self, TimestampParseError> {
        let trimmed = value.trim();
        if let Ok(datetime) = OffsetDateTime::parse(trimmed, &Rfc3339) {
            return Ok(RecordTime::Zoned(datetime));
        }

        let normalized = if trimmed.len() > 10 && trimmed.as_bytes()[10] == b' ' {
            format!("{}T{}", &trimmed[..10], &trimmed[11..])
        } else {
            trimmed.to_string()
        };
        let naive = format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
        );
        PrimitiveDateTime::parse(&normalized, naive)
            .map(RecordTime::Local)
            .map_err(|_| TimestampParseError(value.to_string()))
    }
}

impl TryFrom<String> for RecordTime {
    type Error = TimestampParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        RecordTime::parse(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimestampParseError(pub String);

impl fmt::Display for TimestampParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unrecognized timestamp: {}", self.0)
    }
}

impl std::error::Error for TimestampParseError {}

/// One demographic tally for one camera and time bucket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CountRecord {
    pub cctv_id: CameraId,
    pub timestamp: RecordTime,
    #[serde(default)]
    pub male_minor: u32,
    #[serde(default)]
    pub female_minor: u32,
    #[serde(default)]
    pub male_young_adult: u32,
    #[serde(default)]
    pub female_young_adult: u32,
    #[serde(default)]
    pub male_middle_aged: u32,
    #[serde(default)]
    pub female_middle_aged: u32,
}

impl CountRecord {
    pub fn minor(&self) -> u64 {
        u64::from(self.male_minor) + u64::from(self.female_minor)
    }

    pub fn young_adult(&self) -> u64 {
        u64::from(self.male_young_adult) + u64::from(self.female_young_adult)
    }

    pub fn middle_aged(&self) -> u64 {
        u64::from(self.male_middle_aged) + u64::from(self.female_middle_aged)
    }

    pub fn male(&self) -> u64 {
        u64::from(self.male_minor)
            + u64::from(self.male_young_adult)
            + u64::from(self.male_middle_aged)
    }

    pub fn female(&self) -> u64 {
        u64::from(self.female_minor)
            + u64::from(self.female_young_adult)
            + u64::from(self.female_middle_aged)
    }

    pub fn total(&self) -> u64 {
        self.minor() + self.young_adult() + self.middle_aged()
    }

    /// Local hour-of-day of the bucket start.
    pub fn hour(&self, offset: UtcOffset) -> u8 {
        self.timestamp.local(offset).hour()
    }
}
