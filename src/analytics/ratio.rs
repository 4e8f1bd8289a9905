use crate::analytics::Gender;
use crate::record::CountRecord;

#[derive(Debug, Clone, PartialEq)]
pub struct GenderRatio {
    pub male: u64,
    pub female: u64,
    pub male_percent: f64,
    pub female_percent: f64,
}

impl GenderRatio {
    pub fn count(&self, gender: Gender) -> u64 {
        match gender {
            Gender::Male => self.male,
            Gender::Female => self.female,
        }
    }

    pub fn percent(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.male_percent,
            Gender::Female => self.female_percent,
        }
    }

    /// Slice label such as `"남성 62.5%"`.
    pub fn slice_label(&self, gender: Gender) -> String {
        format!("{} {:.1}%", gender.label(), self.percent(gender))
    }
}

fn percent_of(part: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let raw = part as f64 / total as f64 * 100.0;
    (raw * 10.0).round() / 10.0
}

pub fn build_gender_ratio(records: &[CountRecord]) -> GenderRatio {
    let (male, female) = records.iter().fold((0u64, 0u64), |(male, female), record| {
        (male + record.male(), female + record.female())
    });
    let total = male + female;

    GenderRatio {
        male,
        female,
        male_percent: percent_of(male, total),
        female_percent: percent_of(female, total),
    }
}
