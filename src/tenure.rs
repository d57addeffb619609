//! Account tenure in years and the duration buckets reports slice by

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Days per tenure year; no leap adjustment
const DAYS_PER_YEAR: f64 = 365.0;

/// Service duration in years between activation and churn
///
/// Returns `None` when either date is missing. A churn date before the activation
/// date gives a negative duration, which no bucket accepts.
pub fn duration_years(activated: Option<NaiveDate>, churned: Option<NaiveDate>) -> Option<f64> {
    let (activated, churned) = (activated?, churned?);
    Some((churned - activated).num_days() as f64 / DAYS_PER_YEAR)
}

/// Tenure bucket used by duration filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DurationBucket {
    /// [0, 1)
    BelowOneYear,
    /// [1, 2)
    OneToTwoYears,
    /// [2, 3)
    TwoToThreeYears,
    /// [3, 4)
    ThreeToFourYears,
    /// [4, 5)
    FourToFiveYears,
    /// [5, Inf)
    FiveYearsOrMore,
}

impl DurationBucket {
    pub const ALL: [DurationBucket; 6] = [
        DurationBucket::BelowOneYear,
        DurationBucket::OneToTwoYears,
        DurationBucket::TwoToThreeYears,
        DurationBucket::ThreeToFourYears,
        DurationBucket::FourToFiveYears,
        DurationBucket::FiveYearsOrMore,
    ];

    /// Parse a bucket label, either the dashboard wording or the short form
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "below 1 year" | "<1y" => Some(DurationBucket::BelowOneYear),
            "1 year to 2 years" | "1-2y" => Some(DurationBucket::OneToTwoYears),
            "2 years to 3 years" | "2-3y" => Some(DurationBucket::TwoToThreeYears),
            "3 years to 4 years" | "3-4y" => Some(DurationBucket::ThreeToFourYears),
            "4 years to 5 years" | "4-5y" => Some(DurationBucket::FourToFiveYears),
            "more than 5 years" | ">=5y" | "≥5y" => Some(DurationBucket::FiveYearsOrMore),
            _ => None,
        }
    }

    /// Dashboard wording
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationBucket::BelowOneYear => "below 1 year",
            DurationBucket::OneToTwoYears => "1 year to 2 years",
            DurationBucket::TwoToThreeYears => "2 years to 3 years",
            DurationBucket::ThreeToFourYears => "3 years to 4 years",
            DurationBucket::FourToFiveYears => "4 years to 5 years",
            DurationBucket::FiveYearsOrMore => "more than 5 years",
        }
    }

    /// Lower (inclusive) and upper (exclusive) bound in years
    fn bounds(&self) -> (f64, f64) {
        match self {
            DurationBucket::BelowOneYear => (0.0, 1.0),
            DurationBucket::OneToTwoYears => (1.0, 2.0),
            DurationBucket::TwoToThreeYears => (2.0, 3.0),
            DurationBucket::ThreeToFourYears => (3.0, 4.0),
            DurationBucket::FourToFiveYears => (4.0, 5.0),
            DurationBucket::FiveYearsOrMore => (5.0, f64::INFINITY),
        }
    }

    /// Whether a tenure falls in this bucket; NaN and negatives never do
    pub fn contains(&self, years: f64) -> bool {
        let (lower, upper) = self.bounds();
        years >= lower && years < upper
    }
}
