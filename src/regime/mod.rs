pub mod milestones;
pub mod period;
pub mod range;

pub use milestones::{milestones_in_year, reform_milestones, Milestone};
pub use period::{period_info, period_info_for_year, ApplicableTax, RegimePeriodInfo, Tax};
pub use range::{
    check_supported, is_date_supported, max_supported_date, min_supported_date,
    UnsupportedDateError,
};

use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Last calendar year governed entirely by the legacy taxes
pub const LAST_CURRENT_YEAR: i32 = 2025;
/// First calendar year of the transition (CBS/IBS test collection)
pub const FIRST_TRANSITION_YEAR: i32 = 2026;
/// Last calendar year with legacy taxes still collected
pub const LAST_TRANSITION_YEAR: i32 = 2032;
/// First calendar year of the fully reformed system
pub const FIRST_NEW_YEAR: i32 = 2033;

/// Rule set governing a fiscal transaction.
///
/// Variants are declared in chronological order, so `Ord` follows time.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum RegimeType {
    /// ICMS, IPI, PIS, COFINS and ISS
    Current,
    /// Legacy taxes running alongside CBS and IBS
    Transition,
    /// IBS, CBS and IS only
    New,
}

impl RegimeType {
    pub const ALL: [RegimeType; 3] = [RegimeType::Current, RegimeType::Transition, RegimeType::New];

    /// Regime in force for a calendar year
    pub fn for_year(year: i32) -> Self {
        match year {
            ..=LAST_CURRENT_YEAR => RegimeType::Current,
            FIRST_TRANSITION_YEAR..=LAST_TRANSITION_YEAR => RegimeType::Transition,
            _ => RegimeType::New,
        }
    }

    /// Inclusive year bounds, `None` meaning unbounded on that side
    pub fn years(&self) -> (Option<i32>, Option<i32>) {
        match self {
            RegimeType::Current => (None, Some(LAST_CURRENT_YEAR)),
            RegimeType::Transition => (Some(FIRST_TRANSITION_YEAR), Some(LAST_TRANSITION_YEAR)),
            RegimeType::New => (Some(FIRST_NEW_YEAR), None),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        determine_regime_type(date) == *self
    }

    pub fn display(&self) -> &'static str {
        match self {
            RegimeType::Current => "Current",
            RegimeType::Transition => "Transition",
            RegimeType::New => "New",
        }
    }
}

impl std::fmt::Display for RegimeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display())
    }
}

/// Classify an effective date. Only the calendar year matters.
pub fn determine_regime_type(date: NaiveDate) -> RegimeType {
    RegimeType::for_year(date.year())
}
