//! Reform timeline. Informational only: classification never reads it.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// A dated legal change in the reform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Milestone {
    pub date: NaiveDate,
    pub description: &'static str,
    pub changes: &'static [&'static str],
}

const fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(d) => d,
        None => panic!("invalid milestone date"),
    }
}

static MILESTONES: &[Milestone] = &[
    Milestone {
        date: date(2026, 1, 1),
        description: "Test year: CBS and IBS collected at nominal rates",
        changes: &[
            "CBS charged at 0.9% and IBS at 0.1% on every taxable supply",
            "Amounts are offset against PIS/COFINS owed for the period",
            "ICMS, IPI, PIS, COFINS and ISS remain fully in force",
        ],
    },
    Milestone {
        date: date(2027, 1, 1),
        description: "CBS fully in force, PIS and COFINS extinguished",
        changes: &[
            "PIS and COFINS abolished and replaced by CBS",
            "IPI rates reduced to zero outside the Manaus Free Trade Zone",
            "Selective tax (IS) starts on goods harmful to health or the environment",
            "IBS kept at 0.1% during 2027 and 2028",
        ],
    },
    Milestone {
        date: date(2029, 1, 1),
        description: "ICMS and ISS phase-down begins",
        changes: &[
            "ICMS and ISS reduced to 90% of their rates in 2029",
            "Further reductions to 80% in 2030, 70% in 2031 and 60% in 2032",
            "IBS rises proportionally to offset the reduction",
        ],
    },
    Milestone {
        date: date(2033, 1, 1),
        description: "New regime fully in force",
        changes: &[
            "ICMS and ISS extinguished",
            "IBS and CBS collected at full reference rates",
            "Only IBS, CBS and IS remain",
        ],
    },
];

/// All milestones ordered by date
pub fn reform_milestones() -> &'static [Milestone] {
    MILESTONES
}

pub fn milestones_in_year(year: i32) -> impl Iterator<Item = &'static Milestone> {
    MILESTONES.iter().filter(move |m| m.date.year() == year)
}
