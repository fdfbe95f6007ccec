use super::range::{check_supported, UnsupportedDateError};
use super::{RegimeType, FIRST_TRANSITION_YEAR};
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Indirect taxes across both systems
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tax {
    Icms,
    Ipi,
    Pis,
    Cofins,
    Iss,
    Cbs,
    Ibs,
    Is,
}

impl Tax {
    pub fn code(&self) -> &'static str {
        match self {
            Tax::Icms => "ICMS",
            Tax::Ipi => "IPI",
            Tax::Pis => "PIS",
            Tax::Cofins => "COFINS",
            Tax::Iss => "ISS",
            Tax::Cbs => "CBS",
            Tax::Ibs => "IBS",
            Tax::Is => "IS",
        }
    }

    /// Taxes extinguished by the reform
    pub fn is_legacy(&self) -> bool {
        matches!(self, Tax::Icms | Tax::Ipi | Tax::Pis | Tax::Cofins | Tax::Iss)
    }
}

impl std::fmt::Display for Tax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A tax collected in a period.
///
/// `test` marks nominal collection during the 2026 test year: the amounts are
/// reported but offset against PIS/COFINS rather than actually owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ApplicableTax {
    pub tax: Tax,
    #[serde(default)]
    pub test: bool,
}

impl ApplicableTax {
    pub const fn real(tax: Tax) -> Self {
        ApplicableTax { tax, test: false }
    }

    pub const fn test(tax: Tax) -> Self {
        ApplicableTax { tax, test: true }
    }
}

impl std::fmt::Display for ApplicableTax {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.test {
            write!(f, "{} (test)", self.tax)
        } else {
            write!(f, "{}", self.tax)
        }
    }
}

const LEGACY_TAXES: &[ApplicableTax] = &[
    ApplicableTax::real(Tax::Icms),
    ApplicableTax::real(Tax::Ipi),
    ApplicableTax::real(Tax::Pis),
    ApplicableTax::real(Tax::Cofins),
    ApplicableTax::real(Tax::Iss),
];

const TEST_YEAR_TAXES: &[ApplicableTax] = &[
    ApplicableTax::real(Tax::Icms),
    ApplicableTax::real(Tax::Ipi),
    ApplicableTax::real(Tax::Pis),
    ApplicableTax::real(Tax::Cofins),
    ApplicableTax::real(Tax::Iss),
    ApplicableTax::test(Tax::Cbs),
    ApplicableTax::test(Tax::Ibs),
];

// PIS/COFINS give way to CBS and IPI is zeroed; ICMS/ISS phase down until 2033.
const TRANSITION_TAXES: &[ApplicableTax] = &[
    ApplicableTax::real(Tax::Icms),
    ApplicableTax::real(Tax::Iss),
    ApplicableTax::real(Tax::Cbs),
    ApplicableTax::real(Tax::Ibs),
    ApplicableTax::real(Tax::Is),
];

const NEW_TAXES: &[ApplicableTax] = &[
    ApplicableTax::real(Tax::Ibs),
    ApplicableTax::real(Tax::Cbs),
    ApplicableTax::real(Tax::Is),
];

/// Regulatory description of a calendar year
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegimePeriodInfo {
    pub regime: RegimeType,
    pub year: i32,
    pub description: String,
    /// Taxes collected in `year`, in a fixed order
    pub applicable_taxes: Vec<ApplicableTax>,
}

impl RegimePeriodInfo {
    /// Whether `tax` is collected at all, test or real
    pub fn applies(&self, tax: Tax) -> bool {
        self.applicable_taxes.iter().any(|t| t.tax == tax)
    }

    /// Whether `tax` is collected at its real rate
    pub fn applies_for_real(&self, tax: Tax) -> bool {
        self.applicable_taxes.iter().any(|t| t.tax == tax && !t.test)
    }

    pub fn contains(&self, tax: &ApplicableTax) -> bool {
        self.applicable_taxes.contains(tax)
    }

    /// Display codes, e.g. `["ICMS", "CBS (test)"]`
    pub fn tax_codes(&self) -> Vec<String> {
        self.applicable_taxes.iter().map(|t| t.to_string()).collect()
    }
}

/// Period metadata for an effective date inside the supported window
pub fn period_info(date: NaiveDate) -> Result<RegimePeriodInfo, UnsupportedDateError> {
    let date = check_supported(date)?;
    Ok(period_info_for_year(date.year()))
}

/// Period metadata for a calendar year; depends on nothing but the year
pub fn period_info_for_year(year: i32) -> RegimePeriodInfo {
    let regime = RegimeType::for_year(year);
    let (description, taxes) = match regime {
        RegimeType::Current => (
            format!("Current regime ({year}): ICMS, IPI, PIS, COFINS and ISS"),
            LEGACY_TAXES,
        ),
        RegimeType::Transition if year == FIRST_TRANSITION_YEAR => (
            format!(
                "Transition regime ({year}): test year, CBS and IBS collected at nominal \
                 rates alongside the current taxes"
            ),
            TEST_YEAR_TAXES,
        ),
        RegimeType::Transition => (
            format!(
                "Transition regime ({year}): CBS replaces PIS/COFINS, IBS phases in \
                 while ICMS and ISS phase out"
            ),
            TRANSITION_TAXES,
        ),
        RegimeType::New => (
            format!("New regime ({year}): IBS, CBS and IS fully in force"),
            NEW_TAXES,
        ),
    };

    RegimePeriodInfo {
        regime,
        year,
        description,
        applicable_taxes: taxes.to_vec(),
    }
}
