use super::legacy::LegacyRates;
use super::{check_inputs, document_line, TaxBreakdown, TaxEngine, TaxError, TaxLine};
use crate::document::FiscalDocument;
use crate::regime::{ApplicableTax, RegimeType, Tax, FIRST_TRANSITION_YEAR, LAST_TRANSITION_YEAR};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

/// Rates for one transition year
#[derive(Debug, Clone, PartialEq, Eq)]
struct YearRates {
    cbs: Decimal,
    ibs: Decimal,
    /// Share of the ICMS/ISS rate still charged
    subnational_fraction: Decimal,
    /// CBS/IBS charged at nominal rates and offset against PIS/COFINS
    test_year: bool,
}

/// Rules for 2026–2032, when both systems run side by side
#[derive(Debug, Clone)]
pub struct TransitionRegimeEngine {
    legacy: LegacyRates,
    years: BTreeMap<i32, YearRates>,
}

impl Default for TransitionRegimeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TransitionRegimeEngine {
    pub fn new() -> Self {
        log::debug!("Building transition regime rate table");
        let years = (FIRST_TRANSITION_YEAR..=LAST_TRANSITION_YEAR)
            .map(|year| (year, Self::rates_for(year)))
            .collect();
        TransitionRegimeEngine {
            legacy: LegacyRates::default(),
            years,
        }
    }

    fn rates_for(year: i32) -> YearRates {
        // IBS rises by a tenth of its 17.7% reference rate for every tenth of
        // ICMS/ISS withdrawn from 2029.
        let (cbs, ibs, subnational_fraction) = match year {
            2026 => (dec!(0.009), dec!(0.001), dec!(1)),
            2027 | 2028 => (dec!(0.088), dec!(0.001), dec!(1)),
            2029 => (dec!(0.088), dec!(0.0177), dec!(0.9)),
            2030 => (dec!(0.088), dec!(0.0354), dec!(0.8)),
            2031 => (dec!(0.088), dec!(0.0531), dec!(0.7)),
            _ => (dec!(0.088), dec!(0.0708), dec!(0.6)),
        };
        YearRates {
            cbs,
            ibs,
            subnational_fraction,
            test_year: year == FIRST_TRANSITION_YEAR,
        }
    }

    fn test_year_lines(
        &self,
        document: &FiscalDocument,
        rates: &YearRates,
    ) -> Result<Vec<TaxLine>, TaxError> {
        let mut lines = self.legacy.lines(document)?;
        lines.push(document_line(document, ApplicableTax::test(Tax::Cbs), rates.cbs)?);
        lines.push(document_line(document, ApplicableTax::test(Tax::Ibs), rates.ibs)?);
        Ok(lines)
    }

    fn phase_in_lines(
        &self,
        document: &FiscalDocument,
        rates: &YearRates,
    ) -> Result<Vec<TaxLine>, TaxError> {
        let mut lines = vec![
            self.legacy
                .subnational_line(document, rates.subnational_fraction)?,
            document_line(document, ApplicableTax::real(Tax::Cbs), rates.cbs)?,
            document_line(document, ApplicableTax::real(Tax::Ibs), rates.ibs)?,
        ];
        if let Some(rate) = document.selective_rate.filter(|r| *r > Decimal::ZERO) {
            lines.push(document_line(document, ApplicableTax::real(Tax::Is), rate)?);
        }
        Ok(lines)
    }
}

impl TaxEngine for TransitionRegimeEngine {
    fn regime(&self) -> RegimeType {
        RegimeType::Transition
    }

    fn compute_tax(
        &self,
        document: &FiscalDocument,
        date: NaiveDate,
    ) -> Result<TaxBreakdown, TaxError> {
        let year = check_inputs(RegimeType::Transition, document, date)?;
        let rates = self
            .years
            .get(&year)
            .cloned()
            .unwrap_or_else(|| Self::rates_for(year));

        let lines = if rates.test_year {
            self.test_year_lines(document, &rates)?
        } else {
            self.phase_in_lines(document, &rates)?
        };
        log::debug!(
            "Document {} ({}): {} transition lines, test year {}",
            document.id,
            year,
            lines.len(),
            rates.test_year
        );

        TaxBreakdown::new(document, RegimeType::Transition, year, lines)
    }
}
