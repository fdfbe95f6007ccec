use super::legacy::LegacyRates;
use super::{check_inputs, TaxBreakdown, TaxEngine, TaxError};
use crate::document::FiscalDocument;
use crate::regime::RegimeType;
use chrono::NaiveDate;

/// Pre-reform rules: ICMS, IPI, PIS, COFINS and ISS
#[derive(Debug, Clone)]
pub struct CurrentRegimeEngine {
    rates: LegacyRates,
}

impl Default for CurrentRegimeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrentRegimeEngine {
    pub fn new() -> Self {
        log::debug!("Building current regime rate table");
        CurrentRegimeEngine {
            rates: LegacyRates::default(),
        }
    }
}

impl TaxEngine for CurrentRegimeEngine {
    fn regime(&self) -> RegimeType {
        RegimeType::Current
    }

    fn compute_tax(
        &self,
        document: &FiscalDocument,
        date: NaiveDate,
    ) -> Result<TaxBreakdown, TaxError> {
        let year = check_inputs(RegimeType::Current, document, date)?;
        let lines = self.rates.lines(document)?;
        log::debug!("Document {} ({}): {} legacy lines", document.id, year, lines.len());
        TaxBreakdown::new(document, RegimeType::Current, year, lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_utils::{date, goods, services};
    use crate::regime::Tax;
    use rust_decimal_macros::dec;

    #[test]
    fn goods_pay_icms_pis_cofins() {
        let engine = CurrentRegimeEngine::new();
        let breakdown = engine.compute_tax(&goods(dec!(1000)), date(2024, 5, 10)).unwrap();

        assert_eq!(breakdown.regime, RegimeType::Current);
        assert_eq!(breakdown.year, 2024);
        assert_eq!(breakdown.line(Tax::Icms).unwrap().amount, dec!(180));
        assert_eq!(breakdown.line(Tax::Pis).unwrap().amount, dec!(16.50));
        assert_eq!(breakdown.line(Tax::Cofins).unwrap().amount, dec!(76));
        assert!(breakdown.line(Tax::Ipi).is_none());
        assert!(breakdown.line(Tax::Iss).is_none());
        assert_eq!(breakdown.total(), dec!(272.50));
    }

    #[test]
    fn ipi_applied_when_rate_given() {
        let engine = CurrentRegimeEngine::new();
        let mut doc = goods(dec!(200));
        doc.ipi_rate = Some(dec!(0.10));
        let breakdown = engine.compute_tax(&doc, date(2025, 12, 31)).unwrap();
        assert_eq!(breakdown.line(Tax::Ipi).unwrap().amount, dec!(20));
    }

    #[test]
    fn services_pay_iss_not_icms() {
        let engine = CurrentRegimeEngine::new();
        let breakdown = engine.compute_tax(&services(dec!(1000)), date(2023, 1, 1)).unwrap();
        assert_eq!(breakdown.line(Tax::Iss).unwrap().amount, dec!(50));
        assert!(breakdown.line(Tax::Icms).is_none());
        assert_eq!(breakdown.total(), dec!(142.50));
    }

    #[test]
    fn selective_rate_ignored_before_reform() {
        let engine = CurrentRegimeEngine::new();
        let mut doc = goods(dec!(100));
        doc.selective_rate = Some(dec!(0.2));
        let breakdown = engine.compute_tax(&doc, date(2025, 1, 1)).unwrap();
        assert!(breakdown.line(Tax::Is).is_none());
    }

    #[test]
    fn default_matches_new() {
        let doc = goods(dec!(1000));
        let d = date(2024, 5, 10);
        assert_eq!(
            CurrentRegimeEngine::default().compute_tax(&doc, d),
            CurrentRegimeEngine::new().compute_tax(&doc, d)
        );
    }

    #[test]
    fn same_inputs_same_result() {
        let engine = CurrentRegimeEngine::new();
        let doc = goods(dec!(123.45));
        let first = engine.compute_tax(&doc, date(2022, 3, 3)).unwrap();
        let second = engine.compute_tax(&doc, date(2022, 3, 3)).unwrap();
        assert_eq!(first, second);
    }
}
