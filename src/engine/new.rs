use super::{check_inputs, document_line, TaxBreakdown, TaxEngine, TaxError};
use crate::document::FiscalDocument;
use crate::regime::{ApplicableTax, RegimeType, Tax};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Post-reform rules from 2033: IBS, CBS and IS
#[derive(Debug, Clone)]
pub struct NewRegimeEngine {
    /// Federal CBS reference rate
    cbs: Decimal,
    /// State and municipal IBS reference rate
    ibs: Decimal,
}

impl Default for NewRegimeEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl NewRegimeEngine {
    pub fn new() -> Self {
        log::debug!("Building new regime rate table");
        NewRegimeEngine {
            cbs: dec!(0.088),
            ibs: dec!(0.177),
        }
    }
}

impl TaxEngine for NewRegimeEngine {
    fn regime(&self) -> RegimeType {
        RegimeType::New
    }

    fn compute_tax(
        &self,
        document: &FiscalDocument,
        date: NaiveDate,
    ) -> Result<TaxBreakdown, TaxError> {
        let year = check_inputs(RegimeType::New, document, date)?;

        // Goods and services are taxed alike under IBS/CBS.
        let mut lines = vec![
            document_line(document, ApplicableTax::real(Tax::Ibs), self.ibs)?,
            document_line(document, ApplicableTax::real(Tax::Cbs), self.cbs)?,
        ];
        if let Some(rate) = document.selective_rate.filter(|r| *r > Decimal::ZERO) {
            lines.push(document_line(document, ApplicableTax::real(Tax::Is), rate)?);
        }

        TaxBreakdown::new(document, RegimeType::New, year, lines)
    }
}
