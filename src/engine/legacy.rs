use crate::document::{DocumentKind, FiscalDocument};
use crate::engine::{document_line, TaxError, TaxLine};
use crate::regime::{ApplicableTax, Tax};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Reference rates for the pre-reform taxes
#[derive(Debug, Clone)]
pub(crate) struct LegacyRates {
    /// Standard internal ICMS rate
    pub icms: Decimal,
    /// Non-cumulative PIS
    pub pis: Decimal,
    /// Non-cumulative COFINS
    pub cofins: Decimal,
    /// Municipal ISS ceiling
    pub iss: Decimal,
}

impl Default for LegacyRates {
    fn default() -> Self {
        LegacyRates {
            icms: dec!(0.18),
            pis: dec!(0.0165),
            cofins: dec!(0.076),
            iss: dec!(0.05),
        }
    }
}

impl LegacyRates {
    /// ICMS (goods) or ISS (services), scaled by `fraction` during the phase-down
    pub fn subnational_line(
        &self,
        document: &FiscalDocument,
        fraction: Decimal,
    ) -> Result<TaxLine, TaxError> {
        let (tax, rate) = match document.kind {
            DocumentKind::Goods => (Tax::Icms, self.icms),
            DocumentKind::Services => (Tax::Iss, self.iss),
        };
        document_line(document, ApplicableTax::real(tax), rate * fraction)
    }

    /// IPI on goods, only when the document carries a positive rate
    pub fn ipi_line(&self, document: &FiscalDocument) -> Result<Option<TaxLine>, TaxError> {
        match (document.kind, document.ipi_rate) {
            (DocumentKind::Goods, Some(rate)) if rate > Decimal::ZERO => {
                document_line(document, ApplicableTax::real(Tax::Ipi), rate).map(Some)
            }
            _ => Ok(None),
        }
    }

    pub fn federal_lines(&self, document: &FiscalDocument) -> Result<[TaxLine; 2], TaxError> {
        Ok([
            document_line(document, ApplicableTax::real(Tax::Pis), self.pis)?,
            document_line(document, ApplicableTax::real(Tax::Cofins), self.cofins)?,
        ])
    }

    /// Full legacy computation: ICMS/ISS, IPI, PIS, COFINS
    pub fn lines(&self, document: &FiscalDocument) -> Result<Vec<TaxLine>, TaxError> {
        let mut lines = vec![self.subnational_line(document, Decimal::ONE)?];
        lines.extend(self.ipi_line(document)?);
        lines.extend(self.federal_lines(document)?);
        Ok(lines)
    }
}
