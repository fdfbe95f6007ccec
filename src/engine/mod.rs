pub mod current;
pub mod dispatcher;
mod legacy;
pub mod new;
pub mod transition;

pub use current::CurrentRegimeEngine;
pub use dispatcher::RegimeDispatcher;
pub use new::NewRegimeEngine;
pub use transition::TransitionRegimeEngine;

use crate::document::FiscalDocument;
use crate::regime::{
    check_supported, determine_regime_type, ApplicableTax, RegimeType, UnsupportedDateError,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TaxError {
    #[error(transparent)]
    UnsupportedDate(#[from] UnsupportedDateError),
    #[error("{engine} regime engine cannot compute taxes for {date} ({actual} regime)")]
    RegimeMismatch {
        engine: RegimeType,
        actual: RegimeType,
        date: NaiveDate,
    },
    #[error("negative operation amount on document {document_id}")]
    NegativeAmount { document_id: String },
    #[error("tax on document {document_id} exceeds the representable amount")]
    Overflow { document_id: String },
}

/// Rule set for one regime.
///
/// Implementations hold their own rate tables and never mutate after
/// construction, so `compute_tax` depends on its arguments only.
pub trait TaxEngine: Send + Sync + std::fmt::Debug {
    fn regime(&self) -> RegimeType;

    fn compute_tax(
        &self,
        document: &FiscalDocument,
        date: NaiveDate,
    ) -> Result<TaxBreakdown, TaxError>;
}

/// Construct the engine for a regime
pub fn build_engine(regime: RegimeType) -> Arc<dyn TaxEngine> {
    match regime {
        RegimeType::Current => Arc::new(CurrentRegimeEngine::new()),
        RegimeType::Transition => Arc::new(TransitionRegimeEngine::new()),
        RegimeType::New => Arc::new(NewRegimeEngine::new()),
    }
}

/// A single tax on a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxLine {
    pub tax: ApplicableTax,
    pub base: Decimal,
    pub rate: Decimal,
    pub amount: Decimal,
}

impl TaxLine {
    /// `None` when `base * rate` does not fit in a `Decimal`
    pub fn new(tax: ApplicableTax, base: Decimal, rate: Decimal) -> Option<Self> {
        let amount = base.checked_mul(rate)?.round_dp(2);
        Some(TaxLine {
            tax,
            base,
            rate,
            amount,
        })
    }
}

/// Line on the document's own amount, overflow reported against the document
fn document_line(
    document: &FiscalDocument,
    tax: ApplicableTax,
    rate: Decimal,
) -> Result<TaxLine, TaxError> {
    TaxLine::new(tax, document.amount, rate).ok_or_else(|| TaxError::Overflow {
        document_id: document.id.clone(),
    })
}

/// Taxes computed for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaxBreakdown {
    pub document_id: String,
    pub regime: RegimeType,
    pub year: i32,
    pub lines: Vec<TaxLine>,
}

impl TaxBreakdown {
    /// Assemble a breakdown, rejecting lines whose sum overflows.
    ///
    /// Line amounts are never negative, so once the full sum fits every
    /// partial sum (`total`, `test_total`) fits as well.
    pub fn new(
        document: &FiscalDocument,
        regime: RegimeType,
        year: i32,
        lines: Vec<TaxLine>,
    ) -> Result<Self, TaxError> {
        lines
            .iter()
            .try_fold(Decimal::ZERO, |acc, l| acc.checked_add(l.amount))
            .ok_or_else(|| TaxError::Overflow {
                document_id: document.id.clone(),
            })?;
        Ok(TaxBreakdown {
            document_id: document.id.clone(),
            regime,
            year,
            lines,
        })
    }

    /// Amount actually owed; test-year lines are offset and excluded
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| !l.tax.test)
            .map(|l| l.amount)
            .sum()
    }

    /// Nominal amount reported on test-flagged lines
    pub fn test_total(&self) -> Decimal {
        self.lines
            .iter()
            .filter(|l| l.tax.test)
            .map(|l| l.amount)
            .sum()
    }

    pub fn line(&self, tax: crate::regime::Tax) -> Option<&TaxLine> {
        self.lines.iter().find(|l| l.tax.tax == tax)
    }
}

/// Common preconditions: supported date, matching regime, non-negative amount
fn check_inputs(
    engine: RegimeType,
    document: &FiscalDocument,
    date: NaiveDate,
) -> Result<i32, TaxError> {
    let date = check_supported(date)?;
    if !engine.contains(date) {
        return Err(TaxError::RegimeMismatch {
            engine,
            actual: determine_regime_type(date),
            date,
        });
    }
    if document.amount < Decimal::ZERO {
        return Err(TaxError::NegativeAmount {
            document_id: document.id.clone(),
        });
    }
    Ok(date.year())
}
