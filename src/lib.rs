//! Regime dispatch for the Brazilian consumption tax reform.
//!
//! Maps an effective date onto one of three rule sets (current, transition,
//! new), hands out the matching [`TaxEngine`], and describes which taxes are
//! collected in a given calendar year.

pub mod document;
pub mod engine;
pub mod regime;

// Flat public surface for domain types and functions.
pub use document::{
    DocumentError, DocumentInput, DocumentKind, DocumentRow, DocumentRows, FiscalDocument,
    MalformedRow,
};
pub use engine::{
    build_engine, CurrentRegimeEngine, NewRegimeEngine, RegimeDispatcher, TaxBreakdown, TaxEngine,
    TaxError, TaxLine, TransitionRegimeEngine,
};
pub use regime::{
    check_supported, determine_regime_type, is_date_supported, max_supported_date,
    milestones_in_year, min_supported_date, period_info, period_info_for_year, reform_milestones, ApplicableTax, Milestone, RegimePeriodInfo,
    RegimeType, Tax, UnsupportedDateError,
};
