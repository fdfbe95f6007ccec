use super::{build_engine, TaxBreakdown, TaxEngine, TaxError};
use crate::document::FiscalDocument;
use crate::regime::{check_supported, determine_regime_type, RegimeType, UnsupportedDateError};
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Hands out one shared engine per regime, built on first use.
///
/// Each dispatcher owns its cache; independent dispatchers never share
/// engines. Two lookups resolving to the same regime return the same
/// `Arc` (`Arc::ptr_eq`) until [`RegimeDispatcher::clear_cache`] is called.
#[derive(Debug, Default)]
pub struct RegimeDispatcher {
    cache: RwLock<HashMap<RegimeType, Arc<dyn TaxEngine>>>,
}

impl RegimeDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine for an effective date.
    ///
    /// Dates outside the supported window are rejected rather than mapped to
    /// the nearest regime.
    pub fn engine_for(&self, date: NaiveDate) -> Result<Arc<dyn TaxEngine>, UnsupportedDateError> {
        let date = check_supported(date)?;
        Ok(self.engine_for_type(determine_regime_type(date)))
    }

    /// Engine for a known regime, skipping classification
    pub fn engine_for_type(&self, regime: RegimeType) -> Arc<dyn TaxEngine> {
        if let Some(engine) = self.read().get(&regime) {
            return Arc::clone(engine);
        }

        // Another caller may have filled the slot between the two locks;
        // `entry` keeps whichever engine got there first.
        let mut cache = self.write();
        let engine = cache.entry(regime).or_insert_with(|| {
            log::debug!("Engine cache miss for {} regime", regime);
            build_engine(regime)
        });
        Arc::clone(engine)
    }

    /// Classify, dispatch and compute in one step
    pub fn compute(
        &self,
        document: &FiscalDocument,
        date: NaiveDate,
    ) -> Result<TaxBreakdown, TaxError> {
        let engine = self.engine_for(date)?;
        engine.compute_tax(document, date)
    }

    /// Drop every cached engine; later lookups build fresh instances
    pub fn clear_cache(&self) {
        let mut cache = self.write();
        log::debug!("Clearing {} cached engines", cache.len());
        cache.clear();
    }

    /// Regimes holding a live engine, in chronological order
    pub fn cached_regimes(&self) -> Vec<RegimeType> {
        let mut regimes: Vec<_> = self.read().keys().copied().collect();
        regimes.sort();
        regimes
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<RegimeType, Arc<dyn TaxEngine>>> {
        self.cache.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<RegimeType, Arc<dyn TaxEngine>>> {
        self.cache.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_utils::{date, goods};
    use rust_decimal_macros::dec;

    #[test]
    fn same_regime_same_instance() {
        let dispatcher = RegimeDispatcher::new();
        let a = dispatcher.engine_for(date(2027, 1, 1)).unwrap();
        let b = dispatcher.engine_for(date(2032, 12, 31)).unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(a.regime(), RegimeType::Transition);
    }

    #[test]
    fn different_regimes_different_instances() {
        let dispatcher = RegimeDispatcher::new();
        let current = dispatcher.engine_for(date(2025, 12, 31)).unwrap();
        let transition = dispatcher.engine_for(date(2026, 1, 1)).unwrap();
        let new = dispatcher.engine_for(date(2033, 1, 1)).unwrap();
        assert!(!Arc::ptr_eq(&current, &transition));
        assert!(!Arc::ptr_eq(&transition, &new));
        assert_eq!(current.regime(), RegimeType::Current);
        assert_eq!(new.regime(), RegimeType::New);
    }

    #[test]
    fn by_type_shares_cache_with_by_date() {
        let dispatcher = RegimeDispatcher::new();
        let by_date = dispatcher.engine_for(date(2040, 5, 5)).unwrap();
        let by_type = dispatcher.engine_for_type(RegimeType::New);
        assert!(Arc::ptr_eq(&by_date, &by_type));
    }

    #[test]
    fn clear_cache_rebuilds() {
        let dispatcher = RegimeDispatcher::new();
        let before = dispatcher.engine_for(date(2024, 1, 1)).unwrap();
        dispatcher.clear_cache();
        assert!(dispatcher.cached_regimes().is_empty());
        let after = dispatcher.engine_for(date(2024, 1, 1)).unwrap();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.regime(), RegimeType::Current);
    }

    #[test]
    fn cache_holds_at_most_three_engines() {
        let dispatcher = RegimeDispatcher::new();
        for year in 2020..=2050 {
            dispatcher.engine_for(date(year, 1, 1)).unwrap();
        }
        assert_eq!(dispatcher.cached_regimes(), RegimeType::ALL.to_vec());
    }

    #[test]
    fn lazily_populated() {
        let dispatcher = RegimeDispatcher::new();
        assert!(dispatcher.cached_regimes().is_empty());
        dispatcher.engine_for_type(RegimeType::New);
        assert_eq!(dispatcher.cached_regimes(), vec![RegimeType::New]);
    }

    #[test]
    fn dispatchers_do_not_share_engines() {
        let first = RegimeDispatcher::new();
        let second = RegimeDispatcher::new();
        let a = first.engine_for_type(RegimeType::Current);
        let b = second.engine_for_type(RegimeType::Current);
        assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn out_of_range_dates_rejected() {
        let dispatcher = RegimeDispatcher::new();
        assert!(matches!(
            dispatcher.engine_for(date(2019, 12, 31)),
            Err(UnsupportedDateError::BeforeSupportedRange { .. })
        ));
        assert!(matches!(
            dispatcher.engine_for(date(2051, 1, 1)),
            Err(UnsupportedDateError::AfterSupportedRange { .. })
        ));
        assert!(dispatcher.cached_regimes().is_empty());
    }

    #[test]
    fn concurrent_lookups_share_one_instance() {
        let dispatcher = RegimeDispatcher::new();
        let engines: Vec<Arc<dyn TaxEngine>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..16)
                .map(|i| {
                    let dispatcher = &dispatcher;
                    s.spawn(move || dispatcher.engine_for(date(2026 + i % 7, 6, 1)).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(engines.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));
        assert_eq!(dispatcher.cached_regimes(), vec![RegimeType::Transition]);
    }

    #[test]
    fn compute_dispatches_by_date() {
        let dispatcher = RegimeDispatcher::new();
        let breakdown = dispatcher.compute(&goods(dec!(100)), date(2033, 2, 1)).unwrap();
        assert_eq!(breakdown.regime, RegimeType::New);
        assert_eq!(breakdown.total(), dec!(26.50));
    }
}
