use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::reconcile::ValidationResult;

pub const BALANCE_TTL: Duration = Duration::from_secs(5 * 60);
pub const DISCREPANCY_TTL: Duration = Duration::from_secs(24 * 60 * 60);

pub fn balance_key(company_id: i64) -> String {
    format!("company_balance_{company_id}")
}

pub fn discrepancy_key(company_id: i64) -> String {
    format!("balance_error_company_{company_id}")
}

/// Key/value store with per-entry expiry, injected into the reconciler
///
/// Expired entries read as misses. Two callers racing to repopulate the
/// same key merely duplicate a read, so no locking is required of
/// implementations.
pub trait Cache {
    fn get(&self, key: &str) -> Option<ValidationResult>;
    fn put(&mut self, key: &str, value: ValidationResult, ttl: Duration);
    fn forget(&mut self, key: &str);
}

#[derive(Default)]
pub struct MemoryCache {
    entries: HashMap<String, (ValidationResult, Instant)>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Cache for MemoryCache {
    fn get(&self, key: &str) -> Option<ValidationResult> {
        self.entries
            .get(key)
            .filter(|(_, deadline)| Instant::now() < *deadline)
            .map(|(value, _)| value.clone())
    }

    fn put(&mut self, key: &str, value: ValidationResult, ttl: Duration) {
        self.entries.insert(key.to_owned(), (value, Instant::now() + ttl));
    }

    fn forget(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reconcile::Breakdown;
    use crate::{Currency, Decimal};
    use chrono::offset::Utc;
    use pretty_assertions::assert_eq;

    fn result(company_id: i64) -> ValidationResult {
        ValidationResult {
            company_id,
            company_name: "Acme".to_owned(),
            currency: Currency::USD,
            is_valid: true,
            real_money_total: Decimal::ZERO,
            calculated_balance: Decimal::ZERO,
            difference: Decimal::ZERO,
            tolerance: Decimal::new(1, 2),
            breakdown: Breakdown::default(),
            checked_at: Utc::now(),
        }
    }

    #[test]
    fn put_get_forget() {
        let mut cache = MemoryCache::new();
        let key = balance_key(1);

        assert!(cache.get(&key).is_none());

        cache.put(&key, result(1), Duration::from_secs(60));
        assert_eq!(Some(1), cache.get(&key).map(|r| r.company_id));

        cache.forget(&key);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn expired_entries_are_misses() {
        let mut cache = MemoryCache::new();
        let key = balance_key(1);

        cache.put(&key, result(1), Duration::ZERO);
        assert!(cache.get(&key).is_none());
    }

    #[test]
    fn keys_are_company_scoped() {
        assert_eq!("company_balance_42", balance_key(42));
        assert_eq!("balance_error_company_42", discrepancy_key(42));
    }
}
