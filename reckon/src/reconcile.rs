//! Reconciles a company's externally verifiable balances against the
//! balance derived from its transaction ledger.
//!
//! "Real money" is what the bank and payment processor accounts report;
//! the calculated balance is the signed sum of approved transactions
//! across the company's stores. The two are derived independently, so
//! they must agree to within the tolerance; anything past it is a
//! discrepancy worth a human look, not an error.
//!
//! All balances are summed as raw amounts: a company is expected to keep
//! its reconciled accounts and ledgers in a single currency.

use crate::{
    bank_account::BankAccount,
    cache::{self, Cache, MemoryCache},
    company::Company,
    essentials::*,
    payment_processor::{PaymentProcessorAccount, ProcessorType},
    store::Store,
    transaction::{self, Kind, NewTransaction, Status, Transaction},
    Currency, Decimal,
};

use chrono::{offset::Utc, DateTime};

pub const MANUAL_CORRECTION: &str = "MANUAL_CORRECTION";

/// Outcome of one reconciliation pass over a company
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub company_id: i64,
    pub company_name: String,
    pub currency: Currency,
    pub is_valid: bool,
    pub real_money_total: Decimal,
    pub calculated_balance: Decimal,
    pub difference: Decimal,
    pub tolerance: Decimal,
    pub breakdown: Breakdown,
    pub checked_at: DateTime<Utc>,
}

impl ValidationResult {
    fn new(company: &Company, tolerance: Decimal, breakdown: Breakdown) -> Self {
        let real_money_total = breakdown
            .bank_accounts
            .iter()
            .map(|a| a.balance)
            .sum::<Decimal>()
            + breakdown
                .payment_processors
                .iter()
                .map(|p| p.total)
                .sum::<Decimal>();
        let calculated_balance = breakdown.stores.iter().map(|s| s.balance).sum::<Decimal>();
        let difference = (real_money_total - calculated_balance).abs();

        ValidationResult {
            company_id: company.id,
            company_name: company.name.clone(),
            currency: company.currency,
            is_valid: difference <= tolerance,
            real_money_total,
            calculated_balance,
            difference,
            tolerance,
            breakdown,
            checked_at: Utc::now(),
        }
    }
}

/// Per-source detail behind a validation result, for audit display
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Breakdown {
    pub bank_accounts: Vec<BankAccountSummary>,
    pub payment_processors: Vec<ProcessorSummary>,
    pub stores: Vec<StoreSummary>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BankAccountSummary {
    pub id: i64,
    pub name: String,
    pub bank_type: String,
    pub currency: Currency,
    pub balance: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessorSummary {
    pub id: i64,
    pub processor_type: ProcessorType,
    pub currency: Currency,
    pub current: Decimal,
    pub pending: Decimal,
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StoreSummary {
    pub id: i64,
    pub name: String,
    pub currency: Currency,
    pub balance: Decimal,
    pub income_count: i64,
    pub expense_count: i64,
}

/// Receives discrepancy alerts from [`Reconciler::scheduled_check`]
pub trait Notifier {
    fn discrepancy(&mut self, result: &ValidationResult);
}

/// Forwards discrepancies to the log sink
#[derive(Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn discrepancy(&mut self, result: &ValidationResult) {
        log::warn!(
            "discrepancy notification for company {} ({}): off by {} {}",
            result.company_id,
            result.company_name,
            result.currency.code(),
            result.difference,
        );
    }
}

pub struct Reconciler<C: Cache = MemoryCache> {
    cache: C,
    tolerance: Decimal,
}

impl Reconciler {
    pub fn new() -> Self {
        Self::with_cache(MemoryCache::new())
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cache> Reconciler<C> {
    pub fn with_cache(cache: C) -> Self {
        Reconciler {
            cache,
            // one cent, regardless of currency
            tolerance: Decimal::new(1, 2),
        }
    }

    /// Recomputes both totals and compares them
    ///
    /// An invalid outcome is logged and kept under the company's
    /// discrepancy key for a day; it is not an error. The only failure
    /// is a missing company.
    pub fn validate(&mut self, conn: &mut Conn, company_id: i64) -> Result<ValidationResult> {
        let company = Company::find(conn, company_id)?;

        let bank_accounts = BankAccount::for_company(conn, company.id)?
            .into_iter()
            .map(|account| BankAccountSummary {
                id: account.id,
                name: account.name,
                bank_type: account.bank_type,
                currency: account.currency,
                balance: account.current_balance,
            })
            .collect();

        let payment_processors = PaymentProcessorAccount::active_for_company(conn, company.id)?
            .into_iter()
            .map(|account| ProcessorSummary {
                id: account.id,
                processor_type: account.processor_type,
                currency: account.currency,
                current: account.current_balance,
                pending: account.pending_balance,
                total: account.total(),
            })
            .collect();

        let mut stores = Vec::new();
        for store in Store::for_company(conn, company.id)? {
            let totals = transaction::approved_store_totals(conn, store.id)?;
            stores.push(StoreSummary {
                id: store.id,
                name: store.name,
                currency: store.currency,
                balance: totals.balance(),
                income_count: totals.credit_count,
                expense_count: totals.debit_count,
            });
        }

        let result = ValidationResult::new(
            &company,
            self.tolerance,
            Breakdown {
                bank_accounts,
                payment_processors,
                stores,
            },
        );

        if !result.is_valid {
            log::warn!(
                "balance discrepancy for company {} ({}): real money {} {}, \
                 calculated {} {}, difference {} {} exceeds tolerance {} {}",
                company.id,
                company.name,
                company.currency.code(),
                result.real_money_total,
                company.currency.code(),
                result.calculated_balance,
                company.currency.code(),
                result.difference,
                company.currency.code(),
                result.tolerance,
            );
            self.cache.put(
                &cache::discrepancy_key(company.id),
                result.clone(),
                cache::DISCREPANCY_TTL,
            );
        }

        Ok(result)
    }

    /// Read-through cache over [`validate`](Self::validate)
    ///
    /// Within the TTL window the stored result is returned as-is, so it
    /// can lag ledger mutations by up to five minutes.
    pub fn cached(&mut self, conn: &mut Conn, company_id: i64) -> Result<ValidationResult> {
        let key = cache::balance_key(company_id);
        if let Some(result) = self.cache.get(&key) {
            return Ok(result);
        }

        let result = self.validate(conn, company_id)?;
        self.cache.put(&key, result.clone(), cache::BALANCE_TTL);

        Ok(result)
    }

    /// Drops the cached entry and validates fresh
    pub fn force_recalculate(
        &mut self,
        conn: &mut Conn,
        company_id: i64,
    ) -> Result<ValidationResult> {
        self.cache.forget(&cache::balance_key(company_id));
        self.cached(conn, company_id)
    }

    /// Validates every company in the batch, notifying on discrepancies
    ///
    /// Companies are independent: one failing is logged and skipped, the
    /// rest are still checked.
    pub fn scheduled_check<I>(&mut self, conn: &mut Conn, companies: I, notifier: &mut dyn Notifier)
    where
        I: IntoIterator<Item = i64>,
    {
        for company_id in companies {
            match self.validate(conn, company_id) {
                Ok(result) if !result.is_valid => notifier.discrepancy(&result),
                Ok(_) => {}
                Err(e) => {
                    log::error!("balance check failed for company {company_id}: {e}");
                }
            }
        }
    }

    /// Records a manual correction on the company's first store
    ///
    /// Positive amounts become Income rows, negative ones Expense rows;
    /// the magnitude is stored and the row is approved immediately so
    /// the next validation reflects it.
    pub fn create_adjustment(
        &self,
        conn: &mut Conn,
        company_id: i64,
        amount: Decimal,
        reason: &str,
        adjustment_type: Option<&str>,
    ) -> Result<Transaction> {
        let company = Company::find(conn, company_id)?;

        if amount == Decimal::ZERO {
            return Err(Error::Invalid("adjustment amount must be non-zero".to_owned()));
        }
        let Some(store) = Store::first_for_company(conn, company.id)? else {
            return Err(Error::Invalid(format!(
                "company {} has no stores to adjust",
                company.name
            )));
        };

        let kind = if amount > Decimal::ZERO {
            Kind::Income
        } else {
            Kind::Expense
        };
        let adjustment_type = adjustment_type.unwrap_or(MANUAL_CORRECTION);

        let transaction = NewTransaction {
            amount: amount.abs(),
            kind,
            status: Status::Approved,
            details: reason,
            is_adjustment: true,
            adjustment_type: Some(adjustment_type),
            ..NewTransaction::new(&store)
        }
        .save(conn)?;

        log::info!(
            "adjustment {} on company {} ({}), store {}: {} {} [{}]: {}",
            transaction.id,
            company.id,
            company.name,
            store.name,
            company.currency.code(),
            amount,
            adjustment_type,
            reason,
        );

        Ok(transaction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::{assert_eq, Result, *};

    #[derive(Default)]
    struct RecordingNotifier {
        notified: Vec<i64>,
    }

    impl Notifier for RecordingNotifier {
        fn discrepancy(&mut self, result: &ValidationResult) {
            self.notified.push(result.company_id);
        }
    }

    #[test]
    fn zero_state_is_valid() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;

        let result = Reconciler::new().validate(conn, company.id)?;

        assert_eq!(Decimal::ZERO, result.real_money_total);
        assert_eq!(Decimal::ZERO, result.calculated_balance);
        assert_eq!(Decimal::ZERO, result.difference);
        assert!(result.is_valid);
        assert!(result.breakdown.bank_accounts.is_empty());
        assert!(result.breakdown.payment_processors.is_empty());
        assert!(result.breakdown.stores.is_empty());

        Ok(())
    }

    #[test]
    fn missing_company_is_not_found() -> Result<()> {
        let conn = &mut test::db()?;

        let result = Reconciler::new().validate(conn, 4242);
        assert!(matches!(result, Err(ref e) if e.is_not_found()));

        Ok(())
    }

    #[test]
    fn real_money_adds_banks_and_active_processors() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;

        let mut account = test::bank_account(conn, &company, "Checking")?;
        account.deposit(conn, Decimal::new(100, 0), "seed")?;

        let mut processor = test::processor(conn, &company)?;
        processor.add_current(conn, Decimal::new(50, 0), "seed")?;
        processor.add_pending(conn, Decimal::new(25, 0), "seed")?;

        let mut inactive = crate::payment_processor::NewPaymentProcessorAccount {
            is_active: false,
            ..crate::payment_processor::NewPaymentProcessorAccount::new(
                &company,
                crate::payment_processor::ProcessorType::Manual,
            )
        }
        .save(conn)?;
        inactive.add_current(conn, Decimal::new(1_000, 0), "ignored")?;

        let result = Reconciler::new().validate(conn, company.id)?;

        assert_eq!(Decimal::new(175, 0), result.real_money_total);
        assert_eq!(1, result.breakdown.payment_processors.len());
        assert_eq!(Decimal::new(75, 0), result.breakdown.payment_processors[0].total);

        Ok(())
    }

    #[test]
    fn calculated_balance_signs_by_kind() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;

        test::transaction(conn, &store, Kind::Income, Decimal::new(200, 0))?;
        test::transaction(conn, &store, Kind::Expense, Decimal::new(50, 0))?;

        let result = Reconciler::new().validate(conn, company.id)?;

        assert_eq!(Decimal::new(150, 0), result.calculated_balance);
        let summary = &result.breakdown.stores[0];
        assert_eq!(Decimal::new(150, 0), summary.balance);
        assert_eq!(1, summary.income_count);
        assert_eq!(1, summary.expense_count);

        Ok(())
    }

    #[test]
    fn difference_at_tolerance_is_valid() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;
        let mut account = test::bank_account(conn, &company, "Checking")?;

        test::transaction(conn, &store, Kind::Income, Decimal::new(100, 0))?;
        account.deposit(conn, Decimal::new(100_010, 3), "one cent over")?;

        let result = Reconciler::new().validate(conn, company.id)?;
        assert_eq!(Decimal::new(10, 3), result.difference);
        assert!(result.is_valid);

        Ok(())
    }

    #[test]
    fn difference_past_tolerance_is_a_discrepancy() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;
        let mut account = test::bank_account(conn, &company, "Checking")?;

        test::transaction(conn, &store, Kind::Income, Decimal::new(100, 0))?;
        account.deposit(conn, Decimal::new(100_011, 3), "just past")?;

        let result = Reconciler::new().validate(conn, company.id)?;
        assert_eq!(Decimal::new(11, 3), result.difference);
        assert!(!result.is_valid);

        Ok(())
    }

    #[test]
    fn discrepancy_is_kept_under_the_error_key() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let mut account = test::bank_account(conn, &company, "Checking")?;
        account.deposit(conn, Decimal::new(100, 0), "unexplained")?;

        let mut reconciler = Reconciler::new();
        let result = reconciler.validate(conn, company.id)?;
        assert!(!result.is_valid);

        let kept = reconciler
            .cache
            .get(&cache::discrepancy_key(company.id))
            .unwrap();
        assert_eq!(result, kept);
        assert!(reconciler.cache.get(&cache::balance_key(company.id)).is_none());

        Ok(())
    }

    #[test]
    fn cached_result_survives_ledger_mutation() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let mut account = test::bank_account(conn, &company, "Checking")?;

        let mut reconciler = Reconciler::new();
        let first = reconciler.cached(conn, company.id)?;

        account.deposit(conn, Decimal::new(500, 0), "between checks")?;

        let second = reconciler.cached(conn, company.id)?;
        assert_eq!(first, second);
        assert_eq!(first.checked_at, second.checked_at);

        Ok(())
    }

    #[test]
    fn force_recalculate_reflects_ledger_changes() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let mut account = test::bank_account(conn, &company, "Checking")?;

        let mut reconciler = Reconciler::new();
        let stale = reconciler.cached(conn, company.id)?;

        account.deposit(conn, Decimal::new(500, 0), "between checks")?;

        let fresh = reconciler.force_recalculate(conn, company.id)?;
        assert_eq!(Decimal::new(500, 0), fresh.real_money_total);
        assert!(fresh.checked_at >= stale.checked_at);

        // and the fresh result replaced the cached one
        assert_eq!(fresh, reconciler.cached(conn, company.id)?);

        Ok(())
    }

    #[test]
    fn adjustment_moves_the_calculated_balance_once() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        test::store(conn, &company, "Main Street")?;

        let mut reconciler = Reconciler::new();
        let before = reconciler.validate(conn, company.id)?;

        let transaction = reconciler.create_adjustment(
            conn,
            company.id,
            Decimal::new(100, 0),
            "stocktake correction",
            None,
        )?;
        assert!(transaction.is_adjustment);
        assert_eq!(Kind::Income, transaction.kind);
        assert_eq!(Some(MANUAL_CORRECTION.to_owned()), transaction.adjustment_type);

        let after = reconciler.validate(conn, company.id)?;
        assert_eq!(
            before.calculated_balance + Decimal::new(100, 0),
            after.calculated_balance
        );

        Ok(())
    }

    #[test]
    fn negative_adjustment_is_an_expense() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let store = test::store(conn, &company, "Main Street")?;
        test::transaction(conn, &store, Kind::Income, Decimal::new(100, 0))?;

        let mut reconciler = Reconciler::new();
        let transaction = reconciler.create_adjustment(
            conn,
            company.id,
            Decimal::new(-40, 0),
            "written-off stock",
            Some("WRITE_OFF"),
        )?;
        assert_eq!(Kind::Expense, transaction.kind);
        assert_eq!(Decimal::new(40, 0), transaction.amount);

        let result = reconciler.validate(conn, company.id)?;
        assert_eq!(Decimal::new(60, 0), result.calculated_balance);

        Ok(())
    }

    #[test]
    fn adjustment_requires_a_store() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;

        let reconciler = Reconciler::new();
        assert!(matches!(
            reconciler.create_adjustment(conn, company.id, Decimal::new(10, 0), "noop", None),
            Err(Error::Invalid(_))
        ));
        assert!(matches!(
            reconciler.create_adjustment(conn, 4242, Decimal::new(10, 0), "noop", None),
            Err(ref e) if e.is_not_found()
        ));

        Ok(())
    }

    #[test]
    fn scheduled_check_isolates_failures() -> Result<()> {
        let conn = &mut test::db()?;
        let company = test::company(conn, "Acme")?;
        let mut account = test::bank_account(conn, &company, "Checking")?;
        account.deposit(conn, Decimal::new(100, 0), "unexplained")?;

        let balanced = test::company(conn, "Globex")?;

        let mut reconciler = Reconciler::new();
        let mut notifier = RecordingNotifier::default();
        reconciler.scheduled_check(
            conn,
            [4242, company.id, balanced.id],
            &mut notifier,
        );

        assert_eq!(vec![company.id], notifier.notified);

        Ok(())
    }
}
