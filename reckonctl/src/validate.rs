use std::borrow::Cow;

use anyhow::Result;

use crate::cli::validate::{Adjust, Validate};
use crate::config::Config;
use crate::utils::format_amount;

use reckon::prelude::*;
use reckon::reconcile::{
    BankAccountSummary, Notifier, ProcessorSummary, StoreSummary, ValidationResult,
};

use tabled::{Table, Tabled};

pub fn validate(config: &Config, args: &Validate) -> Result<()> {
    let conn = &mut config.database()?;
    let company = config.company_or_default(conn)?;

    let mut reconciler = Reconciler::new();
    let result = if args.force {
        reconciler.force_recalculate(conn, company.id)?
    } else {
        reconciler.cached(conn, company.id)?
    };

    print_result(&result);
    Ok(())
}

pub fn check(config: &Config) -> Result<()> {
    let conn = &mut config.database()?;
    let companies = Company::all(conn)?;

    let mut reconciler = Reconciler::new();
    let mut notifier = PrintNotifier::default();
    reconciler.scheduled_check(conn, companies.iter().map(|c| c.id), &mut notifier);

    println!(
        "{} companies checked, {} discrepancies",
        companies.len(),
        notifier.count
    );
    Ok(())
}

pub fn adjust(config: &Config, args: &Adjust) -> Result<()> {
    let conn = &mut config.database()?;
    let company = config.company_or_default(conn)?;

    let reconciler = Reconciler::new();
    let transaction = reconciler.create_adjustment(
        conn,
        company.id,
        args.amount,
        &args.reason.join(" "),
        Some(args.adjustment_type.as_str()),
    )?;

    println!(
        "Adjustment {} recorded: {}",
        transaction.id,
        format_amount(transaction.currency, transaction.signed_amount())
    );
    Ok(())
}

#[derive(Default)]
struct PrintNotifier {
    count: usize,
}

impl Notifier for PrintNotifier {
    fn discrepancy(&mut self, result: &ValidationResult) {
        self.count += 1;
        println!(
            "DISCREPANCY {}: off by {}",
            result.company_name,
            format_amount(result.currency, result.difference)
        );
    }
}

fn print_result(result: &ValidationResult) {
    println!(
        "Company: {} ({})",
        result.company_name,
        result.currency.code()
    );
    println!(
        "Real money total:    {}",
        format_amount(result.currency, result.real_money_total)
    );
    println!(
        "Calculated balance:  {}",
        format_amount(result.currency, result.calculated_balance)
    );
    println!(
        "Difference:          {} (tolerance {})",
        format_amount(result.currency, result.difference),
        format_amount(result.currency, result.tolerance)
    );
    println!(
        "Status: {}",
        if result.is_valid { "valid" } else { "DISCREPANCY" }
    );

    if !result.breakdown.bank_accounts.is_empty() {
        println!();
        println!(
            "{}",
            Table::new(result.breakdown.bank_accounts.iter().map(BankRow))
        );
    }
    if !result.breakdown.payment_processors.is_empty() {
        println!();
        println!(
            "{}",
            Table::new(result.breakdown.payment_processors.iter().map(ProcessorRow))
        );
    }
    if !result.breakdown.stores.is_empty() {
        println!();
        println!("{}", Table::new(result.breakdown.stores.iter().map(StoreRow)));
    }
}

struct BankRow<'a>(&'a BankAccountSummary);

impl Tabled for BankRow<'_> {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.name.clone().into(),
            self.0.bank_type.clone().into(),
            format_amount(self.0.currency, self.0.balance).into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "bank account".into(),
            "name".into(),
            "type".into(),
            "balance".into(),
        ]
    }
}

struct ProcessorRow<'a>(&'a ProcessorSummary);

impl Tabled for ProcessorRow<'_> {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.processor_type.to_string().into(),
            format_amount(self.0.currency, self.0.current).into(),
            format_amount(self.0.currency, self.0.pending).into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "processor".into(),
            "type".into(),
            "current".into(),
            "pending".into(),
        ]
    }
}

struct StoreRow<'a>(&'a StoreSummary);

impl Tabled for StoreRow<'_> {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.name.clone().into(),
            format_amount(self.0.currency, self.0.balance).into(),
            format!("{} / {}", self.0.income_count, self.0.expense_count).into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "store".into(),
            "name".into(),
            "balance".into(),
            "income / expense rows".into(),
        ]
    }
}
