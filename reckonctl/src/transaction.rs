use std::borrow::Cow;

use anyhow::Result;

use crate::cli::transaction::Command;
use crate::config::Config;
use crate::utils::format_amount;

use reckon::prelude::*;
use reckon::transaction::{NewTransaction, QueryTransaction};

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct TransactionToDisplay(Transaction);

impl Tabled for TransactionToDisplay {
    const LENGTH: usize = 6;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.created_at.date_naive().to_string().into(),
            self.0.kind.to_string().into(),
            self.0.status.to_string().into(),
            format_amount(self.0.currency, self.0.signed_amount()).into(),
            self.details(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "date".into(),
            "kind".into(),
            "status".into(),
            "amount".into(),
            "details".into(),
        ]
    }
}

impl TransactionToDisplay {
    fn details(&self) -> Cow<'_, str> {
        match &self.0.adjustment_type {
            Some(tag) => format!("{} [{}]", self.0.details, tag).into(),
            None => self.0.details.as_str().into(),
        }
    }
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let company = config.company_or_default(conn)?;

    match command {
        Command::Add {
            store,
            amount,
            details,
            kind,
            status,
        } => {
            if *amount <= Decimal::ZERO {
                anyhow::bail!("amount must be positive, use the kind to set the sign");
            }
            let store = Store::find_by_name(conn, &company, store)?;
            let details = details.join(" ");

            let transaction = NewTransaction {
                amount: *amount,
                kind: *kind,
                status: *status,
                details: &details,
                ..NewTransaction::new(&store)
            }
            .save(conn)?;

            println!("{}", transaction.id);
            Ok(())
        }
        Command::List {
            store,
            kind,
            status,
            adjustments,
            count,
        } => {
            let store = Store::find_by_name(conn, &company, store)?;

            let transactions = QueryTransaction {
                store_id: Some(store.id),
                kind: *kind,
                status: *status,
                is_adjustment: adjustments.then_some(true),
                count: *count,
            }
            .run(conn)?
            .into_iter()
            .map(TransactionToDisplay::from)
            .collect::<Vec<_>>();

            println!("{}", Table::new(transactions));
            Ok(())
        }
    }
}
