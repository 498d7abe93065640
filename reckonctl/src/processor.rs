use std::borrow::Cow;

use anyhow::{anyhow, Result};

use crate::cli::processor::Command;
use crate::config::Config;
use crate::utils::{self, format_amount};

use reckon::payment_processor::NewPaymentProcessorAccount;
use reckon::prelude::*;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct ProcessorToDisplay(PaymentProcessorAccount);

impl Tabled for ProcessorToDisplay {
    const LENGTH: usize = 6;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.processor_type.to_string().into(),
            format_amount(self.0.currency, self.0.current_balance).into(),
            format_amount(self.0.currency, self.0.pending_balance).into(),
            format_amount(self.0.currency, self.0.total()).into(),
            if self.0.is_active { "yes" } else { "no" }.into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "type".into(),
            "current".into(),
            "pending".into(),
            "total".into(),
            "active".into(),
        ]
    }
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let company = config.company_or_default(conn)?;

    let find = |conn: &mut Conn, id: i64| -> Result<PaymentProcessorAccount> {
        let account = PaymentProcessorAccount::find(conn, id)?;
        if account.company_id != company.id {
            return Err(anyhow!("Processor account not found: {id}"));
        }
        Ok(account)
    };

    match command {
        Command::Create {
            processor_type,
            currency,
        } => {
            let currency = currency
                .as_deref()
                .map(utils::parse_currency)
                .transpose()?
                .unwrap_or(company.currency);

            let account = NewPaymentProcessorAccount {
                currency,
                ..NewPaymentProcessorAccount::new(&company, *processor_type)
            }
            .save(conn)?;

            println!("{}", account.id);
            Ok(())
        }
        Command::List {} => {
            let accounts = PaymentProcessorAccount::for_company(conn, company.id)?
                .into_iter()
                .map(ProcessorToDisplay::from)
                .collect::<Vec<_>>();
            println!("{}", Table::new(accounts));
            Ok(())
        }
        Command::AddPending { id, amount, reason } => {
            find(conn, *id)?.add_pending(conn, *amount, reason)?;
            Ok(())
        }
        Command::Release { id, amount, reason } => {
            find(conn, *id)?.release_pending(conn, *amount, reason)?;
            Ok(())
        }
        Command::Add { id, amount, reason } => {
            find(conn, *id)?.add_current(conn, *amount, reason)?;
            Ok(())
        }
        Command::Withdraw { id, amount, reason } => {
            find(conn, *id)?.withdraw_current(conn, *amount, reason)?;
            Ok(())
        }
    }
}
