use std::borrow::Cow;

use anyhow::Result;

use crate::cli::account::Command;
use crate::config::Config;
use crate::utils::{self, format_amount};

use reckon::bank_account::NewBankAccount;
use reckon::prelude::*;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct AccountToDisplay(BankAccount);

impl Tabled for AccountToDisplay {
    const LENGTH: usize = 6;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.name.clone().into(),
            self.0.bank_type.clone().into(),
            format_amount(self.0.currency, self.0.current_balance).into(),
            if self.0.is_primary { "yes" } else { "" }.into(),
            if self.0.is_active { "yes" } else { "no" }.into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "name".into(),
            "type".into(),
            "balance".into(),
            "primary".into(),
            "active".into(),
        ]
    }
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let company = config.company_or_default(conn)?;

    match command {
        Command::Create {
            name,
            bank_type,
            currency,
            primary,
        } => {
            let currency = currency
                .as_deref()
                .map(utils::parse_currency)
                .transpose()?
                .unwrap_or(company.currency);

            let mut account = NewBankAccount {
                bank_type: bank_type.as_str(),
                currency,
                ..NewBankAccount::new(&company, name)
            }
            .save(conn)?;

            if *primary {
                account.set_primary(conn)?;
            }
            Ok(())
        }
        Command::List {} => {
            let accounts = BankAccount::for_company(conn, company.id)?
                .into_iter()
                .map(AccountToDisplay::from)
                .collect::<Vec<_>>();
            println!("{}", Table::new(accounts));
            Ok(())
        }
        Command::Deposit {
            name,
            amount,
            reason,
        } => {
            let mut account = BankAccount::find_by_name(conn, &company, name)?;
            account.deposit(conn, *amount, reason)?;

            println!(
                "Balance: {}",
                format_amount(account.currency, account.current_balance)
            );
            Ok(())
        }
        Command::Withdraw {
            name,
            amount,
            reason,
        } => {
            let mut account = BankAccount::find_by_name(conn, &company, name)?;
            account.withdraw(conn, *amount, reason)?;

            println!(
                "Balance: {}",
                format_amount(account.currency, account.current_balance)
            );
            Ok(())
        }
        Command::Primary { name } => {
            let mut account = BankAccount::find_by_name(conn, &company, name)?;
            account.set_primary(conn)?;
            Ok(())
        }
    }
}
