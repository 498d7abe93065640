use std::borrow::Cow;

use anyhow::Result;

use crate::cli::store::Command;
use crate::config::Config;
use crate::utils;

use reckon::prelude::*;
use reckon::store::NewStore;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct StoreToDisplay(Store);

impl Tabled for StoreToDisplay {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.name.clone().into(),
            self.0.currency.code().into(),
            self.0.status.to_string().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec![
            "id".into(),
            "name".into(),
            "currency".into(),
            "status".into(),
        ]
    }
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;
    let company = config.company_or_default(conn)?;

    match command {
        Command::Create { name, currency } => {
            let currency = currency
                .as_deref()
                .map(utils::parse_currency)
                .transpose()?
                .unwrap_or(company.currency);

            NewStore {
                currency,
                ..NewStore::new(&company, name)
            }
            .save(conn)?;
            Ok(())
        }
        Command::List {} => {
            let stores = Store::for_company(conn, company.id)?
                .into_iter()
                .map(StoreToDisplay::from)
                .collect::<Vec<_>>();
            println!("{}", Table::new(stores));
            Ok(())
        }
    }
}
