use std::borrow::Cow;

use anyhow::Result;

use crate::cli::company::Command;
use crate::config::Config;
use crate::utils;

use reckon::company::NewCompany;
use reckon::prelude::*;

use tabled::{Table, Tabled};

#[derive(derive_more::From)]
struct CompanyToDisplay(Company);

impl Tabled for CompanyToDisplay {
    const LENGTH: usize = 4;

    fn fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            self.0.id.to_string().into(),
            self.0.name.clone().into(),
            self.0.currency.code().into(),
            self.0.plan.clone().into(),
        ]
    }

    fn headers() -> Vec<Cow<'static, str>> {
        vec!["id".into(), "name".into(), "currency".into(), "plan".into()]
    }
}

pub fn run(config: &Config, command: &Command) -> Result<()> {
    let conn = &mut config.database()?;

    match command {
        Command::Create {
            name,
            currency,
            plan,
        } => {
            NewCompany {
                currency: utils::parse_currency(currency)?,
                plan: plan.as_str(),
                ..NewCompany::new(name)
            }
            .save(conn)?;
            Ok(())
        }
        Command::List {} => {
            let companies = Company::all(conn)?
                .into_iter()
                .map(CompanyToDisplay::from)
                .collect::<Vec<_>>();
            println!("{}", Table::new(companies));
            Ok(())
        }
        Command::Show {} => {
            let company = config.company_or_default(conn)?;

            println!("{} | {}", company.id, company.name);
            println!("Currency: {}", company.currency.code());
            println!("Plan: {}", company.plan);
            Ok(())
        }
        Command::Default { reset } => {
            if let Some(name) = config.company_name() {
                let company = Company::find_by_name(conn, name)?;
                config.set("default_company", &company.name)
            } else if *reset {
                config.reset("default_company")
            } else {
                let company_name = config
                    .default_company(conn)?
                    .map(|c| c.name)
                    .unwrap_or("<not set>".to_string());
                println!("{}", company_name);
                Ok(())
            }
        }
        Command::Delete { confirm } => {
            let mut company = config.company_or_default(conn)?;

            if *confirm && utils::confirm()? {
                company.delete(conn)?;
                Ok(())
            } else {
                anyhow::bail!("operation requires confirmation flag");
            }
        }
    }
}
