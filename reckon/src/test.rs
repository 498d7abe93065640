#![cfg(test)]

use crate::{
    bank_account::{BankAccount, NewBankAccount},
    company::{Company, NewCompany},
    database::{Conn, Database},
    payment_processor::{NewPaymentProcessorAccount, PaymentProcessorAccount, ProcessorType},
    store::{NewStore, Store},
    transaction::{Kind, NewTransaction, Transaction},
    Decimal,
};
use anyhow::Result;

pub mod prelude {
    pub use crate::test;
    pub use anyhow::Result;
    pub use pretty_assertions::{assert_eq, assert_ne};
}

pub fn db() -> Result<Conn> {
    let mut db = Database::memory()?;
    db.setup()?;
    Ok(db.connection)
}

pub fn company(conn: &mut Conn, name: &str) -> Result<Company> {
    Ok(NewCompany::new(name).save(conn)?)
}

pub fn bank_account(conn: &mut Conn, company: &Company, name: &str) -> Result<BankAccount> {
    Ok(NewBankAccount::new(company, name).save(conn)?)
}

pub fn processor(conn: &mut Conn, company: &Company) -> Result<PaymentProcessorAccount> {
    Ok(NewPaymentProcessorAccount::new(company, ProcessorType::Stripe).save(conn)?)
}

pub fn store(conn: &mut Conn, company: &Company, name: &str) -> Result<Store> {
    Ok(NewStore::new(company, name).save(conn)?)
}

pub fn transaction(
    conn: &mut Conn,
    store: &Store,
    kind: Kind,
    amount: Decimal,
) -> Result<Transaction> {
    Ok(NewTransaction {
        amount,
        kind,
        ..NewTransaction::new(store)
    }
    .save(conn)?)
}
