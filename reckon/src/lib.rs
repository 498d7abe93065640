pub mod db;
pub mod schema;

mod database;
mod result;

pub mod bank_account;
pub mod cache;
pub mod company;
pub mod payment_processor;
pub mod reconcile;
pub mod store;
pub mod transaction;

#[cfg(test)]
pub mod test;

pub use oxydized_money::{Amount, Currency, Decimal};

pub use bank_account::BankAccount;
pub use company::Company;
pub use database::{Conn, Database};
pub use payment_processor::PaymentProcessorAccount;
pub use reconcile::Reconciler;
pub use result::{Error, Result};
pub use store::Store;
pub use transaction::Transaction;

pub mod essentials {
    pub use crate::database::{Conn, Database};
    pub use crate::db;
    pub use crate::result::{Error, OptionalExtension, Result};
}

pub mod prelude {
    pub use crate::essentials::*;
    pub use crate::{
        bank_account::BankAccount, company::Company,
        payment_processor::PaymentProcessorAccount, reconcile::Reconciler, store::Store,
        transaction::Transaction, Amount, Currency, Decimal,
    };
}
