use clap::Subcommand;

use reckon::Decimal;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a bank account
    Create {
        /// Name of the new account
        name: String,

        /// Kind of bank account, free form
        #[arg(long, default_value = "checking")]
        bank_type: String,

        /// Currency, defaulting to the company one
        #[arg(long)]
        currency: Option<String>,

        /// Mark the account as the company primary account
        #[arg(long)]
        primary: bool,
    },
    /// List the company bank accounts
    List {},
    /// Credit money to a bank account
    Deposit {
        /// Name of the account
        name: String,

        /// Amount to credit
        amount: Decimal,

        /// Audit trail entry
        #[arg(long, default_value = "manual deposit")]
        reason: String,
    },
    /// Debit money from a bank account
    Withdraw {
        /// Name of the account
        name: String,

        /// Amount to debit
        amount: Decimal,

        /// Audit trail entry
        #[arg(long, default_value = "manual withdrawal")]
        reason: String,
    },
    /// Make a bank account the company primary one
    Primary {
        /// Name of the account
        name: String,
    },
}
