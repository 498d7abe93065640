use clap::Subcommand;

use reckon::{payment_processor::ProcessorType, Decimal};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a payment processor account
    Create {
        /// Stripe, PayPal, Shopify or Manual
        processor_type: ProcessorType,

        /// Currency, defaulting to the company one
        #[arg(long)]
        currency: Option<String>,
    },
    /// List the company processor accounts
    List {},
    /// Record captured funds not yet made available
    AddPending {
        /// Id of the processor account
        id: i64,

        /// Amount captured
        amount: Decimal,

        /// Audit trail entry
        #[arg(long, default_value = "processor capture")]
        reason: String,
    },
    /// Move settled funds from pending to available
    Release {
        /// Id of the processor account
        id: i64,

        /// Amount settled
        amount: Decimal,

        /// Audit trail entry
        #[arg(long, default_value = "funds settled")]
        reason: String,
    },
    /// Credit available funds directly
    Add {
        /// Id of the processor account
        id: i64,

        /// Amount to credit
        amount: Decimal,

        /// Audit trail entry
        #[arg(long, default_value = "processor credit")]
        reason: String,
    },
    /// Pay out available funds
    Withdraw {
        /// Id of the processor account
        id: i64,

        /// Amount to pay out
        amount: Decimal,

        /// Audit trail entry
        #[arg(long, default_value = "payout")]
        reason: String,
    },
}
