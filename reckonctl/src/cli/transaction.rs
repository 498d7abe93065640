use clap::Subcommand;

use reckon::{
    transaction::{Kind, Status},
    Decimal,
};

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Record a transaction on a store
    Add {
        /// Name of the store
        store: String,

        /// Amount of the transaction, always positive
        ///
        /// The kind decides whether it adds to or subtracts from the
        /// store balance
        amount: Decimal,

        /// Describe the transaction
        #[arg(required = true)]
        details: Vec<String>,

        /// Transaction kind
        #[arg(short, long, default_value = "expense")]
        kind: Kind,

        /// Transaction status
        #[arg(short, long, default_value = "approved")]
        status: Status,
    },
    /// List transactions of a store
    List {
        /// Name of the store
        store: String,

        /// Only transactions of this kind
        #[arg(long)]
        kind: Option<Kind>,

        /// Only transactions with this status
        #[arg(long)]
        status: Option<Status>,

        /// Only manual adjustments
        #[arg(long)]
        adjustments: bool,

        /// Limit the number of rows
        #[arg(short, long)]
        count: Option<i64>,
    },
}
