use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a new company
    Create {
        /// Name of the new company
        name: String,

        /// Currency shared by the company accounts and ledgers
        #[arg(long, default_value = "USD")]
        currency: String,

        /// Billing plan label
        #[arg(long, default_value = "standard")]
        plan: String,
    },
    /// List registered companies
    List {},
    /// Show details about a company
    Show {},
    /// Check or set the default company
    Default {
        /// Reset the default company
        #[arg(short, long)]
        reset: bool,
    },
    /// Soft-delete a company
    Delete {
        /// Confirm deletion
        #[arg(long)]
        confirm: bool,
    },
}
