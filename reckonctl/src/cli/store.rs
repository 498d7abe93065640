use clap::Subcommand;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Register a store
    Create {
        /// Name of the new store
        name: String,

        /// Currency, defaulting to the company one
        #[arg(long)]
        currency: Option<String>,
    },
    /// List the company stores
    List {},
}
