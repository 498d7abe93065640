use clap::Args;

use reckon::{reconcile, Decimal};

#[derive(Default, Debug, Clone, Args)]
pub struct Validate {
    /// Drop the cached result and recompute
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Debug, Clone, Args)]
pub struct Adjust {
    /// Signed amount of the correction
    #[arg(allow_negative_numbers = true)]
    pub amount: Decimal,

    /// Reason recorded on the adjustment transaction
    #[arg(required = true)]
    pub reason: Vec<String>,

    /// Tag recorded on the adjustment transaction
    #[arg(long, default_value = reconcile::MANUAL_CORRECTION)]
    pub adjustment_type: String,
}
