use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod account;
pub mod company;
pub mod processor;
pub mod store;
pub mod transaction;
pub mod validate;

/// Reckon control
#[derive(Default, Clone, Debug, Parser)]
#[command(version, infer_subcommands = true)]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    /// Sets a custom config directory
    ///
    /// The default value is $RECKON_CONFIG if it is set, or
    /// $XDG_CONFIG_HOME/reckon otherwise
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub config: Option<PathBuf>,

    /// Sets a custom data directory
    ///
    /// The default value is $RECKON_DATA if it is set, or
    /// $XDG_DATA_HOME/reckon otherwise
    #[arg(
        short = 'D',
        long,
        value_name = "DIR",
        global = true,
        help_heading = "Global options"
    )]
    pub data: Option<PathBuf>,

    /// Sets the company to consider for the following command
    ///
    /// A default value can be configured
    #[arg(
        long,
        value_name = "NAME",
        global = true,
        help_heading = "Global options"
    )]
    pub company: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Company related commands
    Company {
        #[command(subcommand)]
        command: company::Command,
    },
    /// Bank account related commands
    Account {
        #[command(subcommand)]
        command: account::Command,
    },
    /// Payment processor account related commands
    Processor {
        #[command(subcommand)]
        command: processor::Command,
    },
    /// Store related commands
    Store {
        #[command(subcommand)]
        command: store::Command,
    },
    /// Transaction related commands
    Transaction {
        #[command(subcommand)]
        command: transaction::Command,
    },
    /// Reconcile the company balance against its ledger
    Validate(validate::Validate),
    /// Reconcile every company and report discrepancies
    Check {},
    /// Record a manual correction transaction
    Adjust(validate::Adjust),
}
