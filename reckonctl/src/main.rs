use anyhow::Result;

mod utils;

mod account;
mod cli;
mod company;
mod config;
mod processor;
mod store;
mod transaction;
mod validate;

use cli::Commands;
use config::Config;

fn main() -> Result<()> {
    let config = Config::try_parse()?;

    env_logger::Builder::new()
        .filter_level(config.log_level_filter())
        .init();

    if let Some(command) = config.command() {
        match command {
            Commands::Company { command } => company::run(&config, command)?,
            Commands::Account { command } => account::run(&config, command)?,
            Commands::Processor { command } => processor::run(&config, command)?,
            Commands::Store { command } => store::run(&config, command)?,
            Commands::Transaction { command } => transaction::run(&config, command)?,
            Commands::Validate(args) => validate::validate(&config, args)?,
            Commands::Check {} => validate::check(&config)?,
            Commands::Adjust(args) => validate::adjust(&config, args)?,
        }
    }

    Ok(())
}
