use std::path::PathBuf;

use anyhow::{anyhow, Result};
use toml::{Table, Value};

use reckon::prelude::*;

use crate::cli::{Cli, Commands};

#[derive(Debug)]
pub struct Config {
    pub dir: PathBuf,
    pub data_dir: PathBuf,
    cli: Cli,
    table: Table,
}

impl Config {
    pub fn try_parse() -> Result<Self> {
        Self::try_parse_from(std::env::args_os())
    }

    pub fn try_parse_from<I, T>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        use clap::Parser;

        let cli = Cli::try_parse_from(iter)?;

        let dir = match cli.config.clone() {
            Some(dir) => dir,
            None => config_home()?,
        };
        let table = match std::fs::read_to_string(dir.join("config.toml")) {
            Ok(content) => content.parse::<Table>()?,
            Err(_) => Table::new(),
        };

        let data_dir = match cli.data.clone() {
            Some(dir) => dir,
            None => match table.get("data_dir").and_then(Value::as_str) {
                Some(dir) => PathBuf::from(dir),
                None => data_home()?,
            },
        };

        if !data_dir.is_dir() {
            return Err(anyhow!(
                "Data directory is not a dir: {}",
                data_dir.display()
            ));
        }

        Ok(Config {
            dir,
            data_dir,
            cli,
            table,
        })
    }

    pub fn log_level_filter(&self) -> log::LevelFilter {
        self.cli.verbose.log_level_filter()
    }

    pub fn command(&self) -> Option<&Commands> {
        self.cli.command.as_ref()
    }

    pub fn company_name(&self) -> Option<&str> {
        self.cli.company.as_deref()
    }

    pub fn company_or_default(&self, conn: &mut Conn) -> Result<Company> {
        if let Some(name) = self.company_name() {
            match Company::find_by_name(conn, name) {
                Ok(company) => Ok(company),
                Err(e) if e.is_not_found() => Err(anyhow!("Company not found: {}", name)),
                Err(e) => Err(e.into()),
            }
        } else if let Some(company) = self.default_company(conn)? {
            Ok(company)
        } else {
            Err(anyhow!("Company not provided"))
        }
    }

    pub fn default_company(&self, conn: &mut Conn) -> Result<Option<Company>> {
        if let Some(company_name) = self.get("default_company")? {
            match Company::find_by_name(conn, &company_name) {
                Ok(entity) => Ok(Some(entity)),
                Err(e) if e.is_not_found() => {
                    self.reset("default_company")?;
                    Ok(None)
                }
                Err(error) => Err(error.into()),
            }
        } else {
            Ok(None)
        }
    }

    pub fn database_path(&self) -> PathBuf {
        let db_filename = if let Some(db_table) = self.table.get("db").and_then(Value::as_table) {
            db_table
                .get("filename")
                .and_then(Value::as_str)
                .unwrap_or("db.reckon")
        } else {
            "db.reckon"
        };

        self.data_dir.join(db_filename)
    }

    pub fn database(&self) -> Result<Database> {
        let mut db = Database::open(self.database_path())?;
        db.setup()?;
        Ok(db)
    }

    fn kvdir(&self) -> Result<PathBuf> {
        let dir = self.dir.join("key_value_store");

        if !dir.is_dir() {
            std::fs::create_dir_all(&dir)?;
        }

        Ok(dir)
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        Ok(self.kvdir()?.join(key))
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;

        if path.is_file() {
            Ok(Some(std::fs::read_to_string(path)?.trim().to_owned()))
        } else {
            Ok(None)
        }
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.path(key)?, value)?;
        Ok(())
    }

    pub fn reset(&self, key: &str) -> Result<()> {
        let path = self.path(key)?;

        if path.is_file() {
            std::fs::remove_file(path)?;
        }

        Ok(())
    }
}

fn config_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RECKON_CONFIG") {
        return Ok(PathBuf::from(dir));
    }

    Ok(xdg::BaseDirectories::with_prefix("reckon")?.get_config_home())
}


fn data_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RECKON_DATA") {
        return Ok(PathBuf::from(dir));
    }

    Ok(xdg::BaseDirectories::with_prefix("reckon")?.get_data_home())
}
