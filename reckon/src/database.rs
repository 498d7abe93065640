use std::path::Path;

use crate::result::{Error, Result};

use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

pub type Conn = SqliteConnection;

#[derive(derive_more::Deref, derive_more::DerefMut)]
pub struct Database {
    pub connection: SqliteConnection,
}

impl Database {
    pub fn open<T: AsRef<Path>>(path: T) -> Result<Self> {
        let path = path.as_ref().display().to_string();
        Ok(Database {
            connection: SqliteConnection::establish(&path)?,
        })
    }

    pub fn memory() -> Result<Self> {
        Ok(Database {
            connection: SqliteConnection::establish(":memory:")?,
        })
    }

    /// Runs any migration not yet applied to this database
    pub fn setup(&mut self) -> Result<()> {
        self.connection
            .run_pending_migrations(MIGRATIONS)
            .map_err(Error::GenericError)?;
        Ok(())
    }
}
