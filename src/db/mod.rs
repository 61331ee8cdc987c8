pub mod connection;
pub mod migrations;
pub mod queries;

use anyhow::Result;
use std::path::{Path, PathBuf};

pub use connection::Database;
pub use queries::{PaidInvoice, Settlement, StoreError};

/// Environment variable that points folio at a different database file.
pub const DATABASE_ENV: &str = "FOLIO_DB";

pub fn initialize_database(db_path: &Path) -> Result<Database> {
    log::debug!("Opening database at {:?}", db_path);
    let db = Database::new(db_path)?;
    log::debug!("Database ready (schema version {:?})", db.get_schema_version()?);
    Ok(db)
}

pub fn get_database_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(DATABASE_ENV) {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    Ok(crate::utils::paths::get_data_dir()?.join("folio.db"))
}
