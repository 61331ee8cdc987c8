pub mod client_service;
pub mod dashboard_service;
pub mod invoice_service;
pub mod settings_service;
pub mod work_service;

pub use client_service::ClientService;
pub use dashboard_service::{Dashboard, DashboardService};
pub use invoice_service::{InvoiceService, PaidEntry, PaymentReceipt};
pub use settings_service::SettingsService;
pub use work_service::{NewJob, WorkService};

use crate::db::Database;
use anyhow::Result;
use std::path::Path;

/// Open the database on the blocking pool and run `f` against it.
pub(crate) async fn with_database<T, F>(db_path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&Database) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    let db_path = db_path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<T> {
        let db = Database::new(&db_path)?;
        f(&db)
    })
    .await?
}
