use crate::db::{initialize_database, Database};
use crate::db::queries::{ClientQueries, WorkItemQueries};
use crate::models::{Client, ClientId, Money, WorkItem, WorkItemId};
use anyhow::Result;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test utilities for setting up isolated test environments
pub struct TestContext {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub database: Database,
}

impl TestContext {
    /// Create a new isolated test context with a temporary database
    pub fn new() -> Result<Self> {
        let temp_dir = tempfile::tempdir()?;
        let db_path = temp_dir.path().join("folio.db");

        // Initialize database with schema
        let database = initialize_database(&db_path)?;

        Ok(Self {
            temp_dir,
            db_path,
            database,
        })
    }

    /// Get the database connection
    pub fn connection(&self) -> &rusqlite::Connection {
        &self.database.connection
    }

    pub fn add_client(&self, name: &str) -> Result<ClientId> {
        ClientQueries::create(self.connection(), &Client::new(name.to_string()))
    }

    pub fn add_work(&self, client_id: ClientId, description: &str, cost: i64) -> Result<WorkItemId> {
        WorkItemQueries::create(
            self.connection(),
            &WorkItem::new(client_id, description.to_string(), Money::from(cost)),
        )
    }
}

/// Helper for testing database operations
pub fn with_test_db<F>(test_fn: F)
where
    F: FnOnce(&TestContext) -> Result<()>,
{
    let ctx = TestContext::new().expect("Failed to create test context");
    test_fn(&ctx).expect("Test function failed");
}

/// Helper for async tests with database
pub async fn with_test_db_async<F, Fut>(test_fn: F)
where
    F: FnOnce(TestContext) -> Fut,
    Fut: std::future::Future<Output = Result<()>>,
{
    let ctx = TestContext::new().expect("Failed to create test context");
    test_fn(ctx).await.expect("Async test function failed");
}
