use anyhow::Result;
use rusqlite::Connection;
use std::collections::BTreeMap;

const MIGRATION_001: &str = include_str!("../../migrations/001_initial_schema.sql");

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_current_version(conn)?;
    let migrations = get_migrations();

    for (version, sql) in migrations.iter() {
        if *version > current_version {
            log::info!("Running migration {}", version);

            let tx = conn.unchecked_transaction()?;

            log::debug!("Executing migration SQL: {}", sql);
            tx.execute_batch(sql)?;

            tx.execute(
                "INSERT OR REPLACE INTO schema_version (version) VALUES (?1)",
                [version],
            )?;

            tx.commit()?;
            log::info!("Migration {} completed", version);
        }
    }

    Ok(())
}

fn get_current_version(conn: &Connection) -> Result<i32> {
    let table_exists: bool = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name='schema_version'",
        [],
        |row| row.get::<_, i32>(0),
    )? > 0;

    if !table_exists {
        return Ok(0);
    }

    let version = conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        let version: Option<i32> = row.get(0)?;
        Ok(version.unwrap_or(0))
    })?;

    Ok(version)
}

fn get_migrations() -> BTreeMap<i32, &'static str> {
    let mut migrations = BTreeMap::new();
    migrations.insert(1, MIGRATION_001);
    migrations
}
