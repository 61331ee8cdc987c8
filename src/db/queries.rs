use crate::billing::{current_sequence, next_sequence};
use crate::models::{
    BankAccount, BusinessSettings, Client, ClientId, Project, StatusTransitionError, WorkItem,
    WorkItemId, WorkStatus,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::time::Duration;

/// Attempts made to take the write lock before giving up with a conflict.
const WRITE_ATTEMPTS: u32 = 5;
const WRITE_BACKOFF: Duration = Duration::from_millis(50);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database is busy after {attempts} attempts, try again")]
    SequenceConflict { attempts: u32 },

    #[error("Work item {0} not found")]
    WorkItemNotFound(WorkItemId),

    #[error("Work item {id} is {status} and can no longer be deleted")]
    NotDeletable { id: WorkItemId, status: WorkStatus },

    #[error(transparent)]
    InvalidTransition(#[from] StatusTransitionError),
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if matches!(failure.code, ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
    )
}

/// Run `op` inside a `BEGIN IMMEDIATE` transaction, retrying while another
/// writer holds the lock. Every read-then-write goes through here: a deferred
/// transaction cannot upgrade a stale WAL snapshot and fails without waiting.
fn with_write_lock<T>(conn: &Connection, mut op: impl FnMut(&Transaction<'_>) -> Result<T>) -> Result<T> {
    for attempt in 1..=WRITE_ATTEMPTS {
        match Transaction::new_unchecked(conn, TransactionBehavior::Immediate) {
            Ok(tx) => {
                let value = op(&tx)?;
                tx.commit()?;
                return Ok(value);
            }
            Err(err) if is_busy(&err) => {
                log::warn!("Database busy, retrying write ({}/{})", attempt, WRITE_ATTEMPTS);
                std::thread::sleep(WRITE_BACKOFF * attempt);
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(StoreError::SequenceConflict {
        attempts: WRITE_ATTEMPTS,
    }
    .into())
}

fn client_from_row(row: &Row<'_>) -> rusqlite::Result<Client> {
    Ok(Client {
        id: Some(row.get(0)?),
        name: row.get(1)?,
        phone: row.get(2)?,
        category: row.get(3)?,
        package_price: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn work_item_from_row(row: &Row<'_>) -> rusqlite::Result<WorkItem> {
    Ok(WorkItem {
        id: Some(row.get(0)?),
        client_id: row.get(1)?,
        project_id: row.get(2)?,
        description: row.get(3)?,
        cost: row.get(4)?,
        date: row.get(5)?,
        due_date: row.get(6)?,
        status: row.get(7)?,
    })
}

const WORK_ITEM_COLUMNS: &str =
    "id, client_id, project_id, description, cost, date, due_date, status";

pub struct ClientQueries;

impl ClientQueries {
    pub fn create(conn: &Connection, client: &Client) -> Result<ClientId> {
        let mut stmt = conn.prepare(
            "INSERT INTO clients (name, phone, category, package_price, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;

        stmt.execute(params![
            client.name,
            client.phone,
            client.category,
            client.package_price,
            client.created_at
        ])?;

        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(conn: &Connection, client_id: ClientId) -> Result<Option<Client>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, category, package_price, created_at
             FROM clients WHERE id = ?1",
        )?;

        let client = stmt.query_row([client_id], client_from_row).optional()?;

        Ok(client)
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<Client>> {
        let mut stmt = conn.prepare(
            "SELECT id, name, phone, category, package_price, created_at
             FROM clients ORDER BY name COLLATE NOCASE",
        )?;

        let clients = stmt
            .query_map([], client_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(clients)
    }

    pub fn count_work_items(conn: &Connection, client_id: ClientId) -> Result<i64> {
        let count = conn.query_row(
            "SELECT COUNT(*) FROM work_logs WHERE client_id = ?1",
            [client_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    pub fn delete(conn: &Connection, client_id: ClientId) -> Result<bool> {
        with_write_lock(conn, |tx| {
            tx.execute("DELETE FROM projects WHERE client_id = ?1", [client_id])?;
            let changes = tx.execute("DELETE FROM clients WHERE id = ?1", [client_id])?;
            Ok(changes > 0)
        })
    }
}

pub struct ProjectQueries;

impl ProjectQueries {
    pub fn create(conn: &Connection, project: &Project) -> Result<i64> {
        conn.execute(
            "INSERT INTO projects (client_id, name, created_at) VALUES (?1, ?2, ?3)",
            params![project.client_id, project.name, project.created_at],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(conn: &Connection, project_id: i64) -> Result<Option<Project>> {
        let project = conn
            .query_row(
                "SELECT id, client_id, name, created_at FROM projects WHERE id = ?1",
                [project_id],
                |row| {
                    Ok(Project {
                        id: Some(row.get(0)?),
                        client_id: row.get(1)?,
                        name: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                },
            )
            .optional()?;
        Ok(project)
    }
}

pub struct WorkItemQueries;

impl WorkItemQueries {
    pub fn create(conn: &Connection, item: &WorkItem) -> Result<WorkItemId> {
        let mut stmt = conn.prepare(
            "INSERT INTO work_logs (client_id, project_id, description, cost, date, due_date, status)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )?;

        stmt.execute(params![
            item.client_id,
            item.project_id,
            item.description,
            item.cost,
            item.date,
            item.due_date,
            item.status
        ])?;

        Ok(conn.last_insert_rowid())
    }

    pub fn find_by_id(conn: &Connection, item_id: WorkItemId) -> Result<Option<WorkItem>> {
        let sql = format!("SELECT {} FROM work_logs WHERE id = ?1", WORK_ITEM_COLUMNS);
        let item = conn.query_row(&sql, [item_id], work_item_from_row).optional()?;
        Ok(item)
    }

    /// Newest first.
    pub fn list_with_filter(
        conn: &Connection,
        status: Option<WorkStatus>,
        client_id: Option<ClientId>,
    ) -> Result<Vec<WorkItem>> {
        let mut sql = format!("SELECT {} FROM work_logs WHERE 1=1", WORK_ITEM_COLUMNS);
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            params.push(Box::new(status));
        }

        if let Some(client_id) = client_id {
            sql.push_str(" AND client_id = ?");
            params.push(Box::new(client_id));
        }

        sql.push_str(" ORDER BY date DESC, id DESC");

        let mut stmt = conn.prepare(&sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let items = stmt
            .query_map(param_refs.as_slice(), work_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(items)
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<WorkItem>> {
        Self::list_with_filter(conn, None, None)
    }

    /// Unbilled work with a due date, soonest first.
    pub fn list_unbilled_scheduled(conn: &Connection) -> Result<Vec<WorkItem>> {
        let sql = format!(
            "SELECT {} FROM work_logs
             WHERE status = 'UNBILLED' AND due_date IS NOT NULL
             ORDER BY due_date ASC, id ASC",
            WORK_ITEM_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map([], work_item_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Apply a status change, rejecting moves the lifecycle does not allow.
    pub fn update_status(conn: &Connection, item_id: WorkItemId, next: WorkStatus) -> Result<WorkItem> {
        with_write_lock(conn, |tx| Self::transition_in(tx, item_id, next))
    }

    fn transition_in(conn: &Connection, item_id: WorkItemId, next: WorkStatus) -> Result<WorkItem> {
        let mut item =
            Self::find_by_id(conn, item_id)?.ok_or(StoreError::WorkItemNotFound(item_id))?;

        item.status = item.status.transition_to(next).map_err(StoreError::from)?;
        conn.execute(
            "UPDATE work_logs SET status = ?1 WHERE id = ?2",
            params![item.status, item_id],
        )?;

        Ok(item)
    }

    pub fn delete(conn: &Connection, item_id: WorkItemId) -> Result<()> {
        let item = Self::find_by_id(conn, item_id)?.ok_or(StoreError::WorkItemNotFound(item_id))?;

        if !item.is_deletable() {
            return Err(StoreError::NotDeletable {
                id: item_id,
                status: item.status,
            }
            .into());
        }

        conn.execute(
            "DELETE FROM work_logs WHERE id = ?1 AND status = 'UNBILLED'",
            [item_id],
        )?;
        Ok(())
    }
}

pub struct SettingsQueries;

impl SettingsQueries {
    fn ensure_row(conn: &Connection) -> Result<()> {
        conn.execute("INSERT OR IGNORE INTO business_settings (id) VALUES (1)", [])?;
        Ok(())
    }

    /// Read the settings row, creating an empty one on first use.
    pub fn get_or_create(conn: &Connection) -> Result<BusinessSettings> {
        Self::ensure_row(conn)?;

        let settings = conn.query_row(
            "SELECT company_name, company_slogan, company_address, company_email,
                    company_phone, company_footer, invoice_sequence, updated_at
             FROM business_settings WHERE id = 1",
            [],
            |row| {
                Ok(BusinessSettings {
                    company_name: row.get(0)?,
                    company_slogan: row.get(1)?,
                    company_address: row.get(2)?,
                    company_email: row.get(3)?,
                    company_phone: row.get(4)?,
                    company_footer: row.get(5)?,
                    invoice_sequence: row.get(6)?,
                    updated_at: row.get(7)?,
                })
            },
        )?;

        Ok(settings)
    }

    /// Save the display fields. The invoice sequence is left alone; it only
    /// moves through [`SettingsQueries::claim_invoice_sequence`].
    pub fn update_company(conn: &Connection, settings: &BusinessSettings) -> Result<()> {
        Self::ensure_row(conn)?;
        conn.execute(
            "UPDATE business_settings SET
                company_name = ?1, company_slogan = ?2, company_address = ?3,
                company_email = ?4, company_phone = ?5, company_footer = ?6,
                updated_at = ?7
             WHERE id = 1",
            params![
                settings.company_name,
                settings.company_slogan,
                settings.company_address,
                settings.company_email,
                settings.company_phone,
                settings.company_footer,
                Utc::now()
            ],
        )?;
        Ok(())
    }

    pub fn current_sequence(conn: &Connection) -> Result<i64> {
        let stored: Option<i64> = conn
            .query_row(
                "SELECT invoice_sequence FROM business_settings WHERE id = 1",
                [],
                |row| row.get::<_, Option<i64>>(0),
            )
            .optional()?
            .flatten();
        Ok(current_sequence(stored))
    }

    fn claim_in(conn: &Connection) -> Result<i64> {
        Self::ensure_row(conn)?;
        let stored: Option<i64> = conn.query_row(
            "SELECT invoice_sequence FROM business_settings WHERE id = 1",
            [],
            |row| row.get(0),
        )?;

        conn.execute(
            "UPDATE business_settings SET invoice_sequence = ?1, updated_at = ?2 WHERE id = 1",
            params![next_sequence(stored), Utc::now()],
        )?;

        Ok(current_sequence(stored))
    }

    /// Take the current invoice number and advance the counter, as one
    /// write transaction. Concurrent callers each get a distinct number.
    pub fn claim_invoice_sequence(conn: &Connection) -> Result<i64> {
        with_write_lock(conn, |tx| Self::claim_in(tx))
    }
}

pub struct BankAccountQueries;

impl BankAccountQueries {
    pub fn create(conn: &Connection, account: &BankAccount) -> Result<i64> {
        conn.execute(
            "INSERT INTO bank_accounts (bank_name, branch_name, account_name, account_number, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                account.bank_name,
                account.branch_name,
                account.account_name,
                account.account_number,
                account.created_at
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    pub fn list_all(conn: &Connection) -> Result<Vec<BankAccount>> {
        let mut stmt = conn.prepare(
            "SELECT id, bank_name, branch_name, account_name, account_number, created_at
             FROM bank_accounts ORDER BY created_at, id",
        )?;

        let accounts = stmt
            .query_map([], |row| {
                Ok(BankAccount {
                    id: Some(row.get(0)?),
                    bank_name: row.get(1)?,
                    branch_name: row.get(2)?,
                    account_name: row.get(3)?,
                    account_number: row.get(4)?,
                    created_at: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(accounts)
    }

    pub fn delete(conn: &Connection, account_id: i64) -> Result<bool> {
        let changes = conn.execute("DELETE FROM bank_accounts WHERE id = ?1", [account_id])?;
        Ok(changes > 0)
    }
}

/// Result of settling an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaidInvoice {
    pub sequence: i64,
    pub items_paid: usize,
}

/// A client's outstanding work, settled under one invoice number.
#[derive(Debug, Clone, PartialEq)]
pub struct Settlement {
    pub invoice: PaidInvoice,
    pub items: Vec<WorkItem>,
}

pub struct InvoiceQueries;

impl InvoiceQueries {
    /// Move the client's UNBILLED items to BILLED. Returns how many moved.
    pub fn bill_unbilled(conn: &Connection, client_id: ClientId) -> Result<usize> {
        with_write_lock(conn, |tx| {
            let unbilled =
                WorkItemQueries::list_with_filter(tx, Some(WorkStatus::Unbilled), Some(client_id))?;
            for item_id in unbilled.iter().filter_map(|item| item.id) {
                WorkItemQueries::transition_in(tx, item_id, WorkStatus::Billed)?;
            }
            Ok(unbilled.len())
        })
    }

    /// Mark the items PAID and claim the invoice number in one transaction.
    pub fn confirm_paid(conn: &Connection, item_ids: &[WorkItemId]) -> Result<PaidInvoice> {
        with_write_lock(conn, |tx| Self::confirm_paid_in(tx, item_ids))
    }

    /// Pay everything the client owes. The outstanding items are read under
    /// the same write lock that settles them, so `None` means another payment
    /// got there first or nothing was owed.
    pub fn settle_outstanding(conn: &Connection, client_id: ClientId) -> Result<Option<Settlement>> {
        with_write_lock(conn, |tx| {
            let mut items: Vec<WorkItem> =
                WorkItemQueries::list_with_filter(tx, None, Some(client_id))?
                    .into_iter()
                    .filter(|item| !item.is_paid())
                    .collect();
            if items.is_empty() {
                return Ok(None);
            }
            items.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

            let ids: Vec<WorkItemId> = items.iter().filter_map(|item| item.id).collect();
            let invoice = Self::confirm_paid_in(tx, &ids)?;
            for item in items.iter_mut() {
                item.status = WorkStatus::Paid;
            }
            Ok(Some(Settlement { invoice, items }))
        })
    }

    fn confirm_paid_in(conn: &Connection, item_ids: &[WorkItemId]) -> Result<PaidInvoice> {
        for &item_id in item_ids {
            WorkItemQueries::transition_in(conn, item_id, WorkStatus::Paid)?;
        }
        let sequence = SettingsQueries::claim_in(conn)?;
        Ok(PaidInvoice {
            sequence,
            items_paid: item_ids.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;
    use crate::models::Money;
    use crate::test_utils::TestContext;

    fn seeded() -> (Database, ClientId) {
        let db = Database::in_memory().unwrap();
        let client_id = ClientQueries::create(&db.connection, &Client::new("Acme".to_string())).unwrap();
        (db, client_id)
    }

    #[test]
    fn test_settings_created_lazily() {
        let db = Database::in_memory().unwrap();
        let settings = SettingsQueries::get_or_create(&db.connection).unwrap();
        assert_eq!(settings, BusinessSettings::default());
        assert_eq!(SettingsQueries::current_sequence(&db.connection).unwrap(), 200);
    }

    #[test]
    fn test_claim_advances_sequence() {
        let db = Database::in_memory().unwrap();
        assert_eq!(SettingsQueries::claim_invoice_sequence(&db.connection).unwrap(), 200);
        assert_eq!(SettingsQueries::claim_invoice_sequence(&db.connection).unwrap(), 201);
        assert_eq!(SettingsQueries::current_sequence(&db.connection).unwrap(), 202);
    }

    #[test]
    fn test_update_company_keeps_sequence() {
        let db = Database::in_memory().unwrap();
        SettingsQueries::claim_invoice_sequence(&db.connection).unwrap();

        let mut settings = SettingsQueries::get_or_create(&db.connection).unwrap();
        settings.company_name = Some("Studio".to_string());
        settings.invoice_sequence = Some(1);
        SettingsQueries::update_company(&db.connection, &settings).unwrap();

        let saved = SettingsQueries::get_or_create(&db.connection).unwrap();
        assert_eq!(saved.company_name.as_deref(), Some("Studio"));
        assert_eq!(saved.invoice_sequence, Some(201));
        assert!(saved.updated_at.is_some());
    }

    #[test]
    fn test_status_update_respects_lifecycle() {
        let (db, client_id) = seeded();
        let id = WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "Poster".to_string(), Money::from(800)),
        )
        .unwrap();

        let item = WorkItemQueries::update_status(&db.connection, id, WorkStatus::Billed).unwrap();
        assert_eq!(item.status, WorkStatus::Billed);

        let err = WorkItemQueries::update_status(&db.connection, id, WorkStatus::Unbilled).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::InvalidTransition(_))
        ));

        let stored = WorkItemQueries::find_by_id(&db.connection, id).unwrap().unwrap();
        assert_eq!(stored.status, WorkStatus::Billed);
    }

    #[test]
    fn test_delete_only_unbilled() {
        let (db, client_id) = seeded();
        let open = WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "Flyer".to_string(), Money::from(100)),
        )
        .unwrap();
        let paid = WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "Banner".to_string(), Money::from(300)).with_status(WorkStatus::Paid),
        )
        .unwrap();

        WorkItemQueries::delete(&db.connection, open).unwrap();
        assert!(WorkItemQueries::find_by_id(&db.connection, open).unwrap().is_none());

        let err = WorkItemQueries::delete(&db.connection, paid).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotDeletable { .. })
        ));

        let missing = WorkItemQueries::delete(&db.connection, 999).unwrap_err();
        assert!(matches!(
            missing.downcast_ref::<StoreError>(),
            Some(StoreError::WorkItemNotFound(999))
        ));
    }

    #[test]
    fn test_confirm_paid_rolls_back_on_invalid_item() {
        let (db, client_id) = seeded();
        let first = WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "A".to_string(), Money::from(100)),
        )
        .unwrap();
        let already_paid = WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "B".to_string(), Money::from(100)).with_status(WorkStatus::Paid),
        )
        .unwrap();

        assert!(InvoiceQueries::confirm_paid(&db.connection, &[first, already_paid]).is_err());

        let first_item = WorkItemQueries::find_by_id(&db.connection, first).unwrap().unwrap();
        assert_eq!(first_item.status, WorkStatus::Unbilled);
        assert_eq!(SettingsQueries::current_sequence(&db.connection).unwrap(), 200);

        let receipt = InvoiceQueries::confirm_paid(&db.connection, &[first]).unwrap();
        assert_eq!(receipt, PaidInvoice { sequence: 200, items_paid: 1 });
        assert_eq!(SettingsQueries::current_sequence(&db.connection).unwrap(), 201);
    }

    #[test]
    fn test_unbilled_scheduled_order() {
        let (db, client_id) = seeded();
        let later = chrono::NaiveDate::from_ymd_opt(2025, 5, 10);
        let sooner = chrono::NaiveDate::from_ymd_opt(2025, 5, 1);

        WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "Later".to_string(), Money::from(1)).with_due_date(later),
        )
        .unwrap();
        WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "Undated".to_string(), Money::from(1)),
        )
        .unwrap();
        WorkItemQueries::create(
            &db.connection,
            &WorkItem::new(client_id, "Sooner".to_string(), Money::from(1)).with_due_date(sooner),
        )
        .unwrap();

        let scheduled = WorkItemQueries::list_unbilled_scheduled(&db.connection).unwrap();
        let names: Vec<_> = scheduled.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(names, vec!["Sooner", "Later"]);
    }

    #[test]
    fn test_settle_outstanding_reads_under_lock() {
        let ctx = TestContext::new().unwrap();
        let client_id = ctx.add_client("Acme").unwrap();
        let billed = ctx.add_work(client_id, "Logo", 5000).unwrap();
        ctx.add_work(client_id, "Flyer", 750).unwrap();
        WorkItemQueries::update_status(ctx.connection(), billed, WorkStatus::Billed).unwrap();

        let settled = InvoiceQueries::settle_outstanding(ctx.connection(), client_id)
            .unwrap()
            .unwrap();
        assert_eq!(settled.invoice, PaidInvoice { sequence: 200, items_paid: 2 });
        assert!(settled.items.iter().all(|item| item.is_paid()));
        assert_eq!(settled.items.iter().map(|item| item.cost).sum::<Money>(), Money::from(5750));

        assert_eq!(InvoiceQueries::settle_outstanding(ctx.connection(), client_id).unwrap(), None);
        assert_eq!(SettingsQueries::current_sequence(ctx.connection()).unwrap(), 201);
    }

    #[test]
    fn test_bill_unbilled_skips_other_statuses() {
        let ctx = TestContext::new().unwrap();
        let client_id = ctx.add_client("Acme").unwrap();
        let paid = ctx.add_work(client_id, "Logo", 5000).unwrap();
        let open = ctx.add_work(client_id, "Flyer", 750).unwrap();
        WorkItemQueries::update_status(ctx.connection(), paid, WorkStatus::Paid).unwrap();

        assert_eq!(InvoiceQueries::bill_unbilled(ctx.connection(), client_id).unwrap(), 1);
        assert_eq!(InvoiceQueries::bill_unbilled(ctx.connection(), client_id).unwrap(), 0);

        let open = WorkItemQueries::find_by_id(ctx.connection(), open).unwrap().unwrap();
        assert_eq!(open.status, WorkStatus::Billed);
    }

    #[test]
    fn test_status_writes_alongside_payments() {
        const ITEMS: usize = 60;

        let ctx = TestContext::new().unwrap();
        let to_bill = ctx.add_client("Billed").unwrap();
        let to_pay = ctx.add_client("Paid").unwrap();
        let billing_ids: Vec<WorkItemId> = (0..ITEMS)
            .map(|i| ctx.add_work(to_bill, &format!("Job {}", i), 100).unwrap())
            .collect();
        let paying_ids: Vec<WorkItemId> = (0..ITEMS)
            .map(|i| ctx.add_work(to_pay, &format!("Job {}", i), 100).unwrap())
            .collect();
        let extra_client = ctx.add_client("Extra").unwrap();
        for i in 0..ITEMS {
            ctx.add_work(extra_client, &format!("Extra {}", i), 100).unwrap();
        }

        let path = ctx.db_path.clone();
        let status_writer = std::thread::spawn(move || -> Result<()> {
            let db = Database::new(&path)?;
            for id in billing_ids {
                WorkItemQueries::update_status(&db.connection, id, WorkStatus::Billed)?;
            }
            InvoiceQueries::bill_unbilled(&db.connection, extra_client)?;
            Ok(())
        });

        let path = ctx.db_path.clone();
        let payer = std::thread::spawn(move || -> Result<()> {
            let db = Database::new(&path)?;
            for id in paying_ids {
                InvoiceQueries::confirm_paid(&db.connection, &[id])?;
            }
            Ok(())
        });

        status_writer.join().expect("status writer panicked").unwrap();
        payer.join().expect("payer panicked").unwrap();

        let billed =
            WorkItemQueries::list_with_filter(ctx.connection(), Some(WorkStatus::Billed), None).unwrap();
        assert_eq!(billed.len(), ITEMS * 2);
        assert_eq!(
            SettingsQueries::current_sequence(ctx.connection()).unwrap(),
            200 + ITEMS as i64
        );
    }
}
