use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::path::PathBuf;

use super::with_database;
use crate::billing::{build_invoice, format_invoice_id, group_unbilled_by_client, ClientGroup, InvoiceDraft, InvoiceInput};
use crate::db::queries::{
    BankAccountQueries, ClientQueries, InvoiceQueries, SettingsQueries, WorkItemQueries,
};
use crate::db::Database;
use crate::models::{Client, ClientId, Money, WorkItem, WorkStatus};
use crate::utils::validation::validate_id;

/// Outcome of confirming payment for a client's invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentReceipt {
    pub invoice_id: String,
    pub sequence: i64,
    pub items_paid: usize,
    pub total: Money,
}

/// One line of the payment history.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaidEntry {
    pub item: WorkItem,
    pub client_name: Option<String>,
}

pub struct InvoiceService {
    db_path: PathBuf,
    country_code: String,
}

fn load_client(db: &Database, client_id: ClientId) -> Result<Client> {
    ClientQueries::find_by_id(&db.connection, client_id)?
        .ok_or_else(|| anyhow::anyhow!("Client with ID {} not found", client_id))
}

/// Work of the client that has not been paid yet, oldest first.
fn outstanding(history: &[WorkItem]) -> Vec<WorkItem> {
    let mut items: Vec<WorkItem> = history.iter().filter(|item| !item.is_paid()).cloned().collect();
    items.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));
    items
}

impl InvoiceService {
    pub fn new(db_path: PathBuf, country_code: String) -> Self {
        Self {
            db_path,
            country_code,
        }
    }

    /// Unbilled work grouped per client, in client id order.
    pub async fn pending(&self) -> Result<Vec<ClientGroup>> {
        with_database(&self.db_path, |db| {
            let items = WorkItemQueries::list_with_filter(&db.connection, Some(WorkStatus::Unbilled), None)?;
            let clients = ClientQueries::list_all(&db.connection)?;
            Ok(group_unbilled_by_client(&items, &clients).into_values().collect())
        })
        .await
    }

    /// Invoice for everything the client still owes, numbered with the
    /// sequence the next payment will claim.
    pub async fn draft(&self, client_id: ClientId, issue_date: NaiveDate) -> Result<InvoiceDraft> {
        let client_id = validate_id("client_id", client_id).context("Invalid client ID")?;
        let country_code = self.country_code.clone();

        with_database(&self.db_path, move |db| {
            let client = load_client(db, client_id)?;
            let history = WorkItemQueries::list_with_filter(&db.connection, None, Some(client_id))?;
            let billed_now = outstanding(&history);
            if billed_now.is_empty() {
                return Err(anyhow::anyhow!("{} has no outstanding work to invoice", client.name));
            }

            let settings = SettingsQueries::get_or_create(&db.connection)?;
            let bank_accounts = BankAccountQueries::list_all(&db.connection)?;
            let sequence = SettingsQueries::current_sequence(&db.connection)?;

            Ok(build_invoice(InvoiceInput {
                client: &client,
                billed_now: &billed_now,
                client_history: &history,
                settings: &settings,
                bank_accounts: &bank_accounts,
                issue_date,
                sequence,
                country_code: &country_code,
            }))
        })
        .await
    }

    /// Mark the client's unbilled work as sent. Returns how many items moved.
    pub async fn bill(&self, client_id: ClientId) -> Result<usize> {
        let client_id = validate_id("client_id", client_id).context("Invalid client ID")?;

        let count = with_database(&self.db_path, move |db| {
            let client = load_client(db, client_id)?;
            match InvoiceQueries::bill_unbilled(&db.connection, client_id)? {
                0 => Err(anyhow::anyhow!("{} has no unbilled work", client.name)),
                count => Ok(count),
            }
        })
        .await?;

        log::info!("Billed {} item(s) for client {}", count, client_id);
        Ok(count)
    }

    /// Settle everything the client owes and claim the invoice number.
    pub async fn pay(&self, client_id: ClientId, paid_on: NaiveDate) -> Result<PaymentReceipt> {
        let client_id = validate_id("client_id", client_id).context("Invalid client ID")?;

        let receipt = with_database(&self.db_path, move |db| {
            let client = load_client(db, client_id)?;
            let settled = InvoiceQueries::settle_outstanding(&db.connection, client_id)?
                .ok_or_else(|| anyhow::anyhow!("{} has nothing left to pay", client.name))?;

            Ok(PaymentReceipt {
                invoice_id: format_invoice_id(paid_on, settled.invoice.sequence),
                sequence: settled.invoice.sequence,
                items_paid: settled.invoice.items_paid,
                total: settled.items.iter().map(|item| item.cost).sum(),
            })
        })
        .await?;

        log::info!(
            "Invoice {} settled for client {} ({} item(s))",
            receipt.invoice_id,
            client_id,
            receipt.items_paid
        );
        Ok(receipt)
    }

    /// Paid work, newest first.
    pub async fn history(&self, limit: usize) -> Result<Vec<PaidEntry>> {
        with_database(&self.db_path, move |db| {
            let names: HashMap<ClientId, String> = ClientQueries::list_all(&db.connection)?
                .into_iter()
                .filter_map(|client| client.id.map(|id| (id, client.name)))
                .collect();

            let entries = WorkItemQueries::list_with_filter(&db.connection, Some(WorkStatus::Paid), None)?
                .into_iter()
                .take(limit)
                .map(|item| PaidEntry {
                    client_name: names.get(&item.client_id).cloned(),
                    item,
                })
                .collect();
            Ok(entries)
        })
        .await
    }
}
