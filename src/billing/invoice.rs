use super::contact::normalize_phone_to_whatsapp_url;
use super::numbering::format_invoice_id;
use super::project::{compute_project_stats, project_root_name, related_items, ProjectStats};
use crate::models::{BankAccount, BusinessSettings, Client, Money, WorkItem};
use chrono::NaiveDate;
use serde::Serialize;

/// Line items of one project on an invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceSection {
    pub project: String,
    pub items: Vec<WorkItem>,
    pub subtotal: Money,
    pub stats: ProjectStats,
}

/// Everything needed to render an invoice.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceDraft {
    pub invoice_id: String,
    pub sequence: i64,
    pub issue_date: NaiveDate,
    pub company: BusinessSettings,
    pub client: Client,
    pub client_whatsapp: Option<String>,
    pub sections: Vec<InvoiceSection>,
    pub total: Money,
    pub bank_accounts: Vec<BankAccount>,
}

pub struct InvoiceInput<'a> {
    pub client: &'a Client,
    /// Items going on this invoice.
    pub billed_now: &'a [WorkItem],
    /// Every item of the client, used to find earlier parts of each project.
    pub client_history: &'a [WorkItem],
    pub settings: &'a BusinessSettings,
    pub bank_accounts: &'a [BankAccount],
    pub issue_date: NaiveDate,
    pub sequence: i64,
    pub country_code: &'a str,
}

#[derive(PartialEq)]
enum SectionKey {
    Project(i64),
    Root(String),
}

fn section_key(item: &WorkItem) -> SectionKey {
    match item.project_id {
        Some(id) => SectionKey::Project(id),
        None => SectionKey::Root(project_root_name(&item.description)),
    }
}

pub fn build_invoice(input: InvoiceInput<'_>) -> InvoiceDraft {
    let mut grouped: Vec<(SectionKey, Vec<WorkItem>)> = Vec::new();
    for item in input.billed_now {
        let key = section_key(item);
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, items)) => items.push(item.clone()),
            None => grouped.push((key, vec![item.clone()])),
        }
    }

    let sections: Vec<InvoiceSection> = grouped
        .into_iter()
        .map(|(_, items)| {
            let mut related: Vec<WorkItem> = related_items(&items[0], input.client_history)
                .into_iter()
                .cloned()
                .collect();
            for item in &items {
                let present = related.iter().any(|r| r.id.is_some() && r.id == item.id);
                if !present {
                    related.push(item.clone());
                }
            }

            InvoiceSection {
                project: project_root_name(&items[0].description),
                subtotal: items.iter().map(|item| item.cost).sum(),
                stats: compute_project_stats(&items, &related),
                items,
            }
        })
        .collect();

    InvoiceDraft {
        invoice_id: format_invoice_id(input.issue_date, input.sequence),
        sequence: input.sequence,
        issue_date: input.issue_date,
        company: input.settings.clone(),
        client: input.client.clone(),
        client_whatsapp: input
            .client
            .phone
            .as_deref()
            .and_then(|phone| normalize_phone_to_whatsapp_url(phone, input.country_code)),
        total: sections.iter().map(|section| section.subtotal).sum(),
        sections,
        bank_accounts: input.bank_accounts.to_vec(),
    }
}
