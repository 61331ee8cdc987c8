use anyhow::Result;
use chrono::Local;
use serde::Serialize;

use super::formatter::{ansi_color, format_money, truncate_string, CliFormatter, StringFormat};
use crate::billing::{ClientGroup, InvoiceDraft, RevenueSummary};
use crate::models::Money;
use crate::services::{Dashboard, PaidEntry};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_dashboard(dashboard: &Dashboard, currency: &str) {
    CliFormatter::print_section_header("Dashboard");
    CliFormatter::print_amount("Unbilled", dashboard.unbilled_total, currency);
    CliFormatter::print_field("Open jobs", &dashboard.unbilled_count.to_string(), None);

    CliFormatter::print_section_header("Urgent");
    if dashboard.urgency.urgent.is_empty() {
        CliFormatter::print_empty_state("Nothing due in the next few days");
    }
    for item in &dashboard.urgency.urgent {
        CliFormatter::print_work_item(item, currency);
    }

    CliFormatter::print_section_header("Upcoming");
    if dashboard.urgency.upcoming.is_empty() {
        CliFormatter::print_empty_state("No later deadlines");
    }
    for item in &dashboard.urgency.upcoming {
        CliFormatter::print_work_item(item, currency);
    }
}

pub fn print_revenue(summary: &RevenueSummary, currency: &str) {
    CliFormatter::print_section_header("Revenue");
    CliFormatter::print_amount("Total earned", summary.total_earned, currency);
    CliFormatter::print_amount("This month", summary.this_month, currency);
    CliFormatter::print_field("Pending", &format_money(summary.pending, currency), Some("yellow"));

    CliFormatter::print_section_header("Recent payments");
    if summary.recent_paid.is_empty() {
        CliFormatter::print_empty_state("No payments yet");
    }
    for item in &summary.recent_paid {
        CliFormatter::print_work_item(item, currency);
    }
}

pub fn print_pending(groups: &[ClientGroup], currency: &str) {
    CliFormatter::print_section_header("Pending invoices");
    if groups.is_empty() {
        CliFormatter::print_empty_state("All work has been invoiced");
        return;
    }

    for group in groups {
        println!(
            "\n  {} {}  {}",
            ansi_color("yellow", &group.client.name, true),
            format!("#{}", group.client.id.unwrap_or_default()).dimmed(),
            format!("{} item(s)", group.count).dimmed()
        );
        for item in &group.items {
            CliFormatter::print_work_item(item, currency);
        }
        CliFormatter::print_field_bold("Subtotal", &format_money(group.total, currency), Some("green"));
    }

    let total: Money = groups.iter().map(|group| group.total).sum();
    CliFormatter::print_summary("Total outstanding", &format_money(total, currency));
}

pub fn print_history(entries: &[PaidEntry], currency: &str) {
    CliFormatter::print_section_header("Payment history");
    if entries.is_empty() {
        CliFormatter::print_empty_state("No payments yet");
        return;
    }

    for entry in entries {
        println!(
            "  {} {:<20} {:<30} {}",
            entry.item.date.with_timezone(&Local).format("%Y-%m-%d").to_string().dimmed(),
            ansi_color(
                "yellow",
                &truncate_string(entry.client_name.as_deref().unwrap_or("(deleted client)"), 20),
                false
            ),
            truncate_string(&entry.item.description, 30),
            ansi_color("green", &format_money(entry.item.cost, currency), false)
        );
    }
}

/// Plain-text rendering of an invoice.
pub fn print_invoice(draft: &InvoiceDraft, currency: &str) {
    let company = &draft.company;

    println!();
    println!("{}", ansi_color("white", company.company_name.as_deref().unwrap_or("INVOICE"), true));
    for line in [&company.company_slogan, &company.company_address, &company.company_email, &company.company_phone]
        .into_iter()
        .flatten()
    {
        println!("{}", line.as_str().dimmed());
    }

    CliFormatter::print_section_header(&format!("Invoice {}", draft.invoice_id));
    CliFormatter::print_field("Date", &draft.issue_date.format("%Y-%m-%d").to_string(), None);
    CliFormatter::print_field_bold("Bill to", &draft.client.name, Some("yellow"));
    if let Some(phone) = &draft.client.phone {
        CliFormatter::print_field("Phone", phone, None);
    }
    if let Some(link) = &draft.client_whatsapp {
        CliFormatter::print_field("WhatsApp", link, Some("cyan"));
    }

    for section in &draft.sections {
        println!("\n  {}", ansi_color("cyan", &section.project, true));
        for item in &section.items {
            CliFormatter::print_work_item(item, currency);
        }
        if section.stats.total != section.subtotal {
            CliFormatter::print_field("Project total", &format_money(section.stats.total, currency), None);
            CliFormatter::print_field("Paid before", &format_money(section.stats.prev_paid, currency), None);
            CliFormatter::print_field("Still due", &format_money(section.stats.balance, currency), None);
        }
    }

    CliFormatter::print_summary("Amount due", &format_money(draft.total, currency));

    if !draft.bank_accounts.is_empty() {
        CliFormatter::print_section_header("Pay to");
        for account in &draft.bank_accounts {
            let mut line = format!("{} {}", account.bank_name, account.account_number);
            if let Some(branch) = &account.branch_name {
                line.push_str(&format!(" ({})", branch));
            }
            if let Some(holder) = &account.account_name {
                line.push_str(&format!(" - {}", holder));
            }
            println!("  {}", line);
        }
    }

    if let Some(footer) = &company.company_footer {
        println!("\n{}", footer.as_str().dimmed());
    }
}
