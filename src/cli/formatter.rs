use crate::models::{Money, WorkItem, WorkStatus};

pub struct CliFormatter;

impl CliFormatter {
    pub fn print_section_header(title: &str) {
        println!("\n{}", ansi_color("cyan", title, true));
        println!("{}", "─".repeat(title.chars().count()).dimmed());
    }

    pub fn print_field(label: &str, value: &str, color: Option<&str>) {
        let colored_value = match color {
            Some(c) => ansi_color(c, value, false),
            None => value.to_string(),
        };
        println!("  {:<14} {}", format!("{}:", label).dimmed(), colored_value);
    }

    pub fn print_field_bold(label: &str, value: &str, color: Option<&str>) {
        let colored_value = match color {
            Some(c) => ansi_color(c, value, true),
            None => bold(value),
        };
        println!("  {:<14} {}", format!("{}:", label).dimmed(), colored_value);
    }

    pub fn print_amount(label: &str, amount: Money, currency: &str) {
        Self::print_field_bold(label, &format_money(amount, currency), Some("green"));
    }

    pub fn print_summary(title: &str, total: &str) {
        println!("\n{}", ansi_color("white", title, true));
        println!("  {}", ansi_color("green", total, true));
    }

    /// One work item per line: id, status badge, description, cost and due date.
    pub fn print_work_item(item: &WorkItem, currency: &str) {
        let due = item
            .due_date
            .map(|d| format!("due {}", d.format("%Y-%m-%d")))
            .unwrap_or_default();

        println!(
            "  {:>5} {} {:<32} {:>16} {}",
            format!("#{}", item.id.unwrap_or_default()).dimmed(),
            status_badge(item.status),
            ansi_color("yellow", &truncate_string(&item.description, 32), false),
            ansi_color("green", &format_money(item.cost, currency), false),
            due.dimmed()
        );
    }

    pub fn print_client_entry(id: Option<i64>, name: &str, detail: &str) {
        println!(
            "  {:>5} {:<28} {}",
            format!("#{}", id.unwrap_or_default()).dimmed(),
            ansi_color("yellow", &truncate_string(name, 28), true),
            detail.dimmed()
        );
    }

    pub fn print_empty_state(message: &str) {
        println!("\n  {}", message.dimmed());
    }

    pub fn print_success(message: &str) {
        println!(
            "  {} {}",
            ansi_color("green", "✓", true),
            ansi_color("green", message, false)
        );
    }
}

// Helper functions
pub fn ansi_color(color: &str, text: &str, bold: bool) -> String {
    let color_code = match color {
        "red" => "31",
        "green" => "32",
        "yellow" => "33",
        "blue" => "34",
        "magenta" => "35",
        "cyan" => "36",
        "white" => "37",
        "gray" => "90",
        _ => "37", // default to white
    };

    if bold {
        format!("\x1b[1;{}m{}\x1b[0m", color_code, text)
    } else {
        format!("\x1b[{}m{}\x1b[0m", color_code, text)
    }
}

fn bold(text: &str) -> String {
    format!("\x1b[1m{}\x1b[0m", text)
}

pub trait StringFormat {
    fn dimmed(&self) -> String;
}

impl StringFormat for str {
    fn dimmed(&self) -> String {
        format!("\x1b[2m{}\x1b[0m", self)
    }
}

fn status_color(status: WorkStatus) -> &'static str {
    match status {
        WorkStatus::Unbilled => "yellow",
        WorkStatus::Billed => "blue",
        WorkStatus::Paid => "green",
    }
}

pub fn status_badge(status: WorkStatus) -> String {
    ansi_color(status_color(status), &format!("{:<8}", status.to_string()), true)
}

pub fn format_money(amount: Money, currency: &str) -> String {
    format!("{} {}", currency, amount)
}

/// Shortens to `max_len` characters, ending in an ellipsis.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", kept)
    }
}
