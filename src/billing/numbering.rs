use chrono::NaiveDate;

/// Sequence used when an account has never issued an invoice.
pub const DEFAULT_INVOICE_SEQUENCE: i64 = 200;

/// `INV-YYMMDD-NNNN`. Sequences wider than four digits are printed in full.
pub fn format_invoice_id(date: NaiveDate, sequence: i64) -> String {
    format!("INV-{}-{:04}", date.format("%y%m%d"), sequence)
}

pub fn current_sequence(stored: Option<i64>) -> i64 {
    stored.unwrap_or(DEFAULT_INVOICE_SEQUENCE)
}

pub fn next_sequence(current: Option<i64>) -> i64 {
    current_sequence(current) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_invoice_id() {
        let date = NaiveDate::from_ymd_opt(2025, 12, 20).unwrap();
        assert_eq!(format_invoice_id(date, 200), "INV-251220-0200");
        assert_eq!(format_invoice_id(date, 7), "INV-251220-0007");
        assert_eq!(format_invoice_id(date, 12345), "INV-251220-12345");
    }

    #[test]
    fn test_next_sequence() {
        assert_eq!(next_sequence(None), 201);
        assert_eq!(next_sequence(Some(200)), 201);
        assert_eq!(next_sequence(Some(9999)), 10000);
    }
}
