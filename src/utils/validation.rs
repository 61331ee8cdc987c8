use crate::models::Money;
use anyhow::Result;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Largest cost or package price accepted, in whole currency units.
pub const MAX_COST_UNITS: i64 = 1_000_000_000_000_000;

/// Rejections raised at the write boundary, before anything reaches the
/// database or the billing computations.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Client name is invalid: {reason}")]
    InvalidClientName { reason: String },

    #[error("Description is invalid: {reason}")]
    InvalidDescription { reason: String },

    #[error("Amount is invalid: {reason}")]
    InvalidAmount { reason: String },

    #[error("Advance percent is invalid: {reason}")]
    InvalidAdvancePercent { reason: String },

    #[error("Date is invalid: {reason}")]
    InvalidDate { reason: String },

    #[error("Input string is invalid: {field} - {reason}")]
    InvalidString { field: String, reason: String },

    #[error("Numeric value is invalid: {field} - {reason}")]
    InvalidNumeric { field: String, reason: String },
}

fn check_text(field: &str, value: &str, max_len: usize) -> Result<String> {
    let trimmed = value.trim();

    if trimmed.len() > max_len {
        return Err(ValidationError::InvalidString {
            field: field.to_string(),
            reason: format!("too long (max {} characters, got {})", max_len, trimmed.len()),
        }
        .into());
    }

    if trimmed.contains('\0') {
        return Err(ValidationError::InvalidString {
            field: field.to_string(),
            reason: "contains null bytes".to_string(),
        }
        .into());
    }

    Ok(trimmed.to_string())
}

pub fn validate_client_name(name: &str) -> Result<String> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::InvalidClientName {
            reason: "Client name cannot be empty or whitespace only".to_string(),
        }
        .into());
    }

    if trimmed.len() > 255 {
        return Err(ValidationError::InvalidClientName {
            reason: format!("Client name too long (max 255 characters, got {})", trimmed.len()),
        }
        .into());
    }

    check_text("name", trimmed, 255)
}

pub fn validate_description(description: &str) -> Result<String> {
    let trimmed = description.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::InvalidDescription {
            reason: "Description cannot be empty".to_string(),
        }
        .into());
    }

    if trimmed.len() > 500 {
        return Err(ValidationError::InvalidDescription {
            reason: format!("Description too long (max 500 characters, got {})", trimmed.len()),
        }
        .into());
    }

    check_text("description", trimmed, 500)
}

pub fn validate_cost(cost: Money) -> Result<Money> {
    if cost.is_negative() {
        return Err(ValidationError::InvalidAmount {
            reason: format!("Cost cannot be negative (got {})", cost),
        }
        .into());
    }

    if cost.amount() > Decimal::from(MAX_COST_UNITS) {
        return Err(ValidationError::InvalidAmount {
            reason: format!("Cost cannot exceed {} (got {})", Money::from(MAX_COST_UNITS), cost),
        }
        .into());
    }

    Ok(cost)
}

pub fn parse_cost(input: &str) -> Result<Money> {
    let cost = input.parse::<Money>().map_err(|e: anyhow::Error| ValidationError::InvalidAmount {
        reason: e.to_string(),
    })?;
    validate_cost(cost)
}

pub fn validate_advance_percent(percent: u32) -> Result<u32> {
    if !(10..=90).contains(&percent) || percent % 10 != 0 {
        return Err(ValidationError::InvalidAdvancePercent {
            reason: format!("Must be a multiple of 10 between 10 and 90 (got {})", percent),
        }
        .into());
    }

    Ok(percent)
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidDate {
            reason: format!("'{}' is not a date. Use YYYY-MM-DD", input.trim()),
        }
        .into()
    })
}

/// Phone numbers are stored as typed; only characters people actually use
/// in numbers are allowed.
pub fn validate_phone(phone: &str) -> Result<Option<String>> {
    let trimmed = phone.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    if !trimmed.chars().all(|c| c.is_ascii_digit() || " +-()".contains(c)) {
        return Err(ValidationError::InvalidString {
            field: "phone".to_string(),
            reason: "may only contain digits, spaces, '+', '-' and parentheses".to_string(),
        }
        .into());
    }

    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidString {
            field: "phone".to_string(),
            reason: "contains no digits".to_string(),
        }
        .into());
    }

    Ok(Some(trimmed.to_string()))
}

pub fn validate_email(email: &str) -> Result<Option<String>> {
    let trimmed = check_text("email", email, 255)?;
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(Some(trimmed)),
        _ => Err(ValidationError::InvalidString {
            field: "email".to_string(),
            reason: format!("'{}' is not an email address", trimmed),
        }
        .into()),
    }
}

/// Free-form optional text such as slogans and footers. Blank clears the field.
pub fn validate_optional_text(field: &str, value: &str) -> Result<Option<String>> {
    let trimmed = check_text(field, value, 1000)?;
    Ok(if trimmed.is_empty() { None } else { Some(trimmed) })
}

pub fn validate_required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = check_text(field, value, 255)?;
    if trimmed.is_empty() {
        return Err(ValidationError::InvalidString {
            field: field.to_string(),
            reason: "cannot be empty".to_string(),
        }
        .into());
    }
    Ok(trimmed)
}

pub fn validate_id(field: &str, id: i64) -> Result<i64> {
    if id <= 0 {
        return Err(ValidationError::InvalidNumeric {
            field: field.to_string(),
            reason: format!("must be positive (got {})", id),
        }
        .into());
    }

    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_client_name() {
        assert_eq!(validate_client_name("  Acme Ltd ").unwrap(), "Acme Ltd");
        assert!(validate_client_name("").is_err());
        assert!(validate_client_name("   ").is_err());
        assert!(validate_client_name(&"a".repeat(300)).is_err());
        assert!(validate_client_name("bad\0name").is_err());
    }

    #[test]
    fn test_validate_description() {
        assert_eq!(validate_description(" Logo Design ").unwrap(), "Logo Design");
        assert!(validate_description("").is_err());
        assert!(validate_description(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_cost_validation() {
        assert_eq!(parse_cost("5000").unwrap(), Money::from(5000));
        assert_eq!(parse_cost("0").unwrap(), Money::ZERO);
        assert_eq!(parse_cost("1,250.75").unwrap(), Money::new(dec!(1250.75)));

        let err = parse_cost("-10").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidAmount { .. })
        ));
        assert!(parse_cost("ten").is_err());
    }

    #[test]
    fn test_cost_upper_bound() {
        let ceiling = Money::from(MAX_COST_UNITS);
        assert_eq!(validate_cost(ceiling).unwrap(), ceiling);
        assert!(parse_cost("1000000000000000.01").is_err());

        let err = parse_cost("79228162514264337593543950335").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ValidationError>(),
            Some(ValidationError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn test_validate_advance_percent() {
        for percent in (10..=90).step_by(10) {
            assert!(validate_advance_percent(percent).is_ok());
        }
        assert!(validate_advance_percent(0).is_err());
        assert!(validate_advance_percent(55).is_err());
        assert!(validate_advance_percent(100).is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2025-12-20").unwrap(), NaiveDate::from_ymd_opt(2025, 12, 20).unwrap());
        assert!(parse_date("20/12/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert_eq!(validate_phone(" 076 001 0635 ").unwrap().as_deref(), Some("076 001 0635"));
        assert_eq!(validate_phone("+94 (76) 001-0635").unwrap().as_deref(), Some("+94 (76) 001-0635"));
        assert_eq!(validate_phone("").unwrap(), None);
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("+ -").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(validate_email("hi@studio.lk").unwrap().as_deref(), Some("hi@studio.lk"));
        assert_eq!(validate_email(" ").unwrap(), None);
        assert!(validate_email("studio.lk").is_err());
        assert!(validate_email("@studio.lk").is_err());
    }

    #[test]
    fn test_validate_id() {
        assert!(validate_id("client_id", 1).is_ok());
        assert!(validate_id("client_id", 0).is_err());
        assert!(validate_id("client_id", -4).is_err());
    }
}
