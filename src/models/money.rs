use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use std::str::FromStr;

/// An exact monetary amount in the account's currency.
///
/// Stored as TEXT so that no precision is lost in SQLite. All aggregation
/// happens in Rust over these values. Arithmetic saturates instead of
/// panicking; inputs are bounded by `validate_cost` long before that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    /// Round to whole currency units, halves going up.
    pub fn round_half_up(&self) -> Money {
        Money(self.0.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
    }

    /// `self * percent / 100`, unrounded. Saturates at the `Decimal` bounds.
    pub fn percent(&self, percent: u32) -> Money {
        Money(self.0.saturating_mul(Decimal::from(percent)) / Decimal::ONE_HUNDRED)
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

impl From<i64> for Money {
    fn from(amount: i64) -> Self {
        Self(Decimal::from(amount))
    }
}

impl From<i32> for Money {
    fn from(amount: i32) -> Self {
        Self(Decimal::from(amount))
    }
}

impl FromStr for Money {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
        let amount = Decimal::from_str(&cleaned)
            .map_err(|e| anyhow::anyhow!("Invalid amount '{}': {}", s.trim(), e))?;
        Ok(Self(amount))
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rounded = self.0.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let text = format!("{:.2}", rounded);
        let (sign, digits) = match text.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", text.as_str()),
        };
        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}{}.{}", sign, grouped, fraction)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 = self.0.saturating_add(rhs.0);
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0.saturating_sub(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl ToSql for Money {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0.to_string()))
    }
}

impl FromSql for Money {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Text(_) => {
                let text = value.as_str()?;
                Decimal::from_str(text)
                    .map(Money)
                    .map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Integer(i) => Ok(Money(Decimal::from(i))),
            ValueRef::Real(r) => Decimal::try_from(r)
                .map(Money)
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_display_groups_thousands() {
        assert_eq!(Money::from(1500).to_string(), "1,500.00");
        assert_eq!(Money::new(dec!(1234567.891)).to_string(), "1,234,567.89");
        assert_eq!(Money::new(dec!(-20.5)).to_string(), "-20.50");
        assert_eq!(Money::ZERO.to_string(), "0.00");
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!("5000".parse::<Money>().unwrap(), Money::from(5000));
        assert_eq!(" 12,500.50 ".parse::<Money>().unwrap(), Money::new(dec!(12500.50)));
        assert!("abc".parse::<Money>().is_err());
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(Money::new(dec!(2.5)).round_half_up(), Money::from(3));
        assert_eq!(Money::new(dec!(2.49)).round_half_up(), Money::from(2));
        assert_eq!(Money::from(333).percent(50).round_half_up(), Money::from(167));
    }

    #[test]
    fn test_arithmetic_saturates() {
        let max = Money::new(Decimal::MAX);
        assert_eq!(max + max, max);
        assert_eq!([max, max].iter().sum::<Money>(), max);
        assert_eq!(Money::new(Decimal::MIN) - max, Money::new(Decimal::MIN));
        assert_eq!(max.percent(50), Money::new(Decimal::MAX / Decimal::ONE_HUNDRED));
    }

    #[test]
    fn test_negative_detection() {
        assert!(Money::from(-1).is_negative());
        assert!(!Money::ZERO.is_negative());
        assert!(!Money::from(10).is_negative());
    }
}
