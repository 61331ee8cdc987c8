use super::Money;
use chrono::{DateTime, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

pub type ClientId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClientCategory {
    Standard,
    Package,
}

impl std::fmt::Display for ClientCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientCategory::Standard => write!(f, "STANDARD"),
            ClientCategory::Package => write!(f, "PACKAGE"),
        }
    }
}

impl std::str::FromStr for ClientCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            // Older records use NORMAL for standard customers
            "STANDARD" | "NORMAL" => Ok(ClientCategory::Standard),
            "PACKAGE" => Ok(ClientCategory::Package),
            _ => Err(anyhow::anyhow!("Invalid client category: {}", s)),
        }
    }
}

impl ToSql for ClientCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for ClientCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: anyhow::Error| FromSqlError::Other(e.into()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: Option<ClientId>,
    pub name: String,
    pub phone: Option<String>,
    pub category: ClientCategory,
    pub package_price: Option<Money>,
    pub created_at: DateTime<Utc>,
}

impl Client {
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            name,
            phone: None,
            category: ClientCategory::Standard,
            package_price: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    /// Switch the client to a monthly package at the given price.
    pub fn with_package(mut self, price: Money) -> Self {
        self.category = ClientCategory::Package;
        self.package_price = Some(price);
        self
    }

    pub fn is_package(&self) -> bool {
        self.category == ClientCategory::Package
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.name.trim().is_empty() {
            return Err(anyhow::anyhow!("Client name cannot be empty"));
        }

        match (self.category, self.package_price) {
            (ClientCategory::Standard, Some(_)) => Err(anyhow::anyhow!(
                "Package price is only allowed for PACKAGE clients"
            )),
            (ClientCategory::Package, Some(price)) if price.is_negative() => {
                Err(anyhow::anyhow!("Package price cannot be negative"))
            }
            _ => Ok(()),
        }
    }
}
