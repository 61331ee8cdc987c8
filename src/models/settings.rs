use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Company details printed on invoices, plus the invoice sequence counter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BusinessSettings {
    pub company_name: Option<String>,
    pub company_slogan: Option<String>,
    pub company_address: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub company_footer: Option<String>,
    pub invoice_sequence: Option<i64>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    Slogan,
    Address,
    Email,
    Phone,
    Footer,
}

impl SettingsField {
    pub fn column(&self) -> &'static str {
        match self {
            SettingsField::Name => "company_name",
            SettingsField::Slogan => "company_slogan",
            SettingsField::Address => "company_address",
            SettingsField::Email => "company_email",
            SettingsField::Phone => "company_phone",
            SettingsField::Footer => "company_footer",
        }
    }
}

impl std::str::FromStr for SettingsField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase();
        let key = key.strip_prefix("company_").unwrap_or(&key);
        match key {
            "name" => Ok(SettingsField::Name),
            "slogan" => Ok(SettingsField::Slogan),
            "address" => Ok(SettingsField::Address),
            "email" => Ok(SettingsField::Email),
            "phone" => Ok(SettingsField::Phone),
            "footer" => Ok(SettingsField::Footer),
            _ => Err(anyhow::anyhow!(
                "Unknown settings field '{}'. Expected one of: name, slogan, address, email, phone, footer",
                s
            )),
        }
    }
}

impl BusinessSettings {
    pub fn set(&mut self, field: SettingsField, value: Option<String>) {
        let slot = match field {
            SettingsField::Name => &mut self.company_name,
            SettingsField::Slogan => &mut self.company_slogan,
            SettingsField::Address => &mut self.company_address,
            SettingsField::Email => &mut self.company_email,
            SettingsField::Phone => &mut self.company_phone,
            SettingsField::Footer => &mut self.company_footer,
        };
        *slot = value;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Option<i64>,
    pub bank_name: String,
    pub branch_name: Option<String>,
    pub account_name: Option<String>,
    pub account_number: String,
    pub created_at: DateTime<Utc>,
}

impl BankAccount {
    pub fn new(bank_name: String, account_number: String) -> Self {
        Self {
            id: None,
            bank_name,
            branch_name: None,
            account_name: None,
            account_number,
            created_at: Utc::now(),
        }
    }

    pub fn with_branch(mut self, branch_name: Option<String>) -> Self {
        self.branch_name = branch_name;
        self
    }

    pub fn with_account_name(mut self, account_name: Option<String>) -> Self {
        self.account_name = account_name;
        self
    }
}
