use anyhow::{Context, Result};
use std::path::PathBuf;

use super::with_database;
use crate::db::queries::{BankAccountQueries, SettingsQueries};
use crate::models::{BankAccount, BusinessSettings, SettingsField};
use crate::utils::validation::{
    validate_email, validate_id, validate_optional_text, validate_phone, validate_required_text,
};

/// Company profile and bank details printed on invoices.
pub struct SettingsService {
    db_path: PathBuf,
}

impl SettingsService {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    pub async fn get(&self) -> Result<BusinessSettings> {
        with_database(&self.db_path, |db| SettingsQueries::get_or_create(&db.connection)).await
    }

    /// Update one company field. A blank value clears it.
    pub async fn set_field(&self, field: SettingsField, value: &str) -> Result<BusinessSettings> {
        let value = match field {
            SettingsField::Email => validate_email(value),
            SettingsField::Phone => validate_phone(value),
            _ => validate_optional_text(field.column(), value),
        }
        .with_context(|| format!("Invalid value for {}", field.column()))?;

        let settings = with_database(&self.db_path, move |db| {
            let mut settings = SettingsQueries::get_or_create(&db.connection)?;
            settings.set(field, value);
            SettingsQueries::update_company(&db.connection, &settings)?;
            SettingsQueries::get_or_create(&db.connection)
        })
        .await?;

        log::info!("Updated {}", field.column());
        Ok(settings)
    }

    pub async fn add_bank_account(
        &self,
        bank_name: &str,
        account_number: &str,
        branch_name: Option<&str>,
        account_name: Option<&str>,
    ) -> Result<BankAccount> {
        let bank_name = validate_required_text("bank_name", bank_name).context("Invalid bank name")?;
        let account_number = validate_required_text("account_number", account_number)
            .context("Invalid account number")?;
        let branch_name = branch_name
            .map(|b| validate_optional_text("branch_name", b))
            .transpose()?
            .flatten();
        let account_name = account_name
            .map(|a| validate_optional_text("account_name", a))
            .transpose()?
            .flatten();

        let mut account = BankAccount::new(bank_name, account_number)
            .with_branch(branch_name)
            .with_account_name(account_name);

        let to_save = account.clone();
        let account_id = with_database(&self.db_path, move |db| {
            BankAccountQueries::create(&db.connection, &to_save)
        })
        .await?;

        log::info!("Added bank account {} ({})", account_id, account.bank_name);
        account.id = Some(account_id);
        Ok(account)
    }

    pub async fn list_bank_accounts(&self) -> Result<Vec<BankAccount>> {
        with_database(&self.db_path, |db| BankAccountQueries::list_all(&db.connection)).await
    }

    pub async fn remove_bank_account(&self, account_id: i64) -> Result<()> {
        let account_id = validate_id("account_id", account_id).context("Invalid bank account ID")?;

        let removed = with_database(&self.db_path, move |db| {
            BankAccountQueries::delete(&db.connection, account_id)
        })
        .await?;

        if !removed {
            return Err(anyhow::anyhow!("Bank account with ID {} not found", account_id));
        }

        log::info!("Removed bank account {}", account_id);
        Ok(())
    }
}
