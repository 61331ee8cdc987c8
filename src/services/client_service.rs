use anyhow::{Context, Result};
use std::path::PathBuf;

use super::with_database;
use crate::db::queries::ClientQueries;
use crate::models::{Client, ClientId, Money};
use crate::utils::validation::{validate_client_name, validate_cost, validate_id, validate_phone};

/// Service layer for client records
pub struct ClientService {
    db_path: PathBuf,
}

impl ClientService {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Create a client. Passing a package price makes it a PACKAGE client.
    pub async fn create_client(
        &self,
        name: String,
        phone: Option<String>,
        package_price: Option<Money>,
    ) -> Result<Client> {
        let name = validate_client_name(&name).context("Invalid client name provided")?;
        let phone = match phone {
            Some(p) => validate_phone(&p).context("Invalid phone number provided")?,
            None => None,
        };

        let mut client = Client::new(name).with_phone(phone);
        if let Some(price) = package_price {
            client = client.with_package(validate_cost(price).context("Invalid package price")?);
        }
        client.validate()?;

        let to_save = client.clone();
        let client_id = with_database(&self.db_path, move |db| {
            ClientQueries::create(&db.connection, &to_save)
        })
        .await?;

        log::info!("Created client {} ({})", client_id, client.name);
        client.id = Some(client_id);
        Ok(client)
    }

    pub async fn list_clients(&self) -> Result<Vec<Client>> {
        with_database(&self.db_path, |db| ClientQueries::list_all(&db.connection)).await
    }

    pub async fn get_client(&self, client_id: ClientId) -> Result<Option<Client>> {
        let client_id = validate_id("client_id", client_id).context("Invalid client ID")?;
        with_database(&self.db_path, move |db| {
            ClientQueries::find_by_id(&db.connection, client_id)
        })
        .await
    }

    /// Remove a client that has no work recorded against it.
    pub async fn delete_client(&self, client_id: ClientId) -> Result<()> {
        let client_id = validate_id("client_id", client_id).context("Invalid client ID")?;

        with_database(&self.db_path, move |db| {
            let work_count = ClientQueries::count_work_items(&db.connection, client_id)?;
            if work_count > 0 {
                return Err(anyhow::anyhow!(
                    "Client {} has {} work item(s) and cannot be deleted",
                    client_id,
                    work_count
                ));
            }

            if !ClientQueries::delete(&db.connection, client_id)? {
                return Err(anyhow::anyhow!("Client with ID {} not found", client_id));
            }
            Ok(())
        })
        .await?;

        log::info!("Deleted client {}", client_id);
        Ok(())
    }
}
