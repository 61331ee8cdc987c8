use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::path::PathBuf;

use super::with_database;
use crate::billing::{split_advance, split_descriptions};
use crate::db::queries::{ClientQueries, ProjectQueries, WorkItemQueries};
use crate::models::{ClientId, Money, Project, WorkItem, WorkItemId, WorkStatus};
use crate::utils::validation::{
    validate_advance_percent, validate_cost, validate_description, validate_id,
};

/// A job as entered by the user.
#[derive(Debug, Clone)]
pub struct NewJob {
    pub client_id: ClientId,
    pub description: String,
    /// Falls back to the client's package price when absent.
    pub cost: Option<Money>,
    pub due_date: Option<NaiveDate>,
    /// Bill this percentage up front and the rest as a final balance.
    pub advance_percent: Option<u32>,
}

pub struct WorkService {
    db_path: PathBuf,
}

impl WorkService {
    pub fn new(db_path: PathBuf) -> Self {
        Self { db_path }
    }

    /// Record a job. A split job becomes a project with two items: the
    /// advance, which carries the due date, and the final balance.
    pub async fn add_job(&self, job: NewJob) -> Result<Vec<WorkItem>> {
        let client_id = validate_id("client_id", job.client_id).context("Invalid client ID")?;
        let description =
            validate_description(&job.description).context("Invalid job description")?;
        let advance_percent = job
            .advance_percent
            .map(validate_advance_percent)
            .transpose()
            .context("Invalid split")?;
        let cost = job.cost.map(validate_cost).transpose().context("Invalid job cost")?;
        let due_date = job.due_date;

        let items = with_database(&self.db_path, move |db| {
            let client = ClientQueries::find_by_id(&db.connection, client_id)?
                .ok_or_else(|| anyhow::anyhow!("Client with ID {} not found", client_id))?;

            let cost = match (cost, client.package_price) {
                (Some(cost), _) => cost,
                (None, Some(package_price)) => package_price,
                (None, None) => {
                    return Err(anyhow::anyhow!(
                        "A cost is required for {}, who has no package price",
                        client.name
                    ))
                }
            };

            let tx = db.connection.unchecked_transaction()?;

            let mut items = match advance_percent {
                None => vec![WorkItem::new(client_id, description, cost).with_due_date(due_date)],
                Some(percent) => {
                    let project_id =
                        ProjectQueries::create(&tx, &Project::new(client_id, description.clone()))?;
                    let split = split_advance(cost, percent);
                    let (advance_label, balance_label) = split_descriptions(&description, percent);

                    vec![
                        WorkItem::new(client_id, advance_label, split.advance)
                            .with_project(Some(project_id))
                            .with_due_date(due_date),
                        WorkItem::new(client_id, balance_label, split.balance)
                            .with_project(Some(project_id)),
                    ]
                }
            };

            for item in items.iter_mut() {
                item.id = Some(WorkItemQueries::create(&tx, item)?);
            }

            tx.commit()?;
            Ok(items)
        })
        .await?;

        log::info!("Recorded {} work item(s) for client {}", items.len(), client_id);
        Ok(items)
    }

    pub async fn list_jobs(
        &self,
        status: Option<WorkStatus>,
        client_id: Option<ClientId>,
    ) -> Result<Vec<WorkItem>> {
        with_database(&self.db_path, move |db| {
            WorkItemQueries::list_with_filter(&db.connection, status, client_id)
        })
        .await
    }

    pub async fn get_job(&self, item_id: WorkItemId) -> Result<Option<WorkItem>> {
        let item_id = validate_id("work_item_id", item_id).context("Invalid work item ID")?;
        with_database(&self.db_path, move |db| {
            WorkItemQueries::find_by_id(&db.connection, item_id)
        })
        .await
    }

    pub async fn set_status(&self, item_id: WorkItemId, status: WorkStatus) -> Result<WorkItem> {
        let item_id = validate_id("work_item_id", item_id).context("Invalid work item ID")?;
        let item = with_database(&self.db_path, move |db| {
            WorkItemQueries::update_status(&db.connection, item_id, status)
        })
        .await?;

        log::info!("Work item {} is now {}", item_id, item.status);
        Ok(item)
    }

    pub async fn delete_job(&self, item_id: WorkItemId) -> Result<()> {
        let item_id = validate_id("work_item_id", item_id).context("Invalid work item ID")?;
        with_database(&self.db_path, move |db| {
            WorkItemQueries::delete(&db.connection, item_id)
        })
        .await?;

        log::info!("Deleted work item {}", item_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;
    use crate::services::ClientService;
    use crate::test_utils::TestContext;
    use crate::utils::validation::ValidationError;
    use rust_decimal_macros::dec;

    async fn client(ctx: &TestContext, package: Option<Money>) -> ClientId {
        ClientService::new(ctx.db_path.clone())
            .create_client("Acme".to_string(), None, package)
            .await
            .unwrap()
            .id
            .unwrap()
    }

    fn job(client_id: ClientId, description: &str, cost: Option<Money>) -> NewJob {
        NewJob {
            client_id,
            description: description.to_string(),
            cost,
            due_date: None,
            advance_percent: None,
        }
    }

    #[tokio::test]
    async fn test_add_single_job() {
        let ctx = TestContext::new().unwrap();
        let client_id = client(&ctx, None).await;
        let service = WorkService::new(ctx.db_path.clone());

        let due = NaiveDate::from_ymd_opt(2025, 12, 20);
        let mut new_job = job(client_id, "Poster", Some(Money::from(1500)));
        new_job.due_date = due;

        let items = service.add_job(new_job).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, WorkStatus::Unbilled);
        assert_eq!(items[0].project_id, None);

        let stored = service.get_job(items[0].id.unwrap()).await.unwrap().unwrap();
        assert_eq!(stored.cost, Money::from(1500));
        assert_eq!(stored.due_date, due);
    }

    #[tokio::test]
    async fn test_add_split_job() {
        let ctx = TestContext::new().unwrap();
        let client_id = client(&ctx, None).await;
        let service = WorkService::new(ctx.db_path.clone());

        let mut new_job = job(client_id, "Website", Some(Money::new(dec!(10001))));
        new_job.due_date = NaiveDate::from_ymd_opt(2025, 11, 1);
        new_job.advance_percent = Some(30);

        let items = service.add_job(new_job).await.unwrap();
        assert_eq!(items.len(), 2);

        let (advance, balance) = (&items[0], &items[1]);
        assert_eq!(advance.description, "Website (Advance - 30%)");
        assert_eq!(advance.cost, Money::new(dec!(3000)));
        assert!(advance.due_date.is_some());

        assert_eq!(balance.description, "Website (Final Balance)");
        assert_eq!(balance.cost, Money::new(dec!(7001)));
        assert_eq!(balance.due_date, None);

        assert!(advance.project_id.is_some());
        assert_eq!(advance.project_id, balance.project_id);

        let project = ProjectQueries::find_by_id(ctx.connection(), advance.project_id.unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(project.name, "Website");
        assert_eq!(project.client_id, client_id);
    }

    #[tokio::test]
    async fn test_package_price_fills_missing_cost() {
        let ctx = TestContext::new().unwrap();
        let package_client = client(&ctx, Some(Money::from(25000))).await;
        let service = WorkService::new(ctx.db_path.clone());

        let items = service
            .add_job(job(package_client, "Monthly retainer", None))
            .await
            .unwrap();
        assert_eq!(items[0].cost, Money::from(25000));

        let standard_client = client(&ctx, None).await;
        assert!(service.add_job(job(standard_client, "Logo", None)).await.is_err());
    }

    #[tokio::test]
    async fn test_rejects_bad_jobs() {
        let ctx = TestContext::new().unwrap();
        let client_id = client(&ctx, None).await;
        let service = WorkService::new(ctx.db_path.clone());

        assert!(service.add_job(job(client_id, " ", Some(Money::from(10)))).await.is_err());
        assert!(service
            .add_job(job(client_id, "Logo", Some(Money::from(-10))))
            .await
            .is_err());
        assert!(service.add_job(job(4242, "Logo", Some(Money::from(10)))).await.is_err());

        let mut bad_split = job(client_id, "Logo", Some(Money::from(10)));
        bad_split.advance_percent = Some(55);
        assert!(service.add_job(bad_split).await.is_err());

        let mut huge = job(client_id, "Site", Some("79228162514264337593543950335".parse().unwrap()));
        huge.advance_percent = Some(50);
        let err = service.add_job(huge).await.unwrap_err();
        assert!(err.chain().any(|cause| cause.is::<ValidationError>()));

        assert!(service.list_jobs(None, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_and_delete() {
        let ctx = TestContext::new().unwrap();
        let client_id = client(&ctx, None).await;
        let service = WorkService::new(ctx.db_path.clone());

        let first = service
            .add_job(job(client_id, "Flyer", Some(Money::from(900))))
            .await
            .unwrap()[0]
            .id
            .unwrap();
        let second = service
            .add_job(job(client_id, "Banner", Some(Money::from(1200))))
            .await
            .unwrap()[0]
            .id
            .unwrap();

        service.set_status(first, WorkStatus::Billed).await.unwrap();
        assert!(service.set_status(first, WorkStatus::Unbilled).await.is_err());

        let billed = service.list_jobs(Some(WorkStatus::Billed), None).await.unwrap();
        assert_eq!(billed.len(), 1);

        let err = service.delete_job(first).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<StoreError>(),
            Some(StoreError::NotDeletable { .. })
        ));

        service.delete_job(second).await.unwrap();
        assert_eq!(service.list_jobs(None, Some(client_id)).await.unwrap().len(), 1);
    }
}
