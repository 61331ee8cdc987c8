use anyhow::Result;
use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::Serialize;
use std::path::PathBuf;

use super::with_database;
use crate::billing::{classify_by_urgency, revenue_summary, unbilled_total, RevenueSummary, Urgency};
use crate::db::queries::WorkItemQueries;
use crate::models::{Config, Money, WorkStatus};

/// Numbers shown on the home screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dashboard {
    pub unbilled_total: Money,
    pub unbilled_count: usize,
    pub urgency: Urgency,
}

pub struct DashboardService {
    db_path: PathBuf,
    urgent_window_days: u32,
    upcoming_limit: usize,
    history_limit: usize,
}

impl DashboardService {
    pub fn new(db_path: PathBuf, config: &Config) -> Self {
        Self {
            db_path,
            urgent_window_days: config.urgent_window_days,
            upcoming_limit: config.upcoming_limit,
            history_limit: config.history_limit,
        }
    }

    pub async fn dashboard(&self, today: NaiveDate) -> Result<Dashboard> {
        let window = self.urgent_window_days;
        let upcoming_limit = self.upcoming_limit;

        with_database(&self.db_path, move |db| {
            let unbilled =
                WorkItemQueries::list_with_filter(&db.connection, Some(WorkStatus::Unbilled), None)?;
            let scheduled = WorkItemQueries::list_unbilled_scheduled(&db.connection)?;

            let mut urgency = classify_by_urgency(&scheduled, today, window);
            urgency.upcoming.truncate(upcoming_limit);

            Ok(Dashboard {
                unbilled_total: unbilled_total(&unbilled),
                unbilled_count: unbilled.len(),
                urgency,
            })
        })
        .await
    }

    pub async fn revenue(&self, now: DateTime<FixedOffset>) -> Result<RevenueSummary> {
        let history_limit = self.history_limit;
        with_database(&self.db_path, move |db| {
            let items = WorkItemQueries::list_all(&db.connection)?;
            Ok(revenue_summary(&items, now, history_limit))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{ClientService, InvoiceService, NewJob, WorkService};
    use crate::test_utils::TestContext;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 18).unwrap()
    }

    async fn add(work: &WorkService, client_id: i64, description: &str, cost: i64, due_in: Option<i64>) {
        work.add_job(NewJob {
            client_id,
            description: description.to_string(),
            cost: Some(Money::from(cost)),
            due_date: due_in.map(|days| today() + Duration::days(days)),
            advance_percent: None,
        })
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_dashboard_classifies_and_limits() {
        let ctx = TestContext::new().unwrap();
        let client_id = ClientService::new(ctx.db_path.clone())
            .create_client("Acme".to_string(), None, None)
            .await
            .unwrap()
            .id
            .unwrap();
        let work = WorkService::new(ctx.db_path.clone());

        add(&work, client_id, "Overdue", 100, Some(-1)).await;
        add(&work, client_id, "Edge", 100, Some(2)).await;
        add(&work, client_id, "Later 1", 100, Some(3)).await;
        add(&work, client_id, "Later 2", 100, Some(9)).await;
        add(&work, client_id, "Later 3", 100, Some(5)).await;
        add(&work, client_id, "Undated", 100, None).await;

        let mut config = Config::default();
        config.upcoming_limit = 2;
        let service = DashboardService::new(ctx.db_path.clone(), &config);

        let dashboard = service.dashboard(today()).await.unwrap();
        assert_eq!(dashboard.unbilled_count, 6);
        assert_eq!(dashboard.unbilled_total, Money::from(600));

        let urgent: Vec<_> = dashboard.urgency.urgent.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(urgent, vec!["Overdue", "Edge"]);

        let upcoming: Vec<_> = dashboard.urgency.upcoming.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(upcoming, vec!["Later 1", "Later 3"]);
    }

    #[tokio::test]
    async fn test_revenue_after_payment() {
        let ctx = TestContext::new().unwrap();
        let client_id = ClientService::new(ctx.db_path.clone())
            .create_client("Acme".to_string(), None, None)
            .await
            .unwrap()
            .id
            .unwrap();
        let work = WorkService::new(ctx.db_path.clone());
        add(&work, client_id, "Poster", 1500, None).await;

        InvoiceService::new(ctx.db_path.clone(), "94".to_string())
            .pay(client_id, today())
            .await
            .unwrap();
        add(&work, client_id, "Flyer", 700, None).await;

        let service = DashboardService::new(ctx.db_path.clone(), &Config::default());
        let revenue = service.revenue(chrono::Utc::now().into()).await.unwrap();
        assert_eq!(revenue.total_earned, Money::from(1500));
        assert_eq!(revenue.this_month, Money::from(1500));
        assert_eq!(revenue.pending, Money::from(700));
        assert_eq!(revenue.recent_paid.len(), 1);
    }
}
