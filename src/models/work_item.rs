use super::{ClientId, Money};
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

pub type WorkItemId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkStatus {
    Unbilled,
    Billed,
    Paid,
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorkStatus::Unbilled => write!(f, "UNBILLED"),
            WorkStatus::Billed => write!(f, "BILLED"),
            WorkStatus::Paid => write!(f, "PAID"),
        }
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "UNBILLED" => Ok(WorkStatus::Unbilled),
            "BILLED" => Ok(WorkStatus::Billed),
            "PAID" => Ok(WorkStatus::Paid),
            _ => Err(anyhow::anyhow!("Invalid work status: {}", s)),
        }
    }
}

impl ToSql for WorkStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.to_string()))
    }
}

impl FromSql for WorkStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: anyhow::Error| FromSqlError::Other(e.into()))
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Cannot move work item from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: WorkStatus,
    pub to: WorkStatus,
}

impl WorkStatus {
    /// Allowed moves: UNBILLED -> BILLED -> PAID, plus UNBILLED -> PAID for
    /// jobs that are paid on the spot. PAID is terminal.
    pub fn can_transition_to(self, next: WorkStatus) -> bool {
        matches!(
            (self, next),
            (WorkStatus::Unbilled, WorkStatus::Billed)
                | (WorkStatus::Unbilled, WorkStatus::Paid)
                | (WorkStatus::Billed, WorkStatus::Paid)
        )
    }

    pub fn transition_to(self, next: WorkStatus) -> Result<WorkStatus, StatusTransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(StatusTransitionError { from: self, to: next })
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkItem {
    pub id: Option<WorkItemId>,
    pub client_id: ClientId,
    pub project_id: Option<i64>,
    pub description: String,
    pub cost: Money,
    pub date: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub status: WorkStatus,
}

impl WorkItem {
    pub fn new(client_id: ClientId, description: String, cost: Money) -> Self {
        Self {
            id: None,
            client_id,
            project_id: None,
            description,
            cost,
            date: Utc::now(),
            due_date: None,
            status: WorkStatus::Unbilled,
        }
    }

    pub fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_project(mut self, project_id: Option<i64>) -> Self {
        self.project_id = project_id;
        self
    }

    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_unbilled(&self) -> bool {
        self.status == WorkStatus::Unbilled
    }

    pub fn is_paid(&self) -> bool {
        self.status == WorkStatus::Paid
    }

    /// Only work that has not been put on an invoice may be removed.
    pub fn is_deletable(&self) -> bool {
        self.is_unbilled()
    }
}
