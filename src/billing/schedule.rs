use crate::models::WorkItem;
use chrono::{Duration, NaiveDate};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Urgency {
    pub urgent: Vec<WorkItem>,
    pub upcoming: Vec<WorkItem>,
}

/// Split dated items into those due within `urgent_window_days` of `now`
/// (boundary inclusive) and those due later.
///
/// Items without a due date are dropped. Input order is kept; callers pass
/// items already sorted by due date.
pub fn classify_by_urgency(items: &[WorkItem], now: NaiveDate, urgent_window_days: u32) -> Urgency {
    let cutoff = now + Duration::days(i64::from(urgent_window_days));
    let mut urgency = Urgency::default();

    for item in items {
        match item.due_date {
            Some(due) if due <= cutoff => urgency.urgent.push(item.clone()),
            Some(_) => urgency.upcoming.push(item.clone()),
            None => {}
        }
    }

    urgency
}
