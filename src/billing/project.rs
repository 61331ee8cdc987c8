use crate::models::{Money, WorkItem, WorkItemId};
use serde::Serialize;
use std::collections::HashSet;

/// The part of a description before the first `" ("`, trimmed.
///
/// `"Website (Advance - 50%)"` and `"Website (Final Balance)"` both map to
/// `"Website"`. Only used for items that predate explicit project ids.
pub fn project_root_name(description: &str) -> String {
    match description.find(" (") {
        Some(idx) => description[..idx].trim().to_string(),
        None => description.trim().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProjectStats {
    pub total: Money,
    pub prev_paid: Money,
    pub balance: Money,
}

/// Totals for a whole project as seen from one invoice.
///
/// `prev_paid` counts PAID items not on this invoice; `balance` is what is
/// still owed once this invoice is settled. `all_related` should contain
/// every item of `billed_now`.
pub fn compute_project_stats(billed_now: &[WorkItem], all_related: &[WorkItem]) -> ProjectStats {
    let billed_ids: HashSet<WorkItemId> = billed_now.iter().filter_map(|item| item.id).collect();

    let total: Money = all_related.iter().map(|item| item.cost).sum();
    let prev_paid: Money = all_related
        .iter()
        .filter(|item| item.is_paid())
        .filter(|item| item.id.map_or(true, |id| !billed_ids.contains(&id)))
        .map(|item| item.cost)
        .sum();
    let billed: Money = billed_now.iter().map(|item| item.cost).sum();

    ProjectStats {
        total,
        prev_paid,
        balance: total - prev_paid - billed,
    }
}

/// Items from `candidates` that belong to the same project as `target`.
///
/// Items with a project id match on it. Older items without one fall back to
/// matching client and [`project_root_name`].
pub fn related_items<'a>(target: &WorkItem, candidates: &'a [WorkItem]) -> Vec<&'a WorkItem> {
    match target.project_id {
        Some(project_id) => candidates
            .iter()
            .filter(|item| item.project_id == Some(project_id))
            .collect(),
        None => {
            let root = project_root_name(&target.description);
            candidates
                .iter()
                .filter(|item| item.project_id.is_none())
                .filter(|item| item.client_id == target.client_id)
                .filter(|item| project_root_name(&item.description) == root)
                .collect()
        }
    }
}
