use crate::models::{Client, ClientId, Money, WorkItem, WorkStatus};
use chrono::{DateTime, Datelike, FixedOffset};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

fn total_with_status(items: &[WorkItem], status: WorkStatus) -> Money {
    items
        .iter()
        .filter(|item| item.status == status)
        .map(|item| item.cost)
        .sum()
}

/// Sum of cost over UNBILLED items. Zero for an empty slice.
pub fn unbilled_total(items: &[WorkItem]) -> Money {
    total_with_status(items, WorkStatus::Unbilled)
}

pub fn paid_total(items: &[WorkItem]) -> Money {
    total_with_status(items, WorkStatus::Paid)
}

/// Outstanding work for one client on the pending-invoices view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientGroup {
    pub client: Client,
    pub items: Vec<WorkItem>,
    pub total: Money,
    pub count: usize,
}

/// Group UNBILLED items by client.
///
/// Items whose client is not present in `clients` are left out instead of
/// failing the whole view.
pub fn group_unbilled_by_client(
    items: &[WorkItem],
    clients: &[Client],
) -> BTreeMap<ClientId, ClientGroup> {
    let directory: HashMap<ClientId, &Client> = clients
        .iter()
        .filter_map(|client| client.id.map(|id| (id, client)))
        .collect();

    let mut groups: BTreeMap<ClientId, ClientGroup> = BTreeMap::new();

    for item in items.iter().filter(|item| item.is_unbilled()) {
        let Some(client) = directory.get(&item.client_id) else {
            log::debug!(
                "Skipping work item {:?}: client {} not found",
                item.id,
                item.client_id
            );
            continue;
        };

        let group = groups.entry(item.client_id).or_insert_with(|| ClientGroup {
            client: (*client).clone(),
            items: Vec::new(),
            total: Money::ZERO,
            count: 0,
        });

        group.total += item.cost;
        group.count += 1;
        group.items.push(item.clone());
    }

    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RevenueSummary {
    pub total_earned: Money,
    pub this_month: Money,
    pub pending: Money,
    pub recent_paid: Vec<WorkItem>,
}

/// Figures for the revenue page: lifetime earnings, earnings in the calendar
/// month of `now`, pending collection and the latest payments. Item dates are
/// read in the offset of `now` so both sides use the same calendar.
pub fn revenue_summary(items: &[WorkItem], now: DateTime<FixedOffset>, history_limit: usize) -> RevenueSummary {
    let today = now.date_naive();
    let this_month = items
        .iter()
        .filter(|item| item.is_paid())
        .filter(|item| {
            let date = item.date.with_timezone(now.offset()).date_naive();
            date.year() == today.year() && date.month() == today.month()
        })
        .map(|item| item.cost)
        .sum();

    let mut recent_paid: Vec<WorkItem> = items.iter().filter(|item| item.is_paid()).cloned().collect();
    recent_paid.sort_by(|a, b| b.date.cmp(&a.date));
    recent_paid.truncate(history_limit);

    RevenueSummary {
        total_earned: paid_total(items),
        this_month,
        pending: unbilled_total(items),
        recent_paid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn item(id: i64, client_id: i64, cost: i64, status: WorkStatus) -> WorkItem {
        let mut item = WorkItem::new(client_id, format!("Job {}", id), Money::from(cost)).with_status(status);
        item.id = Some(id);
        item
    }

    fn client(id: i64, name: &str) -> Client {
        let mut client = Client::new(name.to_string());
        client.id = Some(id);
        client
    }

    #[test]
    fn test_unbilled_total() {
        assert_eq!(unbilled_total(&[]), Money::ZERO);

        let items = vec![
            item(1, 1, 100, WorkStatus::Unbilled),
            item(2, 1, 50, WorkStatus::Paid),
        ];
        assert_eq!(unbilled_total(&items), Money::from(100));
        assert_eq!(paid_total(&items), Money::from(50));
    }

    #[test]
    fn test_group_unbilled_by_client() {
        let clients = vec![client(1, "Acme"), client(2, "Globex")];
        let items = vec![
            item(1, 1, 1000, WorkStatus::Unbilled),
            item(2, 2, 400, WorkStatus::Unbilled),
            item(3, 1, 250, WorkStatus::Unbilled),
            item(4, 1, 999, WorkStatus::Paid),
            item(5, 7, 300, WorkStatus::Unbilled),
        ];

        let groups = group_unbilled_by_client(&items, &clients);
        assert_eq!(groups.len(), 2);

        let acme = &groups[&1];
        assert_eq!(acme.client.name, "Acme");
        assert_eq!(acme.count, 2);
        assert_eq!(acme.total, Money::from(1250));

        let globex = &groups[&2];
        assert_eq!(globex.count, 1);
        assert_eq!(globex.total, Money::from(400));
    }

    #[test]
    fn test_group_totals_match_unbilled_total_of_resolvable_items() {
        let clients = vec![client(1, "Acme"), client(2, "Globex")];
        let items = vec![
            item(1, 1, 120, WorkStatus::Unbilled),
            item(2, 2, 80, WorkStatus::Unbilled),
            item(3, 3, 500, WorkStatus::Unbilled),
            item(4, 2, 40, WorkStatus::Billed),
        ];

        let grouped: Money = group_unbilled_by_client(&items, &clients)
            .values()
            .map(|group| group.total)
            .sum();

        let resolvable: Vec<WorkItem> = items.iter().filter(|i| i.client_id != 3).cloned().collect();
        assert_eq!(grouped, unbilled_total(&resolvable));
    }

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_revenue_summary() {
        let today: DateTime<FixedOffset> = utc(2025, 3, 15, 12).into();
        let items = vec![
            item(1, 1, 1000, WorkStatus::Paid).with_date(Utc.with_ymd_and_hms(2025, 3, 2, 9, 0, 0).unwrap()),
            item(2, 1, 700, WorkStatus::Paid).with_date(Utc.with_ymd_and_hms(2025, 1, 20, 9, 0, 0).unwrap()),
            // Same month, previous year
            item(3, 1, 300, WorkStatus::Paid).with_date(Utc.with_ymd_and_hms(2024, 3, 10, 9, 0, 0).unwrap()),
            item(4, 1, 450, WorkStatus::Unbilled).with_date(Utc.with_ymd_and_hms(2025, 3, 5, 9, 0, 0).unwrap()),
        ];

        let summary = revenue_summary(&items, today, 2);
        assert_eq!(summary.total_earned, Money::from(2000));
        assert_eq!(summary.this_month, Money::from(1000));
        assert_eq!(summary.pending, Money::from(450));
        assert_eq!(
            summary.recent_paid.iter().map(|i| i.id).collect::<Vec<_>>(),
            vec![Some(1), Some(2)]
        );
    }

    #[test]
    fn test_this_month_uses_the_callers_offset() {
        let colombo = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let now = colombo.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        // 20:00 UTC on Feb 28 is already March 1 in Colombo.
        let items = vec![
            item(1, 1, 400, WorkStatus::Paid).with_date(utc(2025, 2, 28, 20)),
            item(2, 1, 900, WorkStatus::Paid).with_date(utc(2025, 2, 28, 10)),
        ];

        assert_eq!(revenue_summary(&items, now, 5).this_month, Money::from(400));
        let late_in_utc: DateTime<FixedOffset> = utc(2025, 2, 28, 23).into();
        assert_eq!(revenue_summary(&items, late_in_utc, 5).this_month, Money::from(1300));
    }
}
