use crate::models::Money;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AdvanceSplit {
    pub advance: Money,
    pub balance: Money,
}

/// Divide a job's cost into an upfront advance and the remaining balance.
///
/// The advance is rounded half-up to whole units; the balance is whatever is
/// left, so `advance + balance == total` always holds. Callers keep
/// `advance_percent` in 10..=90, steps of 10.
pub fn split_advance(total: Money, advance_percent: u32) -> AdvanceSplit {
    let advance = total.percent(advance_percent).round_half_up();
    AdvanceSplit {
        advance,
        balance: total - advance,
    }
}

/// Descriptions for the two halves of a split job.
pub fn split_descriptions(task: &str, advance_percent: u32) -> (String, String) {
    let task = task.trim();
    (
        format!("{} (Advance - {}%)", task, advance_percent),
        format!("{} (Final Balance)", task),
    )
}
