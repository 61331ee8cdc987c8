//! Pure billing computations over snapshots of work items.
//!
//! Nothing in here touches the database or mutates its inputs.

pub mod contact;
pub mod invoice;
pub mod numbering;
pub mod project;
pub mod schedule;
pub mod split;
pub mod totals;

pub use contact::normalize_phone_to_whatsapp_url;
pub use invoice::{build_invoice, InvoiceDraft, InvoiceInput, InvoiceSection};
pub use numbering::{current_sequence, format_invoice_id, next_sequence, DEFAULT_INVOICE_SEQUENCE};
pub use project::{compute_project_stats, project_root_name, related_items, ProjectStats};
pub use schedule::{classify_by_urgency, Urgency};
pub use split::{split_advance, split_descriptions, AdvanceSplit};
pub use totals::{group_unbilled_by_client, paid_total, revenue_summary, unbilled_total, ClientGroup, RevenueSummary};
