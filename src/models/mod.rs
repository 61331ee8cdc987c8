pub mod client;
pub mod config;
pub mod money;
pub mod project;
pub mod settings;
pub mod work_item;

pub use client::{Client, ClientCategory, ClientId};
pub use config::Config;
pub use money::Money;
pub use project::Project;
pub use settings::{BankAccount, BusinessSettings, SettingsField};
pub use work_item::{StatusTransitionError, WorkItem, WorkItemId, WorkStatus};
