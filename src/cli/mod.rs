pub mod commands;
pub mod formatter;
pub mod reports;
pub mod types;

pub use clap::Parser;
pub use types::*;
