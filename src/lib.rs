pub mod billing;
pub mod cli;
pub mod db;
pub mod models;
pub mod services;
pub mod utils;

#[doc(hidden)]
pub mod test_utils;

pub use db::*;
pub use models::*;
pub use utils::*;
