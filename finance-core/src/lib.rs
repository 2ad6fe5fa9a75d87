pub mod calculations;
pub mod ledger;
pub mod models;

pub use calculations::{MetricsCalculator, MetricsError};
pub use ledger::Ledger;
pub use models::*;
