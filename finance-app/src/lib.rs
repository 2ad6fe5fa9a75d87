pub mod config;
pub mod form;
pub mod logging;
pub mod report;
pub mod state;
pub mod table;
pub mod utils;

pub use config::{Config, ConfigError};
pub use form::EntryForm;
pub use state::{Session, SubmitError};
