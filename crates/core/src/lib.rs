pub mod config;
pub mod error;
pub mod paths;

pub use config::{AutomationConfig, Config, DriverConfig};
pub use error::{Error, Result};
pub use paths::Paths;
