pub mod checkpoint;
pub mod config;
pub mod logging;
pub mod runner;

pub use config::{ConfigError, ScraperConfig};
pub use runner::{BatchEvent, BatchOutcome, BatchRunner};
