pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::{build_notifier, InMemoryCityStore};
#[cfg(feature = "store-sqlite")]
pub use adapters::SqliteCityStore;
pub use app::{Application, Reply, Request};
pub use config::AppConfig;
#[cfg(feature = "cli")]
pub use config::{CliConfig, Command};
pub use utils::error::{CityInfoError, Result};
