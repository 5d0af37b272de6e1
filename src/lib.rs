pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemorySource, LocalModuleSource};
pub use config::TomlConfig;
pub use core::{CoefficientStore, QualityPolicy, StatService};
pub use http::{create_router, AppState};
pub use utils::error::{Result, StatsError};
