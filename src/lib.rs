pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{HttpFetcher, LocalStorage};
pub use config::SnapshotConfig;
pub use crate::core::{etl::EtlEngine, json::JsonOrient, pipeline::SnapshotPipeline};
pub use domain::model::{SourceEndpoint, TabularDataset};
pub use utils::error::{Result, SnapshotError};
