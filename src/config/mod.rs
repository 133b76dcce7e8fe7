pub mod toml_config;

pub use toml_config::{default_endpoints, HttpConfig, SnapshotConfig};

#[cfg(feature = "cli")]
pub use cli::CliConfig;

#[cfg(feature = "cli")]
mod cli {
    use super::SnapshotConfig;
    use crate::core::etl::FailurePolicy;
    use crate::core::json::JsonOrient;
    use crate::utils::error::Result;
    use crate::utils::logger::LogFormat;
    use clap::Parser;
    use std::path::PathBuf;

    /// Running with no flags exports the built-in standings and schedule
    /// endpoints into `src/assets/`.
    #[derive(Debug, Clone, Parser)]
    #[command(name = "table-snapshot")]
    #[command(about = "Snapshot HTML tables from the league site into JSON assets")]
    pub struct CliConfig {
        /// TOML file with endpoints and settings
        #[arg(long)]
        pub config: Option<PathBuf>,

        /// Directory that endpoint output paths are relative to
        #[arg(long)]
        pub base_dir: Option<PathBuf>,

        /// JSON layout of the written files
        #[arg(long, value_enum)]
        pub orient: Option<JsonOrient>,

        /// Stop at the first failing endpoint instead of exporting the rest
        #[arg(long)]
        pub fail_fast: bool,

        /// Fetch and parse, but write nothing
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, value_enum, default_value = "compact")]
        pub log_format: LogFormat,
    }

    impl CliConfig {
        /// Flags win over the config file, which wins over built-in defaults.
        pub fn into_snapshot_config(self) -> Result<SnapshotConfig> {
            let mut config = match &self.config {
                Some(path) => SnapshotConfig::from_file(path)?,
                None => SnapshotConfig::default(),
            };

            if let Some(base_dir) = self.base_dir {
                config.base_dir = base_dir;
            }
            if let Some(orient) = self.orient {
                config.orient = orient;
            }
            if self.fail_fast {
                config.failure_policy = FailurePolicy::FailFast;
            }

            Ok(config)
        }
    }

}
