use crate::adapters::http::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_REQUEST_TIMEOUT};
use crate::core::etl::FailurePolicy;
use crate::core::json::JsonOrient;
use crate::core::{ConfigProvider, SourceEndpoint};
use crate::utils::error::{Result, SnapshotError};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_BASE_DIR: &str = "src";
pub const STANDINGS_URL: &str = "https://www.womenseliterugby.us/standings";
pub const SCHEDULE_URL: &str = "https://www.womenseliterugby.us/2025-schedule";

pub fn default_endpoints() -> Vec<SourceEndpoint> {
    vec![
        SourceEndpoint::new("standings", STANDINGS_URL, "assets/standings.json"),
        SourceEndpoint::new("schedule", SCHEDULE_URL, "assets/schedule.json"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: DEFAULT_CONNECT_TIMEOUT.as_secs(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT.as_secs(),
            user_agent: concat!("table-snapshot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Everything a run needs. Any field left out of a TOML file keeps its
/// built-in default, so an empty file reproduces the no-argument run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotConfig {
    pub base_dir: PathBuf,
    pub orient: JsonOrient,
    pub failure_policy: FailurePolicy,
    pub http: HttpConfig,
    pub endpoints: Vec<SourceEndpoint>,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            orient: JsonOrient::default(),
            failure_policy: FailurePolicy::default(),
            http: HttpConfig::default(),
            endpoints: default_endpoints(),
        }
    }
}

impl SnapshotConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SnapshotError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SnapshotError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SnapshotError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }
}

impl Validate for SnapshotConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("base_dir", &self.base_dir.to_string_lossy())?;

        if self.endpoints.is_empty() {
            return Err(SnapshotError::ConfigError {
                message: "at least one endpoint must be configured".to_string(),
            });
        }

        for endpoint in &self.endpoints {
            validation::validate_non_empty_string("endpoints.name", &endpoint.name)?;
            validation::validate_url("endpoints.url", &endpoint.url)?;

            let output = endpoint.output.to_string_lossy();
            validation::validate_relative_path("endpoints.output", &output)?;
            validation::validate_extension("endpoints.output", &output, "json")?;
        }

        validation::validate_unique(
            "endpoints.name",
            self.endpoints.iter().map(|e| e.name.as_str()),
        )?;
        let outputs: Vec<String> = self
            .endpoints
            .iter()
            .map(|e| e.output.to_string_lossy().into_owned())
            .collect();
        validation::validate_unique("endpoints.output", outputs.iter().map(String::as_str))?;

        validation::validate_positive_number(
            "http.connect_timeout_seconds",
            self.http.connect_timeout_seconds,
            1,
        )?;
        validation::validate_positive_number(
            "http.request_timeout_seconds",
            self.http.request_timeout_seconds,
            1,
        )?;
        validation::validate_non_empty_string("http.user_agent", &self.http.user_agent)?;

        Ok(())
    }
}

impl ConfigProvider for SnapshotConfig {
    fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn endpoints(&self) -> &[SourceEndpoint] {
        &self.endpoints
    }

    fn orient(&self) -> JsonOrient {
        self.orient
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.http.connect_timeout_seconds)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.http.request_timeout_seconds)
    }

    fn user_agent(&self) -> &str {
        &self.http.user_agent
    }
}
