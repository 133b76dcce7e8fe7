use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("HTTP request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("HTTP {status} returned by {url}")]
    HttpStatusError { url: String, status: u16 },

    #[error("No <table> element found in {url}")]
    NoTableError { url: String },

    #[error("Table parse error: {message}")]
    ParseError { message: String },

    #[error("Failed to write {path}: {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}': '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Config,
    Network,
    Parse,
    Write,
}

impl SnapshotError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NetworkError(_) | Self::HttpStatusError { .. } => ErrorCategory::Network,
            Self::NoTableError { .. } | Self::ParseError { .. } => ErrorCategory::Parse,
            Self::WriteError { .. } | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Write
            }
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                ErrorCategory::Config
            }
        }
    }

    /// Process exit code for a run that ended with this error. Never zero.
    pub fn exit_code(&self) -> i32 {
        match self.category() {
            ErrorCategory::Config => 1,
            ErrorCategory::Network => 2,
            ErrorCategory::Parse => 3,
            ErrorCategory::Write => 4,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::NetworkError(e) if e.is_timeout() => {
                "The site did not answer in time; retry later or raise http.request_timeout_seconds"
            }
            Self::NetworkError(_) => "Check network connectivity and that the host is reachable",
            Self::HttpStatusError { .. } => "Verify the endpoint URL; the page may have moved",
            Self::NoTableError { .. } => {
                "The page layout changed or the table is rendered client-side"
            }
            Self::ParseError { .. } => "Inspect the page's first <table>; it may be empty",
            Self::WriteError { .. } | Self::IoError(_) => {
                "Check that the base directory exists and is writable"
            }
            Self::SerializationError(_) => "Report this as a bug with the offending page",
            Self::ConfigError { .. } | Self::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command-line flags and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::NetworkError(e) => match e.url() {
                Some(url) => format!("Could not download {}", url),
                None => "Could not download page".to_string(),
            },
            Self::HttpStatusError { url, status } => {
                format!("Server answered {} for {}", status, url)
            }
            Self::NoTableError { url } => format!("No table found on {}", url),
            Self::ParseError { message } => format!("Could not read table: {}", message),
            Self::WriteError { path, .. } => format!("Could not write {}", path),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SnapshotError>;
