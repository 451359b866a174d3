use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Reader configuration with validation
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Gremlin Server host name
    #[validate(length(min = 1, message = "Gremlin host cannot be empty"))]
    pub gremlin_host: String,

    /// Gremlin Server port (1-65535)
    #[validate(range(
        min = 1,
        max = 65535,
        message = "Gremlin port must be between 1 and 65535"
    ))]
    pub gremlin_port: u16,

    /// Upper bound on connecting and on waiting for each response frame
    #[validate(range(
        min = 1,
        max = 600000,
        message = "Request timeout must be between 1 and 600000 ms"
    ))]
    pub request_timeout_ms: u64,

    /// Rows per output block before the block sink seals it
    #[validate(range(
        min = 1,
        max = 10000,
        message = "Max block rows must be between 1 and 10000"
    ))]
    pub max_block_rows: usize,

    /// Fail requests whose `componenttype` is missing or unknown instead of
    /// returning an empty result
    pub strict_query_kind: bool,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            gremlin_host: "localhost".to_string(),
            gremlin_port: 8182,
            request_timeout_ms: 30_000,
            max_block_rows: 1_000,
            strict_query_kind: false,
        }
    }
}

impl ReaderConfig {
    /// Create configuration from environment variables (and `.env`) with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self {
            gremlin_host: env::var("GREMLIN_HOST").unwrap_or_else(|_| "localhost".to_string()),
            gremlin_port: parse_env_var("GREMLIN_PORT", "8182")?,
            request_timeout_ms: parse_env_var("GREMLIN_REQUEST_TIMEOUT_MS", "30000")?,
            max_block_rows: parse_env_var("READER_MAX_BLOCK_ROWS", "1000")?,
            strict_query_kind: parse_env_var("READER_STRICT_QUERY_KIND", "false")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// WebSocket endpoint of the Gremlin Server
    pub fn endpoint(&self) -> String {
        format!("ws://{}:{}/gremlin", self.gremlin_host, self.gremlin_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
