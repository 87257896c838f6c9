//! Runtime configuration for [`Db`](crate::db::Db)

use crate::interceptor::TracingInterceptor;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;

fn default_dialect() -> String {
    "mysql".to_string()
}

fn default_log_level() -> String {
    "debug".to_string()
}

fn default_max_logged_sql_length() -> Option<usize> {
    Some(200)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Registry name of the dialect to render with
    #[serde(default = "default_dialect")]
    pub dialect: String,

    /// Log every rendered statement through `tracing`
    #[serde(default)]
    pub log_sql: bool,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// `None` logs statements in full
    #[serde(default = "default_max_logged_sql_length")]
    pub max_logged_sql_length: Option<usize>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            log_sql: false,
            log_level: default_log_level(),
            max_logged_sql_length: default_max_logged_sql_length(),
        }
    }
}

impl Config {
    /// Parse and validate a JSON document
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.dialect.trim().is_empty() {
            return Err(Error::invalid_argument("config: dialect must not be empty"));
        }
        self.level().map(|_| ())
    }

    /// `log_level` as a tracing level
    pub fn level(&self) -> Result<Level> {
        Level::from_str(self.log_level.trim()).map_err(|_| {
            Error::invalid_argument(format!("config: unknown log level '{}'", self.log_level))
        })
    }

    /// The statement logger described by this config, if `log_sql` is on
    pub fn tracing_interceptor(&self) -> Result<Option<TracingInterceptor>> {
        if !self.log_sql {
            return Ok(None);
        }

        let hook = TracingInterceptor::new().level(self.level()?);
        Ok(Some(match self.max_logged_sql_length {
            Some(len) => hook.max_sql_length(len),
            None => hook.no_truncate(),
        }))
    }
}
