use std::collections::HashMap;
use std::env;
use std::fs;
use std::net::SocketAddr;

use chrono_tz::Tz;
use thiserror::Error;

use crate::clients::calendar_client::DEFAULT_CALENDAR_API_URL;
use crate::clients::openai_client::{DEFAULT_OPENAI_API_URL, DEFAULT_OPENAI_MODEL, OpenAISettings};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3030";
const DEFAULT_TIME_ZONE: &str = "UTC";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("unknown time zone {0:?}")]
    TimeZone(String),
    #[error("invalid bind address {0:?}")]
    BindAddr(String),
    #[error("invalid run mode {0:?}")]
    RunMode(String),
}

#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = &value[1..value.len() - 1];
            }
            values.insert(key.to_string(), value.to_string());
        }
        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    /// File value first, then the process environment. Blank values count as unset.
    pub fn get_or_env(&self, key: &str) -> Option<String> {
        self.get(key)
            .or_else(|| env::var(key).ok())
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Cli,
    Api,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub run_mode: RunMode,
    pub openai: OpenAISettings,
    pub calendar_api_url: String,
    pub time_zone: Tz,
    pub bind_addr: SocketAddr,
    pub provider_token: Option<String>,
    pub user_email: Option<String>,
}

impl Settings {
    pub fn resolve(config: &AppConfig) -> Result<Self, ConfigError> {
        Self::resolve_with(|key| config.get_or_env(key))
    }

    pub fn resolve_with(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let run_mode = match get("RUN_MODE").as_deref() {
            None | Some("cli") => RunMode::Cli,
            Some("api") => RunMode::Api,
            Some(other) => return Err(ConfigError::RunMode(other.to_string())),
        };

        let openai = OpenAISettings {
            api_key: get("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?,
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            api_url: get("OPENAI_API_URL").unwrap_or_else(|| DEFAULT_OPENAI_API_URL.to_string()),
        };

        let zone_name = get("TIME_ZONE")
            .or_else(|| get("TZ"))
            .unwrap_or_else(|| DEFAULT_TIME_ZONE.to_string());
        let time_zone: Tz = zone_name
            .trim()
            .parse()
            .map_err(|_| ConfigError::TimeZone(zone_name.clone()))?;

        let bind = get("API_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind.parse().map_err(|_| ConfigError::BindAddr(bind.clone()))?;

        Ok(Self {
            run_mode,
            openai,
            calendar_api_url: get("GOOGLE_CALENDAR_API_URL")
                .unwrap_or_else(|| DEFAULT_CALENDAR_API_URL.to_string()),
            time_zone,
            bind_addr,
            provider_token: get("GOOGLE_PROVIDER_TOKEN"),
            user_email: get("USER_EMAIL"),
        })
    }
}
