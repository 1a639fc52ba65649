use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{LawDeskError, Result};

pub const DEFAULT_UPSTREAM_ENDPOINT: &str = "http://localhost:11434/api/chat";
pub const DEFAULT_MODEL_NAME: &str = "tinyllama";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a legal advisor.";
pub const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 60;

/// How the generative-text upstream delivers its reply.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ResponseMode {
    /// One JSON object for the whole reply.
    Buffered,
    /// Newline-delimited JSON objects; the last one holds the final message.
    /// Ollama's closing `done: true` line has empty content, so against a
    /// stock Ollama server this mode always falls back. Use `buffered` there.
    #[default]
    Streaming,
}

impl FromStr for ResponseMode {
    type Err = LawDeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buffered" | "json" => Ok(Self::Buffered),
            "streaming" | "ndjson" | "stream" => Ok(Self::Streaming),
            other => Err(LawDeskError::Config(format!(
                "unknown response mode '{other}' (expected 'buffered' or 'streaming')"
            ))),
        }
    }
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered => f.write_str("buffered"),
            Self::Streaming => f.write_str("streaming"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub upstream_endpoint: String,
    pub model_name: String,
    pub request_timeout_seconds: u64,
    pub response_mode: ResponseMode,
    pub system_prompt: String,
    pub server_host: String,
    pub server_port: u16,
    pub static_dir: String,
    pub users_db_path: String,
    pub session_ttl_minutes: i64,
    pub tesseract_cmd: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            upstream_endpoint: DEFAULT_UPSTREAM_ENDPOINT.into(),
            model_name: DEFAULT_MODEL_NAME.into(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            response_mode: ResponseMode::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            server_host: "0.0.0.0".into(),
            server_port: 8000,
            static_dir: "static".into(),
            users_db_path: "./data/users".into(),
            session_ttl_minutes: 720,
            tesseract_cmd: "tesseract".into(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment, falling back to
    /// defaults for anything unset. Values that fail to parse are an error
    /// rather than silently defaulted.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let response_mode = match std::env::var("LAWDESK_RESPONSE_MODE") {
            Ok(raw) => raw.parse()?,
            Err(_) => defaults.response_mode,
        };

        let config = Self {
            upstream_endpoint: env_or("LAWDESK_UPSTREAM_ENDPOINT", defaults.upstream_endpoint),
            model_name: env_or("LAWDESK_MODEL_NAME", defaults.model_name),
            request_timeout_seconds: env_parse(
                "LAWDESK_REQUEST_TIMEOUT_SECONDS",
                defaults.request_timeout_seconds,
            )?,
            response_mode,
            system_prompt: env_or("LAWDESK_SYSTEM_PROMPT", defaults.system_prompt),
            server_host: env_or("SERVER_HOST", defaults.server_host),
            server_port: env_parse("SERVER_PORT", defaults.server_port)?,
            static_dir: env_or("LAWDESK_STATIC_DIR", defaults.static_dir),
            users_db_path: env_or("LAWDESK_USERS_DB", defaults.users_db_path),
            session_ttl_minutes: env_parse(
                "LAWDESK_SESSION_TTL_MINUTES",
                defaults.session_ttl_minutes,
            )?,
            tesseract_cmd: env_or("LAWDESK_TESSERACT_CMD", defaults.tesseract_cmd),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let url = Url::parse(&self.upstream_endpoint).map_err(|e| {
            LawDeskError::Config(format!(
                "invalid upstream endpoint '{}': {e}",
                self.upstream_endpoint
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(LawDeskError::Config(format!(
                "upstream endpoint must be http(s), got '{}'",
                url.scheme()
            )));
        }
        if self.request_timeout_seconds == 0 {
            return Err(LawDeskError::Config(
                "request timeout must be at least one second".into(),
            ));
        }
        if self.model_name.trim().is_empty() {
            return Err(LawDeskError::Config("model name must not be empty".into()));
        }
        if self.session_ttl_minutes <= 0 {
            return Err(LawDeskError::Config("session TTL must be positive".into()));
        }
        Ok(())
    }
}

fn env_or(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| LawDeskError::Config(format!("{key} has an invalid value '{raw}'"))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.request_timeout_seconds, 60);
        assert_eq!(config.response_mode, ResponseMode::Streaming);
    }

    #[test]
    fn response_mode_parses_aliases() {
        assert_eq!("buffered".parse::<ResponseMode>().unwrap(), ResponseMode::Buffered);
        assert_eq!(" NDJSON ".parse::<ResponseMode>().unwrap(), ResponseMode::Streaming);
        assert!("chunked".parse::<ResponseMode>().is_err());
    }

    #[test]
    fn validate_rejects_non_http_endpoint() {
        let config = AppConfig {
            upstream_endpoint: "ftp://localhost/api".into(),
            ..AppConfig::default()
        };
        assert!(matches!(config.validate(), Err(LawDeskError::Config(_))));
    }

    #[test]
    fn validate_rejects_zero_timeout() {
        let config = AppConfig {
            request_timeout_seconds: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
