use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_BASE: &str = "/api";
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Which response contract the masking service speaks. Fixed per deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseVariant {
    /// `POST {base}/upload` answers with the masked image bytes.
    #[default]
    InlineBinary,
    /// `POST {base}/upload/` answers with `{"filename": ...}`.
    FilenameIndirection,
}

impl ResponseVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseVariant::InlineBinary => "inline",
            ResponseVariant::FilenameIndirection => "filename",
        }
    }
}

impl FromStr for ResponseVariant {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(ResponseVariant::InlineBinary),
            "filename" => Ok(ResponseVariant::FilenameIndirection),
            other => Err(ConfigError::InvalidVariant(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("MASKING_RESPONSE_VARIANT must be 'inline' or 'filename', got '{0}'")]
    InvalidVariant(String),

    #[error("MASKING_REQUEST_TIMEOUT_SECS must be a positive integer, got '{0}'")]
    InvalidTimeout(String),

    #[error("MASKING_API_ORIGIN must be an http(s) address, got '{0}'")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub base: String,
    pub origin: String,
    pub variant: ResponseVariant,
    pub request_timeout: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            origin: DEFAULT_ORIGIN.to_string(),
            variant: ResponseVariant::default(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let base = lookup("MASKING_API_BASE")
            .map(|base| base.trim().trim_end_matches('/').to_string())
            .unwrap_or(defaults.base);

        let origin = match lookup("MASKING_API_ORIGIN") {
            Some(origin) if is_absolute(origin.trim()) => {
                origin.trim().trim_end_matches('/').to_string()
            }
            Some(origin) => return Err(ConfigError::InvalidOrigin(origin)),
            None => defaults.origin,
        };

        let variant = match lookup("MASKING_RESPONSE_VARIANT") {
            Some(raw) => raw.parse()?,
            None => defaults.variant,
        };

        let request_timeout = match lookup("MASKING_REQUEST_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => defaults.request_timeout,
        };

        Ok(Self {
            base,
            origin,
            variant,
            request_timeout,
        })
    }

    /// Address as shown to the user, relative to `base` exactly as configured.
    pub fn display_address(&self, path: &str) -> String {
        format!("{}/{}", self.base, path.trim_start_matches('/'))
    }

    /// Turns a display address into something a request can be sent to.
    pub fn resolve(&self, address: &str) -> String {
        if is_absolute(address) {
            address.to_string()
        } else {
            format!("{}/{}", self.origin, address.trim_start_matches('/'))
        }
    }

    pub fn endpoint(&self, path: &str) -> String {
        self.resolve(&self.display_address(path))
    }
}

fn is_absolute(address: &str) -> bool {
    address.starts_with("http://") || address.starts_with("https://")
}
