//! Environment configuration
//!
//! Both sides read their settings from environment variables. Unset or
//! unparseable values fall back to the defaults below.

use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:5173", "http://127.0.0.1:5173"];
pub const DEFAULT_IMAGE_API_BASE: &str = "https://api.openai.com";
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Where the chat client finds its backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_base: String,
    /// No timeout when unset
    pub request_timeout: Option<Duration>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let api_base = non_blank(lookup("TATTOO_API_BASE"))
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());

        let request_timeout = non_blank(lookup("TATTOO_REQUEST_TIMEOUT_SECS")).and_then(|raw| {
            match raw.parse::<u64>() {
                Ok(0) => None,
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring invalid TATTOO_REQUEST_TIMEOUT_SECS");
                    None
                }
            }
        });

        Self {
            api_base,
            request_timeout,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            request_timeout: None,
        }
    }
}

/// Settings for the backend server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Loopback unless overridden
    pub host: IpAddr,
    pub port: u16,
    pub db_path: PathBuf,
    pub allowed_origins: Vec<String>,
    /// Image generation is disabled without a key
    pub openai_api_key: Option<String>,
    pub image_api_base: String,
    pub image_model: String,
    pub image_size: String,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let host = non_blank(lookup("TATTOO_HOST"))
            .and_then(|raw| match raw.parse() {
                Ok(host) => Some(host),
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring invalid TATTOO_HOST");
                    None
                }
            })
            .unwrap_or(DEFAULT_HOST);

        let port = non_blank(lookup("TATTOO_PORT"))
            .and_then(|raw| match raw.parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring invalid TATTOO_PORT");
                    None
                }
            })
            .unwrap_or(DEFAULT_PORT);

        let db_path = non_blank(lookup("TATTOO_DB_PATH")).map_or_else(
            || {
                let home = lookup("HOME").unwrap_or_else(|| "/tmp".to_string());
                PathBuf::from(home).join(".tattoo-studio").join("tattoo.db")
            },
            PathBuf::from,
        );

        let allowed_origins = non_blank(lookup("TATTOO_ALLOWED_ORIGINS")).map_or_else(
            || DEFAULT_ALLOWED_ORIGINS.iter().map(ToString::to_string).collect(),
            |raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            },
        );

        Self {
            host,
            port,
            db_path,
            allowed_origins,
            openai_api_key: non_blank(lookup("OPENAI_API_KEY")),
            image_api_base: non_blank(lookup("TATTOO_IMAGE_API_BASE"))
                .unwrap_or_else(|| DEFAULT_IMAGE_API_BASE.to_string()),
            image_model: non_blank(lookup("TATTOO_IMAGE_MODEL"))
                .unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            image_size: non_blank(lookup("TATTOO_IMAGE_SIZE"))
                .unwrap_or_else(|| DEFAULT_IMAGE_SIZE.to_string()),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
