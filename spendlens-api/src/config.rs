use config::{Config, ConfigError, File};
use extractors::PatternConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PORT: &str = "PORT";
pub const ENV_FRONTEND_URL: &str = "FRONTEND_URL";
pub const ENV_REDIS_ADDRESS: &str = "REDIS_ADDRESS";
pub const ENV_GMAIL_CLIENT_ID: &str = "GMAIL_CLIENT_ID";
pub const ENV_GMAIL_CLIENT_SECRET: &str = "GMAIL_CLIENT_SECRET";

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct ApiConfig {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub google_oauth: GoogleOAuthConfig,
    pub cache: CacheConfig,
    pub gmail: GmailConfig,
    pub patterns: PatternConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct CorsConfig {
    /// Origin echoed in `Access-Control-Allow-Origin`; any origin when unset.
    pub frontend_url: Option<String>,
}

impl CorsConfig {
    /// Specific origin to allow. `None` for unset, blank or `*`, meaning any origin.
    pub fn allowed_origin(&self) -> Option<&str> {
        match self.frontend_url.as_deref().map(str::trim) {
            Some("") | Some("*") | None => None,
            Some(origin) => Some(origin.trim_end_matches('/')),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct GoogleOAuthConfig {
    pub client_id: String,
    pub client_secret: Option<String>,
}

impl GoogleOAuthConfig {
    pub fn is_configured(&self) -> bool {
        !self.client_id.is_empty() && self.client_secret.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    /// `host:port` or a full `redis://` URL. Without it an in-process cache is used.
    pub redis_address: Option<String>,
    pub on_demand_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_address: None,
            on_demand_ttl_secs: 600,
            refresh_ttl_secs: 1200,
        }
    }
}

impl CacheConfig {
    pub fn redis_url(&self) -> Option<String> {
        let address = self.redis_address.as_deref()?.trim();
        if address.is_empty() {
            return None;
        }

        if address.contains("://") {
            Some(address.to_string())
        } else {
            Some(format!("redis://{address}/"))
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct GmailConfig {
    pub api_base_url: String,
    pub subject_keywords: Vec<String>,
    pub request_timeout_secs: u64,
}

impl Default for GmailConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://gmail.googleapis.com/gmail/v1".to_string(),
            subject_keywords: vec![
                "transaction".to_string(),
                "payment".to_string(),
                "purchase".to_string(),
                "UPI txn".to_string(),
            ],
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    /// Loads defaults, then the TOML file, then environment overrides.
    pub fn load(explicit_path: Option<&Path>) -> Result<(Self, PathBuf), ConfigError> {
        let config_path = explicit_path
            .map(Path::to_path_buf)
            .unwrap_or_else(get_config_path);

        let config = Self::from_sources(&config_path, |name| std::env::var(name).ok())?;
        Ok((config, config_path))
    }

    pub fn from_sources<F>(config_path: &Path, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let builder = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .set_override_option("server.port", env(ENV_PORT))?
            .set_override_option("cors.frontend_url", env(ENV_FRONTEND_URL))?
            .set_override_option("cache.redis_address", env(ENV_REDIS_ADDRESS))?
            .set_override_option("google_oauth.client_id", env(ENV_GMAIL_CLIENT_ID))?
            .set_override_option("google_oauth.client_secret", env(ENV_GMAIL_CLIENT_SECRET))?
            .build()?;

        let config: ApiConfig = builder.try_deserialize()?;

        if config.gmail.subject_keywords.is_empty() {
            return Err(ConfigError::Message(
                "gmail.subject_keywords must list at least one keyword".to_string(),
            ));
        }

        Ok(config)
    }
}

pub fn get_config_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        config_dir.join("spendlens").join("api.toml")
    } else {
        PathBuf::from("api.toml")
    }
}
