use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use fundwatch_domain::{DbConfig, RuntimeConfig};

pub const CONFIG_ENV: &str = "FUNDWATCH_CONFIG";

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Clickhouse,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "clickhouse" => Ok(StoreBackend::Clickhouse),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(anyhow!("unknown store_backend '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!("unknown log_format '{}'", other)),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub store_backend: StoreBackend,
    pub clickhouse_url: String,
    pub clickhouse_database: String,
    pub clickhouse_user: Option<String>,
    pub clickhouse_password: Option<String>,
    pub storage_timeout_ms: u64,
    pub request_timeout_seconds: u64,
    pub max_body_bytes: u64,
    pub startup_retry_attempts: u32,
    pub startup_retry_delay_seconds: u64,
    pub serialize_per_user: bool,
    pub log_format: LogFormat,
    pub log_dir: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            store_backend: StoreBackend::Clickhouse,
            clickhouse_url: "http://127.0.0.1:8123".to_string(),
            clickhouse_database: "fundwatch".to_string(),
            clickhouse_user: None,
            clickhouse_password: None,
            storage_timeout_ms: 5_000,
            request_timeout_seconds: 15,
            max_body_bytes: 64 * 1024,
            startup_retry_attempts: 5,
            startup_retry_delay_seconds: 2,
            serialize_per_user: false,
            log_format: LogFormat::Text,
            log_dir: None,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        let file_path = Path::new(&path);
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("failed to read {}", path))?;
            Self::from_toml(&content).with_context(|| format!("failed to parse {}", path))?
        } else {
            warn!(path = %path, "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_env_overrides()?;
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn normalize(&mut self) {
        self.clickhouse_user = non_blank(self.clickhouse_user.take());
        self.clickhouse_password = non_blank(self.clickhouse_password.take());
        self.log_dir = non_blank(self.log_dir.take());
        self.clickhouse_url = self.clickhouse_url.trim().to_string();
        self.clickhouse_database = self.clickhouse_database.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        if let Some(dir) = &self.log_dir {
            self.log_dir = Some(resolve_path(base, dir));
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.bind_addr
            .parse::<std::net::SocketAddr>()
            .map_err(|err| anyhow!("invalid bind_addr: {}", err))?;
        if self.store_backend == StoreBackend::Clickhouse {
            if self.clickhouse_url.is_empty() {
                return Err(anyhow!("clickhouse_url must not be empty"));
            }
            if self.clickhouse_database.is_empty()
                || !self
                    .clickhouse_database
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
            {
                return Err(anyhow!(
                    "clickhouse_database must be a plain identifier, got '{}'",
                    self.clickhouse_database
                ));
            }
        }
        if self.storage_timeout_ms == 0 {
            return Err(anyhow!("storage_timeout_ms must be greater than 0"));
        }
        if self.request_timeout_seconds == 0 {
            return Err(anyhow!("request_timeout_seconds must be greater than 0"));
        }
        if self.max_body_bytes == 0 {
            return Err(anyhow!("max_body_bytes must be greater than 0"));
        }
        if self.startup_retry_attempts == 0 {
            return Err(anyhow!("startup_retry_attempts must be greater than 0"));
        }
        let ingest_budget = self.to_runtime_config().ingest_budget();
        if u128::from(self.storage_timeout_ms) >= ingest_budget.as_millis() {
            return Err(anyhow!(
                "storage_timeout_ms ({}) must be below {}ms, four fifths of request_timeout_seconds",
                self.storage_timeout_ms,
                ingest_budget.as_millis()
            ));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
            storage_timeout_ms: self.storage_timeout_ms,
            serialize_per_user: self.serialize_per_user,
        }
    }

    pub fn to_db_config(&self) -> DbConfig {
        DbConfig {
            clickhouse_url: self.clickhouse_url.clone(),
            clickhouse_database: self.clickhouse_database.clone(),
            clickhouse_user: self.clickhouse_user.clone(),
            clickhouse_password: self.clickhouse_password.clone(),
        }
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides(|key| env::var(key).ok())
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(value) = lookup("FUNDWATCH_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("FUNDWATCH_STORE_BACKEND") {
            self.store_backend = value.parse()?;
        }
        if let Some(value) = lookup("FUNDWATCH_CLICKHOUSE_URL") {
            self.clickhouse_url = value;
        }
        if let Some(value) = lookup("FUNDWATCH_CLICKHOUSE_DATABASE") {
            self.clickhouse_database = value;
        }
        if let Some(value) = lookup("FUNDWATCH_CLICKHOUSE_USER") {
            self.clickhouse_user = Some(value);
        }
        if let Some(value) = lookup("FUNDWATCH_CLICKHOUSE_PASSWORD") {
            self.clickhouse_password = Some(value);
        }
        if let Some(value) = lookup("FUNDWATCH_STORAGE_TIMEOUT_MS") {
            self.storage_timeout_ms = value.parse().unwrap_or(self.storage_timeout_ms);
        }
        if let Some(value) = lookup("FUNDWATCH_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = value.parse().unwrap_or(self.request_timeout_seconds);
        }
        if let Some(value) = lookup("FUNDWATCH_MAX_BODY_BYTES") {
            self.max_body_bytes = value.parse().unwrap_or(self.max_body_bytes);
        }
        if let Some(value) = lookup("FUNDWATCH_STARTUP_RETRY_ATTEMPTS") {
            self.startup_retry_attempts = value.parse().unwrap_or(self.startup_retry_attempts);
        }
        if let Some(value) = lookup("FUNDWATCH_STARTUP_RETRY_DELAY_SECONDS") {
            self.startup_retry_delay_seconds =
                value.parse().unwrap_or(self.startup_retry_delay_seconds);
        }
        if let Some(value) = lookup("FUNDWATCH_SERIALIZE_PER_USER") {
            self.serialize_per_user = value.parse().unwrap_or(self.serialize_per_user);
        }
        if let Some(value) = lookup("FUNDWATCH_LOG_FORMAT") {
            self.log_format = value.parse()?;
        }
        if let Some(value) = lookup("FUNDWATCH_LOG_DIR") {
            self.log_dir = Some(value);
        }
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|raw| !raw.trim().is_empty())
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}
