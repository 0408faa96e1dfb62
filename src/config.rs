use crate::domain::error::DomainError;
use crate::domain::values::rolling_window::DEFAULT_RETENTION_DAYS;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_HOST: &str = "gold-silver-live-price-india.p.rapidapi.com";
pub const DEFAULT_DATA_DIR: &str = "data/cities";
pub const DEFAULT_CITIES_PATH: &str = "cities_list.txt";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

pub const API_KEY_ENV: &str = "RAPIDAPI_KEY";
pub const BASE_URL_ENV: &str = "GOLDRATES_BASE_URL";
pub const TIMEOUT_ENV: &str = "GOLDRATES_TIMEOUT_SECS";

/// Credentials and endpoint for the upstream price API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_key: String,
    pub api_host: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl ApiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_host: DEFAULT_API_HOST.to_string(),
            base_url: format!("https://{DEFAULT_API_HOST}"),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Read `RAPIDAPI_KEY` (required, no default) plus optional
    /// `GOLDRATES_BASE_URL` and `GOLDRATES_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, DomainError> {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                DomainError::Config(format!("{API_KEY_ENV} environment variable is not set"))
            })?;

        let mut cfg = Self::new(api_key.trim());
        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            if !url.trim().is_empty() {
                cfg.base_url = url.trim().to_string();
            }
        }
        if let Ok(secs) = std::env::var(TIMEOUT_ENV) {
            cfg.timeout = parse_timeout_secs(&secs)?;
        }
        Ok(cfg)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Whole seconds, greater than zero.
fn parse_timeout_secs(raw: &str) -> Result<Duration, DomainError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(DomainError::Config(format!(
            "{TIMEOUT_ENV} must be a positive whole number of seconds"
        ))),
    }
}

/// Everything a run needs, built once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub cities_path: PathBuf,
    pub retention_days: usize,
    /// `None` for commands that never talk to the API (`trim`, `show`).
    pub api: Option<ApiConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            cities_path: PathBuf::from(DEFAULT_CITIES_PATH),
            retention_days: DEFAULT_RETENTION_DAYS,
            api: None,
        }
    }
}
