use std::{fmt, str::FromStr};

use crate::{errors::AppError, validation::ReviewRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    S3,
    Memory,
}

impl FromStr for StoreKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" | "r2" => Ok(StoreKind::S3),
            "memory" => Ok(StoreKind::Memory),
            other => Err(AppError::EnvError(format!(
                "REVIEW_STORE must be 's3' or 'memory', got '{other}'"
            ))),
        }
    }
}

#[derive(Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint_url: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub region: String,
}

fn redacted(value: &Option<String>) -> Option<&'static str> {
    value.as_ref().map(|_| "<redacted>")
}

// keeps credentials out of logs
impl fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageConfig")
            .field("bucket", &self.bucket)
            .field("endpoint_url", &self.endpoint_url)
            .field("access_key_id", &redacted(&self.access_key_id))
            .field("secret_access_key", &redacted(&self.secret_access_key))
            .field("region", &self.region)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub store: StoreKind,
    pub storage: StorageConfig,
    pub allowed_origins: Vec<String>,
    pub rate_limit_per_minute: u32,
    pub rules: ReviewRules,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p
                .parse::<u16>()
                .map_err(|_| AppError::EnvError(format!("PORT is not a valid port: {p}")))?,
            None => 8000,
        };

        let store = match var("REVIEW_STORE") {
            Some(kind) => kind.parse()?,
            None => StoreKind::S3,
        };

        let rate_limit_per_minute = match var("RATE_LIMIT_PER_MINUTE") {
            Some(n) => n
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| {
                    AppError::EnvError(format!("RATE_LIMIT_PER_MINUTE must be positive: {n}"))
                })?,
            None => 300,
        };

        let allowed_origins = split_list(&var("ALLOWED_ORIGINS").unwrap_or_else(|| "*".into()));

        let rules = match var("REVIEW_TAG_ALLOWLIST") {
            Some(tags) => ReviewRules::with_allowed_tags(split_list(&tags)),
            None => ReviewRules::default(),
        };

        let storage = StorageConfig {
            bucket: var("R2_BUCKET_NAME").unwrap_or_else(|| "recommendations-wall".into()),
            endpoint_url: var("R2_ENDPOINT_URL"),
            access_key_id: var("R2_ACCESS_KEY_ID"),
            secret_access_key: var("R2_SECRET_ACCESS_KEY"),
            region: var("R2_REGION").unwrap_or_else(|| "auto".into()),
        };

        Ok(Self {
            port,
            store,
            storage,
            allowed_origins,
            rate_limit_per_minute,
            rules,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
