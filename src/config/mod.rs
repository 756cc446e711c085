//! Configuration loading for the RESO seeder.
//!
//! Loads layered `.env` files and environment variables prefixed with
//! `RESO_`, producing a typed [`AppConfig`]. A few unprefixed names used by
//! the container init scripts (`ATLAS_DATAFILL_URI`, `CERT_REPORT_FILENAME`,
//! `LOOKUP_TYPE`) are honored as aliases.

use std::{collections::BTreeMap, collections::HashSet, env, path::PathBuf, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::models::tenant_config::LookupType;

const ENV_PREFIX: &str = "RESO_";

/// Unprefixed names from the container init scripts and the prefixed key each one feeds.
///
/// `CERT_REPORT_FILENAME` is taken as given: a relative name resolves against
/// the working directory, not the filesystem root.
const LEGACY_ALIASES: [(&str, &str); 3] = [
    ("ATLAS_DATAFILL_URI", "SOURCE_DATABASE_URL"),
    ("CERT_REPORT_FILENAME", "METADATA_REPORT_PATH"),
    ("LOOKUP_TYPE", "DEFAULT_LOOKUP_TYPE"),
];

/// Application configuration derived from `RESO_*` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct AppConfig {
    #[serde(default = "default_profile")]
    pub profile: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_log_format")]
    pub log_format: String,
    #[serde(default = "default_database_url")]
    pub database_url: String,
    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
    #[serde(default = "default_db_acquire_timeout_ms")]
    pub db_acquire_timeout_ms: u64,
    /// Remote database the copier reads from; absent means fallback only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_database_url: Option<String>,
    #[serde(default = "default_source_read_timeout_ms")]
    pub source_read_timeout_ms: u64,
    /// Base URL serving `<collection>.json` fallback blobs.
    #[serde(default = "default_fallback_base_url")]
    pub fallback_base_url: String,
    #[serde(default = "default_http_timeout_ms")]
    pub http_timeout_ms: u64,
    #[serde(default = "default_metadata_report_path")]
    pub metadata_report_path: PathBuf,
    #[serde(default = "default_lookup_type")]
    pub default_lookup_type: String,
    /// Copied documents are duplicated once per sandbox server id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sandbox_server_ids: Vec<String>,
    /// Loaded lookups are duplicated once per certification report id.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub certification_report_ids: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            profile: default_profile(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            database_url: default_database_url(),
            db_max_connections: default_db_max_connections(),
            db_acquire_timeout_ms: default_db_acquire_timeout_ms(),
            source_database_url: None,
            source_read_timeout_ms: default_source_read_timeout_ms(),
            fallback_base_url: default_fallback_base_url(),
            http_timeout_ms: default_http_timeout_ms(),
            metadata_report_path: default_metadata_report_path(),
            default_lookup_type: default_lookup_type(),
            sandbox_server_ids: Vec::new(),
            certification_report_ids: Vec::new(),
        }
    }
}

impl AppConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    pub fn source_read_timeout(&self) -> Duration {
        Duration::from_millis(self.source_read_timeout_ms)
    }

    /// Parsed default lookup representation for synthesized tenants.
    pub fn lookup_type(&self) -> Result<LookupType, ConfigError> {
        self.default_lookup_type
            .parse()
            .map_err(|_| ConfigError::InvalidLookupType {
                value: self.default_lookup_type.clone(),
            })
    }

    /// Returns a redacted JSON representation (connection passwords masked).
    pub fn redacted_json(&self) -> serde_json::Result<String> {
        let mut config = self.clone();
        config.database_url = redact_url(&config.database_url);
        config.source_database_url = config.source_database_url.as_deref().map(redact_url);
        serde_json::to_string_pretty(&config)
    }

    /// Validates the configuration, returning the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database_url.trim().is_empty() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        if !matches!(self.log_format.as_str(), "text" | "json" | "pretty") {
            return Err(ConfigError::InvalidLogFormat {
                value: self.log_format.clone(),
            });
        }

        if let Err(source) = Url::parse(&self.fallback_base_url) {
            return Err(ConfigError::InvalidFallbackBaseUrl {
                value: self.fallback_base_url.clone(),
                source,
            });
        }

        for (name, value) in [
            ("DB_ACQUIRE_TIMEOUT_MS", self.db_acquire_timeout_ms),
            ("SOURCE_READ_TIMEOUT_MS", self.source_read_timeout_ms),
            ("HTTP_TIMEOUT_MS", self.http_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::ZeroTimeout { name });
            }
        }

        if self.db_max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections);
        }

        self.lookup_type()?;

        check_unique_ids("SANDBOX_SERVER_IDS", &self.sandbox_server_ids)?;
        check_unique_ids("CERTIFICATION_REPORT_IDS", &self.certification_report_ids)?;

        Ok(())
    }
}

fn check_unique_ids(list: &'static str, ids: &[String]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(ConfigError::DuplicateIdentifier {
                list,
                id: id.clone(),
            });
        }
    }
    Ok(())
}

/// Masks the password component of a connection URL, if any.
pub fn redact_url(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) if url.password().is_some() => {
            if url.set_password(Some("****")).is_ok() {
                url.to_string()
            } else {
                raw.to_string()
            }
        }
        _ => raw.to_string(),
    }
}

fn default_profile() -> String {
    "local".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_database_url() -> String {
    "postgres://localhost:5432/reso".to_string()
}

fn default_db_max_connections() -> u32 {
    5
}

fn default_db_acquire_timeout_ms() -> u64 {
    5000
}

fn default_source_read_timeout_ms() -> u64 {
    60_000
}

fn default_fallback_base_url() -> String {
    "https://resostuff.blob.core.windows.net/refserverfiles".to_string()
}

fn default_http_timeout_ms() -> u64 {
    30_000
}

fn default_metadata_report_path() -> PathBuf {
    PathBuf::from("RESODataDictionary-1.7.metadata-report.json")
}

fn default_lookup_type() -> String {
    "STRING".to_string()
}

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load environment file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        source: dotenvy::Error,
    },
    #[error("database url is empty; set RESO_DATABASE_URL")]
    MissingDatabaseUrl,
    #[error("log format must be one of text, json or pretty, got '{value}'")]
    InvalidLogFormat { value: String },
    #[error("invalid fallback base url '{value}': {source}")]
    InvalidFallbackBaseUrl {
        value: String,
        source: url::ParseError,
    },
    #[error("{name} must be greater than zero")]
    ZeroTimeout { name: &'static str },
    #[error("database max connections must be at least 1")]
    InvalidMaxConnections,
    #[error("unknown lookup type '{value}'; expected STRING, ENUM_COLLECTION or ENUM_FLAGS")]
    InvalidLookupType { value: String },
    #[error("{list} contains '{id}' more than once")]
    DuplicateIdentifier { list: &'static str, id: String },
}

/// Values gathered from the `.env` layers, before the process environment is applied.
#[derive(Debug, Default)]
struct LayeredEnv {
    /// `RESO_*` keys with the prefix stripped.
    prefixed: BTreeMap<String, String>,
    /// Legacy alias names, keyed by the alias itself.
    legacy: BTreeMap<String, String>,
    profile: String,
}

/// Loads configuration using layered `.env` files and `RESO_*` env vars.
pub struct ConfigLoader {
    base_dir: PathBuf,
}

impl ConfigLoader {
    /// Creates a new loader rooted at the current working directory.
    pub fn new() -> Self {
        Self {
            base_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    /// Creates a loader rooted at the provided directory (useful for tests).
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    /// Loads and validates the configuration.
    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        let LayeredEnv {
            prefixed: mut layered,
            mut legacy,
            profile: profile_hint,
        } = self.collect_layered_env()?;

        // Legacy names fill gaps only; prefixed variables always win. Process
        // values of a legacy name beat the same name in `.env` files.
        for (alias, key) in LEGACY_ALIASES {
            if let Ok(value) = env::var(alias) {
                legacy.insert(alias.to_string(), value);
            }
            if let Some(value) = legacy.remove(alias) {
                layered.entry(key.to_string()).or_insert(value);
            }
        }

        // Overlay process environment last so it wins.
        for (key, value) in env::vars() {
            if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                layered.insert(stripped.to_string(), value);
            }
        }

        let profile = layered
            .remove("PROFILE")
            .filter(|v| !v.is_empty())
            .unwrap_or(profile_hint);
        let log_level = layered
            .remove("LOG_LEVEL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_level);
        let log_format = layered
            .remove("LOG_FORMAT")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_log_format);
        let database_url = layered
            .remove("DATABASE_URL")
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_database_url);
        let db_max_connections = layered
            .remove("DB_MAX_CONNECTIONS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_max_connections);
        let db_acquire_timeout_ms = layered
            .remove("DB_ACQUIRE_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_db_acquire_timeout_ms);
        let source_database_url = layered.remove("SOURCE_DATABASE_URL").and_then(|val| {
            let trimmed = val.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        });
        let source_read_timeout_ms = layered
            .remove("SOURCE_READ_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_source_read_timeout_ms);
        let fallback_base_url = layered
            .remove("FALLBACK_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_fallback_base_url);
        let http_timeout_ms = layered
            .remove("HTTP_TIMEOUT_MS")
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_http_timeout_ms);
        let metadata_report_path = layered
            .remove("METADATA_REPORT_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_metadata_report_path);
        let default_lookup_type = layered
            .remove("DEFAULT_LOOKUP_TYPE")
            .map(|v| v.trim().to_ascii_uppercase())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(default_lookup_type);
        let sandbox_server_ids = layered
            .remove("SANDBOX_SERVER_IDS")
            .map(|v| split_list(&v))
            .unwrap_or_default();
        let certification_report_ids = layered
            .remove("CERTIFICATION_REPORT_IDS")
            .map(|v| split_list(&v))
            .unwrap_or_default();

        let config = AppConfig {
            profile,
            log_level,
            log_format,
            database_url,
            db_max_connections,
            db_acquire_timeout_ms,
            source_database_url,
            source_read_timeout_ms,
            fallback_base_url,
            http_timeout_ms,
            metadata_report_path,
            default_lookup_type,
            sandbox_server_ids,
            certification_report_ids,
        };

        config.validate()?;
        Ok(config)
    }

    fn collect_layered_env(&self) -> Result<LayeredEnv, ConfigError> {
        let mut values = LayeredEnv::default();

        self.merge_dotenv(self.base_dir.join(".env"), &mut values)?;
        self.merge_dotenv(self.base_dir.join(".env.local"), &mut values)?;

        let profile = env::var("RESO_PROFILE")
            .ok()
            .or_else(|| values.prefixed.get("PROFILE").cloned())
            .unwrap_or_else(default_profile);

        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}", &profile)),
            &mut values,
        )?;
        self.merge_dotenv(
            self.base_dir.join(format!(".env.{}.local", &profile)),
            &mut values,
        )?;

        values.profile = profile;
        Ok(values)
    }

    fn merge_dotenv(
        &self,
        path: PathBuf,
        values: &mut LayeredEnv,
    ) -> Result<(), ConfigError> {
        match dotenvy::from_path_iter(&path) {
            Ok(iter) => {
                for item in iter {
                    let (key, value) = item.map_err(|source| ConfigError::EnvFile {
                        path: path.clone(),
                        source,
                    })?;
                    if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
                        values.prefixed.insert(stripped.to_string(), value);
                    } else if LEGACY_ALIASES.iter().any(|(alias, _)| *alias == key) {
                        values.legacy.insert(key, value);
                    }
                }
                Ok(())
            }
            Err(dotenvy::Error::Io(ref io_err))
                if io_err.kind() == std::io::ErrorKind::NotFound =>
            {
                Ok(())
            }
            Err(err) => Err(ConfigError::EnvFile { path, source: err }),
        }
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
