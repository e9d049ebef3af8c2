use crate::workflows::vacancy::{FilterPolicy, StorageFormat};
use std::env;
use std::fmt;
use std::path::PathBuf;

const DEFAULT_VACANCIES_URL: &str = "https://api.hh.ru/vacancies";
const DEFAULT_USER_AGENT: &str = "HH-User-Agent";
const MAX_PER_PAGE: u32 = 100;

/// Distinguishes runtime behavior for different stages of the tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub filter: FilterPolicy,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let vacancies_url =
            env::var("HH_VACANCIES_URL").unwrap_or_else(|_| DEFAULT_VACANCIES_URL.to_string());
        let user_agent = env::var("HH_USER_AGENT").unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());
        let per_page = env::var("HH_PER_PAGE")
            .unwrap_or_else(|_| MAX_PER_PAGE.to_string())
            .parse::<u32>()
            .ok()
            .filter(|value| (1..=MAX_PER_PAGE).contains(value))
            .ok_or(ConfigError::InvalidPerPage)?;

        let data_dir = PathBuf::from(env::var("APP_DATA_DIR").unwrap_or_else(|_| "data".to_string()));
        let format = env::var("APP_STORAGE_FORMAT")
            .unwrap_or_else(|_| "json".to_string())
            .parse::<StorageFormat>()
            .map_err(ConfigError::InvalidStorageFormat)?;

        let fallback_to_unfiltered = match env::var("APP_FALLBACK_TO_UNFILTERED") {
            Ok(value) => parse_flag(&value).ok_or(ConfigError::InvalidFlag {
                name: "APP_FALLBACK_TO_UNFILTERED",
                value,
            })?,
            Err(_) => true,
        };

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            api: ApiConfig {
                vacancies_url,
                user_agent,
                per_page,
            },
            storage: StorageConfig { data_dir, format },
            filter: FilterPolicy {
                fallback_to_unfiltered,
            },
            telemetry: TelemetryConfig { log_level },
        })
    }
}

/// Settings for the hh.ru search endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub vacancies_url: String,
    pub user_agent: String,
    pub per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            vacancies_url: DEFAULT_VACANCIES_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            per_page: MAX_PER_PAGE,
        }
    }
}

/// Where and how search results are written.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub format: StorageFormat,
}

impl StorageConfig {
    /// Resolves `file_name` (or the format's default name) inside the data directory.
    pub fn output_path(&self, format: StorageFormat, file_name: Option<&str>) -> PathBuf {
        match file_name {
            Some(name) => self.data_dir.join(name),
            None => self.data_dir.join(format.default_file_name()),
        }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPerPage,
    InvalidStorageFormat(String),
    InvalidFlag { name: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPerPage => {
                write!(f, "HH_PER_PAGE must be an integer between 1 and {MAX_PER_PAGE}")
            }
            ConfigError::InvalidStorageFormat(reason) => {
                write!(f, "APP_STORAGE_FORMAT is invalid: {reason}")
            }
            ConfigError::InvalidFlag { name, value } => {
                write!(f, "{name} must be true or false, got '{value}'")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::Path;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "HH_VACANCIES_URL",
            "HH_USER_AGENT",
            "HH_PER_PAGE",
            "APP_DATA_DIR",
            "APP_STORAGE_FORMAT",
            "APP_FALLBACK_TO_UNFILTERED",
            "APP_LOG_LEVEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.api, ApiConfig::default());
        assert_eq!(config.storage.data_dir, Path::new("data"));
        assert_eq!(config.storage.format, StorageFormat::Json);
        assert!(config.filter.fallback_to_unfiltered);
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn reads_overrides_from_env() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_ENV", "prod");
        env::set_var("HH_PER_PAGE", "20");
        env::set_var("APP_STORAGE_FORMAT", "CSV");
        env::set_var("APP_FALLBACK_TO_UNFILTERED", "off");
        let config = AppConfig::load().expect("config loads");
        reset_env();

        assert_eq!(config.environment, AppEnvironment::Production);
        assert_eq!(config.api.per_page, 20);
        assert_eq!(config.storage.format, StorageFormat::Csv);
        assert!(!config.filter.fallback_to_unfiltered);
    }

    #[test]
    fn rejects_invalid_values() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();

        env::set_var("HH_PER_PAGE", "500");
        assert!(matches!(AppConfig::load(), Err(ConfigError::InvalidPerPage)));
        reset_env();

        env::set_var("APP_STORAGE_FORMAT", "xml");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidStorageFormat(_))
        ));
        reset_env();

        env::set_var("APP_FALLBACK_TO_UNFILTERED", "maybe");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidFlag { .. })
        ));
        reset_env();
    }

    #[test]
    fn output_path_defaults_by_format() {
        let storage = StorageConfig {
            data_dir: PathBuf::from("data"),
            format: StorageFormat::Json,
        };
        assert_eq!(
            storage.output_path(StorageFormat::Csv, None),
            Path::new("data/vacancies.csv")
        );
        assert_eq!(
            storage.output_path(StorageFormat::Json, Some("rust.json")),
            Path::new("data/rust.json")
        );
    }
}
