use config::Config;
use error_stack::ResultExt;
use thiserror::Error;

use super::report_config::ReportConfig;
use super::retry_config::RetryConfig;
use super::sheets_config::SpreadsheetConfig;
use super::source_config::SourceColumnsConfig;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct AppConfig {
    pub sheets: SpreadsheetConfig,
    #[serde(default)]
    pub source_columns: SourceColumnsConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub retry: RetryConfig,
}

#[derive(Error, Debug)]
#[error("Failed to load configuration from '{path}'")]
pub struct ConfigLoadError {
    pub path: String,
}

impl AppConfig {
    /// Reads the config file named by `CONFIG_PATH` (default `Config`),
    /// validated once here and passed down explicitly.
    pub fn load() -> error_stack::Result<Self, ConfigLoadError> {
        let config_path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "Config".to_string());

        let settings = Config::builder()
            .add_source(config::File::with_name(&config_path))
            .build()
            .change_context_lazy(|| ConfigLoadError {
                path: config_path.clone(),
            })?;

        settings
            .try_deserialize::<AppConfig>()
            .change_context_lazy(|| ConfigLoadError {
                path: config_path.clone(),
            })
    }
}
