pub mod app_config;
pub mod report_config;
pub mod retry_config;
pub mod sheets_config;
pub mod source_config;
