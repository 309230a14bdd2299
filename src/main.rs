mod application;
mod domain;
mod infrastructure;

use std::time::Duration;

use error_stack::ResultExt;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use application::tracking::routine::TrackingRoutine;
use domain::routine::{Routine, RoutineError};
use domain::tracking::ReportLayout;
use infrastructure::config::app_config::AppConfig;
use infrastructure::report::store::ReportStore;
use infrastructure::sheets::source_table::SourceTableClient;

/// Authorization happens anew on every attempt, so an expired token or a
/// dropped connection heals on the next pass.
async fn run_once(config: &AppConfig) -> error_stack::Result<(), RoutineError> {
    let source = SourceTableClient::new(config.sheets.clone())
        .await
        .change_context(RoutineError::transient(
            "Failed to authorize against the Sheets API",
        ))?;
    let store = ReportStore::new(config.report.clone());
    let layout = ReportLayout {
        month_sheet_title: config.report.month_sheet_name.clone(),
        date_sheet_title: config.report.date_sheet_name.clone(),
        contractor_label: config.source_columns.contractor.clone(),
        placement_label: config.source_columns.placement_id.clone(),
    };

    let routine = TrackingRoutine::new(source, store, config.source_columns.clone(), layout);
    routine.run().await
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(report) => {
            tracing::error!("❌ Configuration error: {:?}", report);
            std::process::exit(1);
        }
    };

    let mut attempt = 1u32;
    loop {
        match run_once(&config).await {
            Ok(()) => break,
            Err(report) => {
                if report.current_context().is_terminal() {
                    tracing::error!("❌ Giving up: {:?}", report);
                    std::process::exit(1);
                }
                if attempt >= config.retry.max_attempts {
                    tracing::error!("❌ Giving up after {} attempts: {:?}", attempt, report);
                    std::process::exit(1);
                }
                let delay = Duration::from_secs(config.retry.base_delay_secs * u64::from(attempt));
                tracing::warn!(
                    "🔁 Attempt {} failed, retrying in {:?}: {:?}",
                    attempt,
                    delay,
                    report
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
