use std::fmt;

use chrono::Local;
use tracing::instrument;

use crate::application::source::records::records_from_values;
use crate::application::tracking::reconciler::{self, RUN_DATE_FORMAT};
use crate::domain::routine::{Routine, RoutineError};
use crate::domain::tracking::{ReportBook, ReportLayout};
use crate::infrastructure::config::source_config::SourceColumnsConfig;
use crate::infrastructure::report::store::ReportStore;
use crate::infrastructure::sheets::source_table::SourceTableClient;

/// Fetch the source table, map it to records, then either seed a fresh
/// report workbook or reconcile the existing one and save it back. All
/// validation happens before the first mutation; the save at the end is
/// the only persistence point.
pub struct TrackingRoutine {
    source: SourceTableClient,
    store: ReportStore,
    columns: SourceColumnsConfig,
    layout: ReportLayout,
}

impl fmt::Debug for TrackingRoutine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrackingRoutine")
            .field("store", &self.store)
            .finish()
    }
}

impl TrackingRoutine {
    pub fn new(
        source: SourceTableClient,
        store: ReportStore,
        columns: SourceColumnsConfig,
        layout: ReportLayout,
    ) -> Self {
        Self {
            source,
            store,
            columns,
            layout,
        }
    }
}

#[async_trait::async_trait]
impl Routine for TrackingRoutine {
    fn name(&self) -> &str {
        "Placement tracking"
    }

    #[instrument(skip(self), name = "TrackingRoutine::run")]
    async fn run(&self) -> error_stack::Result<(), RoutineError> {
        tracing::trace!("{}: ☁️  Fetching rows from the source table", self.name());
        let values = self.source.fetch_rows().await.map_err(|report| {
            tracing::error!("{}: ❌ Error fetching the source table: {:?}", self.name(), report);
            report.change_context(RoutineError::transient("Failed to fetch the source table"))
        })?;

        tracing::trace!("{}: 📋 Mapping source rows to placement records", self.name());
        let records = records_from_values(&values, &self.columns).map_err(|report| {
            tracing::error!(
                "{}: ❌ The table does not meet the required criteria: {:?}",
                self.name(),
                report
            );
            report.change_context(RoutineError::terminal(
                "The source table does not meet the required criteria",
            ))
        })?;

        let today = Local::now().format(RUN_DATE_FORMAT).to_string();

        if !self.store.exists() {
            tracing::trace!("{}: 🆕 No report found, seeding a new workbook", self.name());
            let book = ReportBook::seed(&records, &self.layout, &today);
            self.store.save(&book).map_err(|report| {
                report.change_context(RoutineError::transient("Failed to save the new report"))
            })?;
            tracing::info!(
                "{}: ✅ Report created at '{}'",
                self.name(),
                self.store.path().display()
            );
            return Ok(());
        }

        tracing::trace!("{}: 📖 Opening the existing report workbook", self.name());
        let mut book = self.store.load().map_err(|report| {
            tracing::error!("{}: ❌ Report workbook is unreadable: {:?}", self.name(), report);
            report.change_context(RoutineError::terminal("The report workbook is unreadable"))
        })?;

        let run = reconciler::decide_run_column(&mut book, &today);
        tracing::trace!(
            "{}: 📝 Reconciling {} records ({:?})",
            self.name(),
            records.len(),
            run
        );
        reconciler::reconcile(&mut book, &records, run);

        self.store.save(&book).map_err(|report| {
            report.change_context(RoutineError::transient("Failed to save the updated report"))
        })?;
        tracing::info!(
            "{}: ✅ Report updated at '{}'",
            self.name(),
            self.store.path().display()
        );

        Ok(())
    }
}
