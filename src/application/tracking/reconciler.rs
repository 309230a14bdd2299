use tracing::instrument;

use crate::domain::record::{PlacementRecord, TrackedDimension};
use crate::domain::tracking::{ReportBook, TrackingSheet, FIRST_VALUE_COLUMN};

/// Header dates use day granularity; two runs on the same calendar day
/// share one column.
pub const RUN_DATE_FORMAT: &str = "%d.%m.%Y";

/// Whether today's dated column was appended by this run, or already
/// existed because an earlier run happened today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunColumn {
    Added,
    ReusedToday,
}

/// Adds today's column to both sheet headers atomically, or reuses the
/// existing one. At most one column per calendar day, however many
/// records or runs that day sees.
#[instrument(skip(book))]
pub fn decide_run_column(book: &mut ReportBook, today: &str) -> RunColumn {
    if book.months.last_header_date() == today {
        RunColumn::ReusedToday
    } else {
        book.months.push_header_date(today);
        book.dates.push_header_date(today);
        RunColumn::Added
    }
}

/// Applies every record to both sheets: month changes to the first,
/// accounting date changes to the second.
#[instrument(skip(book, records), fields(records = records.len()))]
pub fn reconcile(book: &mut ReportBook, records: &[PlacementRecord], run: RunColumn) {
    for record in records {
        update_sheet(&mut book.months, record, TrackedDimension::AccountingMonth, run);
        update_sheet(&mut book.dates, record, TrackedDimension::AccountingDate, run);
    }
}

/// Core update for one record on one sheet.
///
/// Known row: walk the value cells newest to oldest, skipping empties.
/// The walk starts one column early when this run just added today's
/// column, so the fresh empty cell is not inspected. The first non-empty
/// cell decides: a differing value is recorded in the newest column; an
/// equal value clears the newest cell on the first run of the day and is
/// left alone on later runs, so an unchanged value is never duplicated.
/// Rows whose whole history is empty are left untouched.
///
/// Unknown row: append it with the value in the newest column.
fn update_sheet(
    sheet: &mut TrackingSheet,
    record: &PlacementRecord,
    dimension: TrackedDimension,
    run: RunColumn,
) {
    let incoming = dimension.value_of(record);
    let newest = sheet.width() - 1;

    let Some(row) = sheet.row_of(&record.placement_id) else {
        sheet.append_record_row(&record.contractor, &record.placement_id, incoming);
        return;
    };

    let start = match run {
        RunColumn::Added => newest - 1,
        RunColumn::ReusedToday => newest,
    };

    for column in (FIRST_VALUE_COLUMN..=start).rev() {
        let stored = sheet.cell(row, column);
        if stored.is_empty() {
            continue;
        }
        if stored != incoming {
            sheet.set_cell(row, newest, incoming.to_string());
        } else if run == RunColumn::Added {
            sheet.set_cell(row, newest, String::new());
        }
        break;
    }
}
