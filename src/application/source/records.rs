use error_stack::report;
use thiserror::Error;
use tracing::instrument;

use crate::domain::record::PlacementRecord;
use crate::infrastructure::config::source_config::SourceColumnsConfig;

#[derive(Error, Debug)]
pub enum RecordsError {
    #[error("The source table is empty")]
    EmptyTable,
    #[error("The source table has no '{0}' column")]
    MissingColumn(String),
}

/// Resolves the four tracked columns by exact header-name match and maps
/// every data row to a record. Cells the API omitted at the end of a row
/// are read as empty. Fails before any report mutation can happen.
#[instrument(skip(values), fields(rows = values.len()))]
pub fn records_from_values(
    values: &[Vec<String>],
    columns: &SourceColumnsConfig,
) -> error_stack::Result<Vec<PlacementRecord>, RecordsError> {
    let header = values.first().ok_or_else(|| report!(RecordsError::EmptyTable))?;

    let contractor = column_index(header, &columns.contractor)?;
    let placement_id = column_index(header, &columns.placement_id)?;
    let month = column_index(header, &columns.accounting_month)?;
    let date = column_index(header, &columns.accounting_date)?;

    let records: Vec<PlacementRecord> = values[1..]
        .iter()
        .map(|row| PlacementRecord {
            contractor: cell(row, contractor),
            placement_id: cell(row, placement_id),
            month: cell(row, month),
            date: cell(row, date),
        })
        .collect();

    if records.is_empty() {
        return Err(report!(RecordsError::EmptyTable));
    }

    Ok(records)
}

fn column_index(header: &[String], name: &str) -> error_stack::Result<usize, RecordsError> {
    header
        .iter()
        .position(|label| label == name)
        .ok_or_else(|| report!(RecordsError::MissingColumn(name.to_string())))
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}
