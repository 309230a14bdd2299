use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use calamine::{open_workbook, Data, Reader, Xlsx};
use error_stack::ResultExt;
use thiserror::Error;
use tracing::instrument;

use crate::domain::tracking::{ReportBook, TrackingSheet};
use crate::infrastructure::config::report_config::ReportConfig;

#[derive(Error, Debug)]
pub enum ReportStoreError {
    #[error("Failed to open the report workbook at '{0}'")]
    Open(PathBuf),
    #[error("Worksheet '{0}' is missing or unreadable in the report workbook")]
    Sheet(String),
    #[error("The report workbook is malformed")]
    Format,
    #[error("Failed to save the report workbook at '{0}'")]
    Save(PathBuf),
}

/// Owns the report file on disk. The workbook is read whole into a
/// `ReportBook`, mutated in memory, and written back whole; nothing else
/// touches the file during a run.
#[derive(Debug)]
pub struct ReportStore {
    config: ReportConfig,
}

impl ReportStore {
    pub fn new(config: ReportConfig) -> Self {
        ReportStore { config }
    }

    pub fn path(&self) -> PathBuf {
        self.config.file_path()
    }

    /// A missing file is the first-run "create" case, not an error.
    pub fn exists(&self) -> bool {
        self.path().exists()
    }

    #[instrument(skip(self), fields(path = %self.path().display()))]
    pub fn load(&self) -> error_stack::Result<ReportBook, ReportStoreError> {
        let path = self.path();
        let mut workbook = open_workbook::<Xlsx<_>, _>(&path)
            .change_context_lazy(|| ReportStoreError::Open(path.clone()))?;

        let months = load_sheet(&mut workbook, &self.config.month_sheet_name)?;
        let dates = load_sheet(&mut workbook, &self.config.date_sheet_name)?;

        Ok(ReportBook { months, dates })
    }

    #[instrument(skip(self, book), fields(path = %self.path().display()))]
    pub fn save(&self, book: &ReportBook) -> error_stack::Result<(), ReportStoreError> {
        let path = self.path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .change_context_lazy(|| ReportStoreError::Save(path.clone()))?;
        }

        let mut workbook = rust_xlsxwriter::Workbook::new();
        write_sheet(&mut workbook, &book.months)
            .change_context_lazy(|| ReportStoreError::Save(path.clone()))?;
        write_sheet(&mut workbook, &book.dates)
            .change_context_lazy(|| ReportStoreError::Save(path.clone()))?;

        workbook
            .save(&path)
            .change_context_lazy(|| ReportStoreError::Save(path.clone()))?;

        Ok(())
    }
}

fn load_sheet(
    workbook: &mut Xlsx<BufReader<File>>,
    title: &str,
) -> error_stack::Result<TrackingSheet, ReportStoreError> {
    let range = workbook
        .worksheet_range(title)
        .change_context_lazy(|| ReportStoreError::Sheet(title.to_string()))?;

    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();

    TrackingSheet::from_rows(title.to_string(), rows)
        .change_context(ReportStoreError::Format)
        .attach_printable_lazy(|| format!("Worksheet '{}' is not a tracking sheet", title))
}

fn write_sheet(
    workbook: &mut rust_xlsxwriter::Workbook,
    sheet: &TrackingSheet,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet.title())?;

    for (row_index, row) in sheet.rows().iter().enumerate() {
        for (column_index, cell) in row.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            worksheet.write_string(row_index as u32, column_index as u16, cell.as_str())?;
        }
    }

    Ok(())
}

// f64 holds integers exactly only up to 2^53; anything bigger keeps the
// float formatting instead of a lossy cast.
const MAX_EXACT_INT_F64: f64 = 9_007_199_254_740_992.0;

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() <= MAX_EXACT_INT_F64 => {
            format!("{}", *f as i64)
        }
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Error(e) => e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::PlacementRecord;
    use crate::domain::tracking::ReportLayout;

    fn layout() -> ReportLayout {
        ReportLayout {
            month_sheet_title: "Months".to_string(),
            date_sheet_title: "Dates".to_string(),
            contractor_label: "Contractor".to_string(),
            placement_label: "Placement".to_string(),
        }
    }

    fn store_in(dir: &std::path::Path) -> ReportStore {
        ReportStore::new(ReportConfig {
            dir: dir.to_string_lossy().into_owned(),
            file_name: "report.xlsx".to_string(),
            month_sheet_name: "Months".to_string(),
            date_sheet_name: "Dates".to_string(),
        })
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let records = vec![
            PlacementRecord {
                contractor: "A".to_string(),
                placement_id: "P1".to_string(),
                month: "Jan".to_string(),
                date: "01.01.2024".to_string(),
            },
            PlacementRecord {
                contractor: "B".to_string(),
                placement_id: "P2".to_string(),
                month: "Feb".to_string(),
                date: "02.01.2024".to_string(),
            },
        ];
        let book = ReportBook::seed(&records, &layout(), "05.01.2024");

        assert!(!store.exists());
        store.save(&book).unwrap();
        assert!(store.exists());

        let reloaded = store.load().unwrap();
        for (saved, loaded) in [
            (&book.months, &reloaded.months),
            (&book.dates, &reloaded.dates),
        ] {
            assert_eq!(loaded.rows().len(), saved.rows().len());
            assert_eq!(loaded.width(), saved.width());
            for row in 0..saved.rows().len() {
                for column in 0..saved.width() {
                    assert_eq!(loaded.cell(row, column), saved.cell(row, column));
                }
            }
        }
        assert_eq!(reloaded.months.row_of("P2"), Some(2));
    }

    #[test]
    fn empty_history_cells_survive_the_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let mut book = ReportBook::seed(
            &[PlacementRecord {
                contractor: "A".to_string(),
                placement_id: "P1".to_string(),
                month: "Jan".to_string(),
                date: "01.01.2024".to_string(),
            }],
            &layout(),
            "05.01.2024",
        );
        // A later run that recorded no change leaves the newest cell empty.
        book.months.push_header_date("06.01.2024");
        book.dates.push_header_date("06.01.2024");
        store.save(&book).unwrap();

        let reloaded = store.load().unwrap();
        assert_eq!(reloaded.months.width(), 4);
        assert_eq!(reloaded.months.last_header_date(), "06.01.2024");
        assert_eq!(reloaded.months.cell(1, 2), "Jan");
        assert_eq!(reloaded.months.cell(1, 3), "");
    }

    #[test]
    fn numeric_cells_convert_without_truncation() {
        assert_eq!(cell_to_string(&Data::Float(42.0)), "42");
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
        assert_eq!(
            cell_to_string(&Data::Float(9_007_199_254_740_994.0)),
            "9007199254740994"
        );
        assert_eq!(cell_to_string(&Data::Int(7)), "7");
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn load_reports_a_missing_worksheet() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(dir.path());

        let book = ReportBook::seed(&[], &layout(), "05.01.2024");
        store.save(&book).unwrap();

        let misnamed = ReportStore::new(ReportConfig {
            dir: dir.path().to_string_lossy().into_owned(),
            file_name: "report.xlsx".to_string(),
            month_sheet_name: "Nope".to_string(),
            date_sheet_name: "Dates".to_string(),
        });
        let report = misnamed.load().unwrap_err();
        assert!(matches!(
            report.current_context(),
            ReportStoreError::Sheet(name) if name == "Nope"
        ));
    }
}
