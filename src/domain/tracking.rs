use std::collections::HashMap;

use thiserror::Error;

use crate::domain::record::PlacementRecord;

pub const CONTRACTOR_COLUMN: usize = 0;
pub const PLACEMENT_COLUMN: usize = 1;
/// First dated observation column; everything left of it is a key column.
pub const FIRST_VALUE_COLUMN: usize = 2;

#[derive(Error, Debug)]
pub enum TrackingSheetError {
    #[error("Worksheet has no rows")]
    Empty,
    #[error("Worksheet header has fewer than two key columns plus one dated column")]
    HeaderTooNarrow,
}

/// One report worksheet held in memory: a header row, append-only data
/// rows, and an index from placement id to row position.
///
/// The index replaces the per-record full-row membership scan the report
/// grew up with; it is built once on load and updated on append.
#[derive(Debug, Clone)]
pub struct TrackingSheet {
    title: String,
    rows: Vec<Vec<String>>,
    row_by_placement: HashMap<String, usize>,
}

impl TrackingSheet {
    /// A fresh sheet with only the header row; seed rows are appended by
    /// the caller.
    pub fn new(title: &str, contractor_label: &str, placement_label: &str, date: &str) -> Self {
        TrackingSheet {
            title: title.to_string(),
            rows: vec![vec![
                contractor_label.to_string(),
                placement_label.to_string(),
                date.to_string(),
            ]],
            row_by_placement: HashMap::new(),
        }
    }

    /// Rebuilds a sheet from loaded rows. The first row is the header;
    /// on duplicate placement ids the first occurrence wins, matching
    /// top-down lookup order.
    pub fn from_rows(title: String, rows: Vec<Vec<String>>) -> Result<Self, TrackingSheetError> {
        let header = rows.first().ok_or(TrackingSheetError::Empty)?;
        if header.len() <= FIRST_VALUE_COLUMN {
            return Err(TrackingSheetError::HeaderTooNarrow);
        }

        let mut row_by_placement = HashMap::new();
        for (index, row) in rows.iter().enumerate().skip(1) {
            if let Some(id) = row.get(PLACEMENT_COLUMN) {
                if !id.is_empty() {
                    row_by_placement.entry(id.clone()).or_insert(index);
                }
            }
        }

        Ok(TrackingSheet {
            title,
            rows,
            row_by_placement,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Header width; data rows may be shorter when their newest cells are
    /// empty.
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    pub fn last_header_date(&self) -> &str {
        self.rows[0].last().map(String::as_str).unwrap_or("")
    }

    pub fn push_header_date(&mut self, date: &str) {
        self.rows[0].push(date.to_string());
    }

    pub fn row_of(&self, placement_id: &str) -> Option<usize> {
        self.row_by_placement.get(placement_id).copied()
    }

    /// Empty string for cells beyond a row's stored width.
    pub fn cell(&self, row: usize, column: usize) -> &str {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
            .unwrap_or("")
    }

    pub fn set_cell(&mut self, row: usize, column: usize, value: String) {
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value;
    }

    /// Appends `[contractor, placement_id, "", ..., value]` with the value
    /// in the newest column, and registers the id in the index.
    pub fn append_record_row(&mut self, contractor: &str, placement_id: &str, value: &str) {
        let width = self.width();
        let mut row = vec![String::new(); width];
        row[CONTRACTOR_COLUMN] = contractor.to_string();
        row[PLACEMENT_COLUMN] = placement_id.to_string();
        row[width - 1] = value.to_string();
        self.rows.push(row);
        let index = self.rows.len() - 1;
        self.row_by_placement
            .entry(placement_id.to_string())
            .or_insert(index);
    }
}

/// Header labels and worksheet titles of the report workbook.
#[derive(Debug, Clone)]
pub struct ReportLayout {
    pub month_sheet_title: String,
    pub date_sheet_title: String,
    pub contractor_label: String,
    pub placement_label: String,
}

/// The two-sheet report workbook held in memory between load and save.
#[derive(Debug, Clone)]
pub struct ReportBook {
    pub months: TrackingSheet,
    pub dates: TrackingSheet,
}

impl ReportBook {
    /// First-run workbook: headers plus one seed row per record, no
    /// history columns yet.
    pub fn seed(records: &[PlacementRecord], layout: &ReportLayout, today: &str) -> Self {
        let mut months = TrackingSheet::new(
            &layout.month_sheet_title,
            &layout.contractor_label,
            &layout.placement_label,
            today,
        );
        let mut dates = TrackingSheet::new(
            &layout.date_sheet_title,
            &layout.contractor_label,
            &layout.placement_label,
            today,
        );

        for record in records {
            months.append_record_row(&record.contractor, &record.placement_id, &record.month);
            dates.append_record_row(&record.contractor, &record.placement_id, &record.date);
        }

        ReportBook { months, dates }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sheet_with_rows(rows: Vec<Vec<&str>>) -> TrackingSheet {
        let rows = rows
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect())
            .collect();
        TrackingSheet::from_rows("Sheet".to_string(), rows).unwrap()
    }

    #[test]
    fn from_rows_builds_placement_index() {
        let sheet = sheet_with_rows(vec![
            vec!["Contractor", "Placement", "01.01.2024"],
            vec!["A", "P1", "Jan"],
            vec!["B", "P2", "Feb"],
        ]);

        assert_eq!(sheet.row_of("P1"), Some(1));
        assert_eq!(sheet.row_of("P2"), Some(2));
        assert_eq!(sheet.row_of("P3"), None);
    }

    #[test]
    fn from_rows_first_occurrence_wins_on_duplicate_ids() {
        let sheet = sheet_with_rows(vec![
            vec!["Contractor", "Placement", "01.01.2024"],
            vec!["A", "P1", "Jan"],
            vec!["B", "P1", "Feb"],
        ]);

        assert_eq!(sheet.row_of("P1"), Some(1));
    }

    #[test]
    fn from_rows_rejects_empty_and_narrow_sheets() {
        assert!(matches!(
            TrackingSheet::from_rows("Sheet".to_string(), vec![]),
            Err(TrackingSheetError::Empty)
        ));
        assert!(matches!(
            TrackingSheet::from_rows(
                "Sheet".to_string(),
                vec![vec!["Contractor".to_string(), "Placement".to_string()]]
            ),
            Err(TrackingSheetError::HeaderTooNarrow)
        ));
    }

    #[test]
    fn append_record_row_pads_and_indexes() {
        let mut sheet = sheet_with_rows(vec![
            vec!["Contractor", "Placement", "01.01.2024", "02.01.2024"],
            vec!["A", "P1", "Jan", ""],
        ]);

        sheet.append_record_row("B", "P2", "Feb");

        assert_eq!(sheet.rows()[2], vec!["B", "P2", "", "Feb"]);
        assert_eq!(sheet.row_of("P2"), Some(2));
    }

    #[test]
    fn set_cell_pads_short_rows() {
        let mut sheet = sheet_with_rows(vec![
            vec!["Contractor", "Placement", "01.01.2024", "02.01.2024"],
            vec!["A", "P1", "Jan"],
        ]);

        sheet.set_cell(1, 3, "Feb".to_string());

        assert_eq!(sheet.rows()[1], vec!["A", "P1", "Jan", "Feb"]);
        assert_eq!(sheet.cell(1, 4), "");
    }

    #[test]
    fn seed_creates_headers_and_one_row_per_record() {
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
        let layout = ReportLayout {
            month_sheet_title: "Months".to_string(),
            date_sheet_title: "Dates".to_string(),
            contractor_label: "Contractor".to_string(),
            placement_label: "Placement".to_string(),
        };

        let book = ReportBook::seed(&records, &layout, "05.01.2024");

        assert_eq!(
            book.months.rows(),
            &[
                vec!["Contractor", "Placement", "05.01.2024"],
                vec!["A", "P1", "Jan"],
                vec!["B", "P2", "Feb"],
            ]
        );
        assert_eq!(
            book.dates.rows(),
            &[
                vec!["Contractor", "Placement", "05.01.2024"],
                vec!["A", "P1", "01.01.2024"],
                vec!["B", "P2", "02.01.2024"],
            ]
        );
        assert_eq!(book.months.width(), 3);
        assert_eq!(book.dates.width(), 3);
    }
}
