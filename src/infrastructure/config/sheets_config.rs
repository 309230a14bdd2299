#[derive(serde::Deserialize, Debug, Clone)]
pub struct SpreadsheetConfig {
    /// Path to the service account key used to read the source table.
    pub priv_key: Box<str>,
    pub spreadsheet_id: Box<str>,
    /// Name of the source sheet, used as the A1 range for the values read.
    pub sheet_name: Box<str>,
}
