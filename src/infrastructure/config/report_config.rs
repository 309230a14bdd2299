use std::path::PathBuf;

#[derive(serde::Deserialize, Debug, Clone)]
pub struct ReportConfig {
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_file_name")]
    pub file_name: String,
    // Worksheet titles are capped at 31 characters by the xlsx format.
    #[serde(default = "default_month_sheet_name")]
    pub month_sheet_name: String,
    #[serde(default = "default_date_sheet_name")]
    pub date_sheet_name: String,
}

impl ReportConfig {
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(&self.dir).join(&self.file_name)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            dir: default_dir(),
            file_name: default_file_name(),
            month_sheet_name: default_month_sheet_name(),
            date_sheet_name: default_date_sheet_name(),
        }
    }
}

fn default_dir() -> String {
    "reports".to_string()
}

fn default_file_name() -> String {
    "financial_department_report.xlsx".to_string()
}

fn default_month_sheet_name() -> String {
    "Изменение месяца учета ок. ус.".to_string()
}

fn default_date_sheet_name() -> String {
    "Изменение даты учета ок. ус.".to_string()
}
