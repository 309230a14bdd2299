use std::fmt::Debug;

use error_stack::ResultExt;
use google_sheets4::Sheets;
use serde_json::Value;
use thiserror::Error;
use tracing::instrument;

use crate::infrastructure::config::sheets_config::SpreadsheetConfig;

use super::{auth, http_client};

pub struct SourceTableClient {
    pub config: SpreadsheetConfig,
    hub: Sheets<
        google_sheets4::hyper_rustls::HttpsConnector<google_sheets4::hyper::client::HttpConnector>,
    >,
}

impl Debug for SourceTableClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SourceTableClient {{ config: {:?} }}", self.config)
    }
}

#[derive(Error, Debug)]
pub enum SourceTableError {
    #[error("Failed to authorize against the Sheets API")]
    Unauthorized,
    #[error("Failed to fetch range '{0}' from the source spreadsheet")]
    FailedToFetchRange(String),
}

impl SourceTableClient {
    #[instrument(name = "SourceTableClient::new")]
    pub async fn new(config: SpreadsheetConfig) -> error_stack::Result<Self, SourceTableError> {
        let client = http_client::http_client();
        let auth = auth::auth(&config, client.clone())
            .await
            .change_context(SourceTableError::Unauthorized)?;
        let hub = Sheets::new(client.clone(), auth);

        Ok(SourceTableClient { config, hub })
    }

    /// Fetches the whole source sheet as rows of cell strings. The API
    /// omits trailing empty cells, so rows may be ragged.
    #[instrument]
    pub async fn fetch_rows(&self) -> error_stack::Result<Vec<Vec<String>>, SourceTableError> {
        let range = self.config.sheet_name.as_ref();
        let response = self
            .hub
            .spreadsheets()
            .values_get(&self.config.spreadsheet_id, range)
            .doit()
            .await
            .change_context_lazy(|| SourceTableError::FailedToFetchRange(range.to_string()))
            .attach_printable(
                "Something went wrong. Check your internet connection and try again.",
            )?;

        let values = response.1.values.unwrap_or_default();
        let rows = values
            .into_iter()
            .map(|row| row.into_iter().map(json_cell_to_string).collect())
            .collect();

        Ok(rows)
    }
}

fn json_cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
