use super::SheetOperations;
use crate::config::SheetsConfig;
use crate::error::{AppError, CredentialError, Result};
use crate::models::{CreatedSpreadsheet, Row};
use crate::sheets::auth::load_authenticator;
use crate::sheets::range::{append_range, read_range};
use async_trait::async_trait;
use google_sheets4::api::{AppendValuesResponse, Scope, Sheets, Spreadsheet, ValueRange};
use hyper_rustls::HttpsConnector;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, instrument};

// Access to files created or opened by the app
pub(crate) const AUTH_SCOPE: Scope = Scope::DriveFile;

pub struct SheetsClient {
    hub: Sheets<HttpsConnector<HttpConnector>>,
    config: SheetsConfig,
}

impl SheetsClient {
    /// Create a new SheetsClient authenticated with the token at `token_path`
    #[instrument(name = "Authenticating to Google Sheets", skip_all)]
    pub async fn new(token_path: &Path, config: SheetsConfig) -> Result<Self> {
        let auth = load_authenticator(token_path).await?;

        let connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_native_roots()
            .map_err(|e| AppError::Sheets(format!("Failed to load native TLS roots: {}", e)))?
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(hyper_util::rt::TokioExecutor::new()).build(connector);

        Ok(Self {
            hub: Sheets::new(client, auth),
            config,
        })
    }
}

/// A 401 from the Sheets API means the token was revoked or expired on the
/// server side even though it still looked valid locally.
fn sheets_error(context: &str, e: google_sheets4::Error) -> AppError {
    let unauthorized = match &e {
        google_sheets4::Error::BadRequest(body) => body["error"]["code"].as_u64() == Some(401),
        google_sheets4::Error::Failure(response) => response.status().as_u16() == 401,
        google_sheets4::Error::MissingToken(_) => true,
        _ => false,
    };

    match unauthorized {
        true => CredentialError::Rejected(format!("{}: {}", context, e)).into(),
        false => AppError::Sheets(format!("{}: {}", context, e)),
    }
}

/// Cell values come back as JSON; strings are passed through and anything
/// else keeps its JSON text form.
fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

pub(crate) fn rows_from_values(values: Option<Vec<Vec<Value>>>) -> Vec<Vec<String>> {
    values
        .unwrap_or_default()
        .into_iter()
        .map(|row| row.into_iter().map(cell_to_string).collect())
        .collect()
}

#[async_trait]
impl SheetOperations for SheetsClient {
    #[instrument(name = "Creating new spreadsheet", skip(self))]
    async fn create_spreadsheet(&self) -> Result<CreatedSpreadsheet> {
        let (_, result) = self
            .hub
            .spreadsheets()
            .create(Spreadsheet::default())
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| sheets_error("Failed to create spreadsheet", e))?;

        let spreadsheet_id = result
            .spreadsheet_id
            .ok_or_else(|| AppError::Sheets("Created spreadsheet has empty ID".to_string()))?;

        let spreadsheet_url = result
            .spreadsheet_url
            .ok_or_else(|| AppError::Sheets("Created spreadsheet has empty URL".to_string()))?;

        debug!(%spreadsheet_id, "Created spreadsheet");

        Ok(CreatedSpreadsheet {
            spreadsheet_id,
            spreadsheet_url,
        })
    }

    #[instrument(name = "Reading rows", skip(self))]
    async fn read_rows(
        &self,
        spreadsheet_id: &str,
        start_at_row: u64,
    ) -> Result<Vec<Vec<String>>> {
        let range = read_range(&self.config.sheet_name, start_at_row, self.config.row_bound)?;
        debug!(%range, "Requesting values");

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_get(spreadsheet_id, &range)
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| sheets_error(&format!("Failed to read range '{}'", range), e))?;

        Ok(rows_from_values(response.values))
    }

    #[instrument(name = "Appending row", skip(self, row), fields(cells = row.cells().len()))]
    async fn append_row(&self, spreadsheet_id: &str, row: &Row) -> Result<AppendValuesResponse> {
        let range = append_range(&self.config.sheet_name, &self.config.append_columns);

        let value_range = ValueRange {
            values: Some(vec![row.to_wire()]),
            ..Default::default()
        };

        let (_, response) = self
            .hub
            .spreadsheets()
            .values_append(value_range, spreadsheet_id, &range)
            .value_input_option("RAW")
            .add_scope(AUTH_SCOPE)
            .doit()
            .await
            .map_err(|e| sheets_error("Failed to append row", e))?;

        Ok(response)
    }
}
