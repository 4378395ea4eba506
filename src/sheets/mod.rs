mod auth;
mod client;
mod range;
mod storage;

pub use auth::{ConsentMode, generate_token};
pub use client::SheetsClient;

use crate::error::Result;
use crate::models::{CreatedSpreadsheet, Row};
use async_trait::async_trait;
use google_sheets4::api::AppendValuesResponse;

#[async_trait]
pub trait SheetOperations {
    async fn create_spreadsheet(&self) -> Result<CreatedSpreadsheet>;

    /// Rows from `start_at_row` (one-indexed) onwards, as strings
    async fn read_rows(&self, spreadsheet_id: &str, start_at_row: u64)
    -> Result<Vec<Vec<String>>>;

    async fn append_row(&self, spreadsheet_id: &str, row: &Row) -> Result<AppendValuesResponse>;
}
