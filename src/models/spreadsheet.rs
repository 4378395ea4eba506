use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a freshly created spreadsheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CreatedSpreadsheet {
    pub spreadsheet_id: String,
    pub spreadsheet_url: String,
}

impl fmt::Display for CreatedSpreadsheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "spreadsheetId: {}", self.spreadsheet_id)?;
        write!(f, "spreadsheetUrl: {}", self.spreadsheet_url)
    }
}
