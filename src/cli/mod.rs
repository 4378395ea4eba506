mod append_row;
mod create_sheet;
mod generate_token;
mod read_rows;

use crate::config::Config;
use crate::error::Result;
use crate::sheets::SheetsClient;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

const TOKEN_PATH_HELP: &str = "Token path. See `scoped-sheets generate_token --help`.";

#[derive(Parser, Debug)]
#[command(name = "scoped-sheets")]
#[command(
    about = "Create, append to, and read from Google Sheets that are associated with a Google APIs project, without exposing access to any other Google Sheets or Google Drive data.",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Path to a config file (defaults to the XDG config location)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub async fn run(&self) -> Result<()> {
        match &self.command {
            Commands::GenerateToken {
                credentials_path,
                token_path,
                paste_code,
            } => generate_token::execute(credentials_path, token_path, *paste_code).await,
            Commands::CreateSheet { token_path } => {
                let client = self.client(token_path).await?;
                create_sheet::execute(&client).await
            }
            Commands::ReadRows {
                token_path,
                spreadsheet_id,
                start_at_row,
            } => {
                let client = self.client(token_path).await?;
                read_rows::execute(&client, spreadsheet_id, *start_at_row).await
            }
            Commands::AppendRow {
                token_path,
                spreadsheet_id,
                entry,
                json,
            } => {
                // Parse the row before touching credentials or the network
                let row = append_row::parse_row(entry, json.as_deref())?;
                let client = self.client(token_path).await?;
                append_row::execute(&client, spreadsheet_id, &row).await
            }
        }
    }

    async fn client(&self, token_path: &Path) -> Result<SheetsClient> {
        let config = Config::load(self.config.as_deref())?;
        SheetsClient::new(token_path, config.sheets).await
    }
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "snake_case")]
pub enum Commands {
    /// Generate a token for accessing Google Drive files via a Google APIs project
    GenerateToken {
        /// File path to credentials.json, which you can download after creating a project in
        /// https://console.developers.google.com/apis/. Enable the Google Sheets API in that
        /// project, then create credentials that use OAuth client ID, and download the credentials.
        credentials_path: PathBuf,

        /// File path to use for writing token.json. Depending on your application, you may need
        /// to chmod this token.json file afterwards.
        token_path: PathBuf,

        /// Paste the authorization code instead of receiving it on a local redirect. This
        /// uses the out-of-band redirect, which Google only accepts for older OAuth clients.
        #[arg(long)]
        paste_code: bool,
    },

    /// Create a sheet
    CreateSheet {
        #[arg(help = TOKEN_PATH_HELP)]
        token_path: PathBuf,
    },

    /// Read rows from a sheet
    ReadRows {
        #[arg(help = TOKEN_PATH_HELP)]
        token_path: PathBuf,

        /// Spreadsheet ID
        spreadsheet_id: String,

        /// Start reading from this one-indexed row number
        #[arg(value_parser = clap::value_parser!(u64).range(1..))]
        start_at_row: u64,
    },

    /// Append a row to a sheet
    AppendRow {
        #[arg(help = TOKEN_PATH_HELP)]
        token_path: PathBuf,

        /// Spreadsheet ID
        spreadsheet_id: String,

        /// Entry in the row
        entry: Vec<String>,

        /// The row as a JSON array of scalars, e.g. '[1, "a", 3.5]'
        #[arg(long, conflicts_with = "entry")]
        json: Option<String>,
    },
}


#[cfg(test)]
mod tests {
    use super::mocks::MockSheetsClient;
    use super::*;
    use crate::models::Row;
    use crate::sheets::SheetOperations;

    #[test]
    fn test_cli_command_names_are_snake_case() {
        let cli = Cli::try_parse_from(["scoped-sheets", "read_rows", "token.json", "abc123", "5"])
            .unwrap();

        match cli.command {
            Commands::ReadRows {
                spreadsheet_id,
                start_at_row,
                ..
            } => {
                assert_eq!(spreadsheet_id, "abc123");
                assert_eq!(start_at_row, 5);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_zero_start_row() {
        let result = Cli::try_parse_from(["scoped-sheets", "read_rows", "token.json", "abc", "0"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_rejects_non_integer_start_row() {
        let result =
            Cli::try_parse_from(["scoped-sheets", "read_rows", "token.json", "abc", "first"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_append_row_accepts_zero_entries() {
        let cli = Cli::try_parse_from(["scoped-sheets", "append_row", "token.json", "abc"]).unwrap();

        match cli.command {
            Commands::AppendRow { entry, json, .. } => {
                assert!(entry.is_empty());
                assert!(json.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_cli_generate_token_arguments() {
        let cli = Cli::try_parse_from([
            "scoped-sheets",
            "generate_token",
            "credentials.json",
            "token.json",
        ])
        .unwrap();

        match cli.command {
            Commands::GenerateToken {
                credentials_path,
                token_path,
                paste_code,
            } => {
                assert_eq!(credentials_path, PathBuf::from("credentials.json"));
                assert_eq!(token_path, PathBuf::from("token.json"));
                assert!(!paste_code, "local redirect is the default consent flow");
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_create_append_read_end_to_end() {
        let client = MockSheetsClient::default();

        let created = client.create_spreadsheet().await.unwrap();
        assert_eq!(created.spreadsheet_id, "abc123");

        let row = Row::from_entries(["x", "y"]);
        append_row::execute(&client, &created.spreadsheet_id, &row)
            .await
            .unwrap();

        let rows = client.read_rows(&created.spreadsheet_id, 1).await.unwrap();
        assert!(rows.contains(&vec!["x".to_string(), "y".to_string()]));
    }
}
