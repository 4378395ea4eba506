use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_DIR_PREFIX: &str = "scoped-sheets";

// Brief research suggests a Google Sheet cannot hold more than about 5 million
// cells, so this comfortably covers every row of the first sheet.
pub const DEFAULT_ROW_BOUND: u64 = 10_000_000;

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub sheets: SheetsConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SheetsConfig {
    /// Title of the sheet that rows are read from and appended to
    pub sheet_name: String,
    /// Column window handed to the append call, e.g. `A:B`
    pub append_columns: String,
    /// Number of rows past the starting row covered by a read
    pub row_bound: u64,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            append_columns: "A:B".to_string(),
            row_bound: DEFAULT_ROW_BOUND,
        }
    }
}

impl Config {
    /// Load the config from `path`, or from the XDG config location when no
    /// path is given. A missing default file yields the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(path) => {
                if !path.exists() {
                    return Err(AppError::Config(format!(
                        "Config file not found at {:?}",
                        path
                    )));
                }
                path.to_path_buf()
            }
            None => match Self::config_file() {
                Some(path) => path,
                None => {
                    debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        debug!(path = ?config_path, "Loading config");
        let contents = fs::read_to_string(&config_path)?;
        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)
            .map_err(|e| AppError::Config(format!("Failed to parse config: {}", e)))?;

        if config.sheets.sheet_name.is_empty() || config.sheets.append_columns.is_empty() {
            return Err(AppError::Config(
                "sheets.sheet_name and sheets.append_columns must not be empty".to_string(),
            ));
        }

        if config.sheets.row_bound == 0 {
            return Err(AppError::Config(
                "sheets.row_bound must be at least 1".to_string(),
            ));
        }

        Ok(config)
    }

    /// Locate an existing config file under the XDG config directories
    pub fn config_file() -> Option<PathBuf> {
        xdg::BaseDirectories::with_prefix(CONFIG_DIR_PREFIX).find_config_file("config.toml")
    }
}
