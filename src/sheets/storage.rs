use crate::error::{AppError, CredentialError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;
use yup_oauth2::ApplicationSecret;
use yup_oauth2::storage::{TokenInfo, TokenStorage};

/// On-disk token document. Carries the application secret so that later
/// runs can refresh the access token without the original credentials file.
#[derive(Serialize, Deserialize)]
pub(crate) struct TokenFile {
    pub secret: ApplicationSecret,
    pub scopes: Vec<String>,
    pub token: TokenInfo,
}

impl TokenFile {
    /// Read and validate a token file. Every problem is a hard failure.
    pub(crate) fn load(path: &Path) -> std::result::Result<Self, CredentialError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CredentialError::Missing {
                    path: path.to_path_buf(),
                });
            }
            Err(e) => {
                return Err(CredentialError::Unreadable {
                    path: path.to_path_buf(),
                    reason: e,
                });
            }
        };

        let invalid = |reason: String| CredentialError::Invalid {
            path: path.to_path_buf(),
            reason,
        };

        let file: TokenFile =
            serde_json::from_str(&contents).map_err(|e| invalid(format!("{}", e)))?;

        if file.token.access_token.is_none() && file.token.refresh_token.is_none() {
            return Err(invalid("no access or refresh token present".to_string()));
        }

        Ok(file)
    }

    pub(crate) fn covers(&self, target_scopes: &[&str]) -> bool {
        target_scopes
            .iter()
            .all(|scope| self.scopes.iter().any(|s| s == scope))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum WriteMode {
    /// Fail if the destination already exists
    CreateNew,
    /// Replace the destination, used when a refreshed token is stored
    Replace,
}

/// `TokenStorage` backed by a single token file.
pub(crate) struct TokenFileStorage {
    path: PathBuf,
    secret: ApplicationSecret,
    mode: WriteMode,
}

impl TokenFileStorage {
    pub(crate) fn new(path: PathBuf, secret: ApplicationSecret, mode: WriteMode) -> Self {
        Self { path, secret, mode }
    }

    fn save(&self, file: &TokenFile) -> Result<()> {
        let contents = serde_json::to_string_pretty(file)?;

        let parent = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Temp files are created with 0600 permissions, and the destination only
        // appears once the contents are fully written
        let mut temp = NamedTempFile::new_in(parent)
            .map_err(|e| AppError::Auth(format!("Failed to create token file: {}", e)))?;
        temp.write_all(contents.as_bytes())
            .map_err(|e| AppError::Auth(format!("Failed to write token file: {}", e)))?;

        match self.mode {
            WriteMode::CreateNew => temp.persist_noclobber(&self.path).map_err(|e| {
                if e.error.kind() == ErrorKind::AlreadyExists {
                    AppError::TokenExists {
                        path: self.path.clone(),
                    }
                } else {
                    AppError::Auth(format!("Failed to persist token file: {}", e.error))
                }
            })?,
            WriteMode::Replace => temp
                .persist(&self.path)
                .map_err(|e| AppError::Auth(format!("Failed to persist token file: {}", e.error)))?,
        };

        debug!(path = ?self.path, "Saved token");
        Ok(())
    }
}

#[async_trait]
impl TokenStorage for TokenFileStorage {
    async fn set(&self, scopes: &[&str], token: TokenInfo) -> anyhow::Result<()> {
        let file = TokenFile {
            secret: self.secret.clone(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            token,
        };
        self.save(&file)?;
        Ok(())
    }

    async fn get(&self, target_scopes: &[&str]) -> Option<TokenInfo> {
        match TokenFile::load(&self.path) {
            Ok(file) if file.covers(target_scopes) => Some(file.token),
            Ok(_) => {
                debug!(path = ?self.path, "Stored token does not cover requested scopes");
                None
            }
            Err(e) => {
                debug!(error = %e, "No usable stored token");
                None
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use super::*;

    pub(crate) const SCOPE: &str = "https://www.googleapis.com/auth/drive.file";

    pub(crate) fn mock_secret() -> ApplicationSecret {
        ApplicationSecret {
            client_id: "client-id.apps.googleusercontent.com".to_string(),
            client_secret: "client-secret".to_string(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".to_string(),
            token_uri: "https://oauth2.googleapis.com/token".to_string(),
            auth_provider_x509_cert_url: None,
            redirect_uris: vec!["http://localhost".to_string()],
            project_id: Some("test-project".to_string()),
            client_email: None,
            client_x509_cert_url: None,
        }
    }

    pub(crate) fn mock_token() -> TokenInfo {
        TokenInfo {
            access_token: Some("ya29.access".to_string()),
            refresh_token: Some("1//refresh".to_string()),
            expires_at: None,
            id_token: None,
        }
    }
}
