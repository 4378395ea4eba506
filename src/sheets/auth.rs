use crate::error::{AppError, CredentialError, Result};
use crate::sheets::client::AUTH_SCOPE;
use crate::sheets::storage::{TokenFile, TokenFileStorage, WriteMode};
use hyper_util::client::legacy::connect::HttpConnector;
use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use tracing::{debug, instrument};
use yup_oauth2::authenticator_delegate::InstalledFlowDelegate;
use yup_oauth2::{
    ApplicationSecret, InstalledFlowAuthenticator, InstalledFlowReturnMethod,
    authenticator::Authenticator, hyper_rustls::HttpsConnector,
};

pub(crate) type AuthType = Authenticator<HttpsConnector<HttpConnector>>;

/// How the authorization code gets back to us during `generate_token`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ConsentMode {
    /// Print the consent URL and read the pasted code from stdin. Relies on the
    /// out-of-band redirect, which Google has blocked for new OAuth clients.
    CopyPaste,
    /// Receive the code on a loopback HTTP redirect
    #[default]
    LocalServer,
}

impl From<ConsentMode> for InstalledFlowReturnMethod {
    fn from(mode: ConsentMode) -> Self {
        match mode {
            ConsentMode::CopyPaste => InstalledFlowReturnMethod::Interactive,
            ConsentMode::LocalServer => InstalledFlowReturnMethod::HTTPRedirect,
        }
    }
}

/// Refuses to start a consent flow. Used when loading an existing token, so a
/// dead credential fails fast instead of prompting in the middle of a command.
struct NonInteractiveDelegate;

impl InstalledFlowDelegate for NonInteractiveDelegate {
    fn present_user_url<'a>(
        &'a self,
        _url: &'a str,
        _need_code: bool,
    ) -> Pin<Box<dyn Future<Output = std::result::Result<String, String>> + Send + 'a>> {
        Box::pin(async {
            Err("stored token can no longer be refreshed; run generate_token again".to_string())
        })
    }
}

/// Fail before any file read or network call if the token would overwrite an
/// existing file.
pub(crate) fn ensure_token_absent(token_path: &Path) -> Result<()> {
    if token_path.exists() {
        return Err(AppError::TokenExists {
            path: token_path.to_path_buf(),
        });
    }
    Ok(())
}

/// Run the interactive authorization flow and write the resulting token to
/// `token_path`, which must not exist yet.
#[instrument(name = "Generating token", skip_all, fields(token_path = ?token_path))]
pub async fn generate_token(
    credentials_path: &Path,
    token_path: &Path,
    mode: ConsentMode,
) -> Result<()> {
    ensure_token_absent(token_path)?;

    let secret = yup_oauth2::read_application_secret(credentials_path)
        .await
        .map_err(|e| {
            AppError::Auth(format!(
                "Failed to read credentials from {:?}: {}",
                credentials_path, e
            ))
        })?;

    let storage =
        TokenFileStorage::new(token_path.to_path_buf(), secret.clone(), WriteMode::CreateNew);

    let auth = InstalledFlowAuthenticator::builder(secret, mode.into())
        .with_storage(Box::new(storage))
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))?;

    // Requesting a token drives the consent flow and persists the result
    auth.token(&[AUTH_SCOPE])
        .await
        .map_err(|e| AppError::Auth(format!("Failed to get token: {}", e)))?;

    debug!("Token written");
    Ok(())
}

/// Load the token at `token_path` and verify it by fetching an access token.
#[instrument(name = "Loading credentials", skip_all, fields(token_path = ?token_path))]
pub(crate) async fn load_authenticator(token_path: &Path) -> Result<AuthType> {
    let file = TokenFile::load(token_path)?;

    if !file.covers(&[AUTH_SCOPE.as_ref()]) {
        return Err(CredentialError::Invalid {
            path: token_path.to_path_buf(),
            reason: format!("token was not granted {}", AUTH_SCOPE.as_ref()),
        }
        .into());
    }

    let auth = from_token_file(token_path, file.secret).await?;

    let _token = auth
        .token(&[AUTH_SCOPE])
        .await
        .map_err(|e| CredentialError::Rejected(e.to_string()))?;

    Ok(auth)
}

async fn from_token_file(token_path: &Path, secret: ApplicationSecret) -> Result<AuthType> {
    let storage = TokenFileStorage::new(token_path.to_path_buf(), secret.clone(), WriteMode::Replace);

    InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::Interactive)
        .with_storage(Box::new(storage))
        .flow_delegate(Box::new(NonInteractiveDelegate))
        .build()
        .await
        .map_err(|e| AppError::Auth(format!("Failed to build authenticator: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheets::storage::test_helpers::{SCOPE, mock_secret, mock_token};
    use std::fs;
    use yup_oauth2::storage::TokenStorage;

    #[tokio::test]
    async fn test_generate_token_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.json");
        fs::write(&token_path, "do not touch").unwrap();

        // The credentials file does not exist either, so reaching past the
        // guard would surface as an Auth error instead
        let result = generate_token(
            &dir.path().join("credentials.json"),
            &token_path,
            ConsentMode::default(),
        )
        .await;

        assert!(matches!(result, Err(AppError::TokenExists { .. })));
        assert_eq!(fs::read_to_string(&token_path).unwrap(), "do not touch");
    }

    #[tokio::test]
    async fn test_generate_token_missing_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.json");

        let result = generate_token(
            &dir.path().join("credentials.json"),
            &token_path,
            ConsentMode::default(),
        )
        .await;

        assert!(matches!(result, Err(AppError::Auth(_))));
        assert!(!token_path.exists());
    }

    #[tokio::test]
    async fn test_load_authenticator_missing_token_is_hard_failure() {
        let dir = tempfile::tempdir().unwrap();

        let result = load_authenticator(&dir.path().join("token.json")).await;

        assert!(matches!(
            result,
            Err(AppError::Credential(CredentialError::Missing { .. }))
        ));
    }

    #[tokio::test]
    async fn test_load_authenticator_rejects_foreign_scope() {
        let dir = tempfile::tempdir().unwrap();
        let token_path = dir.path().join("token.json");
        let storage =
            TokenFileStorage::new(token_path.clone(), mock_secret(), WriteMode::CreateNew);
        storage
            .set(
                &["https://www.googleapis.com/auth/spreadsheets"],
                mock_token(),
            )
            .await
            .unwrap();

        let result = load_authenticator(&token_path).await;

        assert!(matches!(
            result,
            Err(AppError::Credential(CredentialError::Invalid { .. }))
        ));
    }

    #[test]
    fn test_drive_file_scope() {
        assert_eq!(AUTH_SCOPE.as_ref(), SCOPE);
    }

    #[test]
    fn test_default_consent_uses_loopback_redirect() {
        assert_eq!(ConsentMode::default(), ConsentMode::LocalServer);
        assert!(matches!(
            InstalledFlowReturnMethod::from(ConsentMode::default()),
            InstalledFlowReturnMethod::HTTPRedirect
        ));
    }

    #[test]
    fn test_consent_mode_maps_to_return_method() {
        assert!(matches!(
            InstalledFlowReturnMethod::from(ConsentMode::CopyPaste),
            InstalledFlowReturnMethod::Interactive
        ));
        assert!(matches!(
            InstalledFlowReturnMethod::from(ConsentMode::LocalServer),
            InstalledFlowReturnMethod::HTTPRedirect
        ));
    }
}
