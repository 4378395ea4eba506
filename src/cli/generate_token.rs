use crate::error::Result;
use crate::sheets::{ConsentMode, generate_token};
use std::path::Path;
use tracing::info;

pub async fn execute(credentials_path: &Path, token_path: &Path, paste_code: bool) -> Result<()> {
    let mode = match paste_code {
        true => ConsentMode::CopyPaste,
        false => ConsentMode::default(),
    };

    generate_token(credentials_path, token_path, mode).await?;

    info!(path = ?token_path, "Token saved");

    Ok(())
}
