use crate::error::Result;
use crate::sheets::SheetOperations;
use tracing::info;

pub async fn execute<S>(client: &S) -> Result<()>
where
    S: SheetOperations + Sync,
{
    let created = client.create_spreadsheet().await?;

    info!(id = %created.spreadsheet_id, "Spreadsheet created");
    println!("{}", created);

    Ok(())
}
