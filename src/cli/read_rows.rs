use crate::error::Result;
use crate::sheets::SheetOperations;
use tracing::debug;

pub async fn execute<S>(client: &S, spreadsheet_id: &str, start_at_row: u64) -> Result<()>
where
    S: SheetOperations + Sync,
{
    let rows = client.read_rows(spreadsheet_id, start_at_row).await?;

    debug!(count = rows.len(), "Read rows");
    println!("{}", serde_json::to_string(&rows)?);

    Ok(())
}
