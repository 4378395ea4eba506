use crate::error::Result;
use crate::models::Row;
use crate::sheets::SheetOperations;
use google_sheets4::api::AppendValuesResponse;
use serde_json::Value;
use tracing::debug;

/// Build the row from either the free-text entries or a JSON array
pub fn parse_row(entries: &[String], json: Option<&str>) -> Result<Row> {
    match json {
        Some(json) => Row::from_json(json),
        None => Ok(Row::from_entries(entries.iter().cloned())),
    }
}

/// Drop the `null`s the typed response adds for fields the service left out,
/// so the printed JSON matches the payload Google sent.
fn strip_nulls(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_nulls).collect()),
        other => other,
    }
}

pub(crate) fn render_response(response: &AppendValuesResponse) -> Result<String> {
    let payload = strip_nulls(serde_json::to_value(response)?);
    Ok(serde_json::to_string_pretty(&payload)?)
}

pub async fn execute<S>(client: &S, spreadsheet_id: &str, row: &Row) -> Result<()>
where
    S: SheetOperations + Sync,
{
    let response = client.append_row(spreadsheet_id, row).await?;

    let updated_range = response
        .updates
        .as_ref()
        .and_then(|updates| updates.updated_range.as_deref());
    debug!(?updated_range, "Appended row");
    println!("{}", render_response(&response)?);

    Ok(())
}
