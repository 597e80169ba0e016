//! Spreadsheet values and formatting.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use subrev_core::a1::{cell_range, whole_sheet};
use subrev_core::tracker::TrackerLayout;
use subrev_core::{CellValue, Grid};

use super::{endpoint, GoogleWorkspace, SHEETS_API_URL};
use crate::error::PlatformError;
use crate::services::Sheets;

/// Sheet id of the first sheet in a newly created spreadsheet.
const FIRST_SHEET_ID: i64 = 0;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

fn decode_grid(range: ValueRange) -> Grid {
    range
        .values
        .iter()
        .map(|row| row.iter().map(CellValue::from_json).collect())
        .collect()
}

fn encode_grid(grid: &Grid) -> serde_json::Value {
    serde_json::Value::Array(
        grid.iter()
            .map(|row| serde_json::Value::Array(row.iter().map(CellValue::to_json).collect()))
            .collect(),
    )
}

/// `batchUpdate` requests that turn a freshly written tracker grid into a
/// usable checklist.
pub fn tracker_format_requests(layout: &TrackerLayout, sheet_id: i64) -> Vec<serde_json::Value> {
    let rows = layout.grid.len() as i64;
    let columns = layout.column_count() as i64;
    let mut requests = vec![
        serde_json::json!({
            "repeatCell": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": 0,
                    "endRowIndex": 1,
                    "startColumnIndex": 0,
                    "endColumnIndex": columns,
                },
                "cell": { "userEnteredFormat": { "textFormat": { "bold": true } } },
                "fields": "userEnteredFormat.textFormat.bold",
            }
        }),
        serde_json::json!({
            "updateSheetProperties": {
                "properties": {
                    "sheetId": sheet_id,
                    "gridProperties": { "frozenRowCount": 1 },
                },
                "fields": "gridProperties.frozenRowCount",
            }
        }),
    ];

    if layout.reviewer_count > 0 && rows > 1 {
        requests.push(serde_json::json!({
            "setDataValidation": {
                "range": {
                    "sheetId": sheet_id,
                    "startRowIndex": 1,
                    "endRowIndex": rows,
                    "startColumnIndex": layout.reviewer_start as i64,
                    "endColumnIndex": columns,
                },
                "rule": {
                    "condition": { "type": "BOOLEAN" },
                    "strict": true,
                },
            }
        }));
    }

    requests.push(serde_json::json!({
        "autoResizeDimensions": {
            "dimensions": {
                "sheetId": sheet_id,
                "dimension": "COLUMNS",
                "startIndex": 0,
                "endIndex": columns,
            }
        }
    }));

    requests
}

#[async_trait]
impl Sheets for GoogleWorkspace {
    async fn read_grid(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
    ) -> Result<Grid, PlatformError> {
        let range = whole_sheet(sheet);
        let mut url = endpoint(SHEETS_API_URL, &[spreadsheet_id, "values", &range])?;
        url.query_pairs_mut()
            .append_pair("valueRenderOption", "UNFORMATTED_VALUE")
            .append_pair("majorDimension", "ROWS");

        let range: ValueRange = self.call(Method::GET, url, None).await?;
        let grid = decode_grid(range);
        tracing::debug!(spreadsheet_id, rows = grid.len(), "Read sheet");
        Ok(grid)
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
        row: usize,
        col: usize,
        value: &CellValue,
    ) -> Result<(), PlatformError> {
        let range = cell_range(sheet, row, col);
        let grid = vec![vec![value.clone()]];
        write_values(self, spreadsheet_id, &range, &grid).await
    }

    async fn write_grid(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
        grid: &Grid,
    ) -> Result<(), PlatformError> {
        let range = cell_range(sheet, 0, 0);
        write_values(self, spreadsheet_id, &range, grid).await
    }

    async fn format_tracker(
        &self,
        spreadsheet_id: &str,
        layout: &TrackerLayout,
    ) -> Result<(), PlatformError> {
        let url = endpoint(SHEETS_API_URL, &[&format!("{spreadsheet_id}:batchUpdate")])?;
        let body = serde_json::json!({
            "requests": tracker_format_requests(layout, FIRST_SHEET_ID),
        });
        let _: serde_json::Value = self.call(Method::POST, url, Some(&body)).await?;
        Ok(())
    }
}

async fn write_values(
    client: &GoogleWorkspace,
    spreadsheet_id: &str,
    range: &str,
    grid: &Grid,
) -> Result<(), PlatformError> {
    let mut url = endpoint(SHEETS_API_URL, &[spreadsheet_id, "values", range])?;
    url.query_pairs_mut().append_pair("valueInputOption", "RAW");
    let body = serde_json::json!({
        "range": range,
        "majorDimension": "ROWS",
        "values": encode_grid(grid),
    });
    let _: serde_json::Value = client.call(Method::PUT, url, Some(&body)).await?;
    tracing::debug!(spreadsheet_id, range, rows = grid.len(), "Wrote values");
    Ok(())
}
