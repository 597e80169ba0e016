//! Human-readable summary of one master-sheet row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::links::{fetchable_image_url, is_image_link};
use crate::naming::{FOLDER_HEADER, PROJECT_TITLE_HEADER, SUBMISSION_ID_HEADER};
use crate::types::{cell, CellValue};

/// One labelled entry of a summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SummaryBlock {
    Field { label: String, value: String },
    Image { label: String, url: String },
}

/// Content written into a submission's summary document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryDocument {
    pub title: String,
    pub generated_at: DateTime<Utc>,
    pub blocks: Vec<SummaryBlock>,
}

impl SummaryDocument {
    /// Build the summary for `row` under `header`.
    ///
    /// Columns the workflow manages itself (id, folder link) are left out,
    /// as are empty cells and columns with a blank header.
    pub fn from_row(
        submission_id: &str,
        header: &[CellValue],
        row: &[CellValue],
        generated_at: DateTime<Utc>,
    ) -> Self {
        let mut project_title = None;
        let mut blocks = Vec::new();

        for (col, label) in header.iter().enumerate() {
            let label = label.as_text();
            if label.is_empty() || label == SUBMISSION_ID_HEADER || label == FOLDER_HEADER {
                continue;
            }
            let value = cell(row, col);
            if value.is_empty() {
                continue;
            }
            let value = value.as_text();
            if label == PROJECT_TITLE_HEADER && project_title.is_none() {
                project_title = Some(value.clone());
            }

            if is_image_link(&value) {
                blocks.push(SummaryBlock::Image {
                    label,
                    url: fetchable_image_url(&value),
                });
            } else {
                blocks.push(SummaryBlock::Field { label, value });
            }
        }

        let title = match project_title {
            Some(t) => format!("{submission_id} — {t}"),
            None => submission_id.to_string(),
        };

        Self {
            title,
            generated_at,
            blocks,
        }
    }

    /// Footer line stamped under the content.
    pub fn footer(&self) -> String {
        format!(
            "Generated {}",
            self.generated_at.format("%Y-%m-%d %H:%M UTC")
        )
    }
}
