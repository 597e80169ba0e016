//! Summary document rendering.
//!
//! Content is appended front to back in a single `batchUpdate`. Document
//! indices count UTF-16 code units and start at 1; an inline image takes
//! one index.

use async_trait::async_trait;
use reqwest::Method;

use subrev_core::summary::{SummaryBlock, SummaryDocument};

use super::{endpoint, GoogleWorkspace, DOCS_API_URL};
use crate::error::PlatformError;
use crate::services::Docs;

/// Rendered width of inline images, in points.
const IMAGE_WIDTH_PT: u32 = 400;

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

/// Appends text and styles while tracking the insertion index.
struct RequestBuilder {
    index: usize,
    requests: Vec<serde_json::Value>,
}

impl RequestBuilder {
    fn new() -> Self {
        Self {
            index: 1,
            requests: Vec::new(),
        }
    }

    /// Insert `text` at the end and return its `[start, end)` range.
    fn text(&mut self, text: &str) -> (usize, usize) {
        let start = self.index;
        self.requests.push(serde_json::json!({
            "insertText": { "location": { "index": start }, "text": text }
        }));
        self.index += utf16_len(text);
        (start, self.index)
    }

    fn text_style(&mut self, (start, end): (usize, usize), style: serde_json::Value, fields: &str) {
        self.requests.push(serde_json::json!({
            "updateTextStyle": {
                "range": { "startIndex": start, "endIndex": end },
                "textStyle": style,
                "fields": fields,
            }
        }));
    }

    fn paragraph_style(&mut self, (start, end): (usize, usize), named_style: &str) {
        self.requests.push(serde_json::json!({
            "updateParagraphStyle": {
                "range": { "startIndex": start, "endIndex": end },
                "paragraphStyle": { "namedStyleType": named_style },
                "fields": "namedStyleType",
            }
        }));
    }

    fn image(&mut self, uri: &str) {
        self.requests.push(serde_json::json!({
            "insertInlineImage": {
                "location": { "index": self.index },
                "uri": uri,
                "objectSize": { "width": { "magnitude": IMAGE_WIDTH_PT, "unit": "PT" } },
            }
        }));
        self.index += 1;
    }

    /// Insert `label: ` in bold followed by `rest`.
    fn labelled(&mut self, label: &str, rest: &str) {
        let label_text = format!("{label}: ");
        let (start, _) = self.text(&format!("{label_text}{rest}"));
        // Bold the label and colon, not the trailing space.
        let bold_end = start + utf16_len(&label_text) - 1;
        self.text_style((start, bold_end), serde_json::json!({ "bold": true }), "bold");
    }
}

/// `batchUpdate` requests that render `summary` into an empty document.
pub fn summary_requests(summary: &SummaryDocument) -> Vec<serde_json::Value> {
    let mut builder = RequestBuilder::new();

    let title = builder.text(&format!("{}\n", summary.title));
    builder.paragraph_style(title, "HEADING_1");

    for block in &summary.blocks {
        match block {
            SummaryBlock::Field { label, value } => {
                builder.labelled(label, &format!("{value}\n"));
            }
            SummaryBlock::Image { label, url } => {
                builder.labelled(label, "\n");
                builder.image(url);
                builder.text("\n");
            }
        }
    }

    builder.text("\n");
    let footer = builder.text(&format!("{}\n", summary.footer()));
    builder.text_style(footer, serde_json::json!({ "italic": true }), "italic");

    builder.requests
}

/// Whether a `documents.get` body holds nothing but whitespace text.
/// Tables, inline objects and positioned objects all count as content.
pub fn document_is_blank(document: &serde_json::Value) -> bool {
    let has_objects = ["inlineObjects", "positionedObjects"].iter().any(|key| {
        document[key]
            .as_object()
            .is_some_and(|objects| !objects.is_empty())
    });
    if has_objects {
        return false;
    }

    let content = document["body"]["content"].as_array();
    content.into_iter().flatten().all(|element| {
        if element.get("table").is_some() {
            return false;
        }
        element["paragraph"]["elements"]
            .as_array()
            .into_iter()
            .flatten()
            .all(|run| {
                run["textRun"]["content"]
                    .as_str()
                    .map_or(true, |text| text.trim().is_empty())
            })
    })
}

#[async_trait]
impl Docs for GoogleWorkspace {
    async fn write_summary(
        &self,
        document_id: &str,
        summary: &SummaryDocument,
    ) -> Result<(), PlatformError> {
        let url = endpoint(DOCS_API_URL, &[&format!("{document_id}:batchUpdate")])?;
        let requests = summary_requests(summary);
        let body = serde_json::json!({ "requests": requests });
        let _: serde_json::Value = self.call(Method::POST, url, Some(&body)).await?;
        tracing::info!(document_id, blocks = summary.blocks.len(), "Wrote summary document");
        Ok(())
    }

    async fn is_blank(&self, document_id: &str) -> Result<bool, PlatformError> {
        let url = endpoint(DOCS_API_URL, &[document_id])?;
        let document: serde_json::Value = self.call(Method::GET, url, None).await?;
        Ok(document_is_blank(&document))
    }
}
