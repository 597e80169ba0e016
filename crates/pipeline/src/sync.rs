//! Master sheet → submission folders and summary documents.
//!
//! Each non-blank data row gets a folder named after its positional
//! [`SubmissionId`] and a summary document inside it. Existing folders and
//! documents are reused untouched, so running the sync again only fills in
//! what is missing. A summary document that exists but is blank (left over
//! from a failed write) is filled in. Rows are processed independently: a failing row is
//! logged and recorded and the batch moves on, unless `stop_on_error` is
//! set.

use chrono::Utc;
use serde::Serialize;

use subrev_core::naming::{summary_document_name, FOLDER_HEADER, SUBMISSION_ID_HEADER};
use subrev_core::summary::SummaryDocument;
use subrev_core::types::cell;
use subrev_core::{CellValue, SubmissionId};
use subrev_platform::{Docs, Drive, FileKind, Sheets};

use crate::error::PipelineError;
use crate::folders::{find_file, lookup_folder, FolderLookup};

#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub spreadsheet_id: String,
    /// Sheet holding the submissions; the first sheet when `None`.
    pub sheet: Option<String>,
    /// Folder the submission folders live in.
    pub parent_folder_id: String,
    /// Abort at the first failing row instead of continuing.
    pub stop_on_error: bool,
}

/// A row that could not be synced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// 1-based sheet row number (the header is row 1).
    pub row: usize,
    pub submission_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Data rows read, blank ones included.
    pub rows: usize,
    pub blank_rows: usize,
    pub folders_created: usize,
    pub folders_reused: usize,
    pub documents_created: usize,
    /// Existing but blank summary documents written on this run.
    pub documents_filled: usize,
    pub documents_reused: usize,
    /// Id and folder-link cells written back to the master sheet.
    pub cells_written: usize,
    pub failures: Vec<RowFailure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum DocumentOutcome {
    Created,
    Filled,
    #[default]
    Reused,
}

#[derive(Debug, Default)]
struct RowOutcome {
    folder_created: bool,
    document: DocumentOutcome,
    cells_written: usize,
}

/// Columns of the master sheet the sync writes back into.
#[derive(Debug, Clone, Copy)]
struct WriteBack {
    id_col: Option<usize>,
    folder_col: Option<usize>,
}

impl WriteBack {
    fn from_header(header: &[CellValue]) -> Self {
        let find = |name: &str| header.iter().position(|h| h.as_text() == name);
        Self {
            id_col: find(SUBMISSION_ID_HEADER),
            folder_col: find(FOLDER_HEADER),
        }
    }
}

struct SyncContext<'a> {
    sheets: &'a dyn Sheets,
    drive: &'a dyn Drive,
    docs: &'a dyn Docs,
    options: &'a SyncOptions,
    header: &'a [CellValue],
    write_back: WriteBack,
}

pub async fn sync_submissions(
    sheets: &dyn Sheets,
    drive: &dyn Drive,
    docs: &dyn Docs,
    options: &SyncOptions,
) -> Result<SyncReport, PipelineError> {
    let grid = sheets
        .read_grid(&options.spreadsheet_id, options.sheet.as_deref())
        .await?;
    let mut report = SyncReport::default();

    let Some((header, rows)) = grid.split_first() else {
        tracing::warn!(spreadsheet_id = %options.spreadsheet_id, "Master sheet is empty");
        return Ok(report);
    };

    let ctx = SyncContext {
        sheets,
        drive,
        docs,
        options,
        header,
        write_back: WriteBack::from_header(header),
    };

    tracing::info!(
        spreadsheet_id = %options.spreadsheet_id,
        rows = rows.len(),
        "Syncing submissions",
    );

    for (idx, row) in rows.iter().enumerate() {
        report.rows += 1;
        if row.iter().all(CellValue::is_empty) {
            report.blank_rows += 1;
            continue;
        }

        let id = SubmissionId::from_position(idx as u32 + 1).to_string();
        let sheet_row = idx + 2;

        match sync_row(&ctx, idx + 1, &id, row).await {
            Ok(outcome) => {
                if outcome.folder_created {
                    report.folders_created += 1;
                } else {
                    report.folders_reused += 1;
                }
                match outcome.document {
                    DocumentOutcome::Created => report.documents_created += 1,
                    DocumentOutcome::Filled => report.documents_filled += 1,
                    DocumentOutcome::Reused => report.documents_reused += 1,
                }
                report.cells_written += outcome.cells_written;
            }
            Err(e) if options.stop_on_error => {
                tracing::error!(
                    row = sheet_row,
                    submission_id = %id,
                    error = %e,
                    "Row failed, stopping",
                );
                return Err(PipelineError::Row {
                    row: sheet_row,
                    submission_id: id,
                    source: Box::new(e),
                });
            }
            Err(e) => {
                tracing::error!(
                    row = sheet_row,
                    submission_id = %id,
                    error = %e,
                    "Row failed, continuing",
                );
                report.failures.push(RowFailure {
                    row: sheet_row,
                    submission_id: id,
                    message: e.to_string(),
                });
            }
        }
    }

    tracing::info!(
        rows = report.rows,
        folders_created = report.folders_created,
        documents_created = report.documents_created,
        failures = report.failures.len(),
        "Sync finished",
    );
    Ok(report)
}

/// Sync one data row. `grid_row` is the row's index in the grid.
async fn sync_row(
    ctx: &SyncContext<'_>,
    grid_row: usize,
    id: &str,
    row: &[CellValue],
) -> Result<RowOutcome, PipelineError> {
    let parent = &ctx.options.parent_folder_id;
    let mut outcome = RowOutcome::default();

    let folder = match lookup_folder(ctx.drive, parent, id).await? {
        FolderLookup::Unique(folder) => folder,
        FolderLookup::Ambiguous { first, count } => {
            tracing::warn!(
                submission_id = id,
                count,
                "Several folders share this name, using the first",
            );
            first
        }
        FolderLookup::Missing => {
            outcome.folder_created = true;
            ctx.drive.create_folder(parent, id).await?
        }
    };

    let doc_name = summary_document_name(id);
    let unwritten = match find_file(ctx.drive, &folder.id, &doc_name).await? {
        Some(existing) => {
            if ctx.docs.is_blank(&existing.id).await? {
                tracing::warn!(
                    submission_id = id,
                    document_id = %existing.id,
                    "Filling blank summary document",
                );
                outcome.document = DocumentOutcome::Filled;
                Some(existing)
            } else {
                None
            }
        }
        None => {
            outcome.document = DocumentOutcome::Created;
            Some(
                ctx.drive
                    .create_file(&folder.id, &doc_name, FileKind::Document)
                    .await?,
            )
        }
    };
    if let Some(document) = unwritten {
        let summary = SummaryDocument::from_row(id, ctx.header, row, Utc::now());
        ctx.docs.write_summary(&document.id, &summary).await?;
    }

    let targets = [
        (ctx.write_back.id_col, id),
        (ctx.write_back.folder_col, folder.url.as_str()),
    ];
    for (col, value) in targets {
        let Some(col) = col else { continue };
        if cell(row, col).as_text() == value {
            continue;
        }
        ctx.sheets
            .write_cell(
                &ctx.options.spreadsheet_id,
                ctx.options.sheet.as_deref(),
                grid_row,
                col,
                &CellValue::text(value),
            )
            .await?;
        outcome.cells_written += 1;
    }

    tracing::debug!(
        submission_id = id,
        folder_id = %folder.id,
        folder_created = outcome.folder_created,
        document = ?outcome.document,
        "Row synced",
    );
    Ok(outcome)
}
