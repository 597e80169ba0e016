//! Review Tracker generation.

use serde::Serialize;

use subrev_core::assignment::reviewer_from_header;
use subrev_core::naming::reviewer_header;
use subrev_core::tracker::{index_submission_folders, TrackerLayout};
use subrev_core::{CoreError, FileRef};
use subrev_platform::{Drive, FileKind, Sheets};

use crate::error::PipelineError;
use crate::folders::find_file;

#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub master_spreadsheet_id: String,
    pub master_sheet: Option<String>,
    /// Folder holding the submission folders; the tracker is created here too.
    pub parent_folder_id: String,
    pub reviewers: Vec<String>,
    /// Tracker spreadsheet name.
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerReport {
    pub spreadsheet: FileRef,
    pub rows: usize,
    pub reviewers: usize,
}

/// Trim, drop duplicates (case-insensitively, first spelling wins) and
/// check each reviewer round-trips through the tracker header pattern.
pub fn normalize_reviewers(reviewers: &[String]) -> Result<Vec<String>, CoreError> {
    let mut normalized: Vec<String> = Vec::with_capacity(reviewers.len());
    for reviewer in reviewers {
        let email = reviewer.trim();
        if email.is_empty() {
            continue;
        }
        if reviewer_from_header(&reviewer_header(email)).as_deref() != Some(email) {
            return Err(CoreError::Validation(format!(
                "'{email}' is not a usable reviewer email"
            )));
        }
        if !normalized.iter().any(|r| r.eq_ignore_ascii_case(email)) {
            normalized.push(email.to_string());
        }
    }
    Ok(normalized)
}

/// Build a new tracker from the submission folders under the parent folder.
///
/// Refuses to run when a file with the tracker's name already exists in
/// the parent folder, so a tracker with ticked boxes is never replaced.
pub async fn build_review_tracker(
    sheets: &dyn Sheets,
    drive: &dyn Drive,
    options: &TrackerOptions,
) -> Result<TrackerReport, PipelineError> {
    let reviewers = normalize_reviewers(&options.reviewers)?;
    let parent = &options.parent_folder_id;

    if let Some(existing) = find_file(drive, parent, &options.name).await? {
        return Err(PipelineError::AlreadyExists {
            name: existing.name,
            url: existing.url,
        });
    }

    let master = sheets
        .read_grid(&options.master_spreadsheet_id, options.master_sheet.as_deref())
        .await?;
    let folders = index_submission_folders(drive.list_folders(parent).await?);
    tracing::info!(
        submissions = folders.len(),
        reviewers = reviewers.len(),
        "Building review tracker",
    );

    let layout = TrackerLayout::build(&folders, &master, &reviewers);
    let spreadsheet = drive
        .create_file(parent, &options.name, FileKind::Spreadsheet)
        .await?;
    sheets.write_grid(&spreadsheet.id, None, &layout.grid).await?;
    sheets.format_tracker(&spreadsheet.id, &layout).await?;

    tracing::info!(
        spreadsheet_id = %spreadsheet.id,
        url = %spreadsheet.url,
        rows = layout.row_count(),
        "Review tracker created",
    );

    Ok(TrackerReport {
        spreadsheet,
        rows: layout.row_count(),
        reviewers: layout.reviewer_count,
    })
}
