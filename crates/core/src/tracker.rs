//! Review Tracker layout: one row per submission folder, one checkbox
//! column per reviewer.

use std::collections::HashSet;

use crate::naming::{
    reviewer_header, FOLDER_HEADER, PROJECT_TITLE_HEADER, SUBMISSION_ID_HEADER,
};
use crate::submission::SubmissionId;
use crate::types::{cell, CellValue, FileRef, Grid};

/// Columns before the first reviewer column.
pub const FIXED_COLUMNS: usize = 3;

/// A submission folder recognised by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFolder {
    pub id: SubmissionId,
    pub folder: FileRef,
}

/// Keep folders whose name is a submission id, ordered by the parsed
/// number. When two folders share a name the first listed wins.
pub fn index_submission_folders(folders: Vec<FileRef>) -> Vec<SubmissionFolder> {
    let mut seen = HashSet::new();
    let mut indexed: Vec<SubmissionFolder> = folders
        .into_iter()
        .filter_map(|folder| {
            let id = folder.name.parse::<SubmissionId>().ok()?;
            seen.insert(folder.name.clone())
                .then_some(SubmissionFolder { id, folder })
        })
        .collect();
    // Stable: equal numbers with different padding keep listing order.
    indexed.sort_by_key(|entry| entry.id);
    indexed
}

/// Project title of submission `id` from the master sheet, looked up by
/// position. Empty when the sheet has no title column or no such row.
pub fn project_title(master: &[Vec<CellValue>], id: SubmissionId) -> String {
    let Some(header) = master.first() else {
        return String::new();
    };
    let Some(col) = header
        .iter()
        .position(|h| h.as_text() == PROJECT_TITLE_HEADER)
    else {
        return String::new();
    };
    master
        .get(id.number() as usize)
        .map(|row| cell(row, col).as_text())
        .unwrap_or_default()
}

/// Grid and formatting extents for a freshly built tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerLayout {
    pub grid: Grid,
    /// First reviewer column (zero-based).
    pub reviewer_start: usize,
    pub reviewer_count: usize,
}

impl TrackerLayout {
    pub fn build(
        folders: &[SubmissionFolder],
        master: &[Vec<CellValue>],
        reviewers: &[String],
    ) -> Self {
        let mut header = vec![
            CellValue::text(SUBMISSION_ID_HEADER),
            CellValue::text(PROJECT_TITLE_HEADER),
            CellValue::text(FOLDER_HEADER),
        ];
        header.extend(reviewers.iter().map(|r| CellValue::text(reviewer_header(r))));

        let mut grid = Vec::with_capacity(folders.len() + 1);
        grid.push(header);
        for entry in folders {
            let mut row = vec![
                CellValue::text(entry.folder.name.clone()),
                CellValue::text(project_title(master, entry.id)),
                CellValue::text(entry.folder.url.clone()),
            ];
            row.extend(reviewers.iter().map(|_| CellValue::Bool(false)));
            grid.push(row);
        }

        Self {
            grid,
            reviewer_start: FIXED_COLUMNS,
            reviewer_count: reviewers.len(),
        }
    }

    /// Data rows, header excluded.
    pub fn row_count(&self) -> usize {
        self.grid.len().saturating_sub(1)
    }

    pub fn column_count(&self) -> usize {
        self.reviewer_start + self.reviewer_count
    }
}
