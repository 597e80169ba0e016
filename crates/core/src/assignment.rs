//! Reviewer-assignment extraction from a tracker grid.
//!
//! A tracker has one `Submission ID` column and one checkbox column per
//! reviewer, headed `Reviewer: <email>`. Every checked box yields one
//! [`Assignment`].

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::naming::SUBMISSION_ID_HEADER;
use crate::types::{cell, CellValue};

fn reviewer_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)^\s*reviewer\s*[:\-]\s*([^\s@]+@[^\s@]+\.[^\s@]+)\s*$")
            .expect("static regex")
    })
}

/// Reviewer email embedded in a tracker column header, if the header
/// matches the reviewer column pattern.
pub fn reviewer_from_header(header: &str) -> Option<String> {
    reviewer_pattern()
        .captures(header)
        .map(|caps| caps[1].to_string())
}

/// A reviewer checkbox column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewerColumn {
    pub index: usize,
    pub email: String,
}

/// Column positions found in a tracker header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerHeader {
    pub submission_col: usize,
    pub reviewers: Vec<ReviewerColumn>,
}

impl TrackerHeader {
    /// Locate the submission id column (first exact match) and every
    /// reviewer column, in header order.
    pub fn parse(header: &[CellValue]) -> Result<Self, CoreError> {
        let mut submission_col = None;
        let mut reviewers = Vec::new();

        for (index, value) in header.iter().enumerate() {
            let text = value.as_text();
            if text == SUBMISSION_ID_HEADER && submission_col.is_none() {
                submission_col = Some(index);
            } else if let Some(email) = reviewer_from_header(&text) {
                reviewers.push(ReviewerColumn { index, email });
            }
        }

        let submission_col = submission_col
            .ok_or_else(|| CoreError::MissingColumn(SUBMISSION_ID_HEADER.to_string()))?;

        Ok(Self {
            submission_col,
            reviewers,
        })
    }
}

/// One checked box: `reviewer` is assigned to `submission_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub submission_id: String,
    pub reviewer: String,
}

/// Extract assignments from a full tracker grid (header row first).
///
/// Rows with an empty submission id are ignored. Output order is row order,
/// then reviewer column order within a row.
pub fn extract_assignments(grid: &[Vec<CellValue>]) -> Result<Vec<Assignment>, CoreError> {
    let Some((header_row, rows)) = grid.split_first() else {
        return Err(CoreError::MissingColumn(SUBMISSION_ID_HEADER.to_string()));
    };
    let header = TrackerHeader::parse(header_row)?;

    let mut assignments = Vec::new();
    for row in rows {
        let submission_id = cell(row, header.submission_col).as_text();
        if submission_id.is_empty() {
            continue;
        }
        for column in &header.reviewers {
            if cell(row, column.index).is_checked() {
                assignments.push(Assignment {
                    submission_id: submission_id.clone(),
                    reviewer: column.email.clone(),
                });
            }
        }
    }

    Ok(assignments)
}
