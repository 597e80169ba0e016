//! Reviewer workflow: tracker checkboxes → folder access → one notice per
//! reviewer.
//!
//! Every read (tracker, folder and document lookups) happens before the
//! first grant. In strict mode any irregularity found while reading aborts
//! the run with nothing granted or sent; a grant or send failure aborts at
//! that point. In lenient mode irregularities are logged, recorded as
//! [`Issue`]s, and worked around. A failed lookup is an irregularity like
//! any other: the submission is skipped, or linked by folder when only the
//! document lookup failed.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use subrev_core::naming::summary_document_name;
use subrev_core::notice::{Notice, NoticeTemplate};
use subrev_core::tasks::{group_by_reviewer, ReviewTask, ReviewerTasks};
use subrev_core::{extract_assignments, Assignment, FileRef};
use subrev_platform::{Drive, Mailer, Sheets};

use crate::error::PipelineError;
use crate::folders::{find_file, lookup_folder, FolderLookup};

#[derive(Debug, Clone)]
pub struct ReviewerOptions {
    pub tracker_spreadsheet_id: String,
    pub tracker_sheet: Option<String>,
    /// Folder holding the submission folders.
    pub parent_folder_id: String,
    /// Abort on the first irregularity instead of working around it.
    pub strict: bool,
    /// Compose notices but do not send them.
    pub dry_run: bool,
    pub template: NoticeTemplate,
}

/// Something that went wrong in lenient mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub submission_id: Option<String>,
    pub reviewer: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewerReport {
    pub assignments: Vec<Assignment>,
    pub reviewers: Vec<ReviewerTasks>,
    /// Read grants issued.
    pub grants: usize,
    /// Every composed notice, sent or not.
    pub notices: Vec<Notice>,
    pub sent: usize,
    pub issues: Vec<Issue>,
}

/// Folder and summary document resolved for one submission.
#[derive(Debug, Clone)]
struct Resolved {
    folder: FileRef,
    document: Option<FileRef>,
}

struct Run<'a> {
    options: &'a ReviewerOptions,
    report: ReviewerReport,
}

impl Run<'_> {
    /// Record an irregularity, or turn it into the run's error in strict mode.
    fn irregular(
        &mut self,
        error: PipelineError,
        submission_id: Option<&str>,
        reviewer: Option<&str>,
    ) -> Result<(), PipelineError> {
        if self.options.strict {
            tracing::error!(error = %error, "Strict mode: aborting");
            return Err(error);
        }
        tracing::warn!(
            submission_id = submission_id.unwrap_or_default(),
            reviewer = reviewer.unwrap_or_default(),
            error = %error,
            "Continuing past irregularity",
        );
        self.report.issues.push(Issue {
            submission_id: submission_id.map(str::to_string),
            reviewer: reviewer.map(str::to_string),
            message: error.to_string(),
        });
        Ok(())
    }
}

pub async fn run_reviewer_workflow(
    sheets: &dyn Sheets,
    drive: &dyn Drive,
    mailer: &dyn Mailer,
    options: &ReviewerOptions,
) -> Result<ReviewerReport, PipelineError> {
    let mut run = Run {
        options,
        report: ReviewerReport::default(),
    };

    let grid = sheets
        .read_grid(&options.tracker_spreadsheet_id, options.tracker_sheet.as_deref())
        .await?;
    let assignments = extract_assignments(&grid)?;
    tracing::info!(
        assignments = assignments.len(),
        strict = options.strict,
        dry_run = options.dry_run,
        "Starting reviewer workflow",
    );

    // Phase 1: resolve every submission before touching anything.
    let mut resolved: HashMap<String, Option<Resolved>> = HashMap::new();
    for assignment in &assignments {
        let id = assignment.submission_id.as_str();
        if resolved.contains_key(id) {
            continue;
        }
        let entry = resolve(&mut run, drive, id).await?;
        resolved.insert(id.to_string(), entry);
    }

    // Phase 2: grant access and collect tasks.
    let mut granted: HashSet<(String, String)> = HashSet::new();
    let mut pairs = Vec::with_capacity(assignments.len());
    for assignment in &assignments {
        let Some(Some(entry)) = resolved.get(&assignment.submission_id) else {
            continue;
        };
        let key = (entry.folder.id.clone(), assignment.reviewer.clone());
        if !granted.contains(&key) {
            match drive.grant_reader(&entry.folder.id, &assignment.reviewer).await {
                Ok(()) => {
                    run.report.grants += 1;
                    granted.insert(key);
                }
                Err(e) => {
                    run.irregular(
                        e.into(),
                        Some(&assignment.submission_id),
                        Some(&assignment.reviewer),
                    )?;
                    continue;
                }
            }
        }
        pairs.push((
            assignment.reviewer.clone(),
            ReviewTask {
                submission_id: assignment.submission_id.clone(),
                folder: entry.folder.clone(),
                document: entry.document.clone(),
            },
        ));
    }
    let reviewers = group_by_reviewer(pairs);

    // Phase 3: one notice per reviewer.
    for assigned in &reviewers {
        let notice = options.template.compose(assigned);
        if options.dry_run {
            tracing::info!(
                to = %notice.to,
                tasks = assigned.tasks.len(),
                "Dry run: notification not sent",
            );
        } else {
            match mailer.send(&notice).await {
                Ok(()) => run.report.sent += 1,
                Err(e) => run.irregular(e.into(), None, Some(&notice.to))?,
            }
        }
        run.report.notices.push(notice);
    }

    let mut report = run.report;
    report.assignments = assignments;
    report.reviewers = reviewers;
    tracing::info!(
        reviewers = report.reviewers.len(),
        grants = report.grants,
        sent = report.sent,
        issues = report.issues.len(),
        "Reviewer workflow finished",
    );
    Ok(report)
}

/// Find the folder and summary document for one submission.
async fn resolve(
    run: &mut Run<'_>,
    drive: &dyn Drive,
    submission_id: &str,
) -> Result<Option<Resolved>, PipelineError> {
    let parent = &run.options.parent_folder_id;
    let lookup = match lookup_folder(drive, parent, submission_id).await {
        Ok(lookup) => lookup,
        Err(e) => {
            run.irregular(e.into(), Some(submission_id), None)?;
            return Ok(None);
        }
    };
    let folder = match lookup {
        FolderLookup::Unique(folder) => folder,
        FolderLookup::Ambiguous { first, count } => {
            run.irregular(
                PipelineError::AmbiguousFolder {
                    name: submission_id.to_string(),
                    count,
                },
                Some(submission_id),
                None,
            )?;
            first
        }
        FolderLookup::Missing => {
            run.irregular(
                PipelineError::FolderNotFound(submission_id.to_string()),
                Some(submission_id),
                None,
            )?;
            return Ok(None);
        }
    };

    let document_name = summary_document_name(submission_id);
    let document = match find_file(drive, &folder.id, &document_name).await {
        Ok(Some(document)) => Some(document),
        Ok(None) => {
            run.irregular(
                PipelineError::DocumentNotFound {
                    submission_id: submission_id.to_string(),
                },
                Some(submission_id),
                None,
            )?;
            None
        }
        Err(e) => {
            run.irregular(e.into(), Some(submission_id), None)?;
            None
        }
    };

    Ok(Some(Resolved { folder, document }))
}
