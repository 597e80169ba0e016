//! Naming conventions for generated folders, documents and columns.
//!
//! Every name the workflow searches for is produced here, so lookups and
//! creations cannot drift apart.

/// Header of the submission id column in the master sheet and the tracker.
pub const SUBMISSION_ID_HEADER: &str = "Submission ID";

/// Header of the project title column in the master sheet and the tracker.
pub const PROJECT_TITLE_HEADER: &str = "Project Title";

/// Header of the folder link column in the master sheet and the tracker.
pub const FOLDER_HEADER: &str = "Folder";

/// Default name of the generated tracker spreadsheet.
pub const DEFAULT_TRACKER_NAME: &str = "Review Tracker";

/// Name of the summary document kept inside each submission folder.
///
/// ```
/// use subrev_core::naming::summary_document_name;
///
/// assert_eq!(summary_document_name("SUB00005"), "SUB00005 Summary");
/// ```
pub fn summary_document_name(submission_id: &str) -> String {
    format!("{submission_id} Summary")
}

/// Tracker column header for a reviewer. Parsed back by
/// [`crate::assignment::reviewer_from_header`].
///
/// ```
/// use subrev_core::naming::reviewer_header;
///
/// assert_eq!(reviewer_header("ada@example.org"), "Reviewer: ada@example.org");
/// ```
pub fn reviewer_header(email: &str) -> String {
    format!("Reviewer: {}", email.trim())
}
