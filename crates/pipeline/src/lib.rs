//! The three submission-review procedures.
//!
//! - [`sync`] -- master sheet rows → submission folders and summary documents.
//! - [`tracker`] -- submission folders → Review Tracker spreadsheet.
//! - [`reviewers`] -- tracker checkboxes → folder access and reviewer notices.
//!
//! Each procedure is a single sequential pass over the platform services it
//! is handed; none keeps state between runs.

pub mod error;
pub mod folders;
pub mod reviewers;
pub mod sync;
pub mod tracker;

pub use error::PipelineError;
pub use reviewers::{run_reviewer_workflow, ReviewerOptions, ReviewerReport};
pub use sync::{sync_submissions, SyncOptions, SyncReport};
pub use tracker::{build_review_tracker, TrackerOptions, TrackerReport};
