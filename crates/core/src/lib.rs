//! Pure data transformations for the submission review workflow.
//!
//! Nothing in this crate performs I/O. It turns spreadsheet grids into
//! assignments, task lists, summary documents and tracker layouts, and
//! leaves talking to the hosted platform to `subrev-platform`.

pub mod a1;
pub mod assignment;
pub mod error;
pub mod links;
pub mod naming;
pub mod notice;
pub mod submission;
pub mod summary;
pub mod tasks;
pub mod tracker;
pub mod types;

pub use assignment::{extract_assignments, Assignment, TrackerHeader};
pub use error::CoreError;
pub use submission::SubmissionId;
pub use types::{CellValue, FileRef, Grid};
