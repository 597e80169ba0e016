//! Service traits over the hosted office-suite platform.
//!
//! Each trait covers exactly the calls the workflows make. The REST clients
//! in [`crate::google`] and [`crate::mail`] implement them for real runs;
//! [`crate::memory::MemoryWorkspace`] implements all four for tests.

use async_trait::async_trait;

use subrev_core::notice::Notice;
use subrev_core::summary::SummaryDocument;
use subrev_core::tracker::TrackerLayout;
use subrev_core::{CellValue, FileRef, Grid};

use crate::error::PlatformError;

/// MIME type of platform folders.
pub const FOLDER_MIME: &str = "application/vnd.google-apps.folder";

/// Kinds of native files the workflows create.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Document,
    Spreadsheet,
}

impl FileKind {
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Document => "application/vnd.google-apps.document",
            Self::Spreadsheet => "application/vnd.google-apps.spreadsheet",
        }
    }
}

#[async_trait]
pub trait Sheets: Send + Sync {
    /// Every row of `sheet` (the first sheet when `None`), unformatted.
    async fn read_grid(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
    ) -> Result<Grid, PlatformError>;

    /// Overwrite one cell (zero-based coordinates).
    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
        row: usize,
        col: usize,
        value: &CellValue,
    ) -> Result<(), PlatformError>;

    /// Write `grid` starting at `A1`.
    async fn write_grid(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
        grid: &Grid,
    ) -> Result<(), PlatformError>;

    /// Bold and freeze the header row, turn the reviewer columns into
    /// checkboxes, and fit column widths. Applies to the first sheet.
    async fn format_tracker(
        &self,
        spreadsheet_id: &str,
        layout: &TrackerLayout,
    ) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait Drive: Send + Sync {
    /// Every folder directly inside `parent_id`, in listing order.
    async fn list_folders(&self, parent_id: &str) -> Result<Vec<FileRef>, PlatformError>;

    /// Folders inside `parent_id` named exactly `name`.
    async fn find_folders(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, PlatformError>;

    /// Non-folder files inside `parent_id` named exactly `name`.
    async fn find_files(&self, parent_id: &str, name: &str)
        -> Result<Vec<FileRef>, PlatformError>;

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<FileRef, PlatformError>;

    /// Create an empty native file of `kind` inside `parent_id`.
    async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        kind: FileKind,
    ) -> Result<FileRef, PlatformError>;

    /// Give `email` read-only access to `file_id` without the platform
    /// sending its own share notification.
    async fn grant_reader(&self, file_id: &str, email: &str) -> Result<(), PlatformError>;
}

#[async_trait]
pub trait Docs: Send + Sync {
    /// Write `summary` into an empty document.
    async fn write_summary(
        &self,
        document_id: &str,
        summary: &SummaryDocument,
    ) -> Result<(), PlatformError>;

    /// Whether the document has no text beyond whitespace and no embedded
    /// objects.
    async fn is_blank(&self, document_id: &str) -> Result<bool, PlatformError>;
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, notice: &Notice) -> Result<(), PlatformError>;
}
