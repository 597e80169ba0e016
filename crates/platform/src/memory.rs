//! In-memory platform used by integration tests.
//!
//! [`MemoryWorkspace`] implements every service trait over plain maps, and
//! records grants and sent notices so workflows can be asserted on. Faults
//! can be injected per operation and target with [`MemoryWorkspace::fail`].

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use subrev_core::notice::Notice;
use subrev_core::summary::SummaryDocument;
use subrev_core::tracker::TrackerLayout;
use subrev_core::{CellValue, FileRef, Grid};

use crate::error::PlatformError;
use crate::services::{Docs, Drive, FileKind, Mailer, Sheets, FOLDER_MIME};

/// Name given to the first sheet of every spreadsheet.
pub const DEFAULT_SHEET: &str = "Sheet1";

/// Operations that can be made to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    /// `create_folder` for a folder name.
    CreateFolder,
    /// `create_file` for a file name.
    CreateFile,
    /// `grant_reader` for an email.
    Grant,
    /// `send` for a recipient.
    Send,
    /// `find_folders` for a folder name.
    FindFolders,
    /// `find_files` for a file name.
    FindFiles,
    /// `write_summary` for a document name.
    WriteSummary,
}

#[derive(Debug, Clone)]
struct StoredFile {
    file: FileRef,
    parent: String,
    mime_type: String,
    readers: Vec<String>,
}

#[derive(Debug, Default)]
struct State {
    files: Vec<StoredFile>,
    spreadsheets: HashMap<String, Vec<(String, Grid)>>,
    documents: HashMap<String, SummaryDocument>,
    formatted: HashMap<String, TrackerLayout>,
    sent: Vec<Notice>,
    faults: HashSet<(FailPoint, String)>,
}

impl State {
    fn check(&self, point: FailPoint, target: &str) -> Result<(), PlatformError> {
        if self.faults.contains(&(point, target.to_string())) {
            return Err(PlatformError::Api {
                status: 500,
                body: format!("injected {point:?} failure for {target}"),
            });
        }
        Ok(())
    }

    fn sheet_mut(
        &mut self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
    ) -> Result<&mut Grid, PlatformError> {
        let sheets = self
            .spreadsheets
            .get_mut(spreadsheet_id)
            .ok_or_else(|| PlatformError::NotFound(format!("spreadsheet {spreadsheet_id}")))?;
        let idx = match sheet {
            None if !sheets.is_empty() => 0,
            None => return Err(PlatformError::NotFound(format!("{spreadsheet_id} has no sheets"))),
            Some(name) => sheets
                .iter()
                .position(|(n, _)| n == name)
                .ok_or_else(|| PlatformError::NotFound(format!("sheet {name}")))?,
        };
        Ok(&mut sheets[idx].1)
    }

    fn insert_file(&mut self, parent: &str, name: &str, mime_type: &str) -> FileRef {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let url = match mime_type {
            FOLDER_MIME => format!("https://drive.google.com/drive/folders/{id}"),
            m if m == FileKind::Document.mime_type() => {
                format!("https://docs.google.com/document/d/{id}/edit")
            }
            m if m == FileKind::Spreadsheet.mime_type() => {
                format!("https://docs.google.com/spreadsheets/d/{id}/edit")
            }
            _ => format!("https://drive.google.com/file/d/{id}/view"),
        };
        let file = FileRef {
            id,
            name: name.to_string(),
            url,
        };
        self.files.push(StoredFile {
            file: file.clone(),
            parent: parent.to_string(),
            mime_type: mime_type.to_string(),
            readers: Vec::new(),
        });
        file
    }

    fn document_name(&self, document_id: &str) -> Result<String, PlatformError> {
        self.files
            .iter()
            .find(|f| f.file.id == document_id)
            .map(|f| f.file.name.clone())
            .ok_or_else(|| PlatformError::NotFound(format!("document {document_id}")))
    }

    fn children(&self, parent: &str, folders: bool, name: Option<&str>) -> Vec<FileRef> {
        self.files
            .iter()
            .filter(|f| f.parent == parent)
            .filter(|f| (f.mime_type == FOLDER_MIME) == folders)
            .filter(|f| name.map_or(true, |n| f.file.name == n))
            .map(|f| f.file.clone())
            .collect()
    }
}

/// A whole platform held in memory.
#[derive(Debug, Default)]
pub struct MemoryWorkspace {
    state: Mutex<State>,
}

impl MemoryWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    // ---- seeding ----

    /// Add a folder directly, bypassing fault injection.
    pub fn add_folder(&self, parent_id: &str, name: &str) -> FileRef {
        self.state().insert_file(parent_id, name, FOLDER_MIME)
    }

    /// Add an empty native file directly.
    pub fn add_file(&self, parent_id: &str, name: &str, kind: FileKind) -> FileRef {
        let mut state = self.state();
        let file = state.insert_file(parent_id, name, kind.mime_type());
        if kind == FileKind::Spreadsheet {
            state
                .spreadsheets
                .insert(file.id.clone(), vec![(DEFAULT_SHEET.to_string(), Vec::new())]);
        }
        file
    }

    /// Create or replace a spreadsheet whose first sheet holds `grid`.
    pub fn put_spreadsheet(&self, spreadsheet_id: &str, grid: Grid) {
        self.state()
            .spreadsheets
            .insert(spreadsheet_id.to_string(), vec![(DEFAULT_SHEET.to_string(), grid)]);
    }

    /// Make every later `point` operation on `target` fail.
    pub fn fail(&self, point: FailPoint, target: &str) {
        self.state().faults.insert((point, target.to_string()));
    }

    /// Drop every injected fault.
    pub fn clear_faults(&self) {
        self.state().faults.clear();
    }

    // ---- inspection ----

    /// First sheet of a spreadsheet.
    pub fn grid(&self, spreadsheet_id: &str) -> Option<Grid> {
        self.state()
            .spreadsheets
            .get(spreadsheet_id)
            .and_then(|sheets| sheets.first().map(|(_, grid)| grid.clone()))
    }

    /// Every child of `parent_id` (folders and files).
    pub fn children(&self, parent_id: &str) -> Vec<FileRef> {
        self.state()
            .files
            .iter()
            .filter(|f| f.parent == parent_id)
            .map(|f| f.file.clone())
            .collect()
    }

    pub fn document(&self, document_id: &str) -> Option<SummaryDocument> {
        self.state().documents.get(document_id).cloned()
    }

    pub fn layout(&self, spreadsheet_id: &str) -> Option<TrackerLayout> {
        self.state().formatted.get(spreadsheet_id).cloned()
    }

    /// Emails with read access to `file_id`, in grant order.
    pub fn readers(&self, file_id: &str) -> Vec<String> {
        self.state()
            .files
            .iter()
            .find(|f| f.file.id == file_id)
            .map(|f| f.readers.clone())
            .unwrap_or_default()
    }

    /// Total number of read grants across all files.
    pub fn grant_count(&self) -> usize {
        self.state().files.iter().map(|f| f.readers.len()).sum()
    }

    pub fn sent(&self) -> Vec<Notice> {
        self.state().sent.clone()
    }
}

#[async_trait]
impl Sheets for MemoryWorkspace {
    async fn read_grid(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
    ) -> Result<Grid, PlatformError> {
        let mut state = self.state();
        let grid = state.sheet_mut(spreadsheet_id, sheet)?.clone();
        Ok(grid)
    }

    async fn write_cell(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
        row: usize,
        col: usize,
        value: &CellValue,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        let grid = state.sheet_mut(spreadsheet_id, sheet)?;
        if grid.len() <= row {
            grid.resize_with(row + 1, Vec::new);
        }
        let cells = &mut grid[row];
        if cells.len() <= col {
            cells.resize(col + 1, CellValue::Empty);
        }
        cells[col] = value.clone();
        Ok(())
    }

    async fn write_grid(
        &self,
        spreadsheet_id: &str,
        sheet: Option<&str>,
        grid: &Grid,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        *state.sheet_mut(spreadsheet_id, sheet)? = grid.clone();
        Ok(())
    }

    async fn format_tracker(
        &self,
        spreadsheet_id: &str,
        layout: &TrackerLayout,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.sheet_mut(spreadsheet_id, None)?;
        state
            .formatted
            .insert(spreadsheet_id.to_string(), layout.clone());
        Ok(())
    }
}

#[async_trait]
impl Drive for MemoryWorkspace {
    async fn list_folders(&self, parent_id: &str) -> Result<Vec<FileRef>, PlatformError> {
        Ok(self.state().children(parent_id, true, None))
    }

    async fn find_folders(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, PlatformError> {
        let state = self.state();
        state.check(FailPoint::FindFolders, name)?;
        Ok(state.children(parent_id, true, Some(name)))
    }

    async fn find_files(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, PlatformError> {
        let state = self.state();
        state.check(FailPoint::FindFiles, name)?;
        Ok(state.children(parent_id, false, Some(name)))
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<FileRef, PlatformError> {
        let mut state = self.state();
        state.check(FailPoint::CreateFolder, name)?;
        Ok(state.insert_file(parent_id, name, FOLDER_MIME))
    }

    async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        kind: FileKind,
    ) -> Result<FileRef, PlatformError> {
        self.state().check(FailPoint::CreateFile, name)?;
        Ok(self.add_file(parent_id, name, kind))
    }

    async fn grant_reader(&self, file_id: &str, email: &str) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.check(FailPoint::Grant, email)?;
        let file = state
            .files
            .iter_mut()
            .find(|f| f.file.id == file_id)
            .ok_or_else(|| PlatformError::NotFound(format!("file {file_id}")))?;
        if !file.readers.iter().any(|r| r == email) {
            file.readers.push(email.to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl Docs for MemoryWorkspace {
    async fn write_summary(
        &self,
        document_id: &str,
        summary: &SummaryDocument,
    ) -> Result<(), PlatformError> {
        let mut state = self.state();
        let name = state.document_name(document_id)?;
        state.check(FailPoint::WriteSummary, &name)?;
        state
            .documents
            .insert(document_id.to_string(), summary.clone());
        Ok(())
    }

    async fn is_blank(&self, document_id: &str) -> Result<bool, PlatformError> {
        let state = self.state();
        state.document_name(document_id)?;
        Ok(!state.documents.contains_key(document_id))
    }
}

#[async_trait]
impl Mailer for MemoryWorkspace {
    async fn send(&self, notice: &Notice) -> Result<(), PlatformError> {
        let mut state = self.state();
        state.check(FailPoint::Send, &notice.to)?;
        state.sent.push(notice.clone());
        Ok(())
    }
}
