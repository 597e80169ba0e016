//! Integration tests for the master-sheet sync against the in-memory
//! platform.

use assert_matches::assert_matches;

use subrev_core::summary::{SummaryBlock, SummaryDocument};
use subrev_core::CellValue;
use subrev_pipeline::{sync_submissions, PipelineError, SyncOptions};
use subrev_platform::memory::FailPoint;
use subrev_platform::{Docs, Drive, FileKind, MemoryWorkspace};

const MASTER: &str = "master-sheet";
const PARENT: &str = "submissions-root";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t(s: &str) -> CellValue {
    CellValue::text(s)
}

fn options() -> SyncOptions {
    SyncOptions {
        spreadsheet_id: MASTER.to_string(),
        sheet: None,
        parent_folder_id: PARENT.to_string(),
        stop_on_error: false,
    }
}

/// Three submissions, the second row blank.
fn seeded() -> MemoryWorkspace {
    let ws = MemoryWorkspace::new();
    ws.put_spreadsheet(
        MASTER,
        vec![
            vec![
                t("Timestamp"),
                t("Project Title"),
                t("Team Lead"),
                t("Submission ID"),
                t("Folder"),
            ],
            vec![t("2026-02-01"), t("Solar Kiln"), t("ada@example.org")],
            vec![],
            vec![t("2026-02-03"), t("Rain Gauge"), t("bo@example.org")],
            vec![t("2026-02-04"), t("Seed Bank"), CellValue::Number(7.0)],
        ],
    );
    ws
}

fn folder_names(ws: &MemoryWorkspace) -> Vec<String> {
    ws.children(PARENT).into_iter().map(|f| f.name).collect()
}

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

/// Every non-blank row gets a positional folder, a summary document and
/// its id and folder link written back.
#[tokio::test]
async fn creates_folders_documents_and_write_back() {
    let ws = seeded();

    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.rows, 4);
    assert_eq!(report.blank_rows, 1);
    assert_eq!(report.folders_created, 3);
    assert_eq!(report.documents_created, 3);
    assert_eq!(report.cells_written, 6);
    assert!(report.failures.is_empty());

    // The blank row still consumes SUB00002.
    assert_eq!(folder_names(&ws), vec!["SUB00001", "SUB00003", "SUB00004"]);

    let grid = ws.grid(MASTER).unwrap();
    assert_eq!(grid[1][3], t("SUB00001"));
    assert_eq!(grid[3][3], t("SUB00003"));
    let folder = &ws.find_folders(PARENT, "SUB00003").await.unwrap()[0];
    assert_eq!(grid[3][4], t(&folder.url));
    assert!(grid[2].is_empty(), "blank row must stay untouched");
}

/// The summary document carries the row's content.
#[tokio::test]
async fn summary_document_reflects_row() {
    let ws = seeded();
    sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    let folder = &ws.find_folders(PARENT, "SUB00001").await.unwrap()[0];
    let doc = &ws.find_files(&folder.id, "SUB00001 Summary").await.unwrap()[0];
    let summary = ws.document(&doc.id).expect("summary written");

    assert_eq!(summary.title, "SUB00001 — Solar Kiln");
    assert!(summary.blocks.contains(&SummaryBlock::Field {
        label: "Team Lead".into(),
        value: "ada@example.org".into(),
    }));
    assert!(summary
        .blocks
        .iter()
        .all(|b| !matches!(b, SummaryBlock::Field { label, .. } if label == "Submission ID")));
}

// ---------------------------------------------------------------------------
// Idempotency
// ---------------------------------------------------------------------------

/// A second run creates nothing and writes nothing.
#[tokio::test]
async fn second_run_is_a_no_op() {
    let ws = seeded();
    sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.folders_created, 0);
    assert_eq!(report.folders_reused, 3);
    assert_eq!(report.documents_created, 0);
    assert_eq!(report.documents_reused, 3);
    assert_eq!(report.cells_written, 0);
    assert_eq!(ws.children(PARENT).len(), 3);
}

/// An existing summary document with content is left exactly as it is.
#[tokio::test]
async fn existing_document_is_not_rewritten() {
    let ws = seeded();
    let folder = ws.add_folder(PARENT, "SUB00001");
    let doc = ws.add_file(&folder.id, "SUB00001 Summary", FileKind::Document);
    let edited = SummaryDocument {
        title: "Edited by hand".into(),
        generated_at: chrono::Utc::now(),
        blocks: Vec::new(),
    };
    ws.write_summary(&doc.id, &edited).await.unwrap();

    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.folders_reused, 1);
    assert_eq!(report.documents_reused, 1);
    assert_eq!(report.documents_filled, 0);
    assert_eq!(ws.document(&doc.id).unwrap().title, "Edited by hand");
}

/// A summary document left blank by a failed write is filled in on the
/// next run instead of being reused as is.
#[tokio::test]
async fn blank_document_is_filled_on_next_run() {
    let ws = seeded();
    ws.fail(FailPoint::WriteSummary, "SUB00001 Summary");

    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 2);

    let folder = &ws.find_folders(PARENT, "SUB00001").await.unwrap()[0];
    let doc = &ws.find_files(&folder.id, "SUB00001 Summary").await.unwrap()[0];
    assert!(ws.document(&doc.id).is_none());

    ws.clear_faults();
    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    assert!(report.failures.is_empty());
    assert_eq!(report.documents_created, 0);
    assert_eq!(report.documents_filled, 1);
    assert_eq!(report.documents_reused, 2);
    assert_eq!(ws.document(&doc.id).unwrap().title, "SUB00001 — Solar Kiln");
    assert_eq!(ws.find_files(&folder.id, "SUB00001 Summary").await.unwrap().len(), 1);
}

/// With duplicate folder names the first one is used and none is created.
#[tokio::test]
async fn duplicate_folders_use_first() {
    let ws = seeded();
    let first = ws.add_folder(PARENT, "SUB00001");
    ws.add_folder(PARENT, "SUB00001");

    sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    let grid = ws.grid(MASTER).unwrap();
    assert_eq!(grid[1][4], t(&first.url));
    assert_eq!(ws.find_files(&first.id, "SUB00001 Summary").await.unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

/// A failing row is recorded and the rows after it still sync.
#[tokio::test]
async fn failing_row_does_not_stop_batch() {
    let ws = seeded();
    ws.fail(FailPoint::CreateFolder, "SUB00003");

    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].row, 4);
    assert_eq!(report.failures[0].submission_id, "SUB00003");
    assert_eq!(folder_names(&ws), vec!["SUB00001", "SUB00004"]);
}

/// With `stop_on_error` the first failure ends the run.
#[tokio::test]
async fn stop_on_error_aborts() {
    let ws = seeded();
    ws.fail(FailPoint::CreateFile, "SUB00001 Summary");

    let result = sync_submissions(
        &ws,
        &ws,
        &ws,
        &SyncOptions {
            stop_on_error: true,
            ..options()
        },
    )
    .await;

    assert_matches!(result, Err(PipelineError::Row { row: 2, .. }));
    assert_eq!(folder_names(&ws), vec!["SUB00001"]);
}

/// An unknown spreadsheet is an error before any row is touched.
#[tokio::test]
async fn missing_master_sheet_is_an_error() {
    let ws = MemoryWorkspace::new();
    assert_matches!(
        sync_submissions(&ws, &ws, &ws, &options()).await,
        Err(PipelineError::Platform(_))
    );
}

/// An empty master sheet yields an empty report.
#[tokio::test]
async fn empty_sheet_is_an_empty_report() {
    let ws = MemoryWorkspace::new();
    ws.put_spreadsheet(MASTER, vec![]);
    let report = sync_submissions(&ws, &ws, &ws, &options()).await.unwrap();
    assert_eq!(report.rows, 0);
}
