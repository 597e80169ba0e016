//! Integration tests for the reviewer workflow: tracker checkboxes, folder
//! grants and reviewer notices.

use assert_matches::assert_matches;

use subrev_core::notice::NoticeTemplate;
use subrev_core::{CellValue, FileRef};
use subrev_pipeline::{run_reviewer_workflow, PipelineError, ReviewerOptions};
use subrev_platform::memory::FailPoint;
use subrev_platform::{FileKind, MemoryWorkspace};

const TRACKER: &str = "tracker-sheet";
const PARENT: &str = "submissions-root";
const ADA: &str = "ada@example.org";
const BO: &str = "bo@example.org";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t(s: &str) -> CellValue {
    CellValue::text(s)
}

fn options() -> ReviewerOptions {
    ReviewerOptions {
        tracker_spreadsheet_id: TRACKER.to_string(),
        tracker_sheet: None,
        parent_folder_id: PARENT.to_string(),
        strict: false,
        dry_run: false,
        template: NoticeTemplate::default(),
    }
}

fn strict() -> ReviewerOptions {
    ReviewerOptions {
        strict: true,
        ..options()
    }
}

/// Submission folder with its summary document.
fn submission(ws: &MemoryWorkspace, id: &str) -> (FileRef, FileRef) {
    let folder = ws.add_folder(PARENT, id);
    let doc = ws.add_file(&folder.id, &format!("{id} Summary"), FileKind::Document);
    (folder, doc)
}

/// Tracker with two reviewers. Only real `true` booleans count as ticks.
fn tracker(ws: &MemoryWorkspace, rows: Vec<Vec<CellValue>>) {
    let mut grid = vec![vec![
        t("Submission ID"),
        t("Project Title"),
        t("Folder"),
        t("Reviewer: ada@example.org"),
        t("Reviewer: bo@example.org"),
    ]];
    grid.extend(rows);
    ws.put_spreadsheet(TRACKER, grid);
}

fn row(id: &str, ada: CellValue, bo: CellValue) -> Vec<CellValue> {
    vec![t(id), t("Title"), t(""), ada, bo]
}

const YES: CellValue = CellValue::Bool(true);
const NO: CellValue = CellValue::Bool(false);

// ---------------------------------------------------------------------------
// Happy path
// ---------------------------------------------------------------------------

/// Ticked boxes become grants, and each reviewer gets a single notice
/// listing all of their submissions.
#[tokio::test]
async fn grants_and_notifies_once_per_reviewer() {
    let ws = MemoryWorkspace::new();
    let (f1, d1) = submission(&ws, "SUB00001");
    let (f2, d2) = submission(&ws, "SUB00002");
    tracker(
        &ws,
        vec![
            row("SUB00001", YES, YES),
            row("SUB00002", YES, t("TRUE")),
        ],
    );

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.assignments.len(), 3);
    assert_eq!(report.grants, 3);
    assert_eq!(report.sent, 2);
    assert!(report.issues.is_empty());
    assert_eq!(ws.readers(&f1.id), vec![ADA, BO]);
    assert_eq!(ws.readers(&f2.id), vec![ADA]);

    let sent = ws.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].to, ADA);
    assert!(sent[0].body.contains(&format!("- SUB00001: {}", d1.url)));
    assert!(sent[0].body.contains(&format!("- SUB00002: {}", d2.url)));
    assert!(sent[0].body.contains("assigned 2 submissions"));
    assert_eq!(sent[1].to, BO);
    assert!(sent[1].body.contains("assigned 1 submission "));
}

/// Nothing ticked means nothing granted and nothing sent.
#[tokio::test]
async fn empty_tracker_does_nothing() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(&ws, vec![row("SUB00001", NO, CellValue::Empty)]);

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert!(report.assignments.is_empty());
    assert_eq!(ws.grant_count(), 0);
    assert!(ws.sent().is_empty());
}

/// The same submission listed twice is granted and listed once.
#[tokio::test]
async fn duplicate_rows_grant_once() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(
        &ws,
        vec![row("SUB00001", YES, NO), row("SUB00001", YES, NO)],
    );

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.grants, 1);
    assert_eq!(report.reviewers[0].tasks.len(), 1);
}

/// Subject, cc and footer come from the template.
#[tokio::test]
async fn template_shapes_notice() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(&ws, vec![row("SUB00001", YES, NO)]);

    let opts = ReviewerOptions {
        template: NoticeTemplate {
            subject: "Round 2".to_string(),
            cc: vec!["chair@example.org".to_string()],
            footer: Some("Thanks!".to_string()),
        },
        ..options()
    };
    run_reviewer_workflow(&ws, &ws, &ws, &opts).await.unwrap();

    let sent = ws.sent();
    assert_eq!(sent[0].subject, "Round 2");
    assert_eq!(sent[0].cc, vec!["chair@example.org"]);
    assert!(sent[0].body.ends_with("Thanks!\n"));
}

// ---------------------------------------------------------------------------
// Dry run
// ---------------------------------------------------------------------------

/// A dry run grants access and composes notices, but sends nothing.
#[tokio::test]
async fn dry_run_sends_nothing() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(&ws, vec![row("SUB00001", YES, YES)]);

    let report = run_reviewer_workflow(
        &ws,
        &ws,
        &ws,
        &ReviewerOptions {
            dry_run: true,
            ..options()
        },
    )
    .await
    .unwrap();

    assert_eq!(report.notices.len(), 2);
    assert_eq!(report.sent, 0);
    assert!(ws.sent().is_empty());
    assert_eq!(ws.grant_count(), 2);
}

// ---------------------------------------------------------------------------
// Irregularities
// ---------------------------------------------------------------------------

/// Strict mode aborts on duplicate folders before granting anything.
#[tokio::test]
async fn strict_ambiguous_folder_aborts_cleanly() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    submission(&ws, "SUB00002");
    ws.add_folder(PARENT, "SUB00002");
    tracker(
        &ws,
        vec![row("SUB00001", YES, NO), row("SUB00002", NO, YES)],
    );

    assert_matches!(
        run_reviewer_workflow(&ws, &ws, &ws, &strict()).await,
        Err(PipelineError::AmbiguousFolder { count: 2, .. })
    );
    assert_eq!(ws.grant_count(), 0);
    assert!(ws.sent().is_empty());
}

/// Lenient mode uses the first duplicate folder and records an issue.
#[tokio::test]
async fn lenient_ambiguous_folder_uses_first() {
    let ws = MemoryWorkspace::new();
    let (first, _) = submission(&ws, "SUB00001");
    let second = ws.add_folder(PARENT, "SUB00001");
    tracker(&ws, vec![row("SUB00001", YES, NO)]);

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].submission_id.as_deref(), Some("SUB00001"));
    assert_eq!(ws.readers(&first.id), vec![ADA]);
    assert!(ws.readers(&second.id).is_empty());
    assert_eq!(report.sent, 1);
}

/// A missing folder drops that submission in lenient mode.
#[tokio::test]
async fn lenient_missing_folder_is_skipped() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(
        &ws,
        vec![row("SUB00001", YES, NO), row("SUB00009", YES, NO)],
    );

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.grants, 1);
    assert_eq!(report.reviewers[0].tasks.len(), 1);
    assert!(!ws.sent()[0].body.contains("SUB00009"));
}

/// A missing folder aborts strict mode.
#[tokio::test]
async fn strict_missing_folder_aborts() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(
        &ws,
        vec![row("SUB00001", YES, NO), row("SUB00009", YES, NO)],
    );

    assert_matches!(
        run_reviewer_workflow(&ws, &ws, &ws, &strict()).await,
        Err(PipelineError::FolderNotFound(id)) if id == "SUB00009"
    );
    assert_eq!(ws.grant_count(), 0);
}

/// Without a summary document the notice links to the folder.
#[tokio::test]
async fn missing_document_links_folder() {
    let ws = MemoryWorkspace::new();
    let folder = ws.add_folder(PARENT, "SUB00001");
    tracker(&ws, vec![row("SUB00001", YES, NO)]);

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert!(ws.sent()[0]
        .body
        .contains(&format!("- SUB00001: {}", folder.url)));

    assert_matches!(
        run_reviewer_workflow(&ws, &ws, &ws, &strict()).await,
        Err(PipelineError::DocumentNotFound { .. })
    );
}

/// A failed grant drops that task only; the reviewer's other tasks are
/// still notified.
#[tokio::test]
async fn lenient_grant_failure_drops_task() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(
        &ws,
        vec![row("SUB00001", YES, YES)],
    );
    ws.fail(FailPoint::Grant, BO);

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.grants, 1);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].reviewer.as_deref(), Some(BO));
    assert_eq!(report.reviewers.len(), 1);
    assert_eq!(ws.sent().len(), 1);
}

/// A failed send is recorded and the other reviewers are still mailed.
#[tokio::test]
async fn lenient_send_failure_is_recorded() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    tracker(&ws, vec![row("SUB00001", YES, YES)]);
    ws.fail(FailPoint::Send, ADA);

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.sent, 1);
    assert_eq!(report.notices.len(), 2);
    assert_eq!(report.issues.len(), 1);
    assert_eq!(ws.sent()[0].to, BO);

    assert_matches!(
        run_reviewer_workflow(&ws, &ws, &ws, &strict()).await,
        Err(PipelineError::Platform(_))
    );
}

/// A failed folder lookup drops only that submission in lenient mode;
/// the reviewer's other submissions are still granted and mailed.
#[tokio::test]
async fn lenient_lookup_failure_skips_submission() {
    let ws = MemoryWorkspace::new();
    let (f1, d1) = submission(&ws, "SUB00001");
    let (f2, _) = submission(&ws, "SUB00002");
    tracker(
        &ws,
        vec![row("SUB00001", YES, NO), row("SUB00002", YES, NO)],
    );
    ws.fail(FailPoint::FindFolders, "SUB00002");

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.issues[0].submission_id.as_deref(), Some("SUB00002"));
    assert_eq!(ws.readers(&f1.id), vec![ADA]);
    assert!(ws.readers(&f2.id).is_empty());

    let sent = ws.sent();
    assert_eq!(sent.len(), 1);
    assert!(sent[0].body.contains(&format!("- SUB00001: {}", d1.url)));
    assert!(!sent[0].body.contains("SUB00002"));
}

/// A failed folder lookup aborts strict mode before any grant.
#[tokio::test]
async fn strict_lookup_failure_aborts() {
    let ws = MemoryWorkspace::new();
    submission(&ws, "SUB00001");
    submission(&ws, "SUB00002");
    tracker(
        &ws,
        vec![row("SUB00001", YES, NO), row("SUB00002", YES, NO)],
    );
    ws.fail(FailPoint::FindFolders, "SUB00002");

    assert_matches!(
        run_reviewer_workflow(&ws, &ws, &ws, &strict()).await,
        Err(PipelineError::Platform(_))
    );
    assert_eq!(ws.grant_count(), 0);
    assert!(ws.sent().is_empty());
}

/// A failed document lookup falls back to the folder link.
#[tokio::test]
async fn document_lookup_failure_links_folder() {
    let ws = MemoryWorkspace::new();
    let (folder, _) = submission(&ws, "SUB00001");
    tracker(&ws, vec![row("SUB00001", YES, NO)]);
    ws.fail(FailPoint::FindFiles, "SUB00001 Summary");

    let report = run_reviewer_workflow(&ws, &ws, &ws, &options()).await.unwrap();

    assert_eq!(report.issues.len(), 1);
    assert_eq!(report.grants, 1);
    assert!(ws.sent()[0]
        .body
        .contains(&format!("- SUB00001: {}", folder.url)));
}

/// A tracker without the id column is rejected.
#[tokio::test]
async fn tracker_without_id_column_is_rejected() {
    let ws = MemoryWorkspace::new();
    ws.put_spreadsheet(TRACKER, vec![vec![t("Title"), t("Reviewer: ada@example.org")]]);

    assert_matches!(
        run_reviewer_workflow(&ws, &ws, &ws, &options()).await,
        Err(PipelineError::Core(_))
    );
}
