//! Command-line interface.
//!
//! Every identifier flag accepts either a bare file ID or any share URL of
//! the file, and falls back to an environment variable:
//!
//! | Variable               | Flag            | Used by               |
//! |------------------------|-----------------|-----------------------|
//! | `MASTER_SPREADSHEET`   | `--master`      | `sync`, `tracker`     |
//! | `MASTER_SHEET`         | `--master-sheet`| `sync`, `tracker`     |
//! | `SUBMISSIONS_FOLDER`   | `--folder`      | all                   |
//! | `TRACKER_SPREADSHEET`  | `--tracker`     | `notify`              |
//! | `TRACKER_SHEET`        | `--tracker-sheet` | `notify`            |
//! | `REVIEWERS`            | `--reviewers`   | `tracker`             |
//! | `TRACKER_NAME`         | `--name`        | `tracker`             |
//! | `NOTIFY_SUBJECT`       | `--subject`     | `notify`              |
//! | `NOTIFY_CC`            | `--cc`          | `notify`              |
//! | `NOTIFY_FOOTER`        | `--footer`      | `notify`              |

use clap::{Args, Parser, Subcommand};

use subrev_core::links::extract_file_id;
use subrev_core::naming::DEFAULT_TRACKER_NAME;
use subrev_core::notice::{NoticeTemplate, DEFAULT_SUBJECT};
use subrev_pipeline::{ReviewerOptions, SyncOptions, TrackerOptions};

#[derive(Debug, Parser)]
#[command(name = "subrev", version, about = "Submission review automation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create a folder and summary document for every master sheet row.
    Sync(SyncArgs),
    /// Build the Review Tracker from the submission folders.
    Tracker(TrackerArgs),
    /// Grant reviewers access to their ticked submissions and mail them.
    Notify(NotifyArgs),
}

/// Parse a file ID out of a bare ID or share URL.
fn file_id(value: &str) -> Result<String, String> {
    extract_file_id(value).ok_or_else(|| format!("no file ID found in '{value}'"))
}

#[derive(Debug, Args)]
pub struct SyncArgs {
    /// Master spreadsheet ID or URL.
    #[arg(long, env = "MASTER_SPREADSHEET", value_parser = file_id)]
    pub master: String,

    /// Sheet (tab) name; defaults to the first sheet.
    #[arg(long, env = "MASTER_SHEET")]
    pub master_sheet: Option<String>,

    /// Parent folder of the submission folders, ID or URL.
    #[arg(long, env = "SUBMISSIONS_FOLDER", value_parser = file_id)]
    pub folder: String,

    /// Abort at the first failing row.
    #[arg(long)]
    pub stop_on_error: bool,
}

impl SyncArgs {
    pub fn options(&self) -> SyncOptions {
        SyncOptions {
            spreadsheet_id: self.master.clone(),
            sheet: self.master_sheet.clone(),
            parent_folder_id: self.folder.clone(),
            stop_on_error: self.stop_on_error,
        }
    }
}

#[derive(Debug, Args)]
pub struct TrackerArgs {
    #[arg(long, env = "MASTER_SPREADSHEET", value_parser = file_id)]
    pub master: String,

    #[arg(long, env = "MASTER_SHEET")]
    pub master_sheet: Option<String>,

    #[arg(long, env = "SUBMISSIONS_FOLDER", value_parser = file_id)]
    pub folder: String,

    /// Reviewer emails, comma separated.
    #[arg(long, env = "REVIEWERS", value_delimiter = ',', required = true)]
    pub reviewers: Vec<String>,

    /// Name of the tracker spreadsheet.
    #[arg(long, env = "TRACKER_NAME", default_value = DEFAULT_TRACKER_NAME)]
    pub name: String,
}

impl TrackerArgs {
    pub fn options(&self) -> TrackerOptions {
        TrackerOptions {
            master_spreadsheet_id: self.master.clone(),
            master_sheet: self.master_sheet.clone(),
            parent_folder_id: self.folder.clone(),
            reviewers: self.reviewers.clone(),
            name: self.name.clone(),
        }
    }
}

#[derive(Debug, Args)]
pub struct NotifyArgs {
    /// Review Tracker spreadsheet ID or URL.
    #[arg(long, env = "TRACKER_SPREADSHEET", value_parser = file_id)]
    pub tracker: String,

    #[arg(long, env = "TRACKER_SHEET")]
    pub tracker_sheet: Option<String>,

    #[arg(long, env = "SUBMISSIONS_FOLDER", value_parser = file_id)]
    pub folder: String,

    /// Abort on the first irregularity instead of working around it.
    #[arg(long)]
    pub strict: bool,

    /// Grant access and compose notices without sending them.
    #[arg(long)]
    pub dry_run: bool,

    #[arg(long, env = "NOTIFY_SUBJECT", default_value = DEFAULT_SUBJECT)]
    pub subject: String,

    /// Addresses copied on every notice, comma separated.
    #[arg(long, env = "NOTIFY_CC", value_delimiter = ',')]
    pub cc: Vec<String>,

    /// Text appended to every notice.
    #[arg(long, env = "NOTIFY_FOOTER")]
    pub footer: Option<String>,
}

impl NotifyArgs {
    pub fn options(&self) -> ReviewerOptions {
        ReviewerOptions {
            tracker_spreadsheet_id: self.tracker.clone(),
            tracker_sheet: self.tracker_sheet.clone(),
            parent_folder_id: self.folder.clone(),
            strict: self.strict,
            dry_run: self.dry_run,
            template: NoticeTemplate {
                subject: self.subject.clone(),
                cc: self
                    .cc
                    .iter()
                    .map(|c| c.trim().to_string())
                    .filter(|c| !c.is_empty())
                    .collect(),
                footer: self.footer.clone(),
            },
        }
    }
}
