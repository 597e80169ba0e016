use subrev_core::CoreError;
use subrev_platform::PlatformError;

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("{count} folders are named {name}")]
    AmbiguousFolder { name: String, count: usize },

    #[error("No folder named {0}")]
    FolderNotFound(String),

    #[error("No summary document in folder {submission_id}")]
    DocumentNotFound { submission_id: String },

    #[error("A file named {name} already exists ({url})")]
    AlreadyExists { name: String, url: String },

    #[error("Row {row} ({submission_id}) failed: {source}")]
    Row {
        row: usize,
        submission_id: String,
        #[source]
        source: Box<PipelineError>,
    },
}
