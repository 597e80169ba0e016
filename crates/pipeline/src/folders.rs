//! Name-based folder and document lookup shared by the workflows.

use subrev_core::FileRef;
use subrev_platform::{Drive, PlatformError};

/// Result of looking a folder up by exact name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FolderLookup {
    Unique(FileRef),
    /// More than one folder matched; `first` is the oldest.
    Ambiguous { first: FileRef, count: usize },
    Missing,
}

pub async fn lookup_folder(
    drive: &dyn Drive,
    parent_id: &str,
    name: &str,
) -> Result<FolderLookup, PlatformError> {
    let mut matches = drive.find_folders(parent_id, name).await?;
    let count = matches.len();
    Ok(match count {
        0 => FolderLookup::Missing,
        1 => FolderLookup::Unique(matches.remove(0)),
        _ => FolderLookup::Ambiguous {
            first: matches.remove(0),
            count,
        },
    })
}

/// First file named `name` inside `folder_id`, if any.
pub async fn find_file(
    drive: &dyn Drive,
    folder_id: &str,
    name: &str,
) -> Result<Option<FileRef>, PlatformError> {
    Ok(drive.find_files(folder_id, name).await?.into_iter().next())
}
