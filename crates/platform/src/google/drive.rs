//! Folder listing, file creation and permission grants.

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use subrev_core::FileRef;

use super::{endpoint, GoogleWorkspace, DRIVE_API_URL};
use crate::error::PlatformError;
use crate::services::{Drive, FileKind, FOLDER_MIME};

const FILE_FIELDS: &str = "id,name,webViewLink";
const LIST_FIELDS: &str = "nextPageToken,files(id,name,webViewLink)";
const PAGE_SIZE: &str = "1000";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DriveFile {
    id: String,
    name: String,
    #[serde(default)]
    web_view_link: Option<String>,
}

impl From<DriveFile> for FileRef {
    fn from(file: DriveFile) -> Self {
        let url = file
            .web_view_link
            .unwrap_or_else(|| format!("https://drive.google.com/open?id={}", file.id));
        FileRef {
            id: file.id,
            name: file.name,
            url,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
    next_page_token: Option<String>,
}

/// Which children of a folder a query selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildKind {
    Folders,
    Files,
}

fn quote(value: &str) -> String {
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Search query for the untrashed children of `parent_id`, optionally
/// restricted to an exact `name`.
pub fn children_query(parent_id: &str, name: Option<&str>, kind: ChildKind) -> String {
    let mut query = format!("{} in parents and trashed = false", quote(parent_id));
    match kind {
        ChildKind::Folders => query.push_str(&format!(" and mimeType = {}", quote(FOLDER_MIME))),
        ChildKind::Files => query.push_str(&format!(" and mimeType != {}", quote(FOLDER_MIME))),
    }
    if let Some(name) = name {
        query.push_str(&format!(" and name = {}", quote(name)));
    }
    query
}

impl GoogleWorkspace {
    /// Run a file search, following every result page. Results are ordered
    /// by creation time so "first match" means the oldest file.
    async fn search(&self, query: &str) -> Result<Vec<FileRef>, PlatformError> {
        let mut files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut url = endpoint(DRIVE_API_URL, &[])?;
            {
                let mut pairs = url.query_pairs_mut();
                pairs
                    .append_pair("q", query)
                    .append_pair("fields", LIST_FIELDS)
                    .append_pair("orderBy", "createdTime")
                    .append_pair("pageSize", PAGE_SIZE)
                    .append_pair("supportsAllDrives", "true")
                    .append_pair("includeItemsFromAllDrives", "true");
                if let Some(token) = page_token.as_deref() {
                    pairs.append_pair("pageToken", token);
                }
            }

            let page: FileList = self.call(Method::GET, url, None).await?;
            files.extend(page.files.into_iter().map(FileRef::from));
            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(files)
    }

    async fn create(
        &self,
        parent_id: &str,
        name: &str,
        mime_type: &str,
    ) -> Result<FileRef, PlatformError> {
        let mut url = endpoint(DRIVE_API_URL, &[])?;
        url.query_pairs_mut()
            .append_pair("fields", FILE_FIELDS)
            .append_pair("supportsAllDrives", "true");
        let body = serde_json::json!({
            "name": name,
            "mimeType": mime_type,
            "parents": [parent_id],
        });
        let file: DriveFile = self.call(Method::POST, url, Some(&body)).await?;
        Ok(file.into())
    }
}

#[async_trait]
impl Drive for GoogleWorkspace {
    async fn list_folders(&self, parent_id: &str) -> Result<Vec<FileRef>, PlatformError> {
        self.search(&children_query(parent_id, None, ChildKind::Folders))
            .await
    }

    async fn find_folders(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, PlatformError> {
        self.search(&children_query(parent_id, Some(name), ChildKind::Folders))
            .await
    }

    async fn find_files(
        &self,
        parent_id: &str,
        name: &str,
    ) -> Result<Vec<FileRef>, PlatformError> {
        self.search(&children_query(parent_id, Some(name), ChildKind::Files))
            .await
    }

    async fn create_folder(&self, parent_id: &str, name: &str) -> Result<FileRef, PlatformError> {
        let folder = self.create(parent_id, name, FOLDER_MIME).await?;
        tracing::info!(parent_id, folder_id = %folder.id, name, "Created folder");
        Ok(folder)
    }

    async fn create_file(
        &self,
        parent_id: &str,
        name: &str,
        kind: FileKind,
    ) -> Result<FileRef, PlatformError> {
        let file = self.create(parent_id, name, kind.mime_type()).await?;
        tracing::info!(parent_id, file_id = %file.id, name, ?kind, "Created file");
        Ok(file)
    }

    async fn grant_reader(&self, file_id: &str, email: &str) -> Result<(), PlatformError> {
        let mut url = endpoint(DRIVE_API_URL, &[file_id, "permissions"])?;
        url.query_pairs_mut()
            .append_pair("sendNotificationEmail", "false")
            .append_pair("supportsAllDrives", "true");
        let body = serde_json::json!({
            "role": "reader",
            "type": "user",
            "emailAddress": email,
        });
        let _: serde_json::Value = self.call(Method::POST, url, Some(&body)).await?;
        tracing::info!(file_id, email, "Granted read access");
        Ok(())
    }
}
