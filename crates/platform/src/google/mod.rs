//! REST clients for the hosted spreadsheet, file-storage and document APIs.
//!
//! [`GoogleWorkspace`] implements [`Sheets`](crate::services::Sheets),
//! [`Drive`](crate::services::Drive) and [`Docs`](crate::services::Docs)
//! over `reqwest`, one blocking-in-sequence request per operation. There is
//! no retry or rate-limit handling; a non-2xx response surfaces as
//! [`PlatformError::Api`].

pub mod docs;
pub mod drive;
pub mod sheets;

use std::time::Duration;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::auth::{Credentials, TokenProvider};
use crate::error::PlatformError;

pub const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const DRIVE_API_URL: &str = "https://www.googleapis.com/drive/v3/files";
pub const DOCS_API_URL: &str = "https://docs.googleapis.com/v1/documents";

/// HTTP request timeout for a single API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated client for the spreadsheet, file and document APIs.
pub struct GoogleWorkspace {
    client: reqwest::Client,
    tokens: TokenProvider,
}

impl GoogleWorkspace {
    pub fn new(credentials: Credentials) -> Result<Self, PlatformError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self::with_client(client, credentials))
    }

    /// Reuse an existing [`reqwest::Client`] for both API calls and the
    /// token exchange.
    pub fn with_client(client: reqwest::Client, credentials: Credentials) -> Self {
        let tokens = TokenProvider::new(client.clone(), credentials);
        Self { client, tokens }
    }

    /// Send an authenticated request, optionally with a JSON body, and
    /// decode the JSON response.
    async fn call<T: DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        body: Option<&serde_json::Value>,
    ) -> Result<T, PlatformError> {
        let token = self.tokens.access_token().await?;
        tracing::trace!(%method, %url, "Platform API call");

        let mut request = self.client.request(method, url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = Self::ensure_success(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`PlatformError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, PlatformError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(PlatformError::NotFound(body));
            }
            return Err(PlatformError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// `base` with each of `segments` appended as an encoded path segment.
pub(crate) fn endpoint(base: &str, segments: &[&str]) -> Result<Url, PlatformError> {
    let mut url = Url::parse(base).map_err(|e| PlatformError::Decode(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| PlatformError::Decode(format!("{base} cannot be a base URL")))?
        .extend(segments);
    Ok(url)
}
