//! OAuth access tokens for the platform REST APIs.
//!
//! Two credential sources are supported: a ready-made bearer token, or a
//! service-account key file exchanged for a token through a signed RS256
//! JWT assertion. Tokens from the exchange are cached until shortly before
//! they expire.

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::error::PlatformError;

/// Scopes requested for service-account tokens.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive",
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/documents",
];

/// Token endpoint used when the key file does not name one.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Assertion lifetime; the platform caps this at one hour.
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh a cached token this long before it expires.
const REFRESH_MARGIN_SECS: i64 = 60;

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// The subset of a service-account JSON key the token exchange needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, PlatformError> {
        serde_json::from_str(json)
            .map_err(|e| PlatformError::Auth(format!("invalid service-account key: {e}")))
    }

    pub fn from_file(path: &Path) -> Result<Self, PlatformError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            PlatformError::Auth(format!("cannot read key file {}: {e}", path.display()))
        })?;
        Self::from_json(&json)
    }
}

/// Where access tokens come from.
#[derive(Debug, Clone)]
pub enum Credentials {
    /// A bearer token obtained elsewhere (e.g. `gcloud auth print-access-token`).
    Static(String),
    /// A service account, optionally impersonating a domain user.
    ServiceAccount {
        key: ServiceAccountKey,
        subject: Option<String>,
    },
}

impl Credentials {
    /// Load credentials from environment variables.
    ///
    /// | Variable                         | Description                          |
    /// |----------------------------------|--------------------------------------|
    /// | `GOOGLE_ACCESS_TOKEN`            | Bearer token; takes precedence       |
    /// | `GOOGLE_APPLICATION_CREDENTIALS` | Path to a service-account JSON key   |
    /// | `GOOGLE_IMPERSONATE_SUBJECT`     | User to act as (domain-wide delegation) |
    pub fn from_env() -> Result<Self, PlatformError> {
        if let Ok(token) = std::env::var("GOOGLE_ACCESS_TOKEN") {
            if !token.trim().is_empty() {
                return Ok(Self::Static(token.trim().to_string()));
            }
        }

        let path = std::env::var("GOOGLE_APPLICATION_CREDENTIALS").map_err(|_| {
            PlatformError::Auth(
                "set GOOGLE_ACCESS_TOKEN or GOOGLE_APPLICATION_CREDENTIALS".to_string(),
            )
        })?;
        let key = ServiceAccountKey::from_file(Path::new(&path))?;
        let subject = std::env::var("GOOGLE_IMPERSONATE_SUBJECT")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self::ServiceAccount { key, subject })
    }
}

// ---------------------------------------------------------------------------
// Assertion
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct AssertionClaims {
    iss: String,
    scope: String,
    aud: String,
    iat: i64,
    exp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    sub: Option<String>,
}

impl AssertionClaims {
    pub(crate) fn new(key: &ServiceAccountKey, subject: Option<&str>, now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: SCOPES.join(" "),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
            sub: subject.map(str::to_string),
        }
    }
}

fn sign_assertion(
    key: &ServiceAccountKey,
    subject: Option<&str>,
    now: DateTime<Utc>,
) -> Result<String, PlatformError> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes())
        .map_err(|e| PlatformError::Auth(format!("invalid private key: {e}")))?;
    let claims = AssertionClaims::new(key, subject, now);
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
        .map_err(|e| PlatformError::Auth(format!("cannot sign assertion: {e}")))
}

// ---------------------------------------------------------------------------
// TokenProvider
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Hands out bearer tokens, exchanging service-account assertions as needed.
pub struct TokenProvider {
    client: reqwest::Client,
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenProvider {
    pub fn new(client: reqwest::Client, credentials: Credentials) -> Self {
        Self {
            client,
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// A token valid for at least the refresh margin.
    pub async fn access_token(&self) -> Result<String, PlatformError> {
        let (key, subject) = match &self.credentials {
            Credentials::Static(token) => return Ok(token.clone()),
            Credentials::ServiceAccount { key, subject } => (key, subject.as_deref()),
        };

        let mut cached = self.cached.lock().await;
        let now = Utc::now();
        if let Some(token) = cached.as_ref() {
            if token.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now {
                return Ok(token.value.clone());
            }
        }

        let assertion = sign_assertion(key, subject, now)?;
        let response = self
            .client
            .post(&key.token_uri)
            .form(&[("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(PlatformError::Auth(format!(
                "token exchange returned {}: {body}",
                status.as_u16()
            )));
        }

        let token: TokenResponse = response.json().await?;
        tracing::debug!(
            client_email = %key.client_email,
            expires_in = token.expires_in,
            "Obtained access token",
        );

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: now + Duration::seconds(token.expires_in),
        });
        Ok(token.access_token)
    }
}
