//! Error type shared by every platform service implementation.

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The platform returned a non-2xx status code.
    #[error("Platform API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// Credentials could not be loaded or exchanged for a token.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A response was well-formed HTTP but not the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// The referenced spreadsheet, file or document does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Mail delivery failed.
    #[error("Mail delivery failed: {0}")]
    Mail(#[from] MailError),
}

/// Error type for SMTP delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// A recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The MIME message could not be assembled.
    #[error("Email build error: {0}")]
    Build(String),
}
