//! Access to the hosted office-suite platform.
//!
//! - [`services`] -- the four narrow traits the workflows depend on.
//! - [`google`] -- REST implementations for spreadsheets, files and documents.
//! - [`mail`] -- SMTP delivery of reviewer notices.
//! - [`auth`] -- bearer tokens from a static token or a service account.
//! - [`memory`] -- an in-memory platform for tests.

pub mod auth;
pub mod error;
pub mod google;
pub mod mail;
pub mod memory;
pub mod services;

pub use auth::Credentials;
pub use error::{MailError, PlatformError};
pub use google::GoogleWorkspace;
pub use mail::{MailConfig, SmtpMailer};
pub use memory::MemoryWorkspace;
pub use services::{Docs, Drive, FileKind, Mailer, Sheets};
