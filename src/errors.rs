//! Error taxonomy for the backup pipeline.
//!
//! Every variant is terminal: nothing is retried or recovered locally.
//! A failed stage aborts the remainder of the pipeline and surfaces as the
//! run's single user-visible failure message.

use thiserror::Error;

/// Failures the backup pipeline can terminate with.
#[derive(Debug, Error)]
pub enum BackupError {
    /// A required input is absent or empty, or the CI context is incomplete.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The identity token request or the token exchange subprocess failed.
    #[error("credential exchange failed: {0}")]
    CredentialExchange(String),

    /// The exchange response was not well-formed structured data with the
    /// expected credential fields.
    #[error("credential response malformed: {0}")]
    CredentialParse(String),

    /// The archiving subprocess exited non-zero.
    #[error("archive creation failed: {0}")]
    ArchiveCreation(String),

    /// The transfer subprocess exited non-zero.
    #[error("upload failed: {0}")]
    Upload(String),
}
