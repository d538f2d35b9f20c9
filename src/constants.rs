//! Global constants for the s3-backup-action binary.
//!
//! This module centralizes all hardcoded values to improve maintainability
//! and make configuration changes easier.

// Staging and archive constants
/// Local staging directory for the archive, relative to the process working directory
pub const STAGING_DIR: &str = "tmp/backup";

/// Extension appended to the computed archive file name
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Capture timestamp rendering: ISO-8601 UTC with `-`, `:` and `.` stripped
pub const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%S%3fZ";

/// Default archive file name prefix when the `backup-prefix` input is absent
pub const DEFAULT_BACKUP_PREFIX: &str = "backup";

// Credential exchange constants
/// Session name passed to the security token service on every exchange
pub const ROLE_SESSION_NAME: &str = "s3-backup-action";

/// Requested validity window for temporary credentials, in seconds
pub const SESSION_DURATION_SECS: u32 = 3600;

// External tools
/// Default program name for the cloud CLI (token exchange and transfer)
pub const AWS_PROGRAM: &str = "aws";

/// Default program name for the archiving tool
pub const TAR_PROGRAM: &str = "tar";

// CI environment variables
/// Workspace root of the repository checkout
pub const ENV_WORKSPACE: &str = "GITHUB_WORKSPACE";

/// `owner/name` slug of the repository being backed up
pub const ENV_REPOSITORY: &str = "GITHUB_REPOSITORY";

/// Endpoint that issues OIDC identity tokens for the current run
pub const ENV_ID_TOKEN_URL: &str = "ACTIONS_ID_TOKEN_REQUEST_URL";

/// Bearer token authorizing requests against the OIDC endpoint
pub const ENV_ID_TOKEN_BEARER: &str = "ACTIONS_ID_TOKEN_REQUEST_TOKEN";
