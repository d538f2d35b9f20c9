//! Archive publishing to the object store.
//!
//! The transfer itself is delegated to the cloud CLI; this module's job is
//! invoking it with the right target URI and confining the temporary
//! credentials to the child process environment. The parent process
//! environment is never mutated.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{debug, info};

use crate::constants::AWS_PROGRAM;
use crate::errors::BackupError;
use crate::models::TemporaryCredentials;
use crate::security::scrub_credentials;

/// Handle on the cloud CLI used for the object-store transfer.
pub struct S3Cli {
    program: PathBuf,
}

impl Default for S3Cli {
    fn default() -> Self {
        Self::new()
    }
}

impl S3Cli {
    /// Transfer client backed by the `aws` program on `PATH`.
    pub fn new() -> Self {
        S3Cli {
            program: PathBuf::from(AWS_PROGRAM),
        }
    }

    /// Transfer client backed by an explicit program path. Lets tests
    /// substitute a stub executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        S3Cli {
            program: program.into(),
        }
    }

    /// Copy the archive to `s3://{bucket}/`, authenticating with the
    /// supplied temporary credentials. A single failed attempt aborts the
    /// run; there is no retry or backoff.
    pub fn upload(
        &self,
        bucket: &str,
        archive_path: &Path,
        region: &str,
        credentials: &TemporaryCredentials,
    ) -> Result<(), BackupError> {
        let s3_uri = bucket_uri(bucket);
        info!("Uploading {} to {}", archive_path.display(), s3_uri);

        let output = Command::new(&self.program)
            .arg("s3")
            .arg("cp")
            .arg(archive_path)
            .arg(&s3_uri)
            .env("AWS_REGION", region)
            .env("AWS_ACCESS_KEY_ID", &credentials.access_key_id)
            .env("AWS_SECRET_ACCESS_KEY", &credentials.secret_access_key)
            .env("AWS_SESSION_TOKEN", &credentials.session_token)
            .output()
            .map_err(|e| {
                BackupError::Upload(format!("failed to run {}: {}", self.program.display(), e))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::Upload(format!(
                "{} ({})",
                scrub_credentials(stderr.trim()),
                output.status
            )));
        }

        debug!("Transfer subprocess completed");
        Ok(())
    }
}

/// Destination URI for a bucket's root.
fn bucket_uri(bucket: &str) -> String {
    format!("s3://{}/", bucket)
}
