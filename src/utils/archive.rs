//! Archive staging, naming and creation.
//!
//! The staging directory is a scoped resource: [`StagingDir`] removes it
//! recursively when dropped, so cleanup happens on every exit path of the
//! pipeline, success and failure alike. Removal is best-effort and never
//! escalates into a run failure.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::constants::{ARCHIVE_EXTENSION, STAGING_DIR, TAR_PROGRAM, TIMESTAMP_FORMAT};
use crate::errors::BackupError;
use crate::security::scrub_credentials;

/// Scoped staging directory for the archive under construction.
///
/// Holding the value keeps the directory alive; dropping it removes the
/// directory and its contents, tolerating the case where it is already
/// gone.
pub struct StagingDir {
    path: PathBuf,
}

impl StagingDir {
    /// Create the default staging directory (`tmp/backup`), idempotently.
    pub fn create() -> Result<Self, BackupError> {
        Self::create_at(PathBuf::from(STAGING_DIR))
    }

    /// Create a staging directory at an explicit location, idempotently.
    pub fn create_at(path: PathBuf) -> Result<Self, BackupError> {
        fs::create_dir_all(&path).map_err(|e| {
            BackupError::ArchiveCreation(format!(
                "failed to create staging directory {}: {}",
                path.display(),
                e
            ))
        })?;
        Ok(StagingDir { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingDir {
    fn drop(&mut self) {
        info!("Cleaning up temporary files");
        match fs::remove_dir_all(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(
                "Failed to remove staging directory {}: {}",
                self.path.display(),
                e
            ),
        }
    }
}

/// Render a capture instant in the sortable compact form used in archive
/// names: the ISO-8601 UTC representation with `-`, `:` and `.` stripped.
pub fn format_capture_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Deterministic archive file name for a prefix, repository and instant.
pub fn archive_file_name(prefix: &str, repository: &str, at: DateTime<Utc>) -> String {
    format!(
        "{}_{}_{}{}",
        prefix,
        repository,
        format_capture_timestamp(at),
        ARCHIVE_EXTENSION
    )
}

/// Handle on the external archiving tool.
pub struct TarCli {
    program: PathBuf,
}

impl Default for TarCli {
    fn default() -> Self {
        Self::new()
    }
}

impl TarCli {
    /// Archiver backed by the `tar` program on `PATH`.
    pub fn new() -> Self {
        TarCli {
            program: PathBuf::from(TAR_PROGRAM),
        }
    }

    /// Archiver backed by an explicit program path. Lets tests substitute
    /// a stub executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        TarCli {
            program: program.into(),
        }
    }

    /// Create a timestamped compressed archive of the workspace contents
    /// in the staging directory, returning the archive's path.
    ///
    /// The archiving tool runs with the workspace root as its working
    /// directory and the computed path as its sole output target.
    pub fn create_backup_archive(
        &self,
        staging: &StagingDir,
        prefix: &str,
        repository: &str,
        workspace: &Path,
    ) -> Result<PathBuf, BackupError> {
        let archive_path = staging
            .path()
            .join(archive_file_name(prefix, repository, Utc::now()));

        info!("Creating backup archive {}", archive_path.display());

        // The subprocess runs from the workspace root, so hand it an
        // absolute output path to keep the archive in the staging area.
        let absolute = absolute_path(&archive_path)?;

        let output = Command::new(&self.program)
            .arg("-czf")
            .arg(&absolute)
            .arg(".")
            .current_dir(workspace)
            .output()
            .map_err(|e| {
                BackupError::ArchiveCreation(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::ArchiveCreation(format!(
                "{} ({})",
                scrub_credentials(stderr.trim()),
                output.status
            )));
        }

        Ok(archive_path)
    }
}

fn absolute_path(path: &Path) -> Result<PathBuf, BackupError> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = env::current_dir().map_err(|e| {
        BackupError::ArchiveCreation(format!("failed to resolve working directory: {}", e))
    })?;
    Ok(cwd.join(path))
}
