//! CI platform integration: run context and workflow commands.
//!
//! The runner communicates the checkout location and repository slug
//! through the ambient environment, and accepts workflow commands on
//! stdout. The only command this action emits is `add-mask`, which marks
//! a value as sensitive so the transcript redacts every later occurrence.

pub mod oidc;

use std::env;
use std::path::PathBuf;

use crate::constants::{ENV_REPOSITORY, ENV_WORKSPACE};
use crate::errors::BackupError;

/// Ambient CI context for the current run.
#[derive(Debug, Clone)]
pub struct ActionsContext {
    /// Root of the repository checkout to archive
    pub workspace: PathBuf,
    /// Repository name (the part after `owner/`)
    pub repository: String,
}

impl ActionsContext {
    /// Resolve the run context from the environment, with an optional
    /// workspace override for local runs.
    pub fn resolve(workspace_override: Option<PathBuf>) -> Result<Self, BackupError> {
        let workspace = match workspace_override {
            Some(path) => path,
            None => env::var(ENV_WORKSPACE)
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .ok_or_else(|| {
                    BackupError::Configuration(format!("{} is not set", ENV_WORKSPACE))
                })?,
        };

        if !workspace.is_dir() {
            return Err(BackupError::Configuration(format!(
                "workspace root {} is not a directory",
                workspace.display()
            )));
        }

        let slug = env::var(ENV_REPOSITORY).ok().filter(|v| !v.trim().is_empty());
        let repository = match slug {
            Some(slug) => repo_name_from_slug(&slug),
            None => {
                return Err(BackupError::Configuration(format!(
                    "{} is not set",
                    ENV_REPOSITORY
                )))
            }
        };

        Ok(ActionsContext {
            workspace,
            repository,
        })
    }
}

/// Extract the repository name from an `owner/name` slug.
fn repo_name_from_slug(slug: &str) -> String {
    slug.rsplit('/').next().unwrap_or(slug).to_string()
}

/// Mark a value as sensitive: every later occurrence in the run transcript
/// is redacted by the runner.
pub fn mask_secret(value: &str) {
    println!("{}", format_workflow_command("add-mask", value));
}

/// Render a workflow command line with the data escaping the runner expects.
fn format_workflow_command(command: &str, data: &str) -> String {
    format!("::{}::{}", command, escape_data(data))
}

fn escape_data(data: &str) -> String {
    data.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
