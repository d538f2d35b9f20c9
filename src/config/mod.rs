//! Configuration loading for the backup action.
//!
//! Inputs arrive the way the CI platform delivers them: as `INPUT_<NAME>`
//! environment variables, with the input name uppercased and spaces mapped
//! to underscores. Command-line overrides take precedence so the binary can
//! be exercised outside a runner.

use std::env;

use crate::constants::DEFAULT_BACKUP_PREFIX;
use crate::errors::BackupError;

/// Immutable configuration for one backup run. Created once at startup,
/// never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionConfig {
    /// Destination bucket name
    pub target_bucket: String,
    /// Region for signing and region-scoped calls
    pub bucket_region: String,
    /// Identity to assume via web-identity federation
    pub role_arn: String,
    /// Audience claim requested for the identity token
    pub oidc_audience: String,
    /// File-name prefix for the produced archive
    pub backup_prefix: String,
}

/// Command-line values that take precedence over the `INPUT_*` environment.
#[derive(Debug, Default, Clone)]
pub struct InputOverrides {
    pub target_bucket: Option<String>,
    pub bucket_region: Option<String>,
    pub role_arn: Option<String>,
    pub oidc_audience: Option<String>,
    pub backup_prefix: Option<String>,
}

impl ActionConfig {
    /// Load and validate configuration from overrides and the environment.
    ///
    /// Fails with [`BackupError::Configuration`] if any of `target-bucket`,
    /// `bucket-region`, `role-arn` or `oidc-audience` is absent or empty.
    /// `backup-prefix` defaults to `"backup"`. No side effects beyond
    /// reading the environment.
    pub fn load(overrides: &InputOverrides) -> Result<Self, BackupError> {
        Ok(ActionConfig {
            target_bucket: required_input("target-bucket", overrides.target_bucket.clone())?,
            bucket_region: required_input("bucket-region", overrides.bucket_region.clone())?,
            role_arn: required_input("role-arn", overrides.role_arn.clone())?,
            oidc_audience: required_input("oidc-audience", overrides.oidc_audience.clone())?,
            backup_prefix: optional_input("backup-prefix", overrides.backup_prefix.clone())
                .unwrap_or_else(|| DEFAULT_BACKUP_PREFIX.to_string()),
        })
    }
}

/// Environment variable name the platform uses to deliver an input.
fn input_env_name(name: &str) -> String {
    format!("INPUT_{}", name.replace(' ', "_").to_uppercase())
}

/// Read a single input value, treating whitespace-only values as absent.
fn input(name: &str) -> Option<String> {
    env::var(input_env_name(name))
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn optional_input(name: &str, overridden: Option<String>) -> Option<String> {
    overridden
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| input(name))
}

fn required_input(name: &str, overridden: Option<String>) -> Result<String, BackupError> {
    optional_input(name, overridden).ok_or_else(|| {
        BackupError::Configuration(format!("missing required input '{}'", name))
    })
}
