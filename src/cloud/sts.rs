//! Web-identity credential exchange through the cloud CLI.
//!
//! The exchange is a single blocking subprocess call with explicit argument
//! arrays; there is no retry. Exit status and output shape map onto the two
//! failure modes the pipeline distinguishes: a non-zero exit is a
//! [`BackupError::CredentialExchange`], a response that cannot be decoded
//! into the expected credential fields is a [`BackupError::CredentialParse`].

use std::path::PathBuf;
use std::process::Command;

use log::{debug, info};

use crate::constants::{AWS_PROGRAM, ROLE_SESSION_NAME, SESSION_DURATION_SECS};
use crate::errors::BackupError;
use crate::models::{AssumeRoleResponse, TemporaryCredentials};
use crate::security::redact_values;

/// Handle on the cloud CLI used for the token exchange.
pub struct StsCli {
    program: PathBuf,
}

impl Default for StsCli {
    fn default() -> Self {
        Self::new()
    }
}

impl StsCli {
    /// Exchange client backed by the `aws` program on `PATH`.
    pub fn new() -> Self {
        StsCli {
            program: PathBuf::from(AWS_PROGRAM),
        }
    }

    /// Exchange client backed by an explicit program path. Lets tests
    /// substitute a stub executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        StsCli {
            program: program.into(),
        }
    }

    /// Exchange a web-identity token for temporary credentials.
    ///
    /// Invokes `sts assume-role-with-web-identity` with the given role, a
    /// fixed session name and a fixed 3600-second duration. The region is
    /// handed to the subprocess through its environment so later calls in
    /// the session sign against the right endpoint.
    pub fn assume_role_with_web_identity(
        &self,
        region: &str,
        role_arn: &str,
        web_identity_token: &str,
    ) -> Result<TemporaryCredentials, BackupError> {
        info!("Exchanging identity token for temporary credentials");

        let duration = SESSION_DURATION_SECS.to_string();
        let output = Command::new(&self.program)
            .args([
                "sts",
                "assume-role-with-web-identity",
                "--role-arn",
                role_arn,
                "--role-session-name",
                ROLE_SESSION_NAME,
                "--web-identity-token",
                web_identity_token,
                "--duration-seconds",
                duration.as_str(),
                "--output",
                "json",
            ])
            .env("AWS_REGION", region)
            .output()
            .map_err(|e| {
                BackupError::CredentialExchange(format!(
                    "failed to run {}: {}",
                    self.program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(BackupError::CredentialExchange(format!(
                "{} ({})",
                redact_values(stderr.trim(), &[web_identity_token]),
                output.status
            )));
        }

        debug!("Exchange subprocess completed, decoding response");
        parse_exchange_response(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Decode the exchange response into the credential triple.
pub fn parse_exchange_response(stdout: &str) -> Result<TemporaryCredentials, BackupError> {
    let response: AssumeRoleResponse = serde_json::from_str(stdout)
        .map_err(|e| BackupError::CredentialParse(e.to_string()))?;
    Ok(response.credentials)
}
