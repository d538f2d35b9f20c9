use std::fmt;

use serde::Deserialize;

/// Temporary access/secret/session triple returned by the security token
/// service. Valid only for the requested duration; never persisted to disk.
///
/// `Debug` is implemented by hand so the secret material can never leak
/// through formatting.
#[derive(Clone, Deserialize)]
pub struct TemporaryCredentials {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,
    #[serde(rename = "SessionToken")]
    pub session_token: String,
}

impl fmt::Debug for TemporaryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemporaryCredentials")
            .field("access_key_id", &"<redacted>")
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &"<redacted>")
            .finish()
    }
}

/// Envelope of the `assume-role-with-web-identity` JSON response.
#[derive(Debug, Deserialize)]
pub struct AssumeRoleResponse {
    #[serde(rename = "Credentials")]
    pub credentials: TemporaryCredentials,
}
