//! Identity token requests against the runner's OIDC issuer.
//!
//! The runner exposes a per-job endpoint and bearer token through the
//! environment; a single GET with the requested audience returns a
//! short-lived identity token asserting the run's identity. That token is
//! what the credential exchange trades for temporary storage credentials.

use std::env;

use serde::Deserialize;

use crate::constants::{ENV_ID_TOKEN_BEARER, ENV_ID_TOKEN_URL};
use crate::errors::BackupError;

#[derive(Debug, Deserialize)]
struct IdTokenResponse {
    value: String,
}

/// Request an identity token scoped to `audience` from the endpoint the
/// environment advertises.
///
/// The caller is responsible for masking the returned token before any
/// further use.
pub fn request_id_token(audience: &str) -> Result<String, BackupError> {
    let url = env::var(ENV_ID_TOKEN_URL).map_err(|_| {
        BackupError::CredentialExchange(format!(
            "{} is not set; is `id-token: write` granted to this job?",
            ENV_ID_TOKEN_URL
        ))
    })?;
    let bearer = env::var(ENV_ID_TOKEN_BEARER).map_err(|_| {
        BackupError::CredentialExchange(format!("{} is not set", ENV_ID_TOKEN_BEARER))
    })?;

    request_id_token_from(&url, &bearer, audience)
}

/// Request an identity token from an explicit endpoint. Split out from
/// [`request_id_token`] so the HTTP exchange is testable without the
/// runner's environment.
pub fn request_id_token_from(
    url: &str,
    bearer: &str,
    audience: &str,
) -> Result<String, BackupError> {
    let client = reqwest::blocking::Client::new();
    let response = client
        .get(url)
        .query(&[("audience", audience)])
        .bearer_auth(bearer)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| {
            BackupError::CredentialExchange(format!("identity token request failed: {}", e))
        })?;

    let status = response.status();
    if !status.is_success() {
        return Err(BackupError::CredentialExchange(format!(
            "identity token endpoint returned {}",
            status
        )));
    }

    let body = response.text().map_err(|e| {
        BackupError::CredentialExchange(format!("failed to read identity token response: {}", e))
    })?;

    parse_id_token_response(&body)
}

/// Extract the token from the endpoint's JSON body.
fn parse_id_token_response(body: &str) -> Result<String, BackupError> {
    let parsed: IdTokenResponse = serde_json::from_str(body).map_err(|e| {
        BackupError::CredentialExchange(format!("malformed identity token response: {}", e))
    })?;

    if parsed.value.trim().is_empty() {
        return Err(BackupError::CredentialExchange(
            "identity token response contained an empty token".to_string(),
        ));
    }

    Ok(parsed.value)
}
