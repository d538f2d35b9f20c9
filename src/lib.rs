//! # s3-backup-action
//!
//! A CI automation step that archives a repository checkout into a
//! compressed tarball and uploads it to S3, authenticating through OIDC
//! web-identity federation instead of long-lived secrets.
//!
//! ## Overview
//!
//! The pipeline is a strictly sequential, single-threaded run of five
//! stages: read configuration, exchange the run's identity token for
//! temporary credentials, archive the workspace, upload the archive, and
//! clean up the local staging directory. Cleanup is a scoped-resource
//! guarantee and fires on every exit path. Every stage failure is terminal;
//! nothing is retried.
//!
//! The archiving tool (`tar`) and the object-store transfer tool (the
//! `aws` CLI) are external collaborators invoked as subprocesses, never
//! reimplemented. Temporary credentials are threaded through the call
//! chain as an explicit value and only ever reach the transfer subprocess
//! through its child environment.
//!
//! ## Module Organization
//!
//! - [`cli`]: Command-line interface definitions and argument parsing
//! - [`config`]: Action input loading and validation
//! - [`github`]: CI run context, workflow commands and OIDC token requests
//! - [`cloud`]: Credential exchange and object-store transfer
//! - [`utils`]: Archive staging, naming and creation
//! - [`security`]: Credential scrubbing for captured subprocess output
//! - [`models`]: Credential value types
//! - [`errors`]: The pipeline's error taxonomy
//! - [`constants`]: Application-wide constants

/// Command-line interface definitions and argument parsing
pub mod cli;

/// Application constants and configuration values
pub mod constants;

/// Action input loading and validation
pub mod config;

/// Error taxonomy for the backup pipeline
pub mod errors;

/// CI run context, workflow commands and OIDC token requests
pub mod github;

/// Credential exchange and object-store transfer
pub mod cloud;

/// Credential value types
pub mod models;

/// Credential scrubbing for captured subprocess output
pub mod security;

/// Archive staging, naming and creation
pub mod utils;
