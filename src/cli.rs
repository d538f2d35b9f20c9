use clap::Parser;
use std::path::PathBuf;

use crate::config::InputOverrides;

/// Command-line arguments for the backup action binary.
///
/// In CI every value normally arrives through the platform's `INPUT_*`
/// environment; the flags here override those inputs so the binary can be
/// run by hand against a local checkout.
#[derive(Parser, Debug)]
#[clap(
    name = "s3-backup-action",
    about = "Archive a repository checkout and upload it to S3"
)]
pub struct Args {
    /// Destination bucket name (overrides the `target-bucket` input)
    #[clap(long)]
    pub target_bucket: Option<String>,

    /// Region for signing and region-scoped calls (overrides `bucket-region`)
    #[clap(long)]
    pub bucket_region: Option<String>,

    /// Role to assume via web-identity federation (overrides `role-arn`)
    #[clap(long)]
    pub role_arn: Option<String>,

    /// Audience claim for the identity token (overrides `oidc-audience`)
    #[clap(long)]
    pub oidc_audience: Option<String>,

    /// Archive file-name prefix (overrides `backup-prefix`, default "backup")
    #[clap(long)]
    pub backup_prefix: Option<String>,

    /// Workspace root to archive (default: the CI checkout location)
    #[clap(long)]
    pub workspace: Option<PathBuf>,

    /// Verbose logging
    #[clap(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Input overrides carried by the command line.
    pub fn input_overrides(&self) -> InputOverrides {
        InputOverrides {
            target_bucket: self.target_bucket.clone(),
            bucket_region: self.bucket_region.clone(),
            role_arn: self.role_arn.clone(),
            oidc_audience: self.oidc_audience.clone(),
            backup_prefix: self.backup_prefix.clone(),
        }
    }
}
