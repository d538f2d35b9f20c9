use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::{ColorChoice, Config, TermLogger, TerminalMode};

use s3_backup_action::cli::Args;
use s3_backup_action::cloud::s3::S3Cli;
use s3_backup_action::cloud::sts::StsCli;
use s3_backup_action::config::ActionConfig;
use s3_backup_action::github::{self, oidc, ActionsContext};
use s3_backup_action::models::TemporaryCredentials;
use s3_backup_action::utils::archive::{StagingDir, TarCli};

fn main() {
    let args = Args::parse();

    if let Err(e) = initialize_logging(args.verbose) {
        eprintln!("Action failed: {}", e);
        process::exit(1);
    }

    if let Err(e) = run(&args) {
        error!("Action failed: {:#}", e);
        process::exit(1);
    }
}

/// Initialize logging with the specified verbosity level
fn initialize_logging(verbose: bool) -> Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        log_level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )
    .context("Failed to initialize logger")?;
    Ok(())
}

/// Run the backup pipeline with guaranteed cleanup.
fn run(args: &Args) -> Result<()> {
    info!("Starting repository backup");

    let config = ActionConfig::load(&args.input_overrides())?;
    let context = ActionsContext::resolve(args.workspace.clone())?;

    // The staging guard is held across every later stage; its drop removes
    // the directory on success and failure paths alike.
    let staging = StagingDir::create()?;

    let credentials = establish_credentials(&config)?;
    let archive_path = TarCli::new().create_backup_archive(
        &staging,
        &config.backup_prefix,
        &context.repository,
        &context.workspace,
    )?;
    S3Cli::new().upload(
        &config.target_bucket,
        &archive_path,
        &config.bucket_region,
        &credentials,
    )?;

    info!(
        "Backup of {} completed successfully",
        context.repository
    );
    Ok(())
}

/// Obtain an identity token for the configured audience and exchange it
/// for temporary credentials, masking every sensitive value on the way.
fn establish_credentials(config: &ActionConfig) -> Result<TemporaryCredentials> {
    let id_token = oidc::request_id_token(&config.oidc_audience)?;
    github::mask_secret(&id_token);

    let credentials = StsCli::new().assume_role_with_web_identity(
        &config.bucket_region,
        &config.role_arn,
        &id_token,
    )?;
    github::mask_secret(&credentials.access_key_id);
    github::mask_secret(&credentials.secret_access_key);
    github::mask_secret(&credentials.session_token);

    Ok(credentials)
}
