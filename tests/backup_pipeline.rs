//! Integration tests for the backup pipeline.
//!
//! The external tools (token exchange, transfer) are replaced by stub
//! executables that record their invocations, so the tests can assert the
//! exact subprocess contract and the cleanup guarantee without network
//! dependencies. The happy-path test uses the real `tar`.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use s3_backup_action::cloud::s3::S3Cli;
use s3_backup_action::cloud::sts::StsCli;
use s3_backup_action::errors::BackupError;
use s3_backup_action::models::TemporaryCredentials;
use s3_backup_action::utils::archive::{StagingDir, TarCli};

const ROLE_ARN: &str = "arn:aws:iam::123456789012:role/backup";

const STS_RESPONSE: &str = r#"{
    "Credentials": {
        "AccessKeyId": "ASIASTUBACCESSKEY",
        "SecretAccessKey": "stub-secret-access-key",
        "SessionToken": "stub-session-token",
        "Expiration": "2023-01-01T01:00:00Z"
    }
}"#;

fn write_executable(path: &Path, script: &str) {
    fs::write(path, script).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

/// Stub `aws` that answers the exchange with canned credentials and
/// records `s3` invocations. Either subcommand can be forced to fail.
fn write_aws_stub(dir: &Path, fail_sts: bool, fail_s3: bool) -> PathBuf {
    let stub = dir.join("aws");
    let record = dir.join("s3-invocation.txt");
    let script = format!(
        r#"#!/bin/sh
case "$1" in
  sts)
    if [ "{fail_sts}" = "true" ]; then
      echo 'exchange refused' >&2
      exit 254
    fi
    cat <<'EOF'
{response}
EOF
    ;;
  s3)
    if [ "{fail_s3}" = "true" ]; then
      echo 'Access Denied' >&2
      exit 1
    fi
    printf '%s\n' "$*" > {record}
    ;;
esac
"#,
        fail_sts = fail_sts,
        fail_s3 = fail_s3,
        response = STS_RESPONSE,
        record = record.display()
    );
    write_executable(&stub, &script);
    stub
}

fn make_workspace(base: &Path) -> PathBuf {
    let workspace = base.join("checkout");
    fs::create_dir_all(workspace.join("src")).unwrap();
    fs::write(workspace.join("README.md"), b"# test repo\n").unwrap();
    fs::write(workspace.join("src/lib.rs"), b"pub fn f() {}\n").unwrap();
    workspace
}

/// The library-level pipeline: credentials, archive, upload, with the
/// staging guard dropped before returning on every path.
fn run_pipeline(
    aws: &Path,
    tar: &TarCli,
    staging_path: PathBuf,
    workspace: &Path,
) -> Result<PathBuf, BackupError> {
    let staging = StagingDir::create_at(staging_path)?;

    let credentials: TemporaryCredentials = StsCli::with_program(aws)
        .assume_role_with_web_identity("us-west-2", ROLE_ARN, "stub-id-token")?;

    let archive = tar.create_backup_archive(&staging, "backup", "test-repo", workspace)?;

    S3Cli::with_program(aws).upload("test-bucket", &archive, "us-west-2", &credentials)?;

    Ok(archive)
}

#[test]
fn test_full_pipeline_produces_and_uploads_archive() {
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());
    let aws = write_aws_stub(base.path(), false, false);
    let staging_path = base.path().join("staging");

    let archive = run_pipeline(&aws, &TarCli::new(), staging_path.clone(), &workspace).unwrap();

    // Staging (and the archive inside it) is gone once the run finishes
    assert!(!staging_path.exists());

    // The transfer saw the exact archive path and the bucket-root URI
    let recorded = fs::read_to_string(base.path().join("s3-invocation.txt")).unwrap();
    assert_eq!(
        recorded.trim(),
        format!("s3 cp {} s3://test-bucket/", archive.display())
    );

    let name = archive.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("backup_test-repo_"));
    assert!(name.ends_with(".tar.gz"));
}

#[test]
fn test_archive_is_created_before_upload() {
    // The aws stub verifies the local file exists at transfer time.
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());

    let stub = base.path().join("aws");
    let marker = base.path().join("seen.txt");
    write_executable(
        &stub,
        &format!(
            r#"#!/bin/sh
case "$1" in
  sts) cat <<'EOF'
{STS_RESPONSE}
EOF
    ;;
  s3) [ -f "$3" ] && echo present > {marker} ;;
esac
"#,
            STS_RESPONSE = STS_RESPONSE,
            marker = marker.display()
        ),
    );

    run_pipeline(
        &stub,
        &TarCli::new(),
        base.path().join("staging"),
        &workspace,
    )
    .unwrap();

    assert_eq!(fs::read_to_string(&marker).unwrap().trim(), "present");
}

#[test]
fn test_cleanup_runs_when_exchange_fails() {
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());
    let aws = write_aws_stub(base.path(), true, false);
    let staging_path = base.path().join("staging");

    let err = run_pipeline(&aws, &TarCli::new(), staging_path.clone(), &workspace).unwrap_err();

    assert!(matches!(err, BackupError::CredentialExchange(_)));
    assert!(!staging_path.exists());
}

#[test]
fn test_cleanup_runs_when_archiving_fails() {
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());
    let aws = write_aws_stub(base.path(), false, false);
    let staging_path = base.path().join("staging");

    let broken_tar = base.path().join("tar");
    write_executable(&broken_tar, "#!/bin/sh\necho 'tar: disk full' >&2\nexit 2\n");

    let err = run_pipeline(
        &aws,
        &TarCli::with_program(&broken_tar),
        staging_path.clone(),
        &workspace,
    )
    .unwrap_err();

    assert!(matches!(err, BackupError::ArchiveCreation(_)));
    assert!(!staging_path.exists());
}

#[test]
fn test_cleanup_runs_when_upload_fails() {
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());
    let aws = write_aws_stub(base.path(), false, true);
    let staging_path = base.path().join("staging");

    let err = run_pipeline(&aws, &TarCli::new(), staging_path.clone(), &workspace).unwrap_err();

    assert!(matches!(err, BackupError::Upload(_)));
    assert!(!staging_path.exists());
}

#[test]
fn test_two_runs_produce_distinct_archive_names() {
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());
    let aws = write_aws_stub(base.path(), false, false);

    let first = run_pipeline(
        &aws,
        &TarCli::new(),
        base.path().join("staging-1"),
        &workspace,
    )
    .unwrap();

    // Names carry millisecond granularity; give the clock room to move
    std::thread::sleep(std::time::Duration::from_millis(5));

    let second = run_pipeline(
        &aws,
        &TarCli::new(),
        base.path().join("staging-2"),
        &workspace,
    )
    .unwrap();

    assert_ne!(
        first.file_name().unwrap(),
        second.file_name().unwrap()
    );
}

#[test]
fn test_archive_contains_workspace_contents() {
    // Keep the staging guard alive long enough to inspect the artifact.
    let base = TempDir::new().unwrap();
    let workspace = make_workspace(base.path());

    let staging = StagingDir::create_at(base.path().join("staging")).unwrap();
    let archive = TarCli::new()
        .create_backup_archive(&staging, "backup", "test-repo", &workspace)
        .unwrap();

    let listing = std::process::Command::new("tar")
        .arg("-tzf")
        .arg(&archive)
        .output()
        .unwrap();
    assert!(listing.status.success());

    let entries = String::from_utf8_lossy(&listing.stdout);
    assert!(entries.contains("README.md"));
    assert!(entries.contains("src/lib.rs"));
}
