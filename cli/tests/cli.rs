//! End-to-end tests of the `imgsync` binary.
//!
//! Every case stays away from docker: check-only listings, flag validation,
//! migration, and sync runs whose script is missing.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const IMAGES_JSON: &str = r#"{
  "images": [
    {"name": "nginx", "tag": "1.25"},
    {
      "id": "alist",
      "source": {"repository": "xiaoyaliu/alist", "tag": "v3"},
      "options": {"platform": "linux/arm64", "priority": 0}
    }
  ]
}"#;

fn imgsync(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_imgsync"))
        .args(args)
        .current_dir(dir)
        .env_remove("ALIYUN_REGISTRY")
        .env_remove("ALIYUN_NAME_SPACE")
        .output()
        .expect("failed to run imgsync")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("images.json"), IMAGES_JSON).unwrap();
    tmp
}

#[test]
fn test_check_only_lists_records() {
    let tmp = workspace();
    let output = imgsync(tmp.path(), &["sync", "--check-only"]);
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("nginx:1.25"));
    assert!(out.contains("xiaoyaliu/alist:v3"));
    assert!(out.contains("linux/arm64"));
    assert!(!tmp.path().join("sync-result.env").exists());
}

#[test]
fn test_check_only_discovers_text_list() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("images.txt"), "--platform=linux/amd64 busybox\n").unwrap();

    let output = imgsync(tmp.path(), &["sync", "--check-only"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("busybox:latest"));
}

#[test]
fn test_conflicting_flags() {
    let tmp = workspace();
    let output = imgsync(tmp.path(), &["sync", "--force", "--smart"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Error:"));
    assert!(!tmp.path().join("sync-result.env").exists());
}

#[test]
fn test_missing_config() {
    let tmp = TempDir::new().unwrap();
    let output = imgsync(tmp.path(), &["sync"]);
    assert_eq!(output.status.code(), Some(1));

    let output = imgsync(tmp.path(), &["process", "--validate"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_process_validate_prints_specs() {
    let tmp = workspace();
    let output = imgsync(tmp.path(), &["process", "--validate"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("--platform=linux/arm64 xiaoyaliu/alist:v3"));
}

#[test]
fn test_missing_script_fails_every_record() {
    let tmp = workspace();
    let output = imgsync(
        tmp.path(),
        &["process", "--script", "./no-such-script.sh", "-o", "result.env"],
    );
    assert_eq!(output.status.code(), Some(1));

    let result = std::fs::read_to_string(tmp.path().join("result.env")).unwrap();
    assert!(result.starts_with("TOTAL_COUNT=2\nSUCCESS_COUNT=0\nFAILED_COUNT=2\n"));
    assert!(result.contains("SYNC_COUNT=2\n"));
    assert!(result.contains("FAILED_IMAGES<<EOF\n"));
    assert!(result.contains("sync script not found"));
}

#[test]
fn test_force_sync_writes_escaped_result() {
    let tmp = workspace();
    let output = imgsync(
        tmp.path(),
        &["sync", "--force", "--script", "./no-such-script.sh"],
    );
    assert_eq!(output.status.code(), Some(1));

    let result = std::fs::read_to_string(tmp.path().join("sync-result.env")).unwrap();
    assert!(result.contains("FAILED_COUNT=2\n"));
    assert!(result.contains("FAILED_IMAGES=\"❌ alist: --platform=linux/arm64 xiaoyaliu/alist:v3"));
}

#[test]
fn test_build_validate_only() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("dockerfiles/app")).unwrap();
    std::fs::write(tmp.path().join("dockerfiles/app/Dockerfile"), "FROM alpine\n").unwrap();
    std::fs::write(tmp.path().join("files.txt"), "dockerfiles/app/Dockerfile\n").unwrap();

    let output = imgsync(tmp.path(), &["build", "--files", "files.txt", "--validate-only"]);
    assert!(output.status.success());

    std::fs::write(tmp.path().join("dockerfiles/app/Dockerfile"), "RUN true\n").unwrap();
    let output = imgsync(tmp.path(), &["build", "--files", "files.txt", "--validate-only"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_build_requires_registry() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("files.txt"), "").unwrap();

    let output = imgsync(tmp.path(), &["build", "--files", "files.txt"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!tmp.path().join("build-result.env").exists());
}

#[test]
fn test_migrate() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("images.txt"),
        "# mirrored\nnginx\n--platform linux/arm64 k8s.gcr.io/pause:3.9\n",
    )
    .unwrap();

    let output = imgsync(tmp.path(), &["migrate"]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(tmp.path().join("images_migrated.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    let images = doc["images"].as_array().unwrap();
    assert_eq!(images.len(), 2);
    assert_eq!(images[0]["id"], "migrated-002");
    assert_eq!(images[1]["source"]["repository"], "k8s.gcr.io/pause");
    assert_eq!(images[1]["options"]["platform"], "linux/arm64");
    assert_eq!(images[1]["options"]["private_registry"], true);

    // The migrated list is loadable by the sync command.
    let output = imgsync(
        tmp.path(),
        &["sync", "--check-only", "-c", "images_migrated.json"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("k8s.gcr.io/pause:3.9"));
}

#[test]
fn test_from_issue() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("issue_images.txt"), "nginx:1.25\nredis\n").unwrap();

    let output = imgsync(tmp.path(), &["from-issue"]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(tmp.path().join("issue_images.json")).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(doc["images"][1]["id"], "issue-002");
    assert_eq!(doc["images"][1]["source"]["tag"], "latest");
}

#[cfg(unix)]
#[test]
fn test_bare_script_name_runs_from_working_directory() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = workspace();
    let script = tmp.path().join("sync.sh");
    std::fs::write(&script, "#!/bin/sh\nexit 0\n").unwrap();
    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = imgsync(tmp.path(), &["process", "--script", "sync.sh"]);
    assert!(output.status.success());

    let result = std::fs::read_to_string(tmp.path().join("sync-result.env")).unwrap();
    assert!(result.contains("SUCCESS_COUNT=2\n"));
    assert!(result.contains("FAILED_COUNT=0\n"));
}

#[test]
fn test_init_writes_loadable_examples() {
    let tmp = TempDir::new().unwrap();

    let output = imgsync(tmp.path(), &["init"]);
    assert!(output.status.success());
    assert!(tmp.path().join("images_simple.json").is_file());

    let output = imgsync(tmp.path(), &["sync", "--check-only"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("google/deepvariant:1.9.0-gpu"));

    let output = imgsync(
        tmp.path(),
        &["process", "--validate", "-c", "images_simple.json"],
    );
    assert!(output.status.success());
    assert!(stdout(&output).contains("--platform=linux/arm64 xiaoyaliu/alist:latest"));

    // Existing files are kept unless forced.
    let output = imgsync(tmp.path(), &["init"]);
    assert_eq!(output.status.code(), Some(1));
    let output = imgsync(tmp.path(), &["init", "--force"]);
    assert!(output.status.success());
}
