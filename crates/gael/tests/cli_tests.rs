//! Integration tests for the gael CLI.
//!
//! These tests run the compiled binary against temporary repositories.

use rstest::{fixture, rstest};
use tempfile::TempDir;

mod common;
use common::{SYSTEM_DOC, run_gael_in_dir, stdout_json, write_sample_docs};

// ============================================================================
// Test Fixtures
// ============================================================================

/// Provides a fresh temporary directory for each test
#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Provides an initialized repository with sample docs
#[fixture]
fn initialized_dir() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let output = run_gael_in_dir(temp.path(), &["init", "--quiet"]);
    assert!(
        output.status.success(),
        "Failed to initialize gael: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    write_sample_docs(temp.path());
    temp
}

/// Provides an initialized repository whose docs are already migrated
#[fixture]
fn migrated_dir(initialized_dir: TempDir) -> TempDir {
    let output = run_gael_in_dir(initialized_dir.path(), &["migrate"]);
    assert!(
        output.status.success(),
        "Failed to migrate: {:?}",
        String::from_utf8_lossy(&output.stderr)
    );
    initialized_dir
}

// ============================================================================
// Help and Version Tests
// ============================================================================

#[rstest]
fn test_cli_help(temp_dir: TempDir) {
    let output = run_gael_in_dir(temp_dir.path(), &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    for command in ["init", "migrate", "generate", "export", "stats", "check"] {
        assert!(stdout.contains(command), "help should list {command}");
    }
}

#[rstest]
fn test_cli_version(temp_dir: TempDir) {
    let output = run_gael_in_dir(temp_dir.path(), &["--version"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[rstest]
fn test_cli_no_args(temp_dir: TempDir) {
    let output = run_gael_in_dir(temp_dir.path(), &[]);
    assert!(output.status.success());
}

// ============================================================================
// Init Tests
// ============================================================================

#[rstest]
fn test_init_creates_gael_dir(temp_dir: TempDir) {
    let output = run_gael_in_dir(temp_dir.path(), &["init", "--docs-dir", "catalog"]);

    assert!(output.status.success());
    assert!(temp_dir.path().join(".gael/config.yaml").exists());
    assert!(temp_dir.path().join(".gael/catalog.jsonl").exists());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Initialized"));
    assert!(stdout.contains("catalog"));
}

#[rstest]
fn test_init_twice_fails(initialized_dir: TempDir) {
    let output = run_gael_in_dir(initialized_dir.path(), &["init"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("already initialized"));
}

#[rstest]
fn test_commands_require_init(temp_dir: TempDir) {
    for command in ["migrate", "generate", "export", "stats", "check"] {
        let output = run_gael_in_dir(temp_dir.path(), &[command]);
        assert!(!output.status.success(), "{command} should fail");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("gael init"), "{command}: {stderr}");
    }
}

// ============================================================================
// Migrate / Stats Tests
// ============================================================================

#[rstest]
fn test_migrate_reports_counts(initialized_dir: TempDir) {
    let output = run_gael_in_dir(initialized_dir.path(), &["--json", "migrate"]);
    let summary = stdout_json(&output);

    assert_eq!(summary["documents"], 2);
    assert_eq!(summary["entries"], 6);
    assert_eq!(summary["files"][0]["filename"], "01-system.md");
    assert_eq!(summary["files"][1]["entries"], 2);
}

#[rstest]
fn test_migrate_writes_tagged_rows(migrated_dir: TempDir) {
    let data = std::fs::read_to_string(migrated_dir.path().join(".gael/catalog.jsonl")).unwrap();
    let first: serde_json::Value = serde_json::from_str(data.lines().next().unwrap()).unwrap();

    assert_eq!(first["kind"], "document");
    assert_eq!(first["doc_number"], 1);
    assert_eq!(data.lines().filter(|l| l.contains("\"kind\":\"entry\"")).count(), 6);
}

#[rstest]
fn test_migrate_missing_docs_dir(temp_dir: TempDir) {
    run_gael_in_dir(temp_dir.path(), &["init", "-q"]);
    let output = run_gael_in_dir(temp_dir.path(), &["migrate"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Docs directory not found"));
}

#[rstest]
fn test_stats_json_tree(migrated_dir: TempDir) {
    let output = run_gael_in_dir(migrated_dir.path(), &["stats", "--json"]);
    let stats = stdout_json(&output);

    assert_eq!(stats["entries"], 6);
    assert_eq!(stats["with_upstream"], 3);
    assert_eq!(stats["tree"][0]["title"], "System Foundation");
    assert_eq!(stats["tree"][0]["sections"][0]["entry_count"], 2);
    assert_eq!(stats["tree"][1]["doc_number"], 2);
}

#[rstest]
fn test_stats_text_tree(migrated_dir: TempDir) {
    let output = run_gael_in_dir(migrated_dir.path(), &["stats"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Entries:       6"));
    assert!(stdout.contains("01 System Foundation (4)"));
    assert!(stdout.contains("└── Kernels (2)"));
}

#[rstest]
fn test_stats_from_subdirectory(migrated_dir: TempDir) {
    let output = run_gael_in_dir(&migrated_dir.path().join("docs"), &["--json", "stats"]);
    assert_eq!(stdout_json(&output)["documents"], 2);
}

// ============================================================================
// Generate / Export Tests
// ============================================================================

#[rstest]
fn test_generate_writes_canonical_documents(migrated_dir: TempDir) {
    let output = run_gael_in_dir(migrated_dir.path(), &["generate", "--output-dir", "out"]);
    assert!(output.status.success());

    let system = std::fs::read_to_string(migrated_dir.path().join("out/01-system.md")).unwrap();
    assert!(system.starts_with("# 01 — System Foundation\n"));
    assert!(system.contains("### GRUB → `grub-fork` (fork of `grub`)"));
    assert!(system.contains("- **Build**: `./bootstrap && make`"));
    assert!(system.contains("### linux → `linux`"));

    let tools = std::fs::read_to_string(migrated_dir.path().join("out/02-tools.md")).unwrap();
    assert!(tools.contains("### helix → `me/helix` (fork of `helix-editor/helix`)"));
}

#[rstest]
fn test_generate_defaults_to_docs_dir(migrated_dir: TempDir) {
    let output = run_gael_in_dir(migrated_dir.path(), &["generate"]);
    assert!(output.status.success());

    let system = std::fs::read_to_string(migrated_dir.path().join("docs/01-system.md")).unwrap();
    assert_ne!(system, SYSTEM_DOC);
    assert!(system.contains("### GRUB → `grub-fork`"));
}

#[rstest]
fn test_regenerated_docs_migrate_to_same_stats(migrated_dir: TempDir) {
    let before = stdout_json(&run_gael_in_dir(migrated_dir.path(), &["--json", "stats"]));

    run_gael_in_dir(migrated_dir.path(), &["generate"]);
    run_gael_in_dir(migrated_dir.path(), &["migrate"]);

    let after = stdout_json(&run_gael_in_dir(migrated_dir.path(), &["--json", "stats"]));
    assert_eq!(before, after);
}

#[rstest]
fn test_export_writes_catalog(migrated_dir: TempDir) {
    let output = run_gael_in_dir(migrated_dir.path(), &["export"]);
    assert!(output.status.success());

    let content = std::fs::read_to_string(migrated_dir.path().join("catalog.json")).unwrap();
    let catalog: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(catalog["version"], "1.0.0");
    assert_eq!(catalog["total_entries"], 6);
    assert_eq!(catalog["categories"][0]["name"], "System Foundation");
    assert_eq!(catalog["categories"][1]["entries"][0]["upstream_url"], "helix-editor/helix");
}

#[rstest]
fn test_export_custom_output(migrated_dir: TempDir) {
    let output = run_gael_in_dir(
        migrated_dir.path(),
        &["--json", "export", "--output", "public/catalog.json"],
    );
    let summary = stdout_json(&output);

    assert_eq!(summary["total_entries"], 6);
    assert!(migrated_dir.path().join("public/catalog.json").exists());
}

// ============================================================================
// Check Tests
// ============================================================================

#[rstest]
fn test_check_sample_docs_are_stable(initialized_dir: TempDir) {
    let output = run_gael_in_dir(initialized_dir.path(), &["check"]);

    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stdout)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("01-system.md (4 entries)"));
}

#[rstest]
fn test_check_json_lists_every_file(initialized_dir: TempDir) {
    let output = run_gael_in_dir(initialized_dir.path(), &["--json", "check"]);
    let report = stdout_json(&output);

    let files = report["files"].as_array().unwrap();
    assert_eq!(files.len(), 2);
    assert!(files.iter().all(|f| f["problems"].as_array().unwrap().is_empty()));
}

#[rstest]
fn test_check_docs_dir_without_repo(temp_dir: TempDir) {
    write_sample_docs(temp_dir.path());
    let output = run_gael_in_dir(temp_dir.path(), &["check", "--docs-dir", "docs"]);
    assert!(output.status.success());
}
