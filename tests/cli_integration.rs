// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Integration tests for the fleetmap CLI commands

use assert_cmd::Command as AssertCommand;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Run fleetmap with the given arguments and data directory
fn run_fleetmap(data_dir: &TempDir, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_fleetmap"))
        .env("FLEETMAP_DATA_DIR", data_dir.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .args(["--org-prefix", "org"])
        .args(args)
        .output()
        .expect("Failed to execute fleetmap")
}

/// Helper to get stdout as string
fn stdout_str(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to get stderr as string
fn stderr_str(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// svcA and svcB both call barclient; svcA also uses a non-openapi client and an ordinary library
fn make_fleet() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("gitlab");
    write(
        &root,
        "teamx/svcA/go.mod",
        "module org/teamx/svcA\n\ngo 1.22\n\nrequire (\n\torg/openapi/clients/go/barclient/v1 v1.2.0\n\torg/modules/client/v3/users v3.0.1\n\tgithub.com/pkg/errors v0.9.1\n)\n",
    );
    write(
        &root,
        "teamy/svcB/go.mod",
        "module org/teamy/svcB\n\ngo 1.21\n\nrequire org/openapi/clients/go/barclient/v1 v1.3.0\n",
    );
    tmp
}

fn scan(data_dir: &TempDir, fleet: &TempDir) {
    let root = fleet.path().join("gitlab");
    let output = run_fleetmap(data_dir, &["scan", root.to_str().unwrap()]);
    assert!(output.status.success(), "scan failed: {}", stderr_str(&output));
}

#[test]
fn test_scan_stores_snapshot() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    let root = fleet.path().join("gitlab");

    let output = run_fleetmap(&data_dir, &["scan", root.to_str().unwrap()]);
    assert!(output.status.success(), "scan failed: {}", stderr_str(&output));
    let stdout = stdout_str(&output);
    assert!(stdout.contains("Found 2 modules"));
    assert!(stdout.contains("gitlab/teamx/svcA"));
    assert!(data_dir.path().join("fleet.json").exists());
}

#[test]
fn test_export_json_full_graph() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["export", "--format", "json"]);
    assert!(output.status.success(), "export failed: {}", stderr_str(&output));

    let arch: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(arch["graph"]["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(arch["graph"]["edges"].as_array().unwrap().len(), 2);
    assert_eq!(arch["libraries"][0]["module"], "org/openapi/clients/go/barclient/v1");
    assert_eq!(arch["clients_only"], false);
}

#[test]
fn test_export_focused_radius() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(
        &data_dir,
        &["export", "--module", "svcA", "--radius", "1", "--radius-only", "--format", "json"],
    );
    assert!(output.status.success(), "export failed: {}", stderr_str(&output));

    let arch: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let ids: Vec<&str> = arch["graph"]["nodes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|n| n["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["svc:svcA", "dep:org/openapi/clients/go/barclient/v1"]);
    assert_eq!(arch["module"], "svcA");
}

#[test]
fn test_export_mermaid_files() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);
    let out_dir = TempDir::new().unwrap();

    let output = run_fleetmap(
        &data_dir,
        &["export", "--module", "teamx/svcA", "--out-dir", out_dir.path().to_str().unwrap()],
    );
    assert!(output.status.success(), "export failed: {}", stderr_str(&output));

    let mmd = fs::read_to_string(out_dir.path().join("teamx-svcA-arch.mmd")).unwrap();
    assert!(mmd.starts_with("flowchart LR"));
    assert!(mmd.contains("calls (v1.2.0)"));
    assert!(out_dir.path().join("teamx-svcA-arch.json").exists());
}

#[test]
fn test_export_full_fleet_files() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);
    let out_dir = TempDir::new().unwrap();

    let output = run_fleetmap(&data_dir, &["export", "--out-dir", out_dir.path().to_str().unwrap()]);
    assert!(output.status.success(), "export failed: {}", stderr_str(&output));

    let arch: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out_dir.path().join("full-arch.json")).unwrap())
            .unwrap();
    assert_eq!(arch["graph"]["nodes"].as_array().unwrap().len(), 3);
    let mmd = fs::read_to_string(out_dir.path().join("full-arch.mmd")).unwrap();
    assert!(mmd.contains("calls (v1.3.0)"));
    assert!(!out_dir.path().join("arch-arch.json").exists());
}

#[test]
fn test_export_json_flag() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["--json", "export", "--module", "svcB"]);
    assert!(output.status.success(), "export failed: {}", stderr_str(&output));
    let arch: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(arch["module"], "svcB");

    let output = run_fleetmap(&data_dir, &["--json", "export", "--format", "mermaid"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("--json cannot be combined"));
}

#[test]
fn test_clients_lists_loose_matches() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["clients"]);
    assert!(output.status.success(), "clients failed: {}", stderr_str(&output));
    let lines: Vec<String> = stdout_str(&output).lines().map(str::to_string).collect();
    assert_eq!(
        lines,
        [
            "svcA : client/v3/users -> v3.0.1",
            "svcA : barclient/v1 -> v1.2.0",
            "svcB : barclient/v1 -> v1.3.0",
        ]
    );

    // the graph itself stays strict
    let output = run_fleetmap(&data_dir, &["resolve", "client/v3/users"]);
    assert!(!stdout_str(&output).contains("dep:org/modules/client/v3/users"));

    let output = run_fleetmap(&data_dir, &["--ignore", "teamy", "clients", "--full-path"]);
    assert!(output.status.success(), "clients failed: {}", stderr_str(&output));
    let stdout = stdout_str(&output);
    assert!(stdout.contains("svcA : barclient/v1 -> v1.2.0 (module: org/openapi/clients/go/barclient/v1)"));
    assert!(!stdout.contains("svcB"));
}

#[test]
fn test_export_unknown_module_fails() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["export", "--module", "nothing-here"]);
    assert!(!output.status.success());
    assert!(stderr_str(&output).contains("could not find node for module"));
}

#[test]
fn test_resolve_command() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["resolve", "barclient/v1"]);
    assert!(output.status.success(), "resolve failed: {}", stderr_str(&output));
    assert!(stdout_str(&output).starts_with("dep:org/openapi/clients/go/barclient/v1"));
}

#[test]
fn test_search_and_projects() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["--json", "search", "libraries", "ERRORS"]);
    assert!(output.status.success(), "search failed: {}", stderr_str(&output));
    let hits: Vec<String> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(hits, ["github.com/pkg/errors"]);

    let output = run_fleetmap(
        &data_dir,
        &[
            "--json",
            "projects",
            "--library",
            "org/openapi/clients/go/barclient/v1",
            "--lib-version",
            "v1.3.0",
            "--lib-cmp",
            "lt",
        ],
    );
    assert!(output.status.success(), "projects failed: {}", stderr_str(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let projects = report["projects"].as_array().unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "svcA");
    assert_eq!(report["search_hash"].as_str().unwrap().len(), 32);
}

#[test]
fn test_changes_detects_edits() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["changes"]);
    assert!(output.status.success(), "changes failed: {}", stderr_str(&output));
    assert!(stdout_str(&output).contains("No changes"));

    write(
        &fleet.path().join("gitlab"),
        "teamy/svcB/go.mod",
        "module org/teamy/svcB\n\ngo 1.22\n\nrequire org/openapi/clients/go/barclient/v1 v1.4.0\n",
    );
    write(&fleet.path().join("gitlab"), "teamz/svcC/go.mod", "module org/teamz/svcC\ngo 1.22\n");

    let output = run_fleetmap(&data_dir, &["--json", "changes"]);
    assert!(output.status.success(), "changes failed: {}", stderr_str(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["changed"].as_array().unwrap().len(), 1);
    assert_eq!(report["added"].as_array().unwrap().len(), 1);
    assert!(report["removed"].as_array().unwrap().is_empty());
}

#[test]
fn test_hash_command() {
    let data_dir = TempDir::new().unwrap();
    let fleet = make_fleet();
    scan(&data_dir, &fleet);

    let output = run_fleetmap(&data_dir, &["hash", "svcA"]);
    assert!(output.status.success(), "hash failed: {}", stderr_str(&output));
    let stdout = stdout_str(&output);
    assert!(stdout.contains("gitlab/teamx/svcA"));
    assert!(stdout.contains("ok"));
}

#[test]
fn test_export_without_snapshot_fails() {
    let data_dir = TempDir::new().unwrap();
    AssertCommand::cargo_bin("fleetmap")
        .unwrap()
        .env("FLEETMAP_DATA_DIR", data_dir.path())
        .args(["export"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("fleetmap scan"));
}

#[test]
fn test_config_shows_overrides() {
    let data_dir = TempDir::new().unwrap();
    AssertCommand::cargo_bin("fleetmap")
        .unwrap()
        .env("FLEETMAP_DATA_DIR", data_dir.path())
        .env("FLEETMAP_RADIUS", "4")
        .args(["config", "radius"])
        .assert()
        .success()
        .stdout(predicate::str::diff("4\n"));
}

#[test]
fn test_completions() {
    AssertCommand::cargo_bin("fleetmap")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("fleetmap"));
}
