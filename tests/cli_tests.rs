//! CLI integration tests
//!
//! These tests verify the CLI commands work correctly by running the binary.

#![cfg(feature = "cli")]

use std::path::PathBuf;
use std::process::Command;

fn pagexml_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_pagexml"))
}

fn fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path.to_string_lossy().into_owned()
}

// ============================================================================
// Check Command Tests
// ============================================================================

#[test]
fn test_cli_check_valid() {
    let output = Command::new(pagexml_bin())
        .args(["check", &fixture("full_page.xml")])
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "check should succeed");
    assert!(stdout.contains("pagexml v"), "should show version");
    assert!(stdout.contains("Top-level regions: 3"), "should count regions");
    assert!(stdout.contains("All regions: 4"), "should count nested regions");
    assert!(stdout.contains("Reading order: 4 references"));
}

#[test]
fn test_cli_check_reports_error_kind() {
    let output = Command::new(pagexml_bin())
        .args(["check", &fixture("invalid_width.xml")])
        .output()
        .expect("Failed to execute command");

    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "check should fail");
    assert!(stderr.contains("malformed attribute"), "should name the error kind: {}", stderr);
    assert!(stderr.contains("imageWidth"));
}

#[test]
fn test_cli_check_not_page() {
    let output = Command::new(pagexml_bin())
        .args(["check", &fixture("not_page.xml")])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not a PAGE document"));
}

// ============================================================================
// Roundtrip Command Tests
// ============================================================================

#[test]
fn test_cli_roundtrip_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out.xml");

    let output = Command::new(pagexml_bin())
        .args(["roundtrip", &fixture("simple_page.xml"), "-o", out.to_str().unwrap()])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let written = std::fs::read_to_string(&out).unwrap();
    let doc = roxmltree::Document::parse(&written).unwrap();
    assert_eq!(doc.root_element().tag_name().name(), "PcGts");
    assert_eq!(
        doc.root_element().tag_name().namespace(),
        Some("http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15")
    );
    assert!(doc
        .descendants()
        .any(|n| n.tag_name().name() == "TextRegion" && n.attribute("id") == Some("r0")));
}

// ============================================================================
// JSON Command Tests
// ============================================================================

#[test]
fn test_cli_json() {
    let output = Command::new(pagexml_bin())
        .args(["json", "--pretty", &fixture("simple_page.xml")])
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["page"]["image_width"], 100);
    assert_eq!(json["page"]["regions"][0]["id"], "r0");
    assert_eq!(json["metadata"]["comments"], "Test Comment");
}
