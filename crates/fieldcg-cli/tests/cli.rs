//! Integration tests driving the built `fieldcg` binary over small fixture
//! files, checking exit codes and output shape per analyzer type.

use std::path::Path;
use std::process::{Command, Output};

fn fixture(name: &str) -> String {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name).to_string_lossy().into_owned()
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_fieldcg"))
        .args(args)
        .output()
        .expect("failed to execute fieldcg binary")
}

#[test]
fn static_analysis_of_a_simple_file_succeeds_and_emits_json() {
    let output = run(&[&fixture("simple.js")]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("valid JSON array");
    assert!(parsed.is_array());
    let edges = parsed.as_array().unwrap();
    assert!(!edges.is_empty(), "expected at least one call-graph edge, got {stdout}");
    let has_main_call = edges.iter().any(|e| e["target"]["label"] == "main");
    assert!(has_main_call, "expected an edge targeting main(), got {stdout}");
}

#[test]
fn nativecalls_analyzer_labels_forEach_and_setTimeout_callbacks() {
    let output = run(&["--analyzer-type", "nativecalls", &fixture("natives.js")]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("clb(forEach)"), "got {stdout}");
    assert!(stdout.contains("clb(setTimeout)"), "got {stdout}");
}

#[test]
fn vue_sfc_script_setup_block_is_analyzed() {
    let output = run(&[&fixture("component.vue")]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("loadMessage"), "got {stdout}");
}

#[test]
fn missing_input_path_fails_with_nonzero_exit() {
    let output = run(&["/no/such/path/does-not-exist.js"]);
    assert!(!output.status.success());
}

#[test]
fn fg_flag_emits_arrow_chain_text_instead_of_json() {
    let output = run(&["--fg", &fixture("simple.js")]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("->"), "got {stdout}");
    assert!(serde_json::from_str::<serde_json::Value>(&stdout).is_err());
}

#[test]
fn filter_excludes_matching_files_leaving_none_discovered() {
    let output = run(&["--filter", "-simple", &fixture("simple.js")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("no source files matched"), "got {stderr}");
}
