//! CLI and config contracts.

use crate::common::{todo_app, TestProject};

/// CONTRACT: `plan --json` prints the manifest as a single JSON document.
#[test]
fn contract_plan_json_is_valid() {
    let project = todo_app();
    let result = project.run(&["plan", "--json"]);

    assert!(result.success, "stderr: {}", result.stderr);
    let manifest: serde_json::Value = serde_json::from_str(&result.stdout).unwrap();
    assert!(manifest["environments"]["server"]["server_entries"].is_array());
    assert!(manifest["shape"].as_str().unwrap().starts_with("sha256:"));
}

/// CONTRACT: `check` exits non-zero on an unresolved entry and names it.
#[test]
fn contract_check_fails_on_missing_entry() {
    let project = TestProject::new();
    project.write("stratum.toml", "[entries]\nrsc = \"./src/missing.tsx\"\n");

    let result = project.run(&["check"]);
    assert!(!result.success);
    assert!(result.stderr.contains("Can't resolve './src/missing.tsx'"));
}

/// CONTRACT: Unknown config keys warn with a suggestion but do not fail.
#[test]
fn contract_unknown_config_key_warns() {
    let project = todo_app();
    project.write(
        "stratum.toml",
        &format!("{}\n[dev]\nprot = 3000\n", crate::common::TODO_CONFIG),
    );

    let result = project.run(&["check"]);
    assert!(result.success, "stderr: {}", result.stderr);
    assert!(result.stderr.contains("did you mean 'port'?"));
}

/// CONTRACT: Production mode has no watch loop.
#[test]
fn contract_watch_refuses_production() {
    let project = todo_app();
    let result = project.run_with_env(&["watch"], &[("STRATUM_MODE", "production")]);

    assert!(!result.success);
    insta::assert_snapshot!(
        result.stderr.lines().next().unwrap_or_default(),
        @"Error: watch requires development mode (mode is production)"
    );
}

/// CONTRACT: `--context` selects the directory holding `stratum.toml`.
#[test]
fn contract_context_flag_selects_config_dir() {
    let project = TestProject::new();
    project.write("app/stratum.toml", "[entries]\nrsc = \"./src/missing.tsx\"\n");

    let root = project.run(&["check"]);
    assert!(root.success, "stderr: {}", root.stderr);

    let nested = project.run(&["check", "-c", "app"]);
    assert!(!nested.success);
    assert!(nested.stderr.contains("Can't resolve './src/missing.tsx'"));
}
