//! Integration Test: Layering
//!
//! **Policy**: `skycast-core` is the headless widget. It must not depend on a
//! terminal library, and its reducer and view must stay pure functions of
//! their inputs so the same tree can be rendered on any surface.

use std::fs;

use architectural_enforcement::{declared_dependencies, rust_sources, workspace_root, SourceFile};

const TERMINAL_CRATES: &[&str] = &["ratatui", "crossterm"];

/// Imports that would make the reducer or view impure
const IMPURE: &[&str] = &[
    "tokio", "reqwest", "std::fs", "std::net", "std::io", "std::time", "chrono::Utc::now",
    "crate::bridge", "crate::lookup", "crate::config",
];

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("core/Cargo.toml"))
        .expect("core/Cargo.toml should exist");
    let deps = declared_dependencies(&manifest);

    for forbidden in TERMINAL_CRATES {
        assert!(
            !deps.iter().any(|d| d == forbidden),
            "skycast-core must not depend on {forbidden}"
        );
    }
}

#[test]
fn test_core_sources_never_name_terminal_crates() {
    let mut violations = Vec::new();
    for file in rust_sources("core/src") {
        for (line_number, code) in file.production_lines() {
            if TERMINAL_CRATES.iter().any(|c| code.contains(&format!("{c}::"))) {
                violations.push(format!("{}:{line_number} - {}", file.path.display(), code.trim()));
            }
        }
    }
    assert!(violations.is_empty(), "terminal code in core:\n{}", violations.join("\n"));
}

#[test]
fn test_reducer_and_view_are_pure() {
    let mut violations = Vec::new();
    for path in ["core/src/reducer.rs", "core/src/view.rs"] {
        let file = SourceFile::read(path).expect("source file should exist");
        for (line_number, code) in file.production_lines() {
            if IMPURE.iter().any(|needle| code.contains(needle)) {
                violations.push(format!("{path}:{line_number} - {}", code.trim()));
            }
            if code.contains("async ") || code.contains(".await") {
                violations.push(format!("{path}:{line_number} - async code: {}", code.trim()));
            }
        }
    }
    assert!(violations.is_empty(), "impure code:\n{}", violations.join("\n"));
}

#[test]
fn test_only_the_lookup_module_talks_http() {
    let mut violations = Vec::new();
    for file in rust_sources("core/src") {
        if file.path.starts_with("core/src/lookup") {
            continue;
        }
        for (line_number, code) in file.production_lines() {
            if code.contains("reqwest::") {
                violations.push(format!("{}:{line_number} - {}", file.path.display(), code.trim()));
            }
        }
    }
    assert!(violations.is_empty(), "HTTP outside lookup:\n{}", violations.join("\n"));
}
