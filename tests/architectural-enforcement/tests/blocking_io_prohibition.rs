//! Integration Test: Blocking I/O Prohibition
//!
//! **Policy**: async functions in `core` and `tui` MUST NOT use blocking I/O.
//! Use `tokio::io`, `tokio::fs` and async `reqwest`, not `std::fs`, `std::net`
//! or `reqwest::blocking`.
//!
//! Blocking calls in plain functions are acceptable: config loading runs
//! before the event loop starts.

use architectural_enforcement::rust_sources;

const BLOCKING: &[(&str, &str)] = &[
    ("std::fs::", "Blocking file I/O"),
    ("std::net::", "Blocking network I/O"),
    ("std::process::Command", "Blocking process I/O"),
    ("reqwest::blocking", "Blocking HTTP client"),
    ("std::io::stdin()", "Blocking stdin"),
    ("std::thread::sleep", "Blocking sleep"),
];

#[test]
fn test_no_blocking_io_in_async_code() {
    let mut violations = Vec::new();

    for dir in ["core/src", "tui/src"] {
        for file in rust_sources(dir) {
            for (line_number, code) in file.production_lines() {
                if !file.in_async_fn(line_number - 1) {
                    continue;
                }
                for (needle, what) in BLOCKING {
                    if code.contains(needle) {
                        violations.push(format!(
                            "{}:{line_number} - {what}: {}",
                            file.path.display(),
                            code.trim()
                        ));
                    }
                }
            }
        }
    }

    if !violations.is_empty() {
        eprintln!("\n❌ Blocking I/O calls found in async code!\n");
        for violation in &violations {
            eprintln!("  ❌ {violation}");
        }
        eprintln!("\n✅ REQUIRED async I/O:");
        eprintln!("  - tokio::io::AsyncBufReadExt / AsyncWriteExt");
        eprintln!("  - reqwest::Client with .await");
        panic!("Found {} blocking I/O violation(s)", violations.len());
    }
}

#[test]
fn test_headless_uses_async_io() {
    let files = rust_sources("tui/src");
    let headless = files
        .iter()
        .find(|f| f.path.ends_with("headless.rs"))
        .expect("tui/src/headless.rs should exist");

    let uses_tokio_io = headless
        .production_lines()
        .iter()
        .any(|(_, code)| code.contains("use tokio::io"));
    assert!(uses_tokio_io, "headless mode should read and write through tokio::io");
}
