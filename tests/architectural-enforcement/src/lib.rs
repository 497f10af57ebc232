//! Architectural Enforcement Integration Tests
//!
//! This package holds integration tests that keep the workspace layering honest:
//! - `skycast-core` stays free of terminal crates
//! - The reducer and view stay pure (no I/O, no async runtime)
//! - Async code never reaches for blocking I/O
//!
//! The helpers here scan source text rather than compiled items. They are
//! deliberately line-based; code after a `#[cfg(test)]` marker is treated as
//! test code and skipped.

use std::fs;
use std::path::{Path, PathBuf};

/// Workspace root, two levels above this package
pub fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .ancestors()
        .nth(2)
        .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
}

/// A Rust source file split into lines
#[derive(Debug)]
pub struct SourceFile {
    /// Path relative to the workspace root
    pub path: PathBuf,
    /// Raw lines
    pub lines: Vec<String>,
}

impl SourceFile {
    /// Read a file below the workspace root
    pub fn read(relative: impl AsRef<Path>) -> Option<Self> {
        let relative = relative.as_ref();
        let content = fs::read_to_string(workspace_root().join(relative)).ok()?;
        Some(Self {
            path: relative.to_path_buf(),
            lines: content.lines().map(str::to_string).collect(),
        })
    }

    /// Lines before the first `#[cfg(test)]`, comments stripped, with line numbers
    pub fn production_lines(&self) -> Vec<(usize, &str)> {
        self.lines
            .iter()
            .enumerate()
            .take_while(|(_, line)| !line.trim_start().starts_with("#[cfg(test)]"))
            .map(|(idx, line)| (idx + 1, strip_comment(line)))
            .filter(|(_, code)| !code.trim().is_empty())
            .collect()
    }

    /// Whether line `idx` (zero based) sits inside an `async fn`
    ///
    /// Scans backwards for the nearest function signature.
    pub fn in_async_fn(&self, idx: usize) -> bool {
        self.lines[..=idx.min(self.lines.len().saturating_sub(1))]
            .iter()
            .rev()
            .map(|line| strip_comment(line).trim())
            .find(|line| is_fn_signature(line))
            .is_some_and(|line| line.contains("async fn "))
    }
}

/// All `.rs` files below `dir` (relative to the workspace root)
pub fn rust_sources(dir: &str) -> Vec<SourceFile> {
    let root = workspace_root();
    let mut files: Vec<SourceFile> = walkdir::WalkDir::new(root.join(dir))
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().and_then(|s| s.to_str()) == Some("rs"))
        .filter_map(|entry| {
            let relative = entry.path().strip_prefix(&root).ok()?.to_path_buf();
            SourceFile::read(relative)
        })
        .collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));
    files
}

/// Dependency names declared in a `Cargo.toml`
///
/// Only looks at `[dependencies]`, not dev or build dependencies.
pub fn declared_dependencies(manifest: &str) -> Vec<String> {
    let mut in_deps = false;
    let mut names = Vec::new();
    for line in manifest.lines() {
        let line = line.trim();
        if line.starts_with('[') {
            in_deps = line == "[dependencies]";
            continue;
        }
        if !in_deps || line.is_empty() || line.starts_with('#') {
            continue;
        }
        if let Some((name, _)) = line.split_once('=') {
            let name = name.trim();
            names.push(name.split('.').next().unwrap_or(name).to_string());
        }
    }
    names
}

/// Code part of a line, without a trailing `//` comment
pub fn strip_comment(line: &str) -> &str {
    line.split("//").next().unwrap_or(line)
}

fn is_fn_signature(line: &str) -> bool {
    let line = line
        .trim_start_matches("pub(crate) ")
        .trim_start_matches("pub ");
    line.starts_with("fn ") || line.starts_with("async fn ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(lines: &[&str]) -> SourceFile {
        SourceFile {
            path: PathBuf::from("mem.rs"),
            lines: lines.iter().map(|l| (*l).to_string()).collect(),
        }
    }

    #[test]
    fn test_async_detection() {
        let file = source(&[
            "pub async fn fetch() {",
            "    let body = std::fs::read_to_string(\"x\");",
            "}",
            "fn load() {",
            "    let body = std::fs::read_to_string(\"x\");",
            "}",
        ]);
        assert!(file.in_async_fn(1));
        assert!(!file.in_async_fn(4));
    }

    #[test]
    fn test_production_lines_stop_at_test_module() {
        let file = source(&["use a; // import", "", "#[cfg(test)]", "mod tests {}"]);
        assert_eq!(file.production_lines(), vec![(1, "use a; ")]);
    }

    #[test]
    fn test_declared_dependencies() {
        let manifest = "[package]\nname = \"x\"\n\n[dependencies]\ntokio = { workspace = true }\nserde.workspace = true\n\n[dev-dependencies]\ntempfile = \"3\"\n";
        assert_eq!(declared_dependencies(manifest), vec!["tokio", "serde"]);
    }

    #[test]
    fn test_workspace_root_has_manifest() {
        assert!(workspace_root().join("Cargo.toml").exists());
    }
}
