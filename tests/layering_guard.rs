//! Layering guardrails for the workspace crates.
//!
//! `seer_core` is a pure vocabulary crate and must stay dependency-free. `seer_syntax` must not pull in
//! the tooling stack (LSP, async runtime, CLI, JSON) that only the root crate needs.

const TOOLING_CRATES: &[&str] = &["tower-lsp", "tokio", "clap", "serde_json", "tracing-subscriber"];

/// Dependency names listed in the `[dependencies]` table of a manifest.
fn main_dependencies(manifest: &str) -> Vec<String> {
    let mut in_dependencies = false;
    let mut names = Vec::new();

    for raw_line in manifest.lines() {
        let line = raw_line.trim();
        // Track when we enter/exit the `[dependencies]` table.
        if line.starts_with('[') {
            in_dependencies = line == "[dependencies]";
            continue;
        }

        if !in_dependencies || line.is_empty() || line.starts_with('#') {
            continue;
        }

        // Strip inline comments for robustness.
        let line_no_comment = line.split('#').next().unwrap_or("").trim();
        if let Some((name, _)) = line_no_comment.split_once('=') {
            names.push(name.trim().to_string());
        }
    }
    names
}

#[test]
fn core_has_no_dependencies() {
    let manifest = include_str!("../crates/seer_core/Cargo.toml");
    let deps = main_dependencies(manifest);
    assert!(deps.is_empty(), "seer_core must not depend on anything, found {deps:?}");
}

#[test]
fn syntax_does_not_depend_on_tooling() {
    let manifest = include_str!("../crates/seer_syntax/Cargo.toml");
    let deps = main_dependencies(manifest);
    assert!(deps.contains(&"seer_core".to_string()));
    for tooling in TOOLING_CRATES {
        assert!(
            !deps.iter().any(|dep| dep == tooling),
            "`{tooling}` must not appear in seer_syntax [dependencies]; it belongs to the root crate"
        );
    }
}
