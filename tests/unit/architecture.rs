//! Structural tests for layer boundary enforcement.
//!
//! These scan source files so that a stray import fails the build's tests
//! rather than slipping through review.

use std::path::{Path, PathBuf};

/// Collect all `.rs` files under a directory recursively.
fn collect_rs_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                files.extend(collect_rs_files(&path));
            } else if path.extension().and_then(|e| e.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files
}

/// Non-comment lines outside `#[cfg(test)]` blocks, with 1-based line numbers.
fn production_lines(path: &Path) -> Vec<(usize, String)> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    let mut depth = 0i32;
    let mut test_block_depth: Option<i32> = None;
    let mut out = Vec::new();
    for (i, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.contains("#[cfg(test)]") && test_block_depth.is_none() {
            test_block_depth = Some(depth);
        }
        let in_test = test_block_depth.is_some();
        for ch in line.chars() {
            match ch {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if test_block_depth.is_some_and(|d| depth <= d) {
                        test_block_depth = None;
                    }
                }
                _ => {}
            }
        }
        if !in_test && !trimmed.starts_with("//") {
            out.push((i + 1, line.to_string()));
        }
    }
    out
}

/// Every production line under `src/<layer>` containing a forbidden pattern.
fn violations(layer: &str, forbidden: &[&str]) -> Vec<String> {
    let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src").join(layer);
    let mut found = Vec::new();
    for file in collect_rs_files(&dir) {
        for (lineno, line) in production_lines(&file) {
            for pattern in forbidden {
                if line.contains(pattern) {
                    found.push(format!("{}:{lineno}: {}", file.display(), line.trim()));
                }
            }
        }
    }
    found
}

#[test]
fn domain_is_pure() {
    let found = violations(
        "domain",
        &[
            "crate::infra",
            "crate::application",
            "crate::commands",
            "crate::output",
            "tokio",
            "std::fs",
            "std::process",
        ],
    );
    assert!(found.is_empty(), "domain layer imports I/O:\n{}", found.join("\n"));
}

#[test]
fn application_depends_only_on_domain() {
    let found = violations(
        "application",
        &["crate::infra", "crate::commands", "crate::output", "tokio::"],
    );
    assert!(
        found.is_empty(),
        "application layer reaches outward:\n{}",
        found.join("\n")
    );
}

#[test]
fn infra_does_not_know_about_presentation() {
    let found = violations("infra", &["crate::commands", "crate::output"]);
    assert!(found.is_empty(), "infra imports presentation:\n{}", found.join("\n"));
}

#[test]
fn only_infra_spawns_processes() {
    let mut found = Vec::new();
    for layer in ["domain", "application", "commands", "output"] {
        found.extend(violations(layer, &["Command::new"]));
    }
    assert!(found.is_empty(), "process spawned outside infra:\n{}", found.join("\n"));
}
