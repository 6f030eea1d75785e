//! Source checks for the session core.
//!
//! The core runs inside the browser and the cli alike, so a panic takes the
//! whole front end down with it, and anything platform specific breaks one of
//! the two. Budgets only ever shrink.

use std::fs;
use std::path::Path;

struct SourceFile {
    path: String,
    content: String,
}

/// Production `.rs` files under `src/`, without the sibling `_test.rs` files.
fn source_files() -> Vec<SourceFile> {
    let mut files = Vec::new();
    collect(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found; run from the session crate root");
    files
}

fn collect(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|entry| entry.path()) {
        if path.is_dir() {
            collect(&path, out);
            continue;
        }
        let path_str = path.to_string_lossy().to_string();
        if !path_str.ends_with(".rs") || path_str.ends_with("_test.rs") {
            continue;
        }
        if let Ok(content) = fs::read_to_string(&path) {
            out.push(SourceFile { path: path_str, content });
        }
    }
}

/// `path:line` for every line containing `pattern`.
fn hits(files: &[SourceFile], pattern: &str) -> Vec<String> {
    files
        .iter()
        .flat_map(|file| {
            file.content
                .lines()
                .enumerate()
                .filter(|(_, line)| line.contains(pattern))
                .map(|(n, _)| format!("  {}:{}", file.path, n + 1))
        })
        .collect()
}

/// `(pattern, budget)`. The single `.ok()` is the JSON error-body read in
/// `authenticator::error_message`.
const BUDGETS: &[(&str, usize)] = &[
    (".unwrap()", 0),
    (".expect(", 0),
    ("panic!(", 0),
    ("unreachable!(", 0),
    ("todo!(", 0),
    ("unimplemented!(", 0),
    ("let _ =", 0),
    (".ok()", 1),
    ("#[allow(dead_code)]", 0),
    // Output goes through the `log` facade so each front end picks the sink.
    ("println!(", 0),
    ("eprintln!(", 0),
    ("dbg!(", 0),
];

/// Browser and HTTP stacks belong to `client` and `cli`.
const PLATFORM_CRATES: &[&str] = &["web_sys", "gloo_net", "reqwest", "leptos", "tokio"];

#[test]
fn pattern_budgets() {
    let files = source_files();
    let over: Vec<String> = BUDGETS
        .iter()
        .filter_map(|&(pattern, budget)| {
            let found = hits(&files, pattern);
            (found.len() > budget).then(|| {
                format!("`{pattern}`: found {}, max {budget}\n{}", found.len(), found.join("\n"))
            })
        })
        .collect();
    assert!(over.is_empty(), "budget exceeded:\n{}", over.join("\n"));
}

#[test]
fn core_stays_platform_neutral() {
    let files = source_files();
    let found: Vec<String> = PLATFORM_CRATES
        .iter()
        .flat_map(|krate| hits(&files, &format!("{krate}::")))
        .collect();
    assert!(found.is_empty(), "platform crate referenced from the core:\n{}", found.join("\n"));
}

/// A poisoned session lock must not take the session down with it: every
/// `.lock()` recovers the guard through `PoisonError::into_inner`.
#[test]
fn locks_tolerate_poisoning() {
    let mut bad = Vec::new();
    for file in source_files() {
        let lines: Vec<&str> = file.content.lines().collect();
        for (n, line) in lines.iter().enumerate() {
            if !line.contains(".lock()") {
                continue;
            }
            let next = lines.get(n + 1).copied().unwrap_or_default();
            if !line.contains("PoisonError::into_inner") && !next.contains("PoisonError::into_inner") {
                bad.push(format!("  {}:{}", file.path, n + 1));
            }
        }
    }
    assert!(bad.is_empty(), "lock without poison recovery:\n{}", bad.join("\n"));
}
