//! `xtask`: workspace automation for the wasteland workspace.
//!
//! Provides CI-style checks: clippy suppression scanning, a determinism guard
//! over the simulation crate, and a per-file source line limit.
use anyhow::Result as AnyhowResult;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Default maximum number of code lines (no blanks, no comment-only lines) per Rust file.
const DEFAULT_LINE_LIMIT: usize = 700;
/// Directories scanned for Rust sources, relative to the workspace root.
const SOURCE_ROOTS: &[&str] = &["crates", "xtask"];
/// The simulation crate must replay identically from a seed.
const DETERMINISTIC_ROOT: &str = "crates/core/src";
/// Constructs that make simulation output depend on process state.
const NONDETERMINISM_PATTERNS: &[(&str, &str)] = &[
    (r"\bHashMap\b", "HashMap iteration order is randomized; use BTreeMap or SlotMap"),
    (r"\bHashSet\b", "HashSet iteration order is randomized; use BTreeSet"),
    (r"\bthread_rng\b|\brand::rng\b", "ambient RNG; draw from the seeded game dice"),
    (r"\bSystemTime\b|\bInstant\b", "wall clock in the simulation"),
];
/// Exact clippy lints that repository policy forbids suppressing with `allow`/`expect`.
const SUPPRESSION_DENYLIST_CLIPPY_LINTS: &[&str] = &[
    "clippy::cognitive_complexity",
    "clippy::type_complexity",
    "clippy::too_many_arguments",
    "clippy::too_many_lines",
    "clippy::large_enum_variant",
    "clippy::struct_excessive_bools",
];
/// Clippy lint groups that would suppress denylisted lints transitively.
const SUPPRESSION_DENYLIST_CLIPPY_GROUPS: &[&str] = &["complexity", "perf", "pedantic"];

/// Matches `#[allow(...)]` / `#[expect(...)]` attributes. Nested parentheses can end the
/// capture early, which only ever misses a hit.
const LINT_ATTRIBUTE_PATTERN: &str = r"(?s)#\s*!?\s*\[\s*(allow|expect)\s*\((.*?)\)\s*]";
const CLIPPY_LINT_TOKEN_PATTERN: &str = r"clippy::[a-z_]+";

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks
    Check,
    /// Check for suppressions of clippy lints denied by workspace policy.
    CheckClippySuppressions,
    /// Check the simulation crate for nondeterministic collections, RNGs and clocks
    CheckDeterminism,
    /// Check for Rust files that are too large (code lines)
    CheckRustLineCount {
        /// Set the maximum number of code lines allowed
        #[arg(long, default_value_t = DEFAULT_LINE_LIMIT)]
        limit: usize,

        /// Just print the line counts for all files and exit
        #[arg(long)]
        print_counts: bool,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let root = env::current_dir()?;
    match cli.command {
        Commands::Check => {
            check_clippy_suppressions(&root)?;
            check_determinism(&root)?;
            check_rust_line_count(&root, DEFAULT_LINE_LIMIT, false)
        }
        Commands::CheckClippySuppressions => check_clippy_suppressions(&root),
        Commands::CheckDeterminism => check_determinism(&root),
        Commands::CheckRustLineCount { limit, print_counts } => {
            check_rust_line_count(&root, limit, print_counts)
        }
    }
}

/// Every `.rs` file under `dirs`, as `/`-separated paths relative to `root`, sorted.
fn rust_files(root: &Path, dirs: &[&str]) -> Result<BTreeSet<String>> {
    let mut files = BTreeSet::new();
    let mut pending: Vec<PathBuf> = dirs.iter().map(|dir| root.join(dir)).collect();
    while let Some(dir) = pending.pop() {
        if !dir.is_dir() {
            continue;
        }
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.is_dir() {
                if path.file_name().is_some_and(|name| name != "target") {
                    pending.push(path);
                }
                continue;
            }
            if path.extension().and_then(|ext| ext.to_str()) != Some("rs") {
                continue;
            }
            let relative = path.strip_prefix(root).map_err(|e| eyre!("{}: {e}", path.display()))?;
            let parts: Vec<_> = relative.iter().map(|part| part.to_string_lossy()).collect();
            files.insert(parts.join("/"));
        }
    }
    Ok(files)
}

/// TOML schema for `.rust-line-count-exceptions.toml`.
#[derive(Deserialize, Default)]
struct ExceptionsConfig {
    /// Regex patterns matched against relative file paths to exempt from the limit.
    #[serde(default)]
    exceptions: Vec<String>,
}

fn load_exceptions(root: &Path) -> Result<Vec<Regex>> {
    let config_path = root.join(".rust-line-count-exceptions.toml");
    if !config_path.exists() {
        return Ok(Vec::new());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: ExceptionsConfig = toml::from_str(&content)
        .map_err(|e| eyre!("Failed to parse .rust-line-count-exceptions.toml: {e}"))?;
    config
        .exceptions
        .into_iter()
        .map(|pattern| Regex::new(&pattern).map_err(|e| eyre!("Invalid regex {pattern}: {e}")))
        .collect()
}

/// Checks that every Rust file in the workspace stays under `limit` code lines.
fn check_rust_line_count(root: &Path, limit: usize, print_counts: bool) -> Result<()> {
    let exceptions = load_exceptions(root)?;
    let mut violations = Vec::new();
    let mut max_count = 0;
    let mut max_file = String::new();

    for file_path in rust_files(root, SOURCE_ROOTS)? {
        if exceptions.iter().any(|re| re.is_match(&file_path)) {
            continue;
        }
        let count = count_code_lines(&root.join(&file_path))
            .map_err(|e| eyre!("Failed to count lines in {file_path}: {e}"))?;
        if count > max_count {
            max_count = count;
            max_file = file_path.clone();
        }
        if print_counts {
            println!("{file_path}: {count}");
        }
        if count > limit {
            violations.push((file_path, count));
        }
    }

    if print_counts {
        println!("Max line count: {max_count} (in {max_file})");
        return Ok(());
    }

    if !violations.is_empty() {
        violations.sort_by(|a, b| b.1.cmp(&a.1));
        println!("SOURCE LINE LIMIT EXCEEDED (limit: {limit}; blanks and comments excluded)");
        for (file, count) in violations {
            println!("{file}: {count} lines");
        }
        println!("\nSuggestions for corrective action:");
        println!("- Split tests out into a sibling `tests.rs` module or the crate's tests/ dir.");
        println!("- Extract large components into new modules.");
        bail!("Source line limit exceeded.");
    }

    println!("All Rust files are within the source line limit ({limit}).");
    Ok(())
}

/// One offending line in the simulation crate.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DeterminismHit {
    line: usize,
    reason: &'static str,
}

fn check_determinism(root: &Path) -> Result<()> {
    let patterns = nondeterminism_patterns()?;
    let mut violations = Vec::new();
    for file_path in rust_files(root, &[DETERMINISTIC_ROOT])? {
        let source = fs::read_to_string(root.join(&file_path))?;
        for hit in find_nondeterminism(&source, &patterns) {
            violations.push((file_path.clone(), hit));
        }
    }

    if !violations.is_empty() {
        println!("NONDETERMINISM IN {DETERMINISTIC_ROOT}");
        for (file, hit) in violations {
            println!("{file}:{} -> {}", hit.line, hit.reason);
        }
        bail!("The simulation crate must stay reproducible from its seed.");
    }

    println!("No nondeterministic constructs found in {DETERMINISTIC_ROOT}.");
    Ok(())
}

fn nondeterminism_patterns() -> Result<Vec<(Regex, &'static str)>> {
    let mut patterns = Vec::with_capacity(NONDETERMINISM_PATTERNS.len());
    for (pattern, reason) in NONDETERMINISM_PATTERNS {
        patterns.push((Regex::new(pattern)?, *reason));
    }
    Ok(patterns)
}

/// Comment lines are skipped so docs can name the forbidden types.
fn find_nondeterminism(source: &str, patterns: &[(Regex, &'static str)]) -> Vec<DeterminismHit> {
    let mut hits = Vec::new();
    for (index, line) in source.lines().enumerate() {
        if line.trim_start().starts_with("//") {
            continue;
        }
        if let Some((_, reason)) = patterns.iter().find(|(re, _)| re.is_match(line)) {
            hits.push(DeterminismHit { line: index + 1, reason: *reason });
        }
    }
    hits
}

/// One source-level suppression hit for a policy-denied clippy lint.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ClippySuppressionHit {
    /// Attribute kind (`allow` or `expect`) that performed the suppression.
    kind: String,
    /// Fully qualified clippy lint path (for example, `clippy::too_many_lines`).
    lint: String,
    /// 1-based line where the lint token appears in source.
    line: usize,
}

fn check_clippy_suppressions(root: &Path) -> Result<()> {
    let mut violations: Vec<(String, ClippySuppressionHit)> = Vec::new();
    let lint_attr_re = Regex::new(LINT_ATTRIBUTE_PATTERN)?;
    let clippy_lint_re = Regex::new(CLIPPY_LINT_TOKEN_PATTERN)?;

    for file_path in rust_files(root, SOURCE_ROOTS)? {
        let source = fs::read_to_string(root.join(&file_path))?;
        for hit in find_denied_clippy_suppressions(&source, &lint_attr_re, &clippy_lint_re)? {
            violations.push((file_path.clone(), hit));
        }
    }

    if !violations.is_empty() {
        println!("DISALLOWED CLIPPY SUPPRESSIONS FOUND");
        for (file, hit) in violations {
            println!("{file}:{} -> {}({})", hit.line, hit.kind, hit.lint);
        }
        bail!("Found suppressions of clippy lints denied by workspace policy.");
    }

    println!("No suppressions found for clippy lints denied by workspace policy.");
    Ok(())
}

fn find_denied_clippy_suppressions(
    source: &str,
    lint_attr_re: &Regex,
    clippy_lint_re: &Regex,
) -> Result<Vec<ClippySuppressionHit>> {
    let mut hits = Vec::new();
    for captures in lint_attr_re.captures_iter(source) {
        let kind = captures
            .get(1)
            .ok_or_else(|| eyre!("capture group 1 missing in lint attribute match"))?
            .as_str();
        let args = captures
            .get(2)
            .ok_or_else(|| eyre!("capture group 2 missing in lint attribute match"))?;

        for lint_match in clippy_lint_re.find_iter(args.as_str()) {
            let lint = lint_match.as_str();
            if !is_denied_clippy_suppression(lint) {
                continue;
            }
            let byte_index = args.start() + lint_match.start();
            let line = source[..byte_index].bytes().filter(|byte| *byte == b'\n').count() + 1;
            hits.push(ClippySuppressionHit {
                kind: kind.to_string(),
                lint: lint.to_string(),
                line,
            });
        }
    }
    Ok(hits)
}

fn is_denied_clippy_suppression(lint: &str) -> bool {
    if SUPPRESSION_DENYLIST_CLIPPY_LINTS.contains(&lint) {
        return true;
    }
    lint.strip_prefix("clippy::")
        .is_some_and(|group| SUPPRESSION_DENYLIST_CLIPPY_GROUPS.contains(&group))
}

/// Counts lines that are neither blank nor inside a comment.
fn count_code_lines(path: &Path) -> AnyhowResult<usize> {
    let content = fs::read_to_string(path)?;
    let mut in_block_comment = false;
    let mut count = 0;
    for line in content.lines().map(str::trim) {
        if in_block_comment {
            in_block_comment = !line.contains("*/");
            continue;
        }
        if line.is_empty() || line.starts_with("//") {
            continue;
        }
        if line.starts_with("/*") {
            in_block_comment = !line.contains("*/");
            continue;
        }
        count += 1;
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_code_lines_skips_comments_and_blanks() {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        let path = temp.path().join("test.rs");

        let code = r##"
            //! Module docs
            fn main() {
                // This is a comment
                let x = 1;
                /* a block
                   spanning lines */
                let s = "This is a string // with a comment inside";
            }
        "##;
        fs::write(&path, code).expect("Failed to write test file");

        assert_eq!(count_code_lines(&path).expect("Should count lines"), 4);
    }

    #[test]
    fn test_find_nondeterminism_flags_hash_collections_and_clocks() -> Result<()> {
        let patterns = nondeterminism_patterns()?;
        let source = "use std::collections::HashMap;\n\
                      // HashSet is fine in a comment\n\
                      let seen: BTreeSet<Pos> = BTreeSet::new();\n\
                      let now = Instant::now();\n";
        let hits = find_nondeterminism(source, &patterns);
        let lines: Vec<usize> = hits.iter().map(|hit| hit.line).collect();
        assert_eq!(lines, vec![1, 4]);
        Ok(())
    }

    #[test]
    fn test_rust_files_walks_nested_dirs_and_skips_target() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let root = temp.path();
        fs::create_dir_all(root.join("crates/core/src/world"))?;
        fs::create_dir_all(root.join("crates/target"))?;
        fs::write(root.join("crates/core/src/world/fog.rs"), "")?;
        fs::write(root.join("crates/core/Cargo.toml"), "")?;
        fs::write(root.join("crates/target/build.rs"), "")?;

        let files = rust_files(root, &["crates"])?;
        assert_eq!(files.into_iter().collect::<Vec<_>>(), vec!["crates/core/src/world/fog.rs"]);
        Ok(())
    }

    #[test]
    fn test_find_denied_clippy_suppressions_detects_direct_and_group_lints() -> Result<()> {
        let lint_attr_re = Regex::new(LINT_ATTRIBUTE_PATTERN)?;
        let clippy_lint_re = Regex::new(CLIPPY_LINT_TOKEN_PATTERN)?;

        let source = format!(
            r#"
            #[allow(clippy::{})]
            fn heavy() {{}}

            #[expect(clippy::{}, clippy::all)]
            fn complex() {{}}
        "#,
            "cognitive_complexity", "too_many_lines"
        );
        let hits = find_denied_clippy_suppressions(&source, &lint_attr_re, &clippy_lint_re)?;
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].lint, "clippy::cognitive_complexity");
        assert_eq!(hits[1].lint, "clippy::too_many_lines");
        Ok(())
    }
}
