//! File selection rules.
//!
//! Implements the ordered rule pipeline applied to every walk candidate:
//! fixed always-exclude rules first, then whitelist-or-extension inclusion,
//! then user exclude globs. Later rules can never resurrect a file an earlier
//! rule dropped.

use crate::error::{Error, Result};
use globset::{Glob, GlobMatcher, GlobSet, GlobSetBuilder};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use std::path::Path;

/// Lock files that are never included, regardless of configuration.
static LOCK_FILES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "yarn.lock",
        "package-lock.json",
        "poetry.lock",
        "Pipfile.lock",
        "composer.lock",
        "Gemfile.lock",
        "go.sum",
        "Cargo.lock",
    ]
    .into_iter()
    .collect()
});

/// Directory names skipped anywhere in the path.
static SKIP_DIRS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        ".git",
        ".svn",
        ".hg",
        "__pycache__",
        "node_modules",
        ".venv",
        "venv",
        "env",
        "build",
        "dist",
        "target",
        "migrations",
        "migration",
        "db_migrations",
    ]
    .into_iter()
    .collect()
});

/// Extensions included by default when no whitelist is configured, grouped
/// the way the documented ecosystems group them.
static ALLOWED_EXTENSIONS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // TypeScript/JavaScript
        "ts", "tsx", "js", "jsx", "mjs", "cjs",
        // .NET
        "cs", "fs", "vb", "csproj", "fsproj", "vbproj", "sln",
        // JVM
        "java", "kt", "kts",
        // Scripting
        "py", "rb", "php", "sh", "bash", "rs", "go",
        // Configuration & data
        "json", "yaml", "yml", "toml", "xml", "config",
        // Documentation & text
        "md", "txt", "rst", "adoc",
        // Web & styling
        "html", "css", "scss", "sass", "less",
        // Data/query
        "sql", "graphql", "gql",
    ]
    .into_iter()
    .collect()
});

/// Extensionless build files included by basename when no whitelist is set.
static BUILD_FILE_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "Dockerfile",
        "Makefile",
        "Jenkinsfile",
        "Justfile",
        "Rakefile",
        "Gemfile",
        "Procfile",
        "Vagrantfile",
    ]
    .into_iter()
    .collect()
});

/// Byte-size ceiling above which files are always excluded (1 MiB).
pub(crate) const MAX_FILE_SIZE: u64 = 1024 * 1024;

/// Outcome of running a candidate through the rule pipeline.
///
/// The binary-content check is not part of this verdict: it needs file IO and
/// is applied by the selector after the path-level rules pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Verdict {
    /// Candidate survives the path-level rules
    Accept,
    /// Candidate dropped by a fixed always-exclude rule
    AlwaysExcluded,
    /// Candidate failed the whitelist/extension inclusion test
    NotIncluded,
    /// Candidate matched a user exclude glob
    UserExcluded,
}

/// Compiled selection rules.
///
/// Constructed once from command-line input; immutable afterwards. Matching
/// operates on the forward-slash relative path, so results do not depend on
/// host path conventions.
#[derive(Debug, Clone)]
pub struct SelectionRules {
    include: Option<GlobSet>,
    include_matchers: Vec<GlobMatcher>,
    exclude: GlobSet,
}

impl SelectionRules {
    /// Compiles rules from user-supplied include and exclude glob patterns.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] if any glob fails to compile.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        // Each whitelist pattern is compiled once, both into the aggregate
        // set used for matching and as a standalone matcher for the
        // zero-match warning.
        let include_matchers: Vec<GlobMatcher> = include
            .iter()
            .map(|pattern| {
                Glob::new(pattern)
                    .map(|g| g.compile_matcher())
                    .map_err(|e| Error::invalid_pattern(pattern, e.to_string()))
            })
            .collect::<Result<_>>()?;

        let include_set = if include.is_empty() {
            None
        } else {
            Some(build_globset(include)?)
        };

        Ok(Self {
            include: include_set,
            include_matchers,
            exclude: build_globset(exclude)?,
        })
    }

    /// Returns true if a whitelist is configured.
    #[must_use]
    pub fn has_whitelist(&self) -> bool {
        self.include.is_some()
    }

    /// Per-pattern matchers for the whitelist, compiled alongside the
    /// aggregate set, for zero-match warnings.
    #[must_use]
    pub(crate) fn include_matchers(&self) -> &[GlobMatcher] {
        &self.include_matchers
    }

    /// Runs the ordered path-level rules against a relative path.
    ///
    /// `size` is the on-disk byte size, checked against the fixed ceiling as
    /// part of the always-exclude step.
    pub(crate) fn evaluate(&self, relative_path: &str, size: u64) -> Verdict {
        // 1. Always-exclude: fixed rules, never overridden by the whitelist.
        if always_excluded(relative_path) || size > MAX_FILE_SIZE {
            return Verdict::AlwaysExcluded;
        }

        // 2. Inclusion: whitelist when present, extension allow-list otherwise.
        let file_name = basename(relative_path);
        if let Some(ref include) = self.include {
            if !include.is_match(relative_path) && !include.is_match(file_name) {
                return Verdict::NotIncluded;
            }
        } else if !default_included(relative_path) {
            return Verdict::NotIncluded;
        }

        // 3. User exclude globs.
        if self.exclude.is_match(relative_path) || self.exclude.is_match(file_name) {
            return Verdict::UserExcluded;
        }

        Verdict::Accept
    }
}

fn build_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();

    for pattern in patterns {
        let glob = Glob::new(pattern)
            .map_err(|e| Error::invalid_pattern(pattern, e.to_string()))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| Error::config(format!("Failed to build glob set: {}", e)))
}

fn basename(relative_path: &str) -> &str {
    relative_path.rsplit('/').next().unwrap_or(relative_path)
}

/// Fixed always-exclude rules on the relative path: lock files, skip
/// directories anywhere in the path, and hidden entries.
fn always_excluded(relative_path: &str) -> bool {
    let file_name = basename(relative_path);

    if LOCK_FILES.contains(file_name) {
        return true;
    }

    // Dotfiles and files under dot-directories, plus known build/dependency
    // directory names at any depth.
    for segment in relative_path.split('/') {
        if segment.starts_with('.') || SKIP_DIRS.contains(segment) {
            return true;
        }
    }

    false
}

/// Default inclusion test: extension allow-list, or the extensionless
/// build-file basename list.
fn default_included(relative_path: &str) -> bool {
    let file_name = basename(relative_path);
    let path = Path::new(file_name);

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => ALLOWED_EXTENSIONS.contains(ext.to_ascii_lowercase().as_str()),
        None => BUILD_FILE_NAMES.contains(file_name),
    }
}

/// Normalizes a host path to the forward-slash form rules match against.
#[must_use]
pub(crate) fn normalize_path(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn rules(include: &[&str], exclude: &[&str]) -> SelectionRules {
        let include: Vec<String> = include.iter().map(|s| (*s).to_string()).collect();
        let exclude: Vec<String> = exclude.iter().map(|s| (*s).to_string()).collect();
        SelectionRules::new(&include, &exclude).unwrap()
    }

    #[test]
    fn test_lock_files_always_excluded() {
        let r = rules(&[], &[]);
        assert_eq!(r.evaluate("Cargo.lock", 10), Verdict::AlwaysExcluded);
        assert_eq!(r.evaluate("web/yarn.lock", 10), Verdict::AlwaysExcluded);
    }

    #[test]
    fn test_skip_dirs_anywhere_in_path() {
        let r = rules(&[], &[]);
        assert_eq!(
            r.evaluate("node_modules/x.js", 10),
            Verdict::AlwaysExcluded
        );
        assert_eq!(
            r.evaluate("app/node_modules/lib/y.ts", 10),
            Verdict::AlwaysExcluded
        );
        assert_eq!(r.evaluate("target/debug/a.rs", 10), Verdict::AlwaysExcluded);
    }

    #[test]
    fn test_hidden_entries_excluded() {
        let r = rules(&[], &[]);
        assert_eq!(r.evaluate(".env", 10), Verdict::AlwaysExcluded);
        assert_eq!(r.evaluate(".github/ci.yml", 10), Verdict::AlwaysExcluded);
        assert_eq!(r.evaluate("src/.hidden.py", 10), Verdict::AlwaysExcluded);
    }

    #[test]
    fn test_size_ceiling() {
        let r = rules(&[], &[]);
        assert_eq!(r.evaluate("big.py", MAX_FILE_SIZE), Verdict::Accept);
        assert_eq!(
            r.evaluate("big.py", MAX_FILE_SIZE + 1),
            Verdict::AlwaysExcluded
        );
    }

    #[test]
    fn test_whitelist_never_overrides_always_exclude() {
        let r = rules(&["**/*.js"], &[]);
        assert_eq!(
            r.evaluate("node_modules/x.js", 10),
            Verdict::AlwaysExcluded
        );
    }

    #[test]
    fn test_whitelist_restricts_selection() {
        let r = rules(&["*.py"], &[]);
        assert_eq!(r.evaluate("a.py", 10), Verdict::Accept);
        assert_eq!(r.evaluate("readme.md", 10), Verdict::NotIncluded);
    }

    #[test]
    fn test_whitelist_matches_basename() {
        let r = rules(&["*.py"], &[]);
        assert_eq!(r.evaluate("pkg/deep/mod.py", 10), Verdict::Accept);
    }

    #[test]
    fn test_default_extension_inclusion() {
        let r = rules(&[], &[]);
        assert_eq!(r.evaluate("a.py", 10), Verdict::Accept);
        assert_eq!(r.evaluate("src/app.ts", 10), Verdict::Accept);
        assert_eq!(r.evaluate("img.xyz", 10), Verdict::NotIncluded);
    }

    #[test]
    fn test_extensionless_build_files() {
        let r = rules(&[], &[]);
        assert_eq!(r.evaluate("Dockerfile", 10), Verdict::Accept);
        assert_eq!(r.evaluate("sub/Makefile", 10), Verdict::Accept);
        assert_eq!(r.evaluate("LICENSE", 10), Verdict::NotIncluded);
    }

    #[test]
    fn test_user_exclude_applied_last() {
        let r = rules(&["*.py"], &["*.test.*"]);
        assert_eq!(r.evaluate("a.py", 10), Verdict::Accept);
        assert_eq!(r.evaluate("b.test.py", 10), Verdict::UserExcluded);
    }

    #[test]
    fn test_user_exclude_without_whitelist() {
        let r = rules(&[], &["docs/**"]);
        assert_eq!(r.evaluate("docs/guide.md", 10), Verdict::UserExcluded);
        assert_eq!(r.evaluate("src/guide.md", 10), Verdict::Accept);
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let result = SelectionRules::new(&["[bad".to_string()], &[]);
        assert!(result.is_err());
    }

    #[test]
    fn test_include_matchers_mirror_whitelist() {
        let r = rules(&["*.py", "docs/**"], &[]);
        let matchers = r.include_matchers();

        assert_eq!(matchers.len(), 2);
        assert_eq!(matchers[0].glob().glob(), "*.py");
        assert!(matchers[0].is_match("mod.py"));
        assert!(matchers[1].is_match("docs/guide.md"));

        let r = rules(&[], &[]);
        assert!(r.include_matchers().is_empty());
    }

    #[test]
    fn test_normalize_path() {
        let path = PathBuf::from("a").join("b").join("c.py");
        assert_eq!(normalize_path(&path), "a/b/c.py");
    }

    #[test]
    fn test_extension_case_insensitive() {
        let r = rules(&[], &[]);
        assert_eq!(r.evaluate("Program.CS", 10), Verdict::Accept);
    }
}
