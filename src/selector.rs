use crate::{
    config::Config,
    error::{Error, Result},
    file::{is_likely_binary, read_lossy, FileRecord},
    filter::{normalize_path, SelectionRules, Verdict},
};
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};
use walkdir::WalkDir;

/// Statistics collected during the walk.
#[derive(Debug, Default, Clone)]
pub(crate) struct WalkStats {
    /// Candidate files visited
    pub candidates: usize,

    /// Files dropped by always-exclude rules
    pub always_excluded: usize,

    /// Files dropped by the inclusion test
    pub not_included: usize,

    /// Files dropped by user exclude globs
    pub user_excluded: usize,

    /// Files dropped by the binary heuristic
    pub binary_files: usize,

    /// Non-fatal read errors
    pub errors: usize,
}

/// Walks the root directory and applies the selection rules.
pub(crate) struct Selector {
    root_dir: PathBuf,
    rules: SelectionRules,
}

impl Selector {
    /// Creates a selector from configuration, compiling the glob rules.
    ///
    /// # Errors
    ///
    /// Returns an error if an include or exclude pattern is invalid.
    pub(crate) fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            root_dir: config.root_dir.clone(),
            rules: SelectionRules::new(&config.include, &config.exclude)?,
        })
    }

    /// Selects all files under the root, in lexicographic relative-path
    /// order.
    ///
    /// The walk is sequential and sorted, so repeated calls over the same
    /// tree and rules yield an identical record list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] if the final selection is empty.
    pub(crate) fn select(&self) -> Result<Vec<FileRecord>> {
        let mut records = Vec::new();
        let mut stats = WalkStats::default();

        debug!("Scanning directory: {}", self.root_dir.display());

        let walker = WalkDir::new(&self.root_dir)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Walk error: {}", e);
                    stats.errors += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            stats.candidates += 1;

            match self.process_entry(entry.path(), &mut stats) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    stats.errors += 1;
                }
            }
        }

        debug!(
            "Walk complete: {} candidates, {} selected, {} always-excluded, \
             {} not included, {} user-excluded, {} binary, {} errors",
            stats.candidates,
            records.len(),
            stats.always_excluded,
            stats.not_included,
            stats.user_excluded,
            stats.binary_files,
            stats.errors
        );

        self.warn_unmatched_patterns(&records);

        if records.is_empty() {
            return Err(Error::empty_selection(&self.root_dir));
        }

        // Sorted walk order already approximates this, but the contract is
        // lexicographic relative-path order.
        records.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));

        debug!("Selected {} files", records.len());
        Ok(records)
    }

    /// Runs one candidate through the rule pipeline and reads it on accept.
    fn process_entry(&self, path: &Path, stats: &mut WalkStats) -> Result<Option<FileRecord>> {
        let relative = pathdiff::diff_paths(path, &self.root_dir)
            .unwrap_or_else(|| path.to_path_buf());
        let relative = normalize_path(&relative);

        let size = path
            .metadata()
            .map_err(|e| Error::io(path, e))?
            .len();

        match self.rules.evaluate(&relative, size) {
            Verdict::AlwaysExcluded => {
                trace!("Always-excluded: {}", relative);
                stats.always_excluded += 1;
                return Ok(None);
            }
            Verdict::NotIncluded => {
                trace!("Not included: {}", relative);
                stats.not_included += 1;
                return Ok(None);
            }
            Verdict::UserExcluded => {
                trace!("User-excluded: {}", relative);
                stats.user_excluded += 1;
                return Ok(None);
            }
            Verdict::Accept => {}
        }

        // Content sniffing is the last always-exclude rule; it needs IO, so
        // it only runs for candidates the path rules accepted.
        if is_likely_binary(path)? {
            trace!("Binary content: {}", relative);
            stats.binary_files += 1;
            return Ok(None);
        }

        let content = read_lossy(path)?;
        Ok(Some(FileRecord::new(relative, content)))
    }

    /// Warns for whitelist patterns that matched nothing. Zero matches for a
    /// pattern is not an error; only an empty aggregate selection is.
    fn warn_unmatched_patterns(&self, records: &[FileRecord]) {
        if !self.rules.has_whitelist() {
            return;
        }

        for matcher in self.rules.include_matchers() {
            let matched = records.iter().any(|r| {
                matcher.is_match(&r.relative_path)
                    || matcher.is_match(r.relative_path.rsplit('/').next().unwrap_or_default())
            });

            if !matched {
                warn!("Include pattern '{}' matched no files", matcher.glob().glob());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn build_config(root: &Path, include: &[&str], exclude: &[&str]) -> Config {
        Config::builder()
            .root_dir(root)
            .doc_path(root.join("doc.md"))
            .include(include.iter().map(|s| (*s).to_string()).collect())
            .exclude(exclude.iter().map(|s| (*s).to_string()).collect())
            .dry_run(true)
            .build()
            .unwrap()
    }

    fn select(root: &Path, include: &[&str], exclude: &[&str]) -> Result<Vec<FileRecord>> {
        let config = build_config(root, include, exclude);
        Selector::new(&config).unwrap().select()
    }

    fn write_example_tree(temp: &assert_fs::TempDir) {
        temp.child("a.py").write_str(&"x\n".repeat(25)).unwrap();
        temp.child("b.test.py").write_str(&"y\n".repeat(20)).unwrap();
        temp.child("node_modules/x.js")
            .write_str(&"z\n".repeat(15))
            .unwrap();
        temp.child(".env").write_str("SECRET=1\n").unwrap();
    }

    #[test]
    fn test_default_selection_scenario() {
        let temp = assert_fs::TempDir::new().unwrap();
        write_example_tree(&temp);

        let records = select(temp.path(), &[], &[]).unwrap();
        let paths: Vec<&str> = records.iter().map(|r| r.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["a.py", "b.test.py"]);
    }

    #[test]
    fn test_include_exclude_scenario() {
        let temp = assert_fs::TempDir::new().unwrap();
        write_example_tree(&temp);

        let records = select(temp.path(), &["*.py"], &["*.test.*"]).unwrap();
        let paths: Vec<&str> = records.iter().map(|r| r.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["a.py"]);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("src/z.py").write_str("z = 1\n").unwrap();
        temp.child("src/a.py").write_str("a = 1\n").unwrap();
        temp.child("README.md").write_str("# readme\n").unwrap();
        temp.child("Dockerfile").write_str("FROM scratch\n").unwrap();

        let first = select(temp.path(), &[], &[]).unwrap();
        let second = select(temp.path(), &[], &[]).unwrap();

        let first_paths: Vec<_> = first.iter().map(|r| r.relative_path.clone()).collect();
        let second_paths: Vec<_> = second.iter().map(|r| r.relative_path.clone()).collect();

        assert_eq!(first_paths, second_paths);
        assert_eq!(
            first_paths,
            vec!["Dockerfile", "README.md", "src/a.py", "src/z.py"]
        );
    }

    #[test]
    fn test_whitelist_cannot_resurrect_excluded_dirs() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("node_modules/lib.js").write_str("x\n").unwrap();
        temp.child("app.js").write_str("y\n").unwrap();

        let records = select(temp.path(), &["**/*.js"], &[]).unwrap();
        let paths: Vec<&str> = records.iter().map(|r| r.relative_path.as_str()).collect();

        assert_eq!(paths, vec!["app.js"]);
    }

    #[test]
    fn test_whitelist_matching_nothing_is_empty_selection() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("main.py").write_str("pass\n").unwrap();

        let result = select(temp.path(), &["*.zig"], &[]);
        assert!(matches!(result, Err(Error::Selection { .. })));
    }

    #[test]
    fn test_unknown_extension_excluded_without_whitelist() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("main.py").write_str("pass\n").unwrap();
        temp.child("image.xyz").write_str("data\n").unwrap();

        let records = select(temp.path(), &[], &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relative_path, "main.py");
    }

    #[test]
    fn test_oversized_file_excluded() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("small.py").write_str("ok\n").unwrap();
        temp.child("huge.py")
            .write_str(&"a".repeat(crate::filter::MAX_FILE_SIZE as usize + 1))
            .unwrap();

        let records = select(temp.path(), &[], &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relative_path, "small.py");
    }

    #[test]
    fn test_binary_file_excluded() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("text.py").write_str("ok\n").unwrap();
        temp.child("blob.py").write_binary(&[0u8; 64]).unwrap();

        let records = select(temp.path(), &[], &[]).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].relative_path, "text.py");
    }

    #[test]
    fn test_empty_directory_is_selection_error() {
        let temp = assert_fs::TempDir::new().unwrap();
        let result = select(temp.path(), &[], &[]);
        assert!(matches!(result, Err(Error::Selection { .. })));
    }

    #[test]
    fn test_nested_paths_use_forward_slashes() {
        let temp = assert_fs::TempDir::new().unwrap();
        temp.child("pkg/sub/mod.py").write_str("pass\n").unwrap();

        let records = select(temp.path(), &[], &[]).unwrap();
        assert_eq!(records[0].relative_path, "pkg/sub/mod.py");
    }
}
