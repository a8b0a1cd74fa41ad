use crate::file::FileRecord;
use crate::token::{SimpleTokenizer, TokenEstimator};
use serde::Serialize;

/// Per-file entry in the selection report.
#[derive(Debug, Clone, Serialize)]
pub struct FileStat {
    /// Relative path of the file
    pub path: String,

    /// Content size in bytes
    pub size: u64,

    /// Non-blank line count
    pub lines: usize,
}

/// Aggregate statistics over a selection.
///
/// The token figure is an approximation (roughly four bytes per token) and
/// is always reported as an estimate.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionStats {
    /// Number of selected files
    pub file_count: usize,

    /// Total content size in bytes
    pub total_bytes: u64,

    /// Total non-blank line count
    pub total_lines: usize,

    /// Estimated prompt tokens (approximate)
    pub estimated_tokens: usize,

    /// Per-file breakdown, in selection order
    pub files: Vec<FileStat>,
}

/// Number of entries shown in the verbose breakdown.
const VERBOSE_TOP_FILES: usize = 20;

/// Summarizes an ordered record list.
///
/// The per-file breakdown keeps the selection's path order, so the summary
/// is as deterministic as the selection itself.
#[must_use]
pub fn summarize(records: &[FileRecord]) -> SelectionStats {
    let tokenizer = SimpleTokenizer;

    let files: Vec<FileStat> = records
        .iter()
        .map(|r| FileStat {
            path: r.relative_path.clone(),
            size: r.size,
            lines: r.lines,
        })
        .collect();

    let total_bytes = records.iter().map(|r| r.size).sum();
    let total_lines = records.iter().map(|r| r.lines).sum();
    let estimated_tokens = records.iter().map(|r| tokenizer.estimate(&r.content)).sum();

    SelectionStats {
        file_count: records.len(),
        total_bytes,
        total_lines,
        estimated_tokens,
        files,
    }
}

impl SelectionStats {
    /// Prints the one-screen selection summary.
    pub fn print_summary(&self) {
        println!("Found {} files to analyze", self.file_count);
        println!("Total content size: {} bytes", self.total_bytes);
        println!("Total lines of code: {}", self.total_lines);
        println!("Estimated prompt tokens: ~{} (approximate)", self.estimated_tokens);
    }

    /// The per-file breakdown sorted by size descending. Ties keep
    /// selection order.
    #[must_use]
    pub fn files_by_size(&self) -> Vec<&FileStat> {
        let mut by_size: Vec<&FileStat> = self.files.iter().collect();
        by_size.sort_by(|a, b| b.size.cmp(&a.size));
        by_size
    }

    /// Lines of the full file preview, one per selected file in selection
    /// order. Never truncated; a dry run must show the whole selection.
    #[must_use]
    pub fn file_preview_lines(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| format!("  {:<50} {:>8} bytes  {:>6} LOC", f.path, f.size, f.lines))
            .collect()
    }

    /// Prints every selected file with its size and line count.
    pub fn print_file_list(&self) {
        println!("\nFiles to be processed:");
        for line in self.file_preview_lines() {
            println!("{line}");
        }
    }

    /// Prints the verbose per-file breakdown: largest files first, then a
    /// size distribution.
    pub fn print_verbose(&self) {
        println!("\nFile analysis (sorted by size):");
        for (i, file) in self.files_by_size().iter().take(VERBOSE_TOP_FILES).enumerate() {
            println!(
                "{:2}. {:<50} {:>8} bytes  {:>6} LOC",
                i + 1,
                file.path,
                file.size,
                file.lines
            );
        }
        if self.files.len() > VERBOSE_TOP_FILES {
            println!("    ... and {} more files", self.files.len() - VERBOSE_TOP_FILES);
        }

        let large: Vec<&FileStat> = self.files.iter().filter(|f| f.size > 10_000).collect();
        let medium: Vec<&FileStat> = self
            .files
            .iter()
            .filter(|f| (1_000..=10_000).contains(&f.size))
            .collect();
        let small: Vec<&FileStat> = self.files.iter().filter(|f| f.size < 1_000).collect();

        println!("\nSize distribution:");
        println!(
            "  Large files (>10K bytes):  {:3} files, {} bytes",
            large.len(),
            large.iter().map(|f| f.size).sum::<u64>()
        );
        println!(
            "  Medium files (1K-10K):     {:3} files, {} bytes",
            medium.len(),
            medium.iter().map(|f| f.size).sum::<u64>()
        );
        println!(
            "  Small files (<1K bytes):   {:3} files, {} bytes",
            small.len(),
            small.iter().map(|f| f.size).sum::<u64>()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(path: &str, content: &str) -> FileRecord {
        FileRecord::new(path.to_string(), content.to_string())
    }

    #[test]
    fn test_summarize_empty() {
        let stats = summarize(&[]);
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.total_bytes, 0);
        assert_eq!(stats.estimated_tokens, 0);
        assert!(stats.files.is_empty());
    }

    #[test]
    fn test_summarize_totals() {
        let records = vec![
            record("a.py", "aaaa\nbbbb\n"),
            record("b.py", "cc\n\ndd\n"),
        ];

        let stats = summarize(&records);
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_bytes, 17);
        assert_eq!(stats.total_lines, 4);
        assert!(stats.estimated_tokens > 0);
    }

    #[test]
    fn test_per_file_breakdown_keeps_selection_order() {
        let records = vec![
            record("small.py", "x\n"),
            record("large.py", &"y".repeat(500)),
            record("medium.py", &"z".repeat(50)),
        ];

        let stats = summarize(&records);
        let paths: Vec<&str> = stats.files.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["small.py", "large.py", "medium.py"]);
    }

    #[test]
    fn test_files_by_size_sorted_descending() {
        let records = vec![
            record("small.py", "x\n"),
            record("large.py", &"y".repeat(500)),
            record("medium.py", &"z".repeat(50)),
        ];

        let stats = summarize(&records);
        let paths: Vec<&str> = stats
            .files_by_size()
            .iter()
            .map(|f| f.path.as_str())
            .collect();
        assert_eq!(paths, vec!["large.py", "medium.py", "small.py"]);
    }

    #[test]
    fn test_file_preview_covers_every_file() {
        let records: Vec<FileRecord> = (0..25)
            .map(|i| record(&format!("src/mod_{i:02}.py"), "x = 1\n"))
            .collect();

        let stats = summarize(&records);
        let lines = stats.file_preview_lines();

        assert_eq!(lines.len(), 25);
        for (line, record) in lines.iter().zip(&records) {
            assert!(line.contains(&record.relative_path));
            assert!(line.contains("LOC"));
        }
    }

    #[test]
    fn test_token_estimate_tracks_bytes() {
        let records = vec![record("a.txt", &"a".repeat(4000))];

        let stats = summarize(&records);
        assert_eq!(stats.estimated_tokens, 1000); // 4000 chars / 4
    }
}
