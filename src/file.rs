use crate::error::{Error, Result};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Represents a selected file with its content and metadata.
///
/// Records are created during the directory walk and discarded once the
/// prompt has been assembled. The `relative_path` always uses forward-slash
/// separators so that glob matching and ordering are identical on every host.
#[derive(Debug, Clone)]
pub struct FileRecord {
    /// Path relative to the scan root, forward-slash separated
    pub relative_path: String,

    /// File content, read lossily (undecodable sequences replaced)
    pub content: String,

    /// Size of the content in bytes
    pub size: u64,

    /// Number of non-blank lines
    pub lines: usize,
}

impl FileRecord {
    /// Creates a record from a relative path and content.
    #[must_use]
    pub fn new(relative_path: String, content: String) -> Self {
        let size = content.len() as u64;
        let lines = count_code_lines(&content);
        Self {
            relative_path,
            content,
            size,
            lines,
        }
    }
}

/// Counts non-blank lines, the LOC metric reported by the statistics step.
#[must_use]
pub(crate) fn count_code_lines(content: &str) -> usize {
    content.lines().filter(|line| !line.trim().is_empty()).count()
}

/// Reads a file as text, replacing undecodable byte sequences instead of
/// failing the whole run.
pub(crate) fn read_lossy(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Determines if a file is likely binary by analyzing its content.
///
/// # Algorithm
///
/// 1. Reads the first 8KB of the file
/// 2. Checks for null bytes (binary indicator)
/// 3. Calculates the ratio of ASCII characters
/// 4. Files with null bytes or low ASCII ratio are considered binary
///
/// The heuristic is deterministic: the same file always classifies the same
/// way.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub(crate) fn is_likely_binary(path: &Path) -> Result<bool> {
    const BUFFER_SIZE: usize = 8192;
    const ASCII_THRESHOLD: f64 = 0.85;

    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let mut reader = BufReader::with_capacity(BUFFER_SIZE, file);
    let mut buffer = [0u8; BUFFER_SIZE];

    let bytes_read = reader.read(&mut buffer).map_err(|e| Error::io(path, e))?;

    if bytes_read == 0 {
        return Ok(false);
    }

    let sample = &buffer[..bytes_read];

    if memchr::memchr(0, sample).is_some() {
        return Ok(true);
    }

    let ascii_count = sample.iter().filter(|&&b| b < 128).count();
    let ascii_ratio = ascii_count as f64 / bytes_read as f64;

    Ok(ascii_ratio < ASCII_THRESHOLD)
}
