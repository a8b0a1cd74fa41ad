//! Documentation output writing.

use crate::error::{Error, Result};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Writes the generated document to `path`, creating parent directories as
/// needed.
///
/// The content lands via a sibling temporary file renamed into place, so a
/// failed run never leaves a truncated document behind.
///
/// # Errors
///
/// Returns [`Error::Io`] if directories cannot be created or the file cannot
/// be written.
pub(crate) fn write_document(path: &Path, prefix: Option<&str>, body: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }
    }

    let content = match prefix {
        Some(prefix) => format!("{}{}", prefix, body),
        None => body.to_string(),
    };

    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, &content).map_err(|e| Error::io(&tmp_path, e))?;
    fs::rename(&tmp_path, path).map_err(|e| Error::io(path, e))?;

    debug!(path = %path.display(), bytes = content.len(), "Wrote document");
    Ok(())
}
