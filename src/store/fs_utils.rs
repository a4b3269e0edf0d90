// src/store/fs_utils.rs

use crate::errors::{AppError, AppResult};
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::warn;

/// Write `content` to a uniquely named temp file in the target directory,
/// fsync it, then rename it over `path`. A crash leaves either the old or
/// the new file, never a torn one.
pub fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;

    // The temp file is removed on drop if the rename fails.
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Read a JSON document. Missing or unparsable files yield `None`; a
/// corrupt file is reported and then treated as absent.
pub fn read_json_soft(path: &Path) -> Option<Value> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read JSON document, treating as empty");
            return None;
        }
    };

    if content.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(&content) {
        Ok(v) => Some(v),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "corrupt JSON document, treating as empty");
            None
        }
    }
}

/// Check whether a file can be created or overwritten.
///
/// - file does not exist → Ok
/// - file exists and `force` → Ok
/// - file exists and not `force` → error, nothing is touched
pub(crate) fn ensure_writable(path: &Path, force: bool) -> AppResult<()> {
    if !path.exists() || force {
        return Ok(());
    }

    Err(AppError::from(io::Error::new(
        io::ErrorKind::AlreadyExists,
        format!(
            "the file '{}' already exists (use --force to overwrite)",
            path.display()
        ),
    )))
}
