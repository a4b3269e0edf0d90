use crate::errors::AppResult;
use crate::store::fs_utils::ensure_writable;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::ZipWriter;
use zip::write::FileOptions;

pub struct BackupLogic;

impl BackupLogic {
    /// Copy the timesheet and its history next to `dest_file`, or bundle
    /// both into one zip when `compress` is set. Returns the main file
    /// written.
    pub fn backup(
        snapshot: &Path,
        history: &Path,
        dest_file: &Path,
        compress: bool,
        force: bool,
    ) -> AppResult<PathBuf> {
        // 1️⃣ Check timesheet exists
        if !snapshot.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("Timesheet not found: {}", snapshot.display()),
            )
            .into());
        }

        // 2️⃣ Ensure destination folder exists
        if let Some(parent) = dest_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        // 3️⃣ Zip or plain copies
        let final_path = if compress {
            let zip_path = dest_file.with_extension("zip");
            ensure_writable(&zip_path, force)?;
            compress_backup(&zip_path, &[snapshot, history])?;
            zip_path
        } else {
            ensure_writable(dest_file, force)?;
            fs::copy(snapshot, dest_file)?;

            if history.exists() {
                let history_dest = history_sibling(dest_file);
                ensure_writable(&history_dest, force)?;
                fs::copy(history, &history_dest)?;
            }
            dest_file.to_path_buf()
        };

        info!(dest = %final_path.display(), compress, "backup created");
        Ok(final_path)
    }
}

/// `backup.json` → `backup.history.json`
pub fn history_sibling(dest: &Path) -> PathBuf {
    let stem = dest
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "timesheet".to_string());
    let ext = dest
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_else(|| "json".to_string());
    dest.with_file_name(format!("{stem}.history.{ext}"))
}

/// Write every existing file of `sources` into one deflated zip.
fn compress_backup(zip_path: &Path, sources: &[&Path]) -> AppResult<()> {
    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    for src in sources.iter().filter(|p| p.exists()) {
        let name = src
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "timesheet.json".to_string());

        zip.start_file(name, options)
            .map_err(std::io::Error::other)?;

        let mut f = fs::File::open(src)?;
        std::io::copy(&mut f, &mut zip)?;
    }

    zip.finish().map_err(std::io::Error::other)?;
    Ok(())
}
