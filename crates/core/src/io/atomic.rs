//! Write-new-then-rename file replacement

use std::fs::{self, File};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{Error, Result};

/// Replace `path` with whatever `write` produces.
///
/// The content goes to a temporary file in the destination directory, is
/// synced, then renamed over `path`. If `write` fails the temporary file is
/// removed and any existing file at `path` is untouched.
pub fn write_atomic<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut File) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}
