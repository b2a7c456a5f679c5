//! Saving downloaded structure files.
//!
//! Contents go to `<name>.part` first and are renamed into place once synced,
//! so an interrupted run never leaves a truncated model that later runs
//! would pick up as a cached copy.

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
pub const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path.
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}

/// Writes `contents` to `final_path` via a synced temp file and rename.
/// Creates missing parent directories. The temp file is removed on failure.
pub fn save_atomic(final_path: &Path, contents: &[u8]) -> Result<()> {
    if let Some(parent) = final_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("create directory {}", parent.display()))?;
    }

    let tmp = temp_path(final_path);
    let written = write_synced(&tmp, contents).and_then(|()| {
        fs::rename(&tmp, final_path).with_context(|| {
            format!("rename {} -> {}", tmp.display(), final_path.display())
        })
    });
    if written.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    written
}

fn write_synced(path: &Path, contents: &[u8]) -> Result<()> {
    let mut f = File::create(path).with_context(|| format!("create {}", path.display()))?;
    f.write_all(contents)
        .with_context(|| format!("write {}", path.display()))?;
    f.sync_all()
        .with_context(|| format!("sync {}", path.display()))?;
    Ok(())
}

/// First existing file among `names` inside `dir`.
pub fn find_existing<'a, I>(dir: &Path, names: I) -> Option<PathBuf>
where
    I: IntoIterator<Item = &'a str>,
{
    names
        .into_iter()
        .map(|name| dir.join(name))
        .find(|p| p.is_file())
}
