//! Atomic file replacement inside a capability directory.
//!
//! Contents go to a hidden temporary file in the same directory, are synced
//! and then renamed over the target, so readers see either the old or the
//! new document and never a truncated one.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use camino::{Utf8Component, Utf8Path};
use cap_std::fs::{Dir, OpenOptions};

use crate::domain::ports::DocumentStoreError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Reduce `file` to a single plain file name.
pub(super) fn plain_file_name(file: &str) -> Result<&str, DocumentStoreError> {
    let mut components = Utf8Path::new(file).components();
    match (components.next(), components.next()) {
        (Some(Utf8Component::Normal(name)), None) => Ok(name),
        _ => Err(DocumentStoreError::invalid_name(file)),
    }
}

/// Replace `file` in `dir` with `contents`.
///
/// # Errors
///
/// Returns [`DocumentStoreError::InvalidName`] for anything but a plain file
/// name and [`DocumentStoreError::Io`] when writing, syncing or renaming
/// fails. The previous contents are left in place on failure.
pub(super) fn write_atomic(dir: &Dir, file: &str, contents: &[u8]) -> Result<(), DocumentStoreError> {
    let file_name = plain_file_name(file)?;
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let tmp_name = format!(
        ".{}.tmp.{}.{}.{}",
        file_name,
        std::process::id(),
        suffix,
        counter
    );

    write_to_temp_file(dir, &tmp_name, contents)
        .map_err(|err| DocumentStoreError::io(&tmp_name, err.to_string()))?;
    if let Err(err) = rename_temp_to_target(dir, &tmp_name, file_name) {
        drop(dir.remove_file(&tmp_name));
        return Err(DocumentStoreError::io(file_name, err.to_string()));
    }
    sync_directory(dir);
    Ok(())
}

fn write_to_temp_file(dir: &Dir, tmp_name: &str, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    let mut file = dir.open_with(tmp_name, &options)?;
    let written = file.write_all(contents).and_then(|()| file.sync_all());
    if written.is_err() {
        drop(file);
        drop(dir.remove_file(tmp_name));
    }
    written
}

// `rename` replaces an existing target in one step on every platform;
// Windows goes through `MoveFileExW` with `MOVEFILE_REPLACE_EXISTING`.
fn rename_temp_to_target(dir: &Dir, tmp_name: &str, target_name: &str) -> io::Result<()> {
    dir.rename(tmp_name, dir, target_name)
}

fn sync_directory(dir: &Dir) {
    // Best effort; the rename is already visible.
    if dir.open(".").and_then(|handle| handle.sync_all()).is_err() {
        tracing::debug!("directory sync after rename failed");
    }
}
