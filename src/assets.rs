//! Filesystem plumbing for the publish pipelines.
//!
//! - [`copy_asset`] duplicates a regular file byte for byte.
//! - [`create_output_dir`] creates mirrored directories with mode `0o770`.
//! - [`write_page`] writes rendered HTML with mode `0o666` (subject to umask).
//!
//! None of these are atomic: a failure part-way through may leave a partial
//! file behind.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CopyError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Source not found: {0}")]
    NotFound(PathBuf),
    #[error("{0} is not a regular file")]
    NotRegular(PathBuf),
    #[error("refusing to copy {0} onto itself")]
    SameFile(PathBuf),
}

/// Directory mode for everything created under the output root.
pub const DIR_MODE: u32 = 0o770;

/// File mode for rendered pages, before umask.
pub const PAGE_MODE: u32 = 0o666;

/// Copy `source` to `dest`, overwriting `dest`. Returns the number of bytes
/// copied.
///
/// The source is inspected without following symlinks, so a symlink is
/// rejected with [`CopyError::NotRegular`] just like a directory or device.
/// A `dest` that resolves to `source` is rejected with
/// [`CopyError::SameFile`] before anything is truncated.
pub fn copy_asset(source: &Path, dest: &Path) -> Result<u64, CopyError> {
    let meta = match fs::symlink_metadata(source) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CopyError::NotFound(source.to_path_buf()));
        }
        Err(e) => return Err(CopyError::Io(e)),
    };

    if !meta.file_type().is_file() {
        return Err(CopyError::NotRegular(source.to_path_buf()));
    }
    if is_same_file(source, dest)? {
        return Err(CopyError::SameFile(source.to_path_buf()));
    }

    let mut reader = File::open(source)?;
    let mut writer = File::create(dest)?;
    let bytes = io::copy(&mut reader, &mut writer)?;
    writer.flush()?;
    Ok(bytes)
}

/// Whether `a` and `b` resolve to the same existing file.
fn is_same_file(a: &Path, b: &Path) -> io::Result<bool> {
    match fs::canonicalize(b) {
        Ok(b) => Ok(fs::canonicalize(a)? == b),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Create `path` and all missing parents. Succeeds if it already exists.
pub fn create_output_dir(path: &Path) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder.create(path)
}

/// Create or truncate `path` and write `contents` to it.
pub fn write_page(path: &Path, contents: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(PAGE_MODE);
    }
    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.flush()
}
