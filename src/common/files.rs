//! File helpers for the staged tree. Every one of them applies the mode
//! explicitly instead of inheriting it from a source file or the umask.

use std::fs::{self, File};
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;

use crate::error::{PackagingError, Result};

/// Create a directory (and parents). Existing directories are fine.
pub fn ensure_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(PackagingError::staging("create directory", path))
}

/// Set Unix permission bits on `path`.
pub fn set_mode(path: &Path, mode: u32) -> Result<()> {
    fs::set_permissions(path, fs::Permissions::from_mode(mode))
        .map_err(PackagingError::staging("set permissions on", path))
}

/// Write a file with specific Unix permissions, creating parent directories as needed.
pub fn write_file_mode<C: AsRef<[u8]>>(path: &Path, content: C, mode: u32) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    fs::write(path, content).map_err(PackagingError::staging("write", path))?;
    set_mode(path, mode)
}

/// Copy `src` over `dst` and then force `mode` on the copy.
///
/// Errors name the side that failed: `src` when it cannot be read, `dst`
/// when it cannot be written.
pub fn copy_file_mode(src: &Path, dst: &Path, mode: u32) -> Result<()> {
    if let Some(parent) = dst.parent() {
        ensure_dir(parent)?;
    }
    let mut reader = File::open(src).map_err(PackagingError::staging("read", src))?;
    let mut writer = File::create(dst).map_err(PackagingError::staging("create", dst))?;
    io::copy(&mut reader, &mut writer).map_err(PackagingError::staging("copy to", dst))?;
    set_mode(dst, mode)
}
