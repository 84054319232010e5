//! Input artifact validation.

use std::path::{Path, PathBuf};

use crate::error::{PackagingError, Result};
use crate::manifest::FileManifestEntry;

/// Check that every manifest source exists under `base_dir`.
///
/// Collects all missing paths before failing so the operator sees the
/// complete list in one run. Silent on success.
pub fn verify(base_dir: &Path, manifest: &[FileManifestEntry]) -> Result<()> {
    let missing: Vec<PathBuf> = manifest
        .iter()
        .filter(|entry| !base_dir.join(&entry.source).exists())
        .map(|entry| entry.source.clone())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }

    eprintln!("Missing source files in {}:", base_dir.display());
    for path in &missing {
        eprintln!("  ✗ {}", path.display());
    }
    Err(PackagingError::MissingSourceFile { paths: missing })
}
