//! Package tree builder.
//!
//! Lays out `<name>_<version>_<arch>/` in the working directory:
//!
//! ```text
//! opennic-up_<version>_amd64/
//! ├── DEBIAN/
//! │   ├── control
//! │   ├── postinst
//! │   ├── prerm
//! │   └── postrm
//! ├── usr/bin/opennic-up
//! ├── etc/opennic-up/opennic-up.conf
//! └── lib/systemd/system/
//!     ├── opennic-up.service
//!     └── opennic-up.timer
//! ```
//!
//! An existing tree of the same name is written over in place. It is never
//! removed first, so files added to it by hand survive into the next build.

pub mod hooks;

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::common::{copy_file_mode, ensure_dir, set_mode, write_file_mode};
use crate::descriptor::PackageDescriptor;
use crate::error::{PackagingError, Result};
use crate::manifest::FileManifestEntry;

use hooks::Hook;

/// Name of the metadata directory inside the tree.
pub const METADATA_DIR: &str = "DEBIAN";

/// Mode of the metadata directory (dpkg-deb rejects group/world-writable).
const METADATA_DIR_MODE: u32 = 0o755;

/// Mode of the control record.
const CONTROL_MODE: u32 = 0o644;

/// Mode of the maintainer scripts.
const HOOK_MODE: u32 = 0o755;

/// A populated staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedTree {
    root: PathBuf,
}

impl StagedTree {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn metadata_dir(&self) -> PathBuf {
        self.root.join(METADATA_DIR)
    }

    pub fn control_path(&self) -> PathBuf {
        self.metadata_dir().join("control")
    }

    /// Every regular file in the tree, relative to the root, sorted.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(&self.root).to_path_buf();
                PackagingError::StagingFailure {
                    action: "walk",
                    path,
                    source: e.into(),
                }
            })?;
            if entry.file_type().is_file() {
                if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                    files.push(rel.to_path_buf());
                }
            }
        }
        Ok(files)
    }
}

/// Build the staged tree for `descriptor` under `base_dir`.
pub fn stage(
    base_dir: &Path,
    descriptor: &PackageDescriptor,
    manifest: &[FileManifestEntry],
) -> Result<StagedTree> {
    let tree = StagedTree {
        root: base_dir.join(descriptor.tree_name()),
    };
    println!("Staging {}/", descriptor.tree_name());

    // Directories
    let metadata_dir = tree.metadata_dir();
    ensure_dir(&metadata_dir)?;
    set_mode(&metadata_dir, METADATA_DIR_MODE)?;
    for entry in manifest {
        if let Some(parent) = entry.destination.parent() {
            ensure_dir(&tree.root.join(parent))?;
        }
    }

    // Payload
    for entry in manifest {
        let dst = tree.root.join(&entry.destination);
        copy_file_mode(&base_dir.join(&entry.source), &dst, entry.mode)?;
        println!(
            "  {} -> /{} ({:o})",
            entry.source.display(),
            entry.destination.display(),
            entry.mode
        );
    }

    // Metadata
    write_file_mode(&tree.control_path(), descriptor.control_record(), CONTROL_MODE)?;
    println!("  {}/control", METADATA_DIR);

    for hook in Hook::ALL {
        let path = metadata_dir.join(hook.file_name());
        write_file_mode(&path, hook.render(&descriptor.name), HOOK_MODE)?;
        println!("  {}/{}", METADATA_DIR, hook.file_name());
    }

    tracing::debug!(root = %tree.root.display(), "tree staged");
    Ok(tree)
}
