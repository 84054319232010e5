//! Backend build driver.
//!
//! Hands the staged tree to a packaging backend, then checks for the
//! archive on disk itself instead of trusting the backend's exit status.

pub mod deb;

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::{PackagingError, Result};
use crate::stage::StagedTree;

pub use deb::DpkgDeb;

/// An external program that turns a staged tree into an archive.
pub trait PackageBackend {
    /// Program name or path, for diagnostics and dependency checks.
    fn program(&self) -> &str;

    /// Archive file extension, without the dot.
    fn extension(&self) -> &str;

    /// Build `<tree>.<extension>` from `tree`.
    fn build(&self, tree: &Path) -> Result<()>;

    /// Descriptive metadata of a built archive.
    fn info(&self, archive: &Path) -> Result<String>;

    /// Command the operator runs to install `archive`.
    fn install_command(&self, archive: &Path) -> String;

    /// Command the operator runs to remove `package`.
    fn remove_command(&self, package: &str) -> String;
}

/// The built archive.
#[derive(Debug, Clone)]
pub struct BuildArtifact {
    pub path: PathBuf,
    pub size: u64,
    pub sha256: String,
    /// Backend metadata dump (`dpkg-deb --info`).
    pub info: String,
}

impl BuildArtifact {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Where `backend` writes the archive for `tree`.
pub fn archive_path(backend: &dyn PackageBackend, tree: &StagedTree) -> PathBuf {
    let mut name = tree.root().as_os_str().to_owned();
    name.push(".");
    name.push(backend.extension());
    PathBuf::from(name)
}

/// Build the archive for `tree` and verify it.
pub fn build(backend: &dyn PackageBackend, tree: &StagedTree) -> Result<BuildArtifact> {
    let archive = archive_path(backend, tree);

    // A leftover archive would satisfy the existence check below.
    if archive.exists() {
        fs::remove_file(&archive).map_err(|e| PackagingError::BackendInvocationFailure {
            reason: format!("cannot remove previous {}: {}", archive.display(), e),
        })?;
    }

    println!("Building {} with {}...", file_name(&archive), backend.program());
    backend.build(tree.root())?;

    if !archive.is_file() {
        return Err(PackagingError::ArtifactNotProduced { path: archive });
    }

    let info = backend.info(&archive)?;
    println!("\n{}", info.trim_end());
    check_info(tree, &info);

    let size = fs::metadata(&archive)
        .map_err(|_| PackagingError::ArtifactNotProduced {
            path: archive.clone(),
        })?
        .len();
    let sha256 = sha256_file(&archive).map_err(|e| PackagingError::BackendInvocationFailure {
        reason: format!("cannot read {}: {}", archive.display(), e),
    })?;

    let package = deb::parse_info(&info)
        .map(|d| d.name)
        .unwrap_or_else(|| crate::descriptor::PACKAGE_NAME.to_string());
    println!("\nNext steps:");
    println!("  Install: {}", backend.install_command(&archive));
    println!("  Remove:  {}", backend.remove_command(&package));

    Ok(BuildArtifact {
        path: archive,
        size,
        sha256,
        info,
    })
}

/// Warn when the archive metadata disagrees with the staged control record.
fn check_info(tree: &StagedTree, info: &str) {
    let staged = fs::read_to_string(tree.control_path())
        .ok()
        .and_then(|text| crate::descriptor::parse_control(&text));
    let reported = deb::parse_info(info);
    match (staged, reported) {
        (Some(staged), Some(reported)) if staged != reported => {
            eprintln!(
                "[WARN] archive reports {} {} but the staged control record says {} {}",
                reported.name, reported.version, staged.name, staged.version
            );
        }
        (_, None) => tracing::debug!("backend info output has no control fields"),
        _ => {}
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Hex SHA-256 of a file.
pub fn sha256_file(path: &Path) -> io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}
