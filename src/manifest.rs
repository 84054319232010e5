//! File manifest: which input artifacts land where in the package.

use std::path::PathBuf;

use crate::descriptor::PACKAGE_NAME;

/// Mode for the daemon binary.
pub const EXEC_MODE: u32 = 0o755;

/// Mode for configuration and unit files.
pub const DATA_MODE: u32 = 0o644;

/// One file to stage: source (relative to the working directory),
/// destination (relative to the tree root) and the mode to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileManifestEntry {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub mode: u32,
}

impl FileManifestEntry {
    pub fn new(source: impl Into<PathBuf>, destination: impl Into<PathBuf>, mode: u32) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            mode,
        }
    }
}

/// The release manifest: binary, config, service unit, timer unit.
pub fn default_manifest() -> Vec<FileManifestEntry> {
    let name = PACKAGE_NAME;
    vec![
        FileManifestEntry::new(name, format!("usr/bin/{name}"), EXEC_MODE),
        FileManifestEntry::new(
            format!("{name}.conf"),
            format!("etc/{name}/{name}.conf"),
            DATA_MODE,
        ),
        FileManifestEntry::new(
            format!("{name}.service"),
            format!("lib/systemd/system/{name}.service"),
            DATA_MODE,
        ),
        FileManifestEntry::new(
            format!("{name}.timer"),
            format!("lib/systemd/system/{name}.timer"),
            DATA_MODE,
        ),
    ]
}
