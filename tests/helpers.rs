//! Shared test utilities for debstage tests.

#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use debstage::descriptor::PackageDescriptor;
use debstage::manifest::{default_manifest, FileManifestEntry};
use tempfile::TempDir;

/// Fake `dpkg-deb`: "builds" by copying the control record into the
/// archive, and prints it back indented for `--info`.
/// `FAKE_DPKG_NO_OUTPUT` makes `--build` succeed without writing anything.
pub const FAKE_DPKG_DEB: &str = r#"#!/bin/sh
case "$1" in
  --build)
    [ "$2" = "--root-owner-group" ] || { echo "missing --root-owner-group" >&2; exit 2; }
    [ -f "$3/DEBIAN/control" ] || { echo "no control file in $3" >&2; exit 2; }
    [ -n "$FAKE_DPKG_NO_OUTPUT" ] && exit 0
    cat "$3/DEBIAN/control" > "$3.deb"
    echo "dpkg-deb: building package 'opennic-up' in '$3.deb'."
    ;;
  --info)
    echo " new Debian package, version 2.0."
    sed 's/^/ /' "$2"
    ;;
  *)
    exit 2
    ;;
esac
"#;

/// Fake `systemctl`: logs its arguments to `$SYSTEMCTL_LOG` and exits 5
/// when they match the glob in `$SYSTEMCTL_FAIL`.
pub const FAKE_SYSTEMCTL: &str = r#"#!/bin/sh
echo "$*" >> "$SYSTEMCTL_LOG"
case "$*" in
  $SYSTEMCTL_FAIL) exit 5 ;;
esac
exit 0
"#;

/// Test environment: a working directory plus a directory of fake tools.
pub struct TestEnv {
    /// Temporary directory (kept alive for lifetime of TestEnv)
    pub _temp_dir: TempDir,
    /// Working directory the pipeline runs in
    pub base_dir: PathBuf,
    /// Directory prepended to PATH for child processes
    pub bin_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let base_dir = temp_dir.path().join("work");
        let bin_dir = temp_dir.path().join("bin");
        fs::create_dir_all(&base_dir).expect("Failed to create work dir");
        fs::create_dir_all(&bin_dir).expect("Failed to create bin dir");

        Self {
            _temp_dir: temp_dir,
            base_dir,
            bin_dir,
        }
    }

    /// Write all four release artifacts into the working directory.
    pub fn write_sources(&self) {
        for entry in default_manifest() {
            self.write_source(&entry);
        }
    }

    /// Write one release artifact with recognisable content.
    pub fn write_source(&self, entry: &FileManifestEntry) {
        let path = self.base_dir.join(&entry.source);
        fs::write(&path, format!("# {}\n", entry.source.display()))
            .expect("Failed to write source");
        // Deliberately unusual mode: staging must not copy it.
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .expect("Failed to set source mode");
    }

    /// Install an executable script into the fake bin directory.
    pub fn install_tool(&self, name: &str, script: &str) -> PathBuf {
        let path = self.bin_dir.join(name);
        fs::write(&path, script).expect("Failed to write fake tool");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod fake tool");
        path
    }

    /// PATH with the fake bin directory first.
    pub fn path_var(&self) -> String {
        let system = std::env::var("PATH").unwrap_or_else(|_| "/usr/bin:/bin".to_string());
        format!("{}:{}", self.bin_dir.display(), system)
    }

    pub fn tree_root(&self, descriptor: &PackageDescriptor) -> PathBuf {
        self.base_dir.join(descriptor.tree_name())
    }
}

/// The descriptor used throughout the end-to-end scenarios.
pub fn sample_descriptor() -> PackageDescriptor {
    PackageDescriptor {
        name: "opennic-up".into(),
        version: "dev-20251003-200505".into(),
        arch: "amd64".into(),
        maintainer: "kewlfft".into(),
        description: "OpenNIC auto DNS updater".into(),
    }
}

/// Permission bits of a file.
pub fn mode_of(path: &Path) -> u32 {
    fs::metadata(path)
        .unwrap_or_else(|e| panic!("Failed to stat {}: {}", path.display(), e))
        .permissions()
        .mode()
        & 0o7777
}

/// Assert that a file contains expected content.
pub fn assert_file_contains(path: &Path, expected: &str) {
    let content = fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read file {}: {}", path.display(), e));
    assert!(
        content.contains(expected),
        "File {} does not contain expected content.\nExpected to find: {}\nActual content: {}",
        path.display(),
        expected,
        content
    );
}

/// Assert that a file exists.
pub fn assert_file_exists(path: &Path) {
    assert!(path.exists(), "Expected file to exist: {}", path.display());
}
