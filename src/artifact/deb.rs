//! `dpkg-deb` backend.

use std::path::Path;

use crate::descriptor::{parse_control, PackageDescriptor};
use crate::error::{PackagingError, Result};
use crate::process::Cmd;

use super::PackageBackend;

/// Drives `dpkg-deb` (or a compatible program at another path).
pub struct DpkgDeb {
    program: String,
}

impl DpkgDeb {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for DpkgDeb {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_BACKEND)
    }
}

impl PackageBackend for DpkgDeb {
    fn program(&self) -> &str {
        &self.program
    }

    fn extension(&self) -> &str {
        "deb"
    }

    fn build(&self, tree: &Path) -> Result<()> {
        // Files inside the archive are owned by root:root whoever runs this.
        let result = Cmd::new(&self.program)
            .args(["--build", "--root-owner-group"])
            .arg_path(tree)
            .error_msg(format!("{} --build failed", self.program))
            .run()
            .map_err(backend_failure)?;

        let out = result.stdout_trimmed();
        if !out.is_empty() {
            println!("  {}", out);
        }
        Ok(())
    }

    fn info(&self, archive: &Path) -> Result<String> {
        let result = Cmd::new(&self.program)
            .arg("--info")
            .arg_path(archive)
            .error_msg(format!("{} --info failed", self.program))
            .run()
            .map_err(backend_failure)?;
        Ok(result.stdout)
    }

    fn install_command(&self, archive: &Path) -> String {
        format!("sudo dpkg -i {}", archive.display())
    }

    fn remove_command(&self, package: &str) -> String {
        format!("sudo dpkg -r {}", package)
    }
}

fn backend_failure(e: anyhow::Error) -> PackagingError {
    PackagingError::BackendInvocationFailure {
        reason: format!("{e:#}"),
    }
}

/// Extract the control fields from `dpkg-deb --info` output.
///
/// The tool indents the control record by one space, so that is removed
/// before handing the text to the control parser.
pub fn parse_info(info: &str) -> Option<PackageDescriptor> {
    let control: Vec<&str> = info
        .lines()
        .map(|l| l.strip_prefix(' ').unwrap_or(l))
        .collect();
    parse_control(&control.join("\n"))
}
