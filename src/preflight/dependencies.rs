//! Host tool resolution with interactive remediation.
//!
//! PATH lookups, the yes/no prompt and the package manager call all sit
//! behind [`ToolProvider`] so the decision logic in [`ensure`] can run
//! against a fake in tests.

use std::io::{self, BufRead, Write};

use crate::error::{PackagingError, Result};
use crate::process::{self, Cmd};

use super::types::{CheckResult, PreflightReport};

/// Tools whose installable package differs from the tool name.
const PACKAGE_TABLE: &[(&str, &str)] = &[
    ("dpkg-deb", "dpkg"),
    ("fakeroot", "fakeroot"),
    ("lintian", "lintian"),
];

/// Map a tool to the package that provides it. Unknown tools map to themselves.
pub fn package_for(tool: &str) -> &str {
    PACKAGE_TABLE
        .iter()
        .find(|(t, _)| *t == tool)
        .map(|(_, pkg)| *pkg)
        .unwrap_or(tool)
}

/// Host capabilities the resolver needs.
pub trait ToolProvider {
    /// Whether `name` resolves on PATH.
    fn check_tool(&self, name: &str) -> bool;

    /// Ask the operator whether to install `packages`. Blocks on input.
    /// `Ok(false)` is a decline; `Err` means no answer could be read.
    fn confirm_install(&self, packages: &[String]) -> Result<bool>;

    /// Install `packages` via the system package manager.
    fn request_install(&self, packages: &[String]) -> Result<()>;
}

/// Make sure every tool in `required` is available.
///
/// Missing tools are mapped to packages and offered for installation.
/// Declining, a failed install, or a tool still missing afterwards is fatal.
pub fn ensure(provider: &dyn ToolProvider, required: &[&str]) -> Result<()> {
    if required.is_empty() {
        return Ok(());
    }

    let report = check_tools(provider, required);
    report.print();
    if report.all_passed() {
        return Ok(());
    }

    let missing: Vec<&str> = report.failed().collect();
    let mut packages: Vec<String> = Vec::new();
    for tool in &missing {
        let pkg = package_for(tool).to_string();
        if !packages.contains(&pkg) {
            packages.push(pkg);
        }
    }

    println!("\nMissing tools: {}", missing.join(", "));
    println!("Required packages: {}", packages.join(" "));

    if !provider.confirm_install(&packages)? {
        return Err(PackagingError::DependencyInstallDeclined { packages });
    }

    provider.request_install(&packages)?;

    let still_missing: Vec<String> = required
        .iter()
        .filter(|tool| !provider.check_tool(tool))
        .map(|tool| tool.to_string())
        .collect();
    if !still_missing.is_empty() {
        return Err(PackagingError::MissingDependency {
            tools: still_missing,
        });
    }

    println!("Dependencies installed.");
    Ok(())
}

fn check_tools(provider: &dyn ToolProvider, required: &[&str]) -> PreflightReport {
    let checks = required
        .iter()
        .map(|tool| {
            if provider.check_tool(tool) {
                CheckResult::pass(tool)
            } else {
                CheckResult::fail(
                    tool,
                    &format!("Not found. Provided by '{}' package.", package_for(tool)),
                )
            }
        })
        .collect();
    PreflightReport { checks }
}

/// The real host: PATH lookup, stdin prompt, `<package-manager> install -y`.
pub struct SystemTools {
    package_manager: String,
    assume_yes: bool,
}

impl SystemTools {
    pub fn new(package_manager: impl Into<String>, assume_yes: bool) -> Self {
        Self {
            package_manager: package_manager.into(),
            assume_yes,
        }
    }
}

impl ToolProvider for SystemTools {
    fn check_tool(&self, name: &str) -> bool {
        match process::which(name) {
            Some(path) => {
                tracing::debug!(tool = name, path = %path.display(), "tool resolved");
                true
            }
            None => false,
        }
    }

    fn confirm_install(&self, packages: &[String]) -> Result<bool> {
        if self.assume_yes {
            println!("Installing {} (DEBSTAGE_ASSUME_YES)", packages.join(" "));
            return Ok(true);
        }

        print!("Install them now with {}? [y/N] ", self.package_manager);
        let mut answer = String::new();
        let read = io::stdout()
            .flush()
            .and_then(|_| io::stdin().lock().read_line(&mut answer))
            .map_err(|e| PackagingError::DependencyInstallFailed {
                packages: packages.to_vec(),
                reason: format!("could not read confirmation: {e}"),
            })?;

        // EOF is a "no".
        Ok(read > 0 && is_yes(&answer))
    }

    fn request_install(&self, packages: &[String]) -> Result<()> {
        // SAFETY: geteuid has no preconditions.
        let is_root = unsafe { libc::geteuid() } == 0;
        let cmd = if is_root {
            Cmd::new(&self.package_manager)
        } else {
            Cmd::new("sudo").arg(&self.package_manager)
        };

        cmd.args(["install", "-y"])
            .args(packages)
            .error_msg(format!("{} install failed", self.package_manager))
            .run_interactive()
            .map(|_| ())
            .map_err(|e| PackagingError::DependencyInstallFailed {
                packages: packages.to_vec(),
                reason: format!("{e:#}"),
            })
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
