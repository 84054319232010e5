//! Configuration management for debstage.
//!
//! Reads configuration from a `.env` file in the working directory and
//! from environment variables. Environment variables take precedence
//! over the `.env` file. Every key is optional.

use anyhow::{bail, Context, Result};
use std::collections::HashMap;
use std::path::Path;

/// Default maintainer written into the control record.
pub const DEFAULT_MAINTAINER: &str = "kewlfft";

/// Default target architecture.
pub const DEFAULT_ARCH: &str = "amd64";

/// Default packaging backend program.
pub const DEFAULT_BACKEND: &str = "dpkg-deb";

/// Default system package manager used to install missing tools.
pub const DEFAULT_PACKAGE_MANAGER: &str = "apt-get";

/// Debstage configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Pinned version string (DEBSTAGE_VERSION). Derived from build time when unset.
    pub version: Option<String>,
    /// Maintainer identity (DEBSTAGE_MAINTAINER)
    pub maintainer: String,
    /// Target architecture (DEBSTAGE_ARCH)
    pub arch: String,
    /// Packaging backend program (DEBSTAGE_BACKEND)
    pub backend: String,
    /// System package manager (DEBSTAGE_PACKAGE_MANAGER)
    pub package_manager: String,
    /// Skip the interactive install prompt (DEBSTAGE_ASSUME_YES)
    pub assume_yes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_vars(&HashMap::new())
    }
}

impl Config {
    /// Load configuration from `.env` in `base_dir` and the environment.
    pub fn load(base_dir: &Path) -> Result<Self> {
        let mut vars = HashMap::new();

        let env_path = base_dir.join(".env");
        if env_path.exists() {
            let entries = dotenvy::from_path_iter(&env_path)
                .with_context(|| format!("Failed to read {}", env_path.display()))?;
            for entry in entries {
                let (key, value) =
                    entry.with_context(|| format!("Malformed line in {}", env_path.display()))?;
                vars.insert(key, value);
            }
        }

        vars.extend(std::env::vars());

        let config = Self::from_vars(&vars);
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would break the `<name>_<version>_<arch>` tree
    /// and archive names.
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = &self.version {
            check_name_component("DEBSTAGE_VERSION", version)?;
        }
        check_name_component("DEBSTAGE_ARCH", &self.arch)
    }

    /// Build a config from an explicit variable map.
    pub fn from_vars(vars: &HashMap<String, String>) -> Self {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            version: get("DEBSTAGE_VERSION"),
            maintainer: get("DEBSTAGE_MAINTAINER").unwrap_or_else(|| DEFAULT_MAINTAINER.into()),
            arch: get("DEBSTAGE_ARCH").unwrap_or_else(|| DEFAULT_ARCH.into()),
            backend: get("DEBSTAGE_BACKEND").unwrap_or_else(|| DEFAULT_BACKEND.into()),
            package_manager: get("DEBSTAGE_PACKAGE_MANAGER")
                .unwrap_or_else(|| DEFAULT_PACKAGE_MANAGER.into()),
            assume_yes: get("DEBSTAGE_ASSUME_YES")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "y" | "yes" | "true"))
                .unwrap_or(false),
        }
    }

    /// Print configuration for debugging.
    pub fn print(&self) {
        println!("Configuration:");
        println!(
            "  DEBSTAGE_VERSION: {}",
            self.version.as_deref().unwrap_or("(build time)")
        );
        println!("  DEBSTAGE_MAINTAINER: {}", self.maintainer);
        println!("  DEBSTAGE_ARCH: {}", self.arch);
        println!("  DEBSTAGE_BACKEND: {}", self.backend);
        println!("  DEBSTAGE_PACKAGE_MANAGER: {}", self.package_manager);
        println!("  DEBSTAGE_ASSUME_YES: {}", self.assume_yes);
    }
}

/// Characters allowed in a version or architecture: alphanumerics and
/// the Debian version punctuation `. + ~ - :`. No `/`, `_` or whitespace.
fn check_name_component(key: &str, value: &str) -> Result<()> {
    if let Some(bad) = value
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '~' | '-' | ':')))
    {
        bail!("{key}={value:?} contains {bad:?}; allowed are letters, digits and . + ~ - :");
    }
    Ok(())
}
