//! Package identity and the Debian control record.
//!
//! A [`PackageDescriptor`] is built once at start-up and read by every
//! stage afterwards. The control record rendered from it is parsed by
//! the backend by keyword, so field order and formatting are fixed.

use chrono::{DateTime, Local};

use crate::config::Config;

/// Package name (also the daemon / unit name).
pub const PACKAGE_NAME: &str = "opennic-up";

/// One-line summary used as the first `Description` line.
pub const SUMMARY: &str = "OpenNIC auto DNS updater";

/// Continuation line of the description.
pub const LONG_DESCRIPTION: &str =
    "Automatically updates DNS resolvers with the best OpenNIC servers.";

/// Constant `Section` field.
pub const SECTION: &str = "net";

/// Constant `Priority` field.
pub const PRIORITY: &str = "optional";

/// Immutable package metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDescriptor {
    pub name: String,
    pub version: String,
    pub arch: String,
    pub maintainer: String,
    pub description: String,
}

impl PackageDescriptor {
    /// Descriptor for this release, honouring config overrides.
    ///
    /// The version is taken from `DEBSTAGE_VERSION` when set, otherwise
    /// derived from `now`.
    pub fn from_config(config: &Config, now: DateTime<Local>) -> Self {
        Self {
            name: PACKAGE_NAME.to_string(),
            version: config
                .version
                .clone()
                .unwrap_or_else(|| build_version(now)),
            arch: config.arch.clone(),
            maintainer: config.maintainer.clone(),
            description: SUMMARY.to_string(),
        }
    }

    /// Name of the staged tree root: `<name>_<version>_<arch>`.
    pub fn tree_name(&self) -> String {
        format!("{}_{}_{}", self.name, self.version, self.arch)
    }

    /// Render the control record.
    pub fn control_record(&self) -> String {
        format!(
            "Package: {}\n\
             Version: {}\n\
             Section: {}\n\
             Priority: {}\n\
             Architecture: {}\n\
             Maintainer: {}\n\
             Description: {}\n \
             {}\n",
            self.name,
            self.version,
            SECTION,
            PRIORITY,
            self.arch,
            self.maintainer,
            self.description,
            LONG_DESCRIPTION,
        )
    }
}

/// Version string derived from build time: `dev-YYYYMMDD-HHMMSS`.
pub fn build_version(now: DateTime<Local>) -> String {
    format!("dev-{}", now.format("%Y%m%d-%H%M%S"))
}

/// Parse a control record back into a descriptor.
///
/// Continuation lines (leading whitespace) are skipped; only the first
/// `Description` line is kept. Returns None if any identity field is absent.
pub fn parse_control(text: &str) -> Option<PackageDescriptor> {
    let mut name = None;
    let mut version = None;
    let mut arch = None;
    let mut maintainer = None;
    let mut description = None;

    for line in text.lines() {
        if line.starts_with([' ', '\t']) {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let value = Some(value.trim().to_string());
        match key.trim() {
            "Package" => name = value,
            "Version" => version = value,
            "Architecture" => arch = value,
            "Maintainer" => maintainer = value,
            "Description" => description = value,
            _ => {}
        }
    }

    Some(PackageDescriptor {
        name: name?,
        version: version?,
        arch: arch?,
        maintainer: maintainer?,
        description: description?,
    })
}
