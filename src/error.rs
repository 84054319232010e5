//! Error taxonomy for the packaging pipeline.
//!
//! Every variant is fatal. The orchestrator never retries or reinterprets
//! these, it only stops and hands the error to `main` for reporting.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by a pipeline stage.
#[derive(Debug, Error)]
pub enum PackagingError {
    /// Required host tools are not on PATH (and were not installed).
    #[error("missing required tool(s): {}", tools.join(", "))]
    MissingDependency {
        /// Tool names that could not be resolved.
        tools: Vec<String>,
    },

    /// Operator answered "no" to the install prompt.
    #[error("installation of {} declined", packages.join(", "))]
    DependencyInstallDeclined {
        /// Packages that would have been installed.
        packages: Vec<String>,
    },

    /// The system package manager failed.
    #[error("failed to install {}: {reason}", packages.join(", "))]
    DependencyInstallFailed {
        /// Packages requested.
        packages: Vec<String>,
        /// Package manager diagnostic.
        reason: String,
    },

    /// One or more input artifacts are absent. Lists all of them.
    #[error("missing source file(s): {}", display_paths(paths))]
    MissingSourceFile {
        /// Every missing source path, in manifest order.
        paths: Vec<PathBuf>,
    },

    /// A filesystem operation while laying out the staged tree failed.
    #[error("failed to {action} {}: {source}", path.display())]
    StagingFailure {
        /// Short verb phrase, e.g. "copy" or "create directory".
        action: &'static str,
        /// Path the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The packaging backend could not be run or exited non-zero.
    #[error("packaging backend failed: {reason}")]
    BackendInvocationFailure {
        /// Backend diagnostic (exit code and stderr).
        reason: String,
    },

    /// The backend returned but the expected archive is not on disk.
    #[error("expected archive was not produced: {}", path.display())]
    ArtifactNotProduced {
        /// Archive path that should exist.
        path: PathBuf,
    },
}

impl PackagingError {
    /// Label of the stage that raised this error.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::MissingDependency { .. }
            | Self::DependencyInstallDeclined { .. }
            | Self::DependencyInstallFailed { .. } => "deps",
            Self::MissingSourceFile { .. } => "sources",
            Self::StagingFailure { .. } => "stage",
            Self::BackendInvocationFailure { .. } | Self::ArtifactNotProduced { .. } => "build",
        }
    }

    /// Wrap an I/O error from the tree builder.
    pub(crate) fn staging(
        action: &'static str,
        path: impl Into<PathBuf>,
    ) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::StagingFailure {
            action,
            path,
            source,
        }
    }
}

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result alias for pipeline stages.
pub type Result<T> = std::result::Result<T, PackagingError>;
