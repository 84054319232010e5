//! Preflight stages: host tools and input artifacts.
//!
//! Both run before anything is written to the working directory.

pub mod dependencies;
pub mod sources;
mod types;

pub use dependencies::{ensure, package_for, SystemTools, ToolProvider};
pub use sources::verify;
pub use types::{CheckResult, CheckStatus, PreflightReport};
