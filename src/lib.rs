//! Debstage library exports.
//!
//! The binary is a thin wrapper around [`pipeline::Pipeline`]; the stages
//! are exposed here so integration tests can drive them directly.

pub mod artifact;
pub mod common;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod preflight;
pub mod process;
pub mod stage;
pub mod timing;

pub use error::{PackagingError, Result};
