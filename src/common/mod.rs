//! Shared utilities across debstage modules.

pub mod files;

pub use files::{copy_file_mode, ensure_dir, set_mode, write_file_mode};
