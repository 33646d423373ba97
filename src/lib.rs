pub mod analyzer;
pub mod changelog;
pub mod config;
pub mod conventional;
pub mod error;
pub mod git_ops;
pub mod hosting;
pub mod manifest;
pub mod notes;
pub mod ui;
pub mod version;
pub mod workflow;

pub use error::{ReleaseError, Result};
