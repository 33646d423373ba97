//! Analysis engine for determining the release type from commit records

pub mod release_analyzer;

pub use release_analyzer::{classify, default_rules, resolve, ReleaseRule};
