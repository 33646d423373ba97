//! Hosting API abstraction layer
//!
//! Trait-based seam over the source-hosting provider's REST interface so
//! the workflows can run against a real GitHub client or a mock in tests.
//!
//! - [github::GithubClient]: real implementation over blocking HTTP
//! - [mock::MockHosting]: canned responses for testing

pub mod github;
pub mod mock;

pub use github::GithubClient;
pub use mock::MockHosting;

use serde::Serialize;

use crate::error::Result;

/// An open pull request, as much of it as the workflows need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequest {
    /// Head branch name (`head.ref` in the API payload)
    pub head_ref: String,
    /// The pull request description
    pub body: Option<String>,
    /// API URL of the pull request
    pub url: String,
}

/// The payload handed to the hosting API when cutting a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Release {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub target_commitish: String,
    pub draft: bool,
    pub prerelease: bool,
}

/// Operations the release workflows need from the hosting provider.
///
/// Error policy follows the orchestration's taxonomy: pull request lookup
/// failures are fatal and surface as `Err`; `latest_release_tag` degrades
/// to `Ok(None)` on any failure so version resolution can fall back to the
/// manifest; `create_release` failures surface as `Err` and the caller
/// decides whether they are fatal.
pub trait HostingApi {
    /// Find the open pull request whose head is the given branch.
    fn find_pull_request(&self, branch: &str) -> Result<Option<PullRequest>>;

    /// Tag name of the latest published release, if one exists.
    fn latest_release_tag(&self) -> Result<Option<String>>;

    /// Create a hosted release.
    fn create_release(&self, release: &Release) -> Result<()>;
}
