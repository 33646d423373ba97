use std::sync::Mutex;

use crate::error::{ReleaseError, Result};
use crate::hosting::{HostingApi, PullRequest, Release};

/// Mock hosting provider for testing without network access.
pub struct MockHosting {
    pull_requests: Vec<PullRequest>,
    latest_tag: Option<String>,
    fail_create: bool,
    created: Mutex<Vec<Release>>,
}

impl MockHosting {
    /// Create an empty mock with no pull requests and no releases
    pub fn new() -> Self {
        MockHosting {
            pull_requests: Vec::new(),
            latest_tag: None,
            fail_create: false,
            created: Mutex::new(Vec::new()),
        }
    }

    /// Add an open pull request
    pub fn with_pull_request(mut self, head_ref: &str, body: Option<&str>) -> Self {
        self.pull_requests.push(PullRequest {
            head_ref: head_ref.to_string(),
            body: body.map(String::from),
            url: format!("https://example.invalid/pulls/{}", self.pull_requests.len() + 1),
        });
        self
    }

    /// Set the latest published release tag
    pub fn with_latest_tag(mut self, tag: &str) -> Self {
        self.latest_tag = Some(tag.to_string());
        self
    }

    /// Make `create_release` fail, simulating an API outage
    pub fn with_failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    /// Releases created through this mock, in creation order
    pub fn created_releases(&self) -> Vec<Release> {
        self.created.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl Default for MockHosting {
    fn default() -> Self {
        Self::new()
    }
}

impl HostingApi for MockHosting {
    fn find_pull_request(&self, branch: &str) -> Result<Option<PullRequest>> {
        Ok(self
            .pull_requests
            .iter()
            .find(|p| p.head_ref == branch)
            .cloned())
    }

    fn latest_release_tag(&self) -> Result<Option<String>> {
        Ok(self.latest_tag.clone())
    }

    fn create_release(&self, release: &Release) -> Result<()> {
        if self.fail_create {
            return Err(ReleaseError::api("simulated release creation failure"));
        }
        if let Ok(mut created) = self.created.lock() {
            created.push(release.clone());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_pull_request_lookup() {
        let mock = MockHosting::new().with_pull_request("feature/login", Some("feat: login"));

        let pr = mock.find_pull_request("feature/login").unwrap().unwrap();
        assert_eq!(pr.head_ref, "feature/login");
        assert_eq!(pr.body.as_deref(), Some("feat: login"));

        assert!(mock.find_pull_request("other-branch").unwrap().is_none());
    }

    #[test]
    fn test_mock_latest_tag() {
        let mock = MockHosting::new().with_latest_tag("v1.0.0");
        assert_eq!(mock.latest_release_tag().unwrap().as_deref(), Some("v1.0.0"));

        let empty = MockHosting::new();
        assert_eq!(empty.latest_release_tag().unwrap(), None);
    }

    #[test]
    fn test_mock_records_created_releases() {
        let mock = MockHosting::new();
        let release = Release {
            tag_name: "v2.0.0".to_string(),
            name: "v2.0.0".to_string(),
            body: "notes".to_string(),
            target_commitish: "master".to_string(),
            draft: false,
            prerelease: false,
        };

        mock.create_release(&release).unwrap();

        let created = mock.created_releases();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].tag_name, "v2.0.0");
    }

    #[test]
    fn test_mock_failing_create() {
        let mock = MockHosting::new().with_failing_create();
        let release = Release {
            tag_name: "v2.0.0".to_string(),
            name: "v2.0.0".to_string(),
            body: "notes".to_string(),
            target_commitish: "master".to_string(),
            draft: false,
            prerelease: false,
        };

        assert!(mock.create_release(&release).is_err());
        assert!(mock.created_releases().is_empty());
    }
}
