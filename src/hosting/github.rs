use reqwest::blocking::Client;
use serde::Deserialize;

use crate::error::{ReleaseError, Result};
use crate::hosting::{HostingApi, PullRequest, Release};
use crate::ui;

const API_ROOT: &str = "https://api.github.com";

/// GitHub implementation of [HostingApi] over blocking HTTP.
pub struct GithubClient {
    client: Client,
    token: String,
    owner: String,
    repo: String,
    api_root: String,
}

/// Pull request payload, only the fields the workflows read.
#[derive(Debug, Deserialize)]
struct PullPayload {
    head: HeadPayload,
    body: Option<String>,
    url: String,
}

#[derive(Debug, Deserialize)]
struct HeadPayload {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Debug, Deserialize)]
struct ReleasePayload {
    tag_name: String,
}

impl GithubClient {
    /// Create a client for the given repository.
    pub fn new(token: &str, owner: &str, repo: &str) -> Result<Self> {
        Self::with_api_root(token, owner, repo, API_ROOT)
    }

    /// Create a client pointed at a custom API root (used by tests).
    pub fn with_api_root(token: &str, owner: &str, repo: &str, api_root: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("version-release/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ReleaseError::api(format!("failed to build HTTP client: {}", e)))?;

        Ok(GithubClient {
            client,
            token: token.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            api_root: api_root.trim_end_matches('/').to_string(),
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_root, self.owner, self.repo, path
        )
    }

    fn get(&self, url: &str) -> reqwest::Result<reqwest::blocking::Response> {
        self.client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .send()
    }
}

impl HostingApi for GithubClient {
    fn find_pull_request(&self, branch: &str) -> Result<Option<PullRequest>> {
        let url = format!(
            "{}?head=\"{}:{}\"",
            self.repo_url("pulls"),
            self.owner,
            branch
        );

        let response = self
            .get(&url)
            .map_err(|e| ReleaseError::api(format!("pull request lookup failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ReleaseError::api(format!(
                "pull request lookup returned HTTP {}",
                response.status()
            )));
        }

        let pulls: Vec<PullPayload> = response
            .json()
            .map_err(|e| ReleaseError::api(format!("malformed pull request payload: {}", e)))?;

        Ok(pulls
            .into_iter()
            .find(|p| p.head.ref_name == branch)
            .map(|p| PullRequest {
                head_ref: p.head.ref_name,
                body: p.body,
                url: p.url,
            }))
    }

    fn latest_release_tag(&self) -> Result<Option<String>> {
        let url = self.repo_url("releases/latest");

        // Any failure here degrades to "no release found" so the caller can
        // fall back to the manifest version.
        let response = match self.get(&url) {
            Ok(r) => r,
            Err(e) => {
                ui::display_status(&format!("Could not find the latest release: {}", e));
                return Ok(None);
            }
        };

        if !response.status().is_success() {
            ui::display_status(&format!(
                "Could not find the latest release (HTTP {})",
                response.status()
            ));
            return Ok(None);
        }

        match response.json::<ReleasePayload>() {
            Ok(payload) => Ok(Some(payload.tag_name)),
            Err(e) => {
                ui::display_status(&format!("Could not read the latest release: {}", e));
                Ok(None)
            }
        }
    }

    fn create_release(&self, release: &Release) -> Result<()> {
        let url = self.repo_url("releases");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .json(release)
            .send()
            .map_err(|e| ReleaseError::api(format!("release creation failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ReleaseError::api(format!(
                "release creation returned HTTP {}",
                response.status()
            )));
        }

        Ok(())
    }
}
