use std::path::Path;

use git2::{PushOptions, RemoteCallbacks, Repository, Signature};

use crate::error::{ReleaseError, Result};

/// Wrapper around a git2 Repository for the commit-and-push step.
///
/// Provides the small set of operations the release workflow needs:
/// detecting the current branch, committing the release files, and pushing
/// the branch over a token-authenticated HTTPS remote.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the git repository in the current directory or parents.
    pub fn discover() -> Result<Self> {
        let repo = Repository::discover(".")?;
        Ok(GitRepo { repo })
    }

    /// Opens the repository at a specific path.
    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)?;
        Ok(GitRepo { repo })
    }

    /// Name of the branch HEAD currently points at.
    ///
    /// # Returns
    /// * `Ok(name)` - The current branch name
    /// * `Err` - If HEAD is detached or not a branch
    pub fn current_branch(&self) -> Result<String> {
        let head = self.repo.head()?;
        if !head.is_branch() {
            return Err(git2::Error::from_str("HEAD is not on a branch").into());
        }
        head.shorthand()
            .map(String::from)
            .ok_or_else(|| git2::Error::from_str("branch name is not valid UTF-8").into())
    }

    /// Stages the given files and commits them on HEAD.
    ///
    /// Paths may be absolute (inside the work tree) or relative to it; a
    /// leading `./` component is stripped, since libgit2 rejects
    /// dot-prefixed repository paths.
    ///
    /// # Arguments
    /// * `paths` - Files to stage
    /// * `message` - Commit message
    /// * `author_name` / `author_email` - Commit author identity
    pub fn commit_files(
        &self,
        paths: &[&Path],
        message: &str,
        author_name: &str,
        author_email: &str,
    ) -> Result<()> {
        let workdir = self
            .repo
            .workdir()
            .ok_or_else(|| ReleaseError::remote("repository has no work tree"))?;

        let mut index = self.repo.index()?;
        for path in paths {
            let relative = if path.is_absolute() {
                path.strip_prefix(workdir).map_err(|_| {
                    ReleaseError::remote(format!(
                        "path '{}' is outside the repository work tree",
                        path.display()
                    ))
                })?
            } else {
                path.strip_prefix(".").unwrap_or(path)
            };
            index.add_path(relative)?;
        }
        index.write()?;

        let tree_id = index.write_tree()?;
        let tree = self.repo.find_tree(tree_id)?;
        let signature = Signature::now(author_name, author_email)?;
        let parent = self.repo.head()?.peel_to_commit()?;

        self.repo.commit(
            Some("HEAD"),
            &signature,
            &signature,
            message,
            &tree,
            &[&parent],
        )?;

        Ok(())
    }

    /// Pushes a branch to the given remote URL.
    ///
    /// The URL is expected to embed the access token
    /// (`https://<token>@github.com/<owner>/<repo>.git`); the embedded user
    /// is replayed as plaintext credentials when the transport asks.
    pub fn push_branch(&self, branch: &str, url: &str) -> Result<()> {
        let mut remote = self.repo.remote_anonymous(url)?;

        let mut push_options = PushOptions::new();
        let mut callbacks = RemoteCallbacks::new();

        callbacks.credentials(|_url, username_from_url, _allowed_types| {
            if let Some(username) = username_from_url {
                git2::Cred::userpass_plaintext(username, "")
            } else {
                git2::Cred::default()
            }
        });

        // Catch per-reference rejections during push
        callbacks.push_update_reference(|refname, status| {
            if let Some(status) = status {
                eprintln!("Warning: Could not update reference {}: {}", refname, status);
                Err(git2::Error::from_str(&format!(
                    "Push failed for {}",
                    refname
                )))
            } else {
                Ok(())
            }
        });

        push_options.remote_callbacks(callbacks);

        let refspec = format!("refs/heads/{}:refs/heads/{}", branch, branch);
        match remote.push(&[&refspec], Some(&mut push_options)) {
            Ok(_) => Ok(()),
            Err(e) => {
                if e.class() == git2::ErrorClass::Net {
                    Err(ReleaseError::remote(format!(
                        "network error during push: {}",
                        e
                    )))
                } else if e.class() == git2::ErrorClass::Reference {
                    Err(ReleaseError::remote(format!(
                        "reference error during push: {}",
                        e
                    )))
                } else {
                    Err(ReleaseError::remote(format!(
                        "failed to push branch '{}': {}",
                        branch, e
                    )))
                }
            }
        }
    }
}
