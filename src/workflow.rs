use std::fs;
use std::process::Command;

use chrono::Local;
use semver::Version;

use crate::analyzer;
use crate::changelog;
use crate::config::Config;
use crate::conventional;
use crate::error::{ReleaseError, Result};
use crate::git_ops::GitRepo;
use crate::hosting::{HostingApi, Release};
use crate::manifest;
use crate::notes;
use crate::ui;
use crate::version;

/// Name of the transient file holding the raw pull request description.
/// Written, parsed, and deleted within a single run.
pub const PR_MESSAGE_FILENAME: &str = "pr_message.txt";

/// Outcome of the version update workflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// No commit matched any release rule; nothing was changed
    NoRelease,
    /// The manifest and changelog were updated and pushed
    Released { version: Version },
}

/// Runs the version update workflow for the current pull request branch.
///
/// Sequence: fetch the PR description, parse it into commit records,
/// resolve the release type, compute the next version, generate notes,
/// write the manifest, prepend the changelog, commit and push.
///
/// A resolved release type of none is a successful no-op. Everything else
/// fails fatally with no rollback: if the push at the end fails, the
/// manifest and changelog are already modified on disk. That gap is
/// deliberate and documented; CI branch serialization is what keeps runs
/// from interleaving.
pub fn update_version<H: HostingApi>(
    config: &Config,
    repo: &GitRepo,
    api: &H,
) -> Result<UpdateOutcome> {
    let branch = repo.current_branch()?;

    let pull_request = api.find_pull_request(&branch)?.ok_or_else(|| {
        ReleaseError::pull_request(format!("no open pull request found for branch '{}'", branch))
    })?;

    let description = pull_request.body.unwrap_or_default();
    if description.trim().is_empty() {
        return Err(ReleaseError::pull_request(
            "no description found on the pull request",
        ));
    }

    // The description passes through a transient file, consumed and
    // deleted within this run
    let pr_file = config.workdir.join(PR_MESSAGE_FILENAME);
    fs::write(&pr_file, &description)?;
    let text = fs::read_to_string(&pr_file)?;
    let commits = conventional::parse_messages(&text);
    fs::remove_file(&pr_file)?;

    ui::display_commit_summary(&commits);

    let Some(bump) = analyzer::resolve(&config.rules, &commits) else {
        return Ok(UpdateOutcome::NoRelease);
    };
    ui::display_status(&format!("Release type detected: {}", bump));

    // Missing author identity must fail before anything touches the disk
    let author_name = config
        .author_name
        .as_deref()
        .ok_or_else(|| ReleaseError::config("git author name is not configured"))?;
    let author_email = config
        .author_email
        .as_deref()
        .ok_or_else(|| ReleaseError::config("git author email is not configured"))?;

    let current_version = match api.latest_release_tag()? {
        Some(tag) => match version::clean_tag(&tag) {
            Some(v) => v,
            None => manifest::read_version(&config.manifest_file())?,
        },
        None => manifest::read_version(&config.manifest_file())?,
    };

    let next_version = version::increment(&current_version, bump);
    ui::display_version_change(&current_version, &next_version);

    let release_notes = notes::generate(&next_version, Local::now().date_naive(), &commits);

    let manifest_file = config.manifest_file();
    let changelog_file = config.changelog_file();
    manifest::write_version(&manifest_file, &next_version)?;
    changelog::prepend(&changelog_file, &release_notes)?;

    let message = format!(
        "chore(release): updating version to {} [skip ci]",
        next_version
    );
    repo.commit_files(
        &[manifest_file.as_path(), changelog_file.as_path()],
        &message,
        author_name,
        author_email,
    )?;
    repo.push_branch(&branch, &config.push_url)?;

    Ok(UpdateOutcome::Released {
        version: next_version,
    })
}

/// Cuts a hosted release from the changelog's newest entry.
///
/// No-ops (returning `Ok(None)`) when there is no changelog, no parsable
/// entry, or the latest published release already carries the entry's
/// version. A failed release submission is logged and the constructed
/// release is still returned: the version and changelog update already
/// landed, and must not be reported as failed because the remote release
/// record could not be written.
pub fn release_version<H: HostingApi>(
    config: &Config,
    api: &H,
    npm_publish: bool,
) -> Result<Option<Release>> {
    let changelog_file = config.changelog_file();
    if !changelog_file.exists() {
        ui::display_status("No CHANGELOG file found, no release will be generated");
        return Ok(None);
    }

    let Some(entry) = changelog::latest_entry(&changelog_file)? else {
        ui::display_status("No release entry found in the changelog");
        return Ok(None);
    };

    let published = api
        .latest_release_tag()?
        .and_then(|tag| version::clean_tag(&tag));

    if published.as_ref() == Some(&entry.version) {
        ui::display_status(
            "No changes between changelog last release and repository last release version, \
             no release will be generated",
        );
        return Ok(None);
    }

    let release = Release {
        tag_name: format!("v{}", entry.version),
        name: format!("v{}", entry.version),
        body: format!("## {}\n\n{}", entry.title, entry.body),
        target_commitish: config.default_branch.clone(),
        draft: false,
        prerelease: false,
    };

    match api.create_release(&release) {
        Ok(()) => {
            ui::display_success(&format!("Created release {}", release.tag_name));
            if npm_publish {
                run_npm_publish(config);
            }
        }
        Err(e) => {
            // Best effort: the version bump already landed, a failed remote
            // release record does not fail the run
            ui::display_error(&format!("Release creation failed: {}", e));
        }
    }

    Ok(Some(release))
}

fn run_npm_publish(config: &Config) {
    match Command::new("npm")
        .arg("publish")
        .current_dir(&config.workdir)
        .status()
    {
        Ok(status) if status.success() => {
            ui::display_success("Package published");
        }
        Ok(status) => {
            ui::display_error(&format!("npm publish exited with {}", status));
        }
        Err(e) => {
            ui::display_error(&format!("Failed to run npm publish: {}", e));
        }
    }
}
