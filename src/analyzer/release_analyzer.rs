use serde::{Deserialize, Serialize};

use crate::conventional::CommitRecord;
use crate::version::BumpLevel;

/// A single entry in the ordered release rule table.
///
/// A rule matches a commit when:
/// - `breaking` is set and the commit carries a breaking change, or
/// - `revert` is set and the commit is a revert, or
/// - `commit_type` equals the commit's type.
///
/// Table order encodes priority: the first matching rule decides the bump
/// a commit implies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReleaseRule {
    #[serde(default)]
    pub breaking: bool,

    #[serde(default)]
    pub revert: bool,

    #[serde(default, rename = "type")]
    pub commit_type: Option<String>,

    pub release: BumpLevel,
}

impl ReleaseRule {
    fn matches(&self, commit: &CommitRecord) -> bool {
        if self.breaking {
            return commit.breaking;
        }
        if self.revert {
            return commit.revert;
        }
        match &self.commit_type {
            Some(t) => commit.commit_type.as_deref() == Some(t.as_str()),
            None => false,
        }
    }
}

/// The default rule table, highest priority first.
pub fn default_rules() -> Vec<ReleaseRule> {
    fn breaking(release: BumpLevel) -> ReleaseRule {
        ReleaseRule {
            breaking: true,
            revert: false,
            commit_type: None,
            release,
        }
    }
    fn revert(release: BumpLevel) -> ReleaseRule {
        ReleaseRule {
            breaking: false,
            revert: true,
            commit_type: None,
            release,
        }
    }
    fn typed(commit_type: &str, release: BumpLevel) -> ReleaseRule {
        ReleaseRule {
            breaking: false,
            revert: false,
            commit_type: Some(commit_type.to_string()),
            release,
        }
    }

    vec![
        breaking(BumpLevel::Major),
        revert(BumpLevel::Patch),
        typed("feat", BumpLevel::Minor),
        typed("fix", BumpLevel::Patch),
        typed("refactor", BumpLevel::Patch),
        typed("ci", BumpLevel::Patch),
        typed("docs", BumpLevel::Patch),
        typed("style", BumpLevel::Patch),
    ]
}

/// Determine the bump level a single commit implies.
///
/// Scans the rule table in order and returns the bump level of the first
/// matching rule, or `None` when no rule matches. No side effects.
pub fn classify(rules: &[ReleaseRule], commit: &CommitRecord) -> Option<BumpLevel> {
    rules
        .iter()
        .find(|rule| rule.matches(commit))
        .map(|rule| rule.release)
}

/// Determine the release type for a whole list of commits.
///
/// Folds `classify` over the commits keeping the highest bump seen
/// (`major > minor > patch`). Returns `None` when no commit matches any
/// rule, which signals that no release should occur.
pub fn resolve(rules: &[ReleaseRule], commits: &[CommitRecord]) -> Option<BumpLevel> {
    commits
        .iter()
        .filter_map(|commit| classify(rules, commit))
        .max()
}
