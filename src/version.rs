use semver::Version;
use serde::{Deserialize, Serialize};

/// Represents the type of semantic version bump to apply.
///
/// The derived ordering is significant: `Major > Minor > Patch`, so the
/// highest bump across a set of commits can be picked with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BumpLevel {
    Patch,
    Minor,
    Major,
}

impl std::fmt::Display for BumpLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BumpLevel::Patch => write!(f, "patch"),
            BumpLevel::Minor => write!(f, "minor"),
            BumpLevel::Major => write!(f, "major"),
        }
    }
}

/// Parses a release tag into a canonical semantic version.
///
/// Strips a leading 'v' or 'V' prefix and parses the remainder. Tags that
/// carry prerelease or build metadata are not canonical `MAJOR.MINOR.PATCH`
/// versions and are treated as absent, never as an error.
///
/// # Example
/// ```
/// use version_release::version::clean_tag;
/// assert_eq!(clean_tag("v1.2.3").unwrap().to_string(), "1.2.3");
/// assert_eq!(clean_tag("release-1"), None);
/// assert_eq!(clean_tag("v1.2.3-rc.1"), None);
/// ```
pub fn clean_tag(tag: &str) -> Option<Version> {
    let clean = tag
        .trim()
        .trim_start_matches('v')
        .trim_start_matches('V');

    let version = Version::parse(clean).ok()?;
    if !version.pre.is_empty() || !version.build.is_empty() {
        return None;
    }

    Some(version)
}

/// Increments a version according to the bump level.
///
/// Standard semantic-version increment rules: major resets minor and patch
/// to 0, minor resets patch to 0, patch increments patch only.
pub fn increment(version: &Version, bump: BumpLevel) -> Version {
    match bump {
        BumpLevel::Major => Version::new(version.major + 1, 0, 0),
        BumpLevel::Minor => Version::new(version.major, version.minor + 1, 0),
        BumpLevel::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bump_ordering() {
        assert!(BumpLevel::Major > BumpLevel::Minor);
        assert!(BumpLevel::Minor > BumpLevel::Patch);
        assert_eq!(
            [BumpLevel::Patch, BumpLevel::Major, BumpLevel::Minor]
                .into_iter()
                .max(),
            Some(BumpLevel::Major)
        );
    }

    #[test]
    fn test_clean_tag_with_prefix() {
        assert_eq!(clean_tag("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(clean_tag("V0.1.0"), Some(Version::new(0, 1, 0)));
        assert_eq!(clean_tag("1.2.3"), Some(Version::new(1, 2, 3)));
    }

    #[test]
    fn test_clean_tag_rejects_non_canonical() {
        assert_eq!(clean_tag("v1.2"), None);
        assert_eq!(clean_tag("v1.2.3-beta.1"), None);
        assert_eq!(clean_tag("v1.2.3+build.5"), None);
        assert_eq!(clean_tag("not-a-version"), None);
        assert_eq!(clean_tag(""), None);
    }

    #[test]
    fn test_increment_major_resets_lower() {
        let next = increment(&Version::new(1, 2, 3), BumpLevel::Major);
        assert_eq!(next, Version::new(2, 0, 0));
    }

    #[test]
    fn test_increment_minor_resets_patch() {
        let next = increment(&Version::new(1, 2, 3), BumpLevel::Minor);
        assert_eq!(next, Version::new(1, 3, 0));
    }

    #[test]
    fn test_increment_patch() {
        let next = increment(&Version::new(1, 2, 3), BumpLevel::Patch);
        assert_eq!(next, Version::new(1, 2, 4));
    }

    #[test]
    fn test_bump_display() {
        assert_eq!(BumpLevel::Major.to_string(), "major");
        assert_eq!(BumpLevel::Minor.to_string(), "minor");
        assert_eq!(BumpLevel::Patch.to_string(), "patch");
    }
}
