use std::fs;
use std::path::Path;

use regex::Regex;
use semver::Version;

use crate::error::Result;

/// The most recent release note entry parsed from a changelog document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry {
    pub version: Version,
    pub title: String,
    pub body: String,
}

/// Prepend new release notes to the changelog document.
///
/// Creates the file when absent. The new section always lands first,
/// separated from existing content by exactly one blank line:
/// `trim(notes) + "\n" + ("\n" + existing + "\n" if existing else "")`.
///
/// Calling this twice with identical notes stacks two duplicate sections;
/// deduplication happens upstream where the resolver prevents a second run
/// from producing the same notes.
pub fn prepend(path: &Path, notes: &str) -> Result<()> {
    let existing = if path.exists() {
        fs::read_to_string(path)?.trim().to_string()
    } else {
        String::new()
    };

    let content = if existing.is_empty() {
        format!("{}\n", notes.trim())
    } else {
        format!("{}\n\n{}\n", notes.trim(), existing)
    };

    fs::write(path, content)?;
    Ok(())
}

/// Parse the newest entry from the changelog document.
///
/// Sections start at `##` headings carrying a semantic version; the first
/// such heading in the document is the newest entry. Returns `Ok(None)`
/// when the file is missing or no section heading parses.
pub fn latest_entry(path: &Path) -> Result<Option<NoteEntry>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)?;
    let lines: Vec<&str> = content.lines().collect();

    let Some((start, version, title)) = lines
        .iter()
        .enumerate()
        .find_map(|(i, line)| parse_heading(line).map(|(v, t)| (i, v, t)))
    else {
        return Ok(None);
    };

    let body_end = lines[start + 1..]
        .iter()
        .position(|line| parse_heading(line).is_some())
        .map(|offset| start + 1 + offset)
        .unwrap_or(lines.len());

    let body = lines[start + 1..body_end].join("\n").trim().to_string();

    Ok(Some(NoteEntry {
        version,
        title,
        body,
    }))
}

/// Parse a `##` heading into its version and title, if it carries one.
fn parse_heading(line: &str) -> Option<(Version, String)> {
    let title = line.strip_prefix("## ")?.trim();

    let re = Regex::new(r"\d+\.\d+\.\d+").ok()?;
    let matched = re.find(title)?;
    let version = Version::parse(matched.as_str()).ok()?;

    Some((version, title.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_prepend_creates_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        let notes = "## 1.0.0 (01-01-2024)\n\n* Initial release";

        prepend(&path, notes).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "## 1.0.0 (01-01-2024)\n\n* Initial release\n");
    }

    #[test]
    fn test_prepend_stacks_newest_first() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        prepend(&path, "## 1.0.0\n\n* first").unwrap();
        prepend(&path, "## 1.1.0\n\n* second").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "## 1.1.0\n\n* second\n\n## 1.0.0\n\n* first\n");
    }

    #[test]
    fn test_prepend_does_not_deduplicate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");

        prepend(&path, "## 1.0.0\n\n* same").unwrap();
        prepend(&path, "## 1.0.0\n\n* same").unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("## 1.0.0").count(), 2);
    }

    #[test]
    fn test_latest_entry_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        assert_eq!(latest_entry(&path).unwrap(), None);
    }

    #[test]
    fn test_latest_entry_parses_first_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(
            &path,
            "## 1.1.0 (02-01-2024)\n\n* newer change\n\n## 1.0.0 (01-01-2024)\n\n* older change\n",
        )
        .unwrap();

        let entry = latest_entry(&path).unwrap().unwrap();
        assert_eq!(entry.version, Version::new(1, 1, 0));
        assert_eq!(entry.title, "1.1.0 (02-01-2024)");
        assert_eq!(entry.body, "* newer change");
    }

    #[test]
    fn test_latest_entry_skips_versionless_headings() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "## Unreleased\n\n* pending\n\n## 2.0.0\n\n* released\n").unwrap();

        let entry = latest_entry(&path).unwrap().unwrap();
        assert_eq!(entry.version, Version::new(2, 0, 0));
        assert_eq!(entry.body, "* released");
    }

    #[test]
    fn test_latest_entry_no_parsable_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("CHANGELOG.md");
        fs::write(&path, "# Changelog\n\nnothing released yet\n").unwrap();

        assert_eq!(latest_entry(&path).unwrap(), None);
    }
}
