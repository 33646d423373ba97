use chrono::NaiveDate;
use semver::Version;

use crate::conventional::CommitRecord;

/// Heading used for a group of commits of one type.
fn section_title(commit_type: &str) -> String {
    match commit_type {
        "feat" => "Features".to_string(),
        "fix" => "Bug Fixes".to_string(),
        "perf" => "Performance Improvements".to_string(),
        "revert" => "Reverts".to_string(),
        "docs" => "Documentation".to_string(),
        "style" => "Styles".to_string(),
        "refactor" => "Code Refactoring".to_string(),
        "ci" => "Continuous Integration".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        }
    }
}

fn bullet(commit: &CommitRecord) -> String {
    match &commit.scope {
        Some(scope) => format!("* **{}:** {}", scope, commit.subject),
        None => format!("* {}", commit.subject),
    }
}

/// Generate formatted release notes for the next version.
///
/// Produces a `## <version> (<dd-MM-YYYY>)` heading followed by one section
/// per commit type in rule-table order (features first, then fixes, then
/// the rest in order of appearance), with breaking changes listed in their
/// own section last. Commits without a conventional type are included only
/// when they are reverts or carry a breaking change.
pub fn generate(version: &Version, date: NaiveDate, commits: &[CommitRecord]) -> String {
    let mut out = format!("## {} ({})", version, date.format("%d-%m-%Y"));

    let mut section_order: Vec<String> = Vec::new();
    for commit in commits {
        let key = match &commit.commit_type {
            Some(t) => t.clone(),
            None if commit.revert => "revert".to_string(),
            None => continue,
        };
        if !section_order.contains(&key) {
            section_order.push(key);
        }
    }

    // Features and fixes always lead when present
    for pinned in ["fix", "feat"] {
        if let Some(pos) = section_order.iter().position(|t| t == pinned) {
            let key = section_order.remove(pos);
            section_order.insert(0, key);
        }
    }

    for section in &section_order {
        let entries: Vec<String> = commits
            .iter()
            .filter(|c| {
                c.commit_type.as_deref() == Some(section.as_str())
                    || (section == "revert" && c.commit_type.is_none() && c.revert)
            })
            .map(bullet)
            .collect();

        if !entries.is_empty() {
            out.push_str(&format!("\n\n### {}\n\n{}", section_title(section), entries.join("\n")));
        }
    }

    let breaking: Vec<String> = commits.iter().filter(|c| c.breaking).map(bullet).collect();
    if !breaking.is_empty() {
        out.push_str(&format!("\n\n### BREAKING CHANGES\n\n{}", breaking.join("\n")));
    }

    out.push('\n');
    out
}
