use semver::Version;

use crate::conventional::CommitRecord;

pub fn display_error(message: &str) {
    eprintln!("\x1b[31mERROR:\x1b[0m {}", message); // Red color
}

pub fn display_success(message: &str) {
    println!("\x1b[32m✓\x1b[0m {}", message); // Green color
}

pub fn display_status(message: &str) {
    println!("\x1b[33m→\x1b[0m {}", message); // Yellow color
}

pub fn display_commit_summary(commits: &[CommitRecord]) {
    println!(
        "\n\x1b[1mParsed {} message(s) from the pull request\x1b[0m",
        commits.len()
    );

    for (i, commit) in commits.iter().take(10).enumerate() {
        let label = match &commit.commit_type {
            Some(t) => t.as_str(),
            None if commit.revert => "revert",
            None => "-",
        };
        let marker = if commit.breaking { "!" } else { "" };
        println!("  {}. [{}{}] {}", i + 1, label, marker, commit.subject);
    }

    if commits.len() > 10 {
        println!("  ... and {} more messages", commits.len() - 10);
    }
}

pub fn display_version_change(current: &Version, next: &Version) {
    println!("\n\x1b[1mVersion Change:\x1b[0m");
    println!("  From: \x1b[31m{}\x1b[0m", current);
    println!("  To:   \x1b[32m{}\x1b[0m", next);
}
