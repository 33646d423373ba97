use regex::Regex;

/// Issue reference parsed from a commit message (e.g. `Closes #12`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub action: Option<String>,
    pub issue: String,
    pub raw: String,
}

/// Parsed representation of a conventional commit message.
///
/// `commit_type` is `None` for messages that do not conform to the
/// conventional grammar; such records never match a type rule but still
/// carry their subject and any breaking-change markers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommitRecord {
    pub commit_type: Option<String>,
    pub scope: Option<String>,
    pub subject: String,
    pub body: Option<String>,
    pub footer: Option<String>,
    pub breaking: bool,
    pub revert: bool,
    pub references: Vec<Reference>,
}

fn header_regex() -> Option<Regex> {
    Regex::new(r"^([a-z]+)(?:\(([^)]+)\))?(!)?:\s*(.*)$").ok()
}

fn revert_regex() -> Option<Regex> {
    Regex::new(r#"^[Rr]evert\s+"?(.+?)"?\s*$"#).ok()
}

fn reference_regex() -> Option<Regex> {
    Regex::new(r"(?i)(?:(close[sd]?|fix(?:e[sd])?|resolve[sd]?)\s+)?#(\d+)").ok()
}

fn has_breaking_note(message: &str) -> bool {
    message.contains("BREAKING CHANGE:") || message.contains("BREAKING-CHANGE:")
}

/// Parse a single commit message according to the conventional commits
/// grammar.
///
/// Supported header formats:
/// - `type(scope)!: subject`
/// - `type(scope): subject`
/// - `type!: subject`
/// - `type: subject`
/// - `Revert "reverted commit header"`
/// - free text (yields a record with no type)
///
/// The remainder of the message is split on blank lines; a trailing
/// paragraph carrying references or a `BREAKING CHANGE:` note becomes the
/// footer, everything in between the body.
pub fn parse_commit(message: &str) -> CommitRecord {
    let message = message.trim();
    let (header, rest) = match message.split_once('\n') {
        Some((h, r)) => (h.trim(), r.trim()),
        None => (message, ""),
    };

    let (body, footer) = split_body_footer(rest);
    let references = parse_references(message);
    let breaking_note = has_breaking_note(message);

    if let Some(captures) = header_regex().and_then(|re| re.captures(header)) {
        let commit_type = captures.get(1).map(|m| m.as_str().to_string());
        let scope = captures.get(2).map(|m| m.as_str().to_string());
        let has_bang = captures.get(3).is_some();
        let subject = captures
            .get(4)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        let revert = commit_type.as_deref() == Some("revert");

        return CommitRecord {
            commit_type,
            scope,
            subject,
            body,
            footer,
            breaking: has_bang || breaking_note,
            revert,
            references,
        };
    }

    // A "Revert" header produced by git has no conventional type
    if let Some(captures) = revert_regex().and_then(|re| re.captures(header)) {
        let subject = captures
            .get(1)
            .map(|m| m.as_str().to_string())
            .unwrap_or_default();

        return CommitRecord {
            commit_type: None,
            scope: None,
            subject,
            body,
            footer,
            breaking: breaking_note,
            revert: true,
            references,
        };
    }

    // Non-conventional message: no type, subject is the header line
    CommitRecord {
        commit_type: None,
        scope: None,
        subject: header.to_string(),
        body,
        footer,
        breaking: breaking_note,
        revert: false,
        references,
    }
}

/// Split the post-header text into body and footer paragraphs.
fn split_body_footer(rest: &str) -> (Option<String>, Option<String>) {
    if rest.is_empty() {
        return (None, None);
    }

    let paragraphs: Vec<&str> = rest
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    match paragraphs.split_last() {
        Some((last, init)) if is_footer_paragraph(last) => {
            let body = if init.is_empty() {
                None
            } else {
                Some(init.join("\n\n"))
            };
            (body, Some((*last).to_string()))
        }
        Some(_) => (Some(paragraphs.join("\n\n")), None),
        None => (None, None),
    }
}

fn is_footer_paragraph(paragraph: &str) -> bool {
    has_breaking_note(paragraph)
        || reference_regex()
            .map(|re| re.is_match(paragraph))
            .unwrap_or(false)
}

fn parse_references(message: &str) -> Vec<Reference> {
    let Some(re) = reference_regex() else {
        return Vec::new();
    };

    re.captures_iter(message)
        .map(|captures| Reference {
            action: captures.get(1).map(|m| m.as_str().to_string()),
            issue: captures
                .get(2)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
            raw: captures
                .get(0)
                .map(|m| m.as_str().to_string())
                .unwrap_or_default(),
        })
        .collect()
}

/// Parse a pull request description into an ordered list of commit records.
///
/// Descriptions carrying `===` separator lines are treated as a sequence of
/// full multi-line commit messages. Otherwise each non-empty line is one
/// single-line message, with leading list bullets stripped.
pub fn parse_messages(text: &str) -> Vec<CommitRecord> {
    let has_separator = text.lines().any(|line| line.trim() == "===");

    if has_separator {
        text.split("\n===")
            .map(|block| block.trim_start_matches("===").trim())
            .filter(|block| !block.is_empty())
            .map(parse_commit)
            .collect()
    } else {
        text.lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches("* ")
                    .trim_start_matches("- ")
                    .trim()
            })
            .filter(|line| !line.is_empty())
            .map(parse_commit)
            .collect()
    }
}
