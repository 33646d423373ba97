// tests/config_test.rs
use std::env;
use std::io::Write;

use serial_test::serial;
use tempfile::NamedTempFile;

use version_release::analyzer::default_rules;
use version_release::config::{load_file_config, Config, FileConfig};
use version_release::version::BumpLevel;

#[test]
fn test_default_file_config() {
    let config = FileConfig::default();
    assert_eq!(config.manifest, "package.json");
    assert_eq!(config.changelog, "CHANGELOG.md");
    assert_eq!(config.default_branch, "master");
    assert!(config.npm_publish);
    assert_eq!(config.rules, default_rules());
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
manifest = "Cargo.toml"
changelog = "CHANGES.md"
default_branch = "main"
npm_publish = false

[[rules]]
breaking = true
release = "major"

[[rules]]
type = "feat"
release = "minor"

[[rules]]
type = "fix"
release = "patch"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let config = load_file_config(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(config.manifest, "Cargo.toml");
    assert_eq!(config.changelog, "CHANGES.md");
    assert_eq!(config.default_branch, "main");
    assert!(!config.npm_publish);
    assert_eq!(config.rules.len(), 3);
    assert_eq!(config.rules[1].release, BumpLevel::Minor);
}

#[test]
fn test_load_invalid_file_is_an_error() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"manifest = [not valid").unwrap();
    temp_file.flush().unwrap();

    let err = load_file_config(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().contains("Configuration error"));
}

fn clear_release_env() {
    for name in [
        "GH_TOKEN",
        "CIRCLE_PROJECT_USERNAME",
        "CIRCLE_PROJECT_REPONAME",
        "CIRCLE_USERNAME",
        "VERSION_RELEASE_GIT_AUTHOR_NAME",
        "VERSION_RELEASE_GIT_AUTHOR_EMAIL",
    ] {
        env::remove_var(name);
    }
}

#[test]
#[serial]
fn test_config_from_env() {
    clear_release_env();
    env::set_var("GH_TOKEN", "secret");
    env::set_var("CIRCLE_PROJECT_USERNAME", "octo");
    env::set_var("CIRCLE_PROJECT_REPONAME", "project");
    env::set_var("VERSION_RELEASE_GIT_AUTHOR_NAME", "Release Bot");
    env::set_var("VERSION_RELEASE_GIT_AUTHOR_EMAIL", "bot@example.invalid");

    let config = Config::from_env(FileConfig::default()).unwrap();
    assert_eq!(config.token, "secret");
    assert_eq!(config.owner, "octo");
    assert_eq!(config.repo, "project");
    assert_eq!(config.author_name.as_deref(), Some("Release Bot"));
    assert_eq!(config.author_email.as_deref(), Some("bot@example.invalid"));
    assert_eq!(
        config.push_url,
        "https://secret@github.com/octo/project.git"
    );

    clear_release_env();
}

#[test]
#[serial]
fn test_config_from_env_author_fallback() {
    clear_release_env();
    env::set_var("GH_TOKEN", "secret");
    env::set_var("CIRCLE_PROJECT_USERNAME", "octo");
    env::set_var("CIRCLE_PROJECT_REPONAME", "project");
    env::set_var("CIRCLE_USERNAME", "ci-user");

    let config = Config::from_env(FileConfig::default()).unwrap();
    assert_eq!(config.author_name.as_deref(), Some("ci-user"));
    assert_eq!(config.author_email, None);

    clear_release_env();
}

#[test]
#[serial]
fn test_config_from_env_missing_token() {
    clear_release_env();
    env::set_var("CIRCLE_PROJECT_USERNAME", "octo");
    env::set_var("CIRCLE_PROJECT_REPONAME", "project");

    let err = Config::from_env(FileConfig::default()).unwrap_err();
    assert!(err.to_string().contains("GH_TOKEN"));

    clear_release_env();
}
