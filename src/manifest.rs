use std::fs;
use std::path::Path;

use semver::Version;

use crate::error::{ReleaseError, Result};

/// Reads the `version` field from the package manifest.
///
/// TOML manifests (by extension) are checked for `[package] version` first,
/// then a top-level `version`; anything else is treated as JSON with a
/// top-level `version` field.
pub fn read_version(path: &Path) -> Result<Version> {
    let content = fs::read_to_string(path)?;

    let raw = if is_toml(path) {
        toml_version(&content)?
    } else {
        json_version(&content)?
    };

    Version::parse(&raw).map_err(|e| {
        ReleaseError::version(format!("manifest version '{}' is not semver: {}", raw, e))
    })
}

/// Writes the next version into the manifest, mutating only the version
/// field and rewriting the document.
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    let content = fs::read_to_string(path)?;
    let version = version.to_string();

    let updated = if is_toml(path) {
        let mut value: toml::Value = toml::from_str(&content)
            .map_err(|e| ReleaseError::manifest(format!("invalid TOML manifest: {}", e)))?;

        let target = match value.get_mut("package").and_then(|p| p.as_table_mut()) {
            Some(package) => package,
            None => value
                .as_table_mut()
                .ok_or_else(|| ReleaseError::manifest("TOML manifest is not a table"))?,
        };
        target.insert("version".to_string(), toml::Value::String(version));

        toml::to_string(&value)
            .map_err(|e| ReleaseError::manifest(format!("failed to render manifest: {}", e)))?
    } else {
        let mut value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| ReleaseError::manifest(format!("invalid JSON manifest: {}", e)))?;

        let object = value
            .as_object_mut()
            .ok_or_else(|| ReleaseError::manifest("JSON manifest is not an object"))?;
        object.insert("version".to_string(), serde_json::Value::String(version));

        let mut rendered = serde_json::to_string_pretty(&value)
            .map_err(|e| ReleaseError::manifest(format!("failed to render manifest: {}", e)))?;
        rendered.push('\n');
        rendered
    };

    fs::write(path, updated)?;
    Ok(())
}

fn is_toml(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("toml")
}

fn toml_version(content: &str) -> Result<String> {
    let value: toml::Value = toml::from_str(content)
        .map_err(|e| ReleaseError::manifest(format!("invalid TOML manifest: {}", e)))?;

    value
        .get("package")
        .and_then(|p| p.get("version"))
        .or_else(|| value.get("version"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| ReleaseError::manifest("TOML manifest has no version field"))
}

fn json_version(content: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(content)
        .map_err(|e| ReleaseError::manifest(format!("invalid JSON manifest: {}", e)))?;

    value
        .get("version")
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| ReleaseError::manifest("JSON manifest has no version field"))
}
