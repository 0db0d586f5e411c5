//! Version rewriting for each kind of project
//!
//! Every updater reads the project file, computes the new contents and
//! returns them as [`FileChange`]s. Nothing touches the disk until a change is
//! applied, which keeps dry runs and real runs on the same code path.
//!
//! | Type         | File            | What changes                                       |
//! |--------------|-----------------|----------------------------------------------------|
//! | `manifest`   | `manifest.json` | top-level `version`                                |
//! | `npm`        | `package.json`  | top-level `version`, plus `package-lock.json`       |
//! | `rust_crate` | `Cargo.toml`    | first line-leading `version = "..."`                |
//! | `maven`      | `pom.xml`       | text of `<project><version>`                        |

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::LazyLock;

use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ReleaseError, Result};

static CRATE_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?m)^version\s*=\s*"[^"]*""#).unwrap());

const NPM_LOCKFILE: &str = "package-lock.json";
const CDATA_OPEN: &str = "<![CDATA[";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectType {
    /// Browser extension manifest
    Manifest,
    Npm,
    RustCrate,
    Maven,
}

/// A project whose version follows the release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Project {
    /// Project file, relative to the repository root
    pub path: PathBuf,
    #[serde(rename = "type")]
    pub kind: ProjectType,
    /// Package whose `Cargo.lock` entry is refreshed after a crate bump
    #[serde(default)]
    pub lock_package: Option<String>,
}

impl Project {
    pub fn new(path: &str, kind: ProjectType) -> Self {
        Self {
            path: PathBuf::from(path),
            kind,
            lock_package: None,
        }
    }

    pub fn with_lock_package(mut self, package: &str) -> Self {
        self.lock_package = Some(package.to_string());
        self
    }

    /// New contents of every file the release touches for this project
    pub fn plan(&self, root: &Path, version: &str) -> Result<Vec<FileChange>> {
        let path = root.join(&self.path);
        debug!(path = %path.display(), kind = ?self.kind, "Planning project update");

        match self.kind {
            ProjectType::Manifest => Ok(vec![update_manifest(&path, version)?]),
            ProjectType::Npm => update_npm(&path, version),
            ProjectType::RustCrate => Ok(vec![update_rust_crate(&path, version)?]),
            ProjectType::Maven => Ok(vec![update_maven(&path, version)?]),
        }
    }
}

/// Pending rewrite of one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: PathBuf,
    pub contents: String,
}

impl FileChange {
    pub fn apply(&self) -> Result<()> {
        std::fs::write(&self.path, &self.contents).map_err(|e| ReleaseError::io(&self.path, e))?;
        info!(path = %self.path.display(), "Updated");
        Ok(())
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| ReleaseError::io(path, e))
}

/// Sets the top-level `version` of a JSON document, keeping key order
pub fn set_json_version(path: &Path, content: &str, version: &str) -> Result<String> {
    let mut document: Value = serde_json::from_str(content)?;
    let object = document
        .as_object_mut()
        .ok_or_else(|| ReleaseError::InvalidDocument {
            path: path.to_path_buf(),
            reason: "top level is not an object".to_string(),
        })?;
    object.insert("version".to_string(), Value::String(version.to_string()));

    if let Some(root_package) = object
        .get_mut("packages")
        .and_then(|packages| packages.get_mut(""))
        .and_then(Value::as_object_mut)
    {
        root_package.insert("version".to_string(), Value::String(version.to_string()));
    }

    let mut updated = serde_json::to_string_pretty(&document)?;
    if content.ends_with('\n') {
        updated.push('\n');
    }
    Ok(updated)
}

pub fn update_manifest(path: &Path, version: &str) -> Result<FileChange> {
    let content = read(path)?;
    Ok(FileChange {
        path: path.to_path_buf(),
        contents: set_json_version(path, &content, version)?,
    })
}

/// `package.json` and, when present, the `package-lock.json` beside it
pub fn update_npm(path: &Path, version: &str) -> Result<Vec<FileChange>> {
    let mut changes = vec![update_manifest(path, version)?];

    let lockfile = path.with_file_name(NPM_LOCKFILE);
    if lockfile.exists() {
        changes.push(update_manifest(&lockfile, version)?);
    } else {
        debug!(path = %lockfile.display(), "No npm lockfile");
    }
    Ok(changes)
}

pub fn set_crate_version(path: &Path, content: &str, version: &str) -> Result<String> {
    if !CRATE_VERSION.is_match(content) {
        return Err(ReleaseError::VersionNotFound(path.to_path_buf()));
    }
    let replacement = format!("version = \"{}\"", version);
    Ok(CRATE_VERSION
        .replace(content, NoExpand(&replacement))
        .into_owned())
}

pub fn update_rust_crate(path: &Path, version: &str) -> Result<FileChange> {
    let content = read(path)?;
    Ok(FileChange {
        path: path.to_path_buf(),
        contents: set_crate_version(path, &content, version)?,
    })
}

/// Runs `cargo update -p <package>` next to a crate manifest
pub fn refresh_lockfile(manifest: &Path, package: &str) -> Result<()> {
    let directory = manifest.parent().unwrap_or_else(|| Path::new("."));
    let command = format!("cargo update -p {}", package);
    info!(directory = %directory.display(), command = %command, "Refreshing lockfile");

    let status = Command::new("cargo")
        .args(["update", "-p", package])
        .current_dir(directory)
        .status()
        .map_err(|e| ReleaseError::Command {
            command: command.clone(),
            reason: e.to_string(),
        })?;

    if !status.success() {
        return Err(ReleaseError::Command {
            command,
            reason: status.to_string(),
        });
    }
    Ok(())
}

/// Replaces the text of `<project><version>` and nothing else
///
/// Versions of the parent, dependencies and plugins live deeper in the tree
/// and are left alone.
pub fn set_maven_version(path: &Path, content: &str, version: &str) -> Result<String> {
    let mut reader = Reader::from_str(content);
    let mut stack: Vec<String> = Vec::new();
    let mut range: Option<(usize, usize)> = None;

    loop {
        let position = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                stack.push(String::from_utf8_lossy(e.name().as_ref()).into_owned());
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(e) if is_project_version(&stack) => {
                let raw = &content[position..position + e.len()];
                let value = raw.trim();
                if value.is_empty() {
                    continue;
                }
                let start = position + (raw.len() - raw.trim_start().len());
                range = Some((start, start + value.len()));
                break;
            }
            Event::CData(e) if is_project_version(&stack) => {
                let start = position + CDATA_OPEN.len();
                range = Some((start, start + e.len()));
                break;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    let (start, end) = range.ok_or_else(|| ReleaseError::VersionNotFound(path.to_path_buf()))?;
    let mut updated = String::with_capacity(content.len() + version.len());
    updated.push_str(&content[..start]);
    updated.push_str(version);
    updated.push_str(&content[end..]);
    Ok(updated)
}

fn is_project_version(stack: &[String]) -> bool {
    matches!(stack, [project, version] if project == "project" && version == "version")
}

pub fn update_maven(path: &Path, version: &str) -> Result<FileChange> {
    let content = read(path)?;
    Ok(FileChange {
        path: path.to_path_buf(),
        contents: set_maven_version(path, &content, version)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> &'static Path {
        Path::new("test")
    }

    #[test]
    fn test_json_keeps_key_order_and_indent() {
        let content = "{\n  \"name\": \"Zana\",\n  \"version\": \"0.1.0\",\n  \"manifest_version\": 2\n}";
        let updated = set_json_version(path(), content, "0.2.0").unwrap();
        assert_eq!(
            updated,
            "{\n  \"name\": \"Zana\",\n  \"version\": \"0.2.0\",\n  \"manifest_version\": 2\n}"
        );
    }

    #[test]
    fn test_json_without_object_is_rejected() {
        let err = set_json_version(path(), "[1, 2]", "0.2.0").unwrap_err();
        assert!(matches!(err, ReleaseError::InvalidDocument { .. }));
    }

    #[test]
    fn test_json_lockfile_root_package() {
        let content = r#"{"name":"zana","version":"0.1.0","packages":{"":{"name":"zana","version":"0.1.0"},"node_modules/jest":{"version":"29.0.0"}}}"#;
        let updated: Value =
            serde_json::from_str(&set_json_version(path(), content, "0.2.0").unwrap()).unwrap();
        assert_eq!(updated["version"], "0.2.0");
        assert_eq!(updated["packages"][""]["version"], "0.2.0");
        assert_eq!(updated["packages"]["node_modules/jest"]["version"], "29.0.0");
    }

    #[test]
    fn test_crate_version_replaces_first_line_only() {
        let content = "[package]\nname = \"zana\"\nversion = \"0.1.0\"\n\n[dependencies]\nserde = { version = \"1.0\" }\n\n[dev-dependencies]\nversion = \"9.9.9\"\n";
        let updated = set_crate_version(path(), content, "0.2.0").unwrap();
        assert!(updated.contains("version = \"0.2.0\"\n\n[dependencies]"));
        assert!(updated.contains("serde = { version = \"1.0\" }"));
        assert!(updated.contains("version = \"9.9.9\""));
    }

    #[test]
    fn test_crate_without_version() {
        let err = set_crate_version(path(), "[package]\nversion.workspace = true\n", "0.2.0").unwrap_err();
        assert!(matches!(err, ReleaseError::VersionNotFound(_)));
    }

    #[test]
    fn test_maven_project_version_only() {
        let content = r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0">
    <parent>
        <version>3.0.0</version>
    </parent>
    <groupId>com.kushtrimh</groupId>
    <version>0.1.0</version>
    <dependencies>
        <dependency>
            <version>2.1.0</version>
        </dependency>
    </dependencies>
</project>
"#;
        let updated = set_maven_version(path(), content, "0.2.0").unwrap();
        assert_eq!(updated, content.replace("<version>0.1.0</version>", "<version>0.2.0</version>"));
    }

    #[test]
    fn test_maven_version_next_to_comment() {
        let content = "<project>\n  <version><!-- bumped on release -->\n    0.1.0\n  </version>\n</project>\n";
        let updated = set_maven_version(path(), content, "0.2.0").unwrap();
        assert_eq!(
            updated,
            "<project>\n  <version><!-- bumped on release -->\n    0.2.0\n  </version>\n</project>\n"
        );
    }

    #[test]
    fn test_maven_version_in_cdata() {
        let content = "<project><version><![CDATA[0.1.0]]></version></project>";
        let updated = set_maven_version(path(), content, "0.2.0").unwrap();
        assert_eq!(updated, "<project><version><![CDATA[0.2.0]]></version></project>");
    }

    #[test]
    fn test_maven_without_project_version() {
        let content = "<project><parent><version>1.0</version></parent></project>";
        let err = set_maven_version(path(), content, "0.2.0").unwrap_err();
        assert!(matches!(err, ReleaseError::VersionNotFound(_)));
    }

    #[test]
    fn test_project_type_from_toml_name() {
        let project: Project =
            serde_json::from_str(r#"{"path": "a/Cargo.toml", "type": "rust_crate", "lock_package": "zana"}"#)
                .unwrap();
        assert_eq!(project.kind, ProjectType::RustCrate);
        assert_eq!(project.lock_package.as_deref(), Some("zana"));
    }
}
