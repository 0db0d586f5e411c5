//! # zana-release
//!
//! Bumps the release version and propagates it to every project manifest.
//!
//! Projects are updated one after the other; the first failure aborts the
//! release and leaves already written files as they are.

use std::path::{Path, PathBuf};

use semver::Version;
use tracing::info;

pub mod config;
pub mod error;
pub mod project;
pub mod version;

pub use config::ReleaseConfig;
pub use error::{ReleaseError, Result};
pub use project::{FileChange, Project, ProjectType};
pub use version::{bump, ReleaseType};

#[derive(Debug, Clone, Copy, Default)]
pub struct ReleaseOptions {
    /// Plan every change without writing anything
    pub dry_run: bool,
    /// Run `cargo update -p` for crates that name a lock package
    pub refresh_lockfiles: bool,
}

#[derive(Debug, Clone)]
pub struct ReleaseReport {
    pub previous: Version,
    pub version: Version,
    /// Every file written, or that would be written on a dry run
    pub changes: Vec<FileChange>,
}

impl ReleaseReport {
    pub fn paths(&self) -> Vec<&Path> {
        self.changes.iter().map(|c| c.path.as_path()).collect()
    }
}

/// Runs a release for the repository at `root`
pub fn release(
    root: &Path,
    config: &ReleaseConfig,
    release_type: ReleaseType,
    options: ReleaseOptions,
) -> Result<ReleaseReport> {
    let version_file: PathBuf = root.join(&config.version_file);
    let previous = version::read_version(&version_file)?;
    let next = version::bump(&previous, release_type);
    let next_text = next.to_string();
    info!(previous = %previous, version = %next, release_type = ?release_type, "Releasing");

    let mut changes = vec![FileChange {
        path: version_file,
        contents: next_text.clone(),
    }];
    if !options.dry_run {
        version::write_version(&changes[0].path, &next)?;
    }

    for project in &config.projects {
        let planned = project.plan(root, &next_text)?;
        if !options.dry_run {
            for change in &planned {
                change.apply()?;
            }
            if let (true, Some(package)) = (options.refresh_lockfiles, &project.lock_package) {
                project::refresh_lockfile(&root.join(&project.path), package)?;
            }
        }
        changes.extend(planned);
    }

    Ok(ReleaseReport {
        previous,
        version: next,
        changes,
    })
}
