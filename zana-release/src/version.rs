//! Release version arithmetic and the `VERSION` file

use std::path::Path;

use clap::ValueEnum;
use semver::Version;

use crate::error::{ReleaseError, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReleaseType {
    Minor,
    #[default]
    Patch,
}

/// Next version for `release_type`
///
/// A minor release keeps the patch number. Pre-release and build metadata
/// are dropped.
pub fn bump(version: &Version, release_type: ReleaseType) -> Version {
    match release_type {
        ReleaseType::Minor => Version::new(version.major, version.minor + 1, version.patch),
        ReleaseType::Patch => Version::new(version.major, version.minor, version.patch + 1),
    }
}

pub fn read_version(path: &Path) -> Result<Version> {
    let content = std::fs::read_to_string(path).map_err(|e| ReleaseError::io(path, e))?;
    Ok(Version::parse(content.trim())?)
}

/// Writes the bare version, without a trailing newline
pub fn write_version(path: &Path, version: &Version) -> Result<()> {
    std::fs::write(path, version.to_string()).map_err(|e| ReleaseError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_bump() {
        let version = Version::parse("0.1.9").unwrap();
        assert_eq!(bump(&version, ReleaseType::Patch), Version::new(0, 1, 10));
    }

    #[test]
    fn test_minor_bump_keeps_patch() {
        let version = Version::parse("1.4.2").unwrap();
        assert_eq!(bump(&version, ReleaseType::Minor), Version::new(1, 5, 2));
    }

    #[test]
    fn test_bump_drops_pre_release() {
        let version = Version::parse("2.0.0-rc.1").unwrap();
        assert_eq!(bump(&version, ReleaseType::Patch), Version::new(2, 0, 1));
    }

    #[test]
    fn test_default_release_type_is_patch() {
        assert_eq!(ReleaseType::default(), ReleaseType::Patch);
    }
}
