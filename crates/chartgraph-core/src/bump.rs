use std::fmt;
use std::str::FromStr;

use anyhow::{anyhow, Error};
use semver::Version;

/// The semver component a bump applies to. Closed set; anything else is
/// rejected when the value is parsed at the CLI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPart {
    Major,
    Minor,
    Patch,
}

impl BumpPart {
    /// Increment the selected component, resetting the lower ones and
    /// clearing pre-release/build metadata.
    pub fn apply(self, version: &Version) -> Version {
        match self {
            Self::Major => Version::new(version.major + 1, 0, 0),
            Self::Minor => Version::new(version.major, version.minor + 1, 0),
            Self::Patch => Version::new(version.major, version.minor, version.patch + 1),
        }
    }
}

impl FromStr for BumpPart {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        match value {
            "major" => Ok(Self::Major),
            "minor" => Ok(Self::Minor),
            "patch" => Ok(Self::Patch),
            other => Err(anyhow!(
                "bump part must be 'major', 'minor', or 'patch', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for BumpPart {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Patch => "patch",
        };
        formatter.write_str(label)
    }
}
