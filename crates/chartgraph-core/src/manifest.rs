use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const MANIFEST_FILE_NAME: &str = "Chart.yaml";

/// One dependency declaration inside a chart manifest. Fields this tool does
/// not manage (e.g. `repository`) are captured in `extra` so write-back keeps
/// them intact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartDependency {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(flatten)]
    pub extra: serde_yaml::Mapping,
}

impl ChartDependency {
    /// The identity a dependency edge points at: the alias when one is set,
    /// otherwise the declared name. Blank values yield `None` and the
    /// declaration is ignored by graph construction.
    pub fn effective_child(&self) -> Option<&str> {
        let child = self.alias.as_deref().unwrap_or(&self.name).trim();
        (!child.is_empty()).then_some(child)
    }
}

#[derive(Debug, Deserialize)]
struct RawChart {
    name: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    version: Option<String>,
    dependencies: Option<Vec<ChartDependency>>,
}

/// A parsed chart manifest. `version` stays a raw string here; it is parsed
/// as semver only at the bump boundary so a malformed version does not block
/// graph construction.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ChartManifest {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub version: String,
    pub path: PathBuf,
    pub dependencies: Vec<ChartDependency>,
}

impl ChartManifest {
    pub fn load(chart_yaml: &Path) -> Result<Self> {
        let contents = fs::read_to_string(chart_yaml)
            .with_context(|| format!("failed reading chart manifest {}", chart_yaml.display()))?;
        Self::from_yaml_str(&contents, chart_yaml)
    }

    /// Parse manifest text as if it lived at `chart_yaml`. A missing `name`
    /// falls back to the containing directory's name.
    pub fn from_yaml_str(input: &str, chart_yaml: &Path) -> Result<Self> {
        let raw: RawChart = serde_yaml::from_str(input)
            .with_context(|| format!("failed parsing chart manifest {}", chart_yaml.display()))?;

        let path = chart_yaml.parent().map(Path::to_path_buf).unwrap_or_default();
        let directory_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let name = match raw.name {
            Some(name) if !name.trim().is_empty() => name,
            _ => directory_name,
        };

        Ok(Self {
            name,
            kind: raw.kind.unwrap_or_else(|| "application".to_string()),
            version: raw.version.unwrap_or_default(),
            path,
            dependencies: raw.dependencies.unwrap_or_default(),
        })
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.path.join(MANIFEST_FILE_NAME)
    }

    /// Write the manifest back to disk. Only the four managed keys are
    /// replaced; every other field in the live file is carried over as-is.
    pub fn save(&self) -> Result<()> {
        let manifest_path = self.manifest_path();
        let contents = fs::read_to_string(&manifest_path).with_context(|| {
            format!("failed reading chart manifest {}", manifest_path.display())
        })?;
        let mut document: serde_yaml::Mapping = serde_yaml::from_str(&contents)
            .with_context(|| format!("failed parsing chart manifest {}", manifest_path.display()))?;

        document.insert("name".into(), self.name.clone().into());
        document.insert("type".into(), self.kind.clone().into());
        document.insert("version".into(), self.version.clone().into());
        document.insert(
            "dependencies".into(),
            serde_yaml::to_value(&self.dependencies)
                .context("failed serializing chart dependencies")?,
        );

        let rendered =
            serde_yaml::to_string(&document).context("failed serializing chart manifest")?;
        fs::write(&manifest_path, rendered).with_context(|| {
            format!("failed writing chart manifest {}", manifest_path.display())
        })
    }
}
