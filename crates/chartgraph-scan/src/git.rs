use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{bail, Context, Result};
use chartgraph_core::ChartManifest;

fn run_git(args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .output()
        .with_context(|| format!("failed launching git {}", args.join(" ")))?;
    if !output.status.success() {
        bail!(
            "git {} failed: {}",
            args.join(" "),
            String::from_utf8_lossy(&output.stderr).trim()
        );
    }
    String::from_utf8(output.stdout).context("git produced non-UTF-8 output")
}

/// Working-tree root of the enclosing git repository.
pub fn repo_root() -> Result<PathBuf> {
    let output = run_git(&["rev-parse", "--show-toplevel"])?;
    Ok(PathBuf::from(output.trim()))
}

/// Paths of files staged with modifications, relative to the repository root.
pub fn staged_files() -> Result<Vec<String>> {
    let output = run_git(&["diff", "--cached", "--name-only", "--diff-filter=M"])?;
    Ok(output
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(str::to_string)
        .collect())
}

/// Contents of `path` at `revision`, or None when the file did not exist
/// there.
pub fn file_at_revision(revision: &str, path: &Path) -> Result<Option<String>> {
    let root = repo_root()?;
    let relative = path.strip_prefix(&root).unwrap_or(path);
    let spec = format!("{revision}:{}", git_path(relative));

    let output = Command::new("git")
        .arg("show")
        .arg(&spec)
        .output()
        .with_context(|| format!("failed launching git show {spec}"))?;
    if !output.status.success() {
        return Ok(None);
    }
    let contents =
        String::from_utf8(output.stdout).context("git show produced non-UTF-8 output")?;
    Ok(Some(contents))
}

/// A chart's version at a prior revision. None when the manifest did not
/// exist at that revision or can no longer be parsed.
pub fn previous_version(manifest_path: &Path, revision: &str) -> Result<Option<String>> {
    let Some(contents) = file_at_revision(revision, manifest_path)? else {
        return Ok(None);
    };
    match ChartManifest::from_yaml_str(&contents, manifest_path) {
        Ok(manifest) => Ok(Some(manifest.version)),
        Err(err) => {
            eprintln!("warning: {err:#} (at revision {revision})");
            Ok(None)
        }
    }
}

/// Git path specs always use forward slashes, regardless of platform.
pub(crate) fn git_path(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
