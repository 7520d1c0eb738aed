use std::collections::{BTreeSet, VecDeque};
use std::fs;
use std::path::{Path, PathBuf};

use chartgraph_core::{ChartManifest, MANIFEST_FILE_NAME};

/// Recursively collect every Chart.yaml under the given roots. Results are
/// de-duplicated by canonical path (roots may overlap) and sorted, so the
/// scan order is stable regardless of directory iteration order. Unreadable
/// or missing roots are skipped with a warning.
pub fn find_chart_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    let mut seen: BTreeSet<PathBuf> = BTreeSet::new();
    let mut chart_files = Vec::new();

    for root in roots {
        if !root.exists() {
            eprintln!("warning: root path does not exist: {}", root.display());
            continue;
        }
        if !root.is_dir() {
            eprintln!("warning: root path is not a directory: {}", root.display());
            continue;
        }

        let mut queue: VecDeque<PathBuf> = VecDeque::new();
        queue.push_back(root.clone());

        while let Some(dir) = queue.pop_front() {
            let entries = match fs::read_dir(&dir) {
                Ok(entries) => entries,
                Err(err) => {
                    eprintln!("warning: failed reading directory {}: {err}", dir.display());
                    continue;
                }
            };
            for entry in entries.flatten() {
                let path = entry.path();
                let Ok(file_type) = entry.file_type() else {
                    continue;
                };
                if file_type.is_dir() {
                    queue.push_back(path);
                } else if file_type.is_file() && entry.file_name() == MANIFEST_FILE_NAME {
                    let resolved = path.canonicalize().unwrap_or(path);
                    if seen.insert(resolved.clone()) {
                        chart_files.push(resolved);
                    }
                }
            }
        }
    }

    chart_files.sort();
    chart_files
}

/// Map arbitrary repository paths to the names of the charts that own them:
/// a chart directory, its Chart.yaml or values.yaml, or anything under its
/// templates/ directory. Relative paths are resolved against `base`.
/// Nonexistent paths warn and are skipped.
pub fn paths_to_chart_names(paths: &[String], base: &Path) -> Vec<String> {
    let mut chart_files: BTreeSet<PathBuf> = BTreeSet::new();

    for raw in paths {
        let mut path = PathBuf::from(raw);
        if path.is_relative() {
            path = base.join(path);
        }
        if !path.exists() {
            eprintln!("warning: path does not exist: {}", path.display());
            continue;
        }

        let manifest = owning_manifest(&path);
        if let Some(manifest) = manifest {
            if manifest.exists() {
                chart_files.insert(manifest);
            }
        }
    }

    let mut names = BTreeSet::new();
    for chart_file in chart_files {
        match ChartManifest::load(&chart_file) {
            Ok(manifest) => {
                names.insert(manifest.name);
            }
            Err(err) => eprintln!("warning: {err:#}"),
        }
    }
    names.into_iter().collect()
}

fn owning_manifest(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        return Some(path.join(MANIFEST_FILE_NAME));
    }
    let file_name = path.file_name().and_then(|name| name.to_str())?;
    if file_name == MANIFEST_FILE_NAME {
        return Some(path.to_path_buf());
    }
    if file_name == "values.yaml" {
        return path.parent().map(|dir| dir.join(MANIFEST_FILE_NAME));
    }
    let in_templates = path
        .components()
        .any(|component| component.as_os_str() == "templates");
    if path.extension().and_then(|ext| ext.to_str()) == Some("tpl") || in_templates {
        return path
            .parent()
            .and_then(Path::parent)
            .map(|dir| dir.join(MANIFEST_FILE_NAME));
    }
    None
}
