use std::process::Command;

use chartgraph_core::ChartManifest;

/// Run `helm dependency update` in the chart directory to materialize its
/// dependency archives. Failures are warnings: one chart failing must not
/// stop a batch over many charts.
pub fn update_chart_dependencies(manifest: &ChartManifest, dry_run: bool) {
    if manifest.dependencies.is_empty() {
        println!("No dependencies to update for chart {}.", manifest.name);
        return;
    }
    if dry_run {
        println!(
            "dry-run: would update dependencies for chart {}",
            manifest.name
        );
        return;
    }

    println!("Updating dependencies for chart {}...", manifest.name);
    let status = Command::new("helm")
        .arg("dependency")
        .arg("update")
        .current_dir(&manifest.path)
        .status();
    match status {
        Ok(status) if status.success() => {}
        Ok(status) => eprintln!(
            "warning: helm dependency update failed for chart '{}': {status}",
            manifest.name
        ),
        Err(err) => eprintln!(
            "warning: failed launching helm for chart '{}': {err}",
            manifest.name
        ),
    }
}
