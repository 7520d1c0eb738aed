mod discover;
mod git;
mod helm;

pub use discover::{find_chart_files, paths_to_chart_names};
pub use git::{file_at_revision, previous_version, repo_root, staged_files};
pub use helm::update_chart_dependencies;
