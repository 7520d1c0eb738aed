use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use chartgraph_cascade::CascadeState;
use chartgraph_core::{BumpPart, ChartManifest};
use chartgraph_graph::ChartGraph;
use chartgraph_scan::{
    find_chart_files, paths_to_chart_names, previous_version, repo_root, staged_files,
    update_chart_dependencies,
};
use clap::CommandFactory;
use semver::Version;

use crate::mermaid::MermaidDiagram;
use crate::render::{self, current_output_style};
use crate::{ChartMode, Cli, Commands, VersionCommands};

pub(crate) fn run_cli(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "chartgraph", &mut std::io::stdout());
            Ok(ExitCode::SUCCESS)
        }
        command => {
            let graph = load_graph(&cli.roots, cli.internal_only)?;
            if graph.charts().is_empty() {
                eprintln!("no chart manifests discovered");
                return Ok(ExitCode::from(2));
            }
            dispatch(&graph, command)
        }
    }
}

fn dispatch(graph: &ChartGraph, command: Commands) -> Result<ExitCode> {
    match command {
        Commands::Charts {
            json,
            sort,
            reverse,
        } => run_charts(graph, json, sort, reverse),
        Commands::Chart { name, mode, json } => run_chart(graph, &name, mode, json),
        Commands::Version { command } => match command {
            VersionCommands::List { charts } => run_version_list(graph, charts),
            VersionCommands::Bump {
                charts,
                part,
                dry_run,
                json,
                staged,
            } => run_bump(graph, charts, part, dry_run, json, staged),
            VersionCommands::Check {
                charts,
                revision,
                staged,
            } => run_check(graph, charts, &revision, staged),
        },
        Commands::UpdateDependencies {
            charts,
            all,
            dry_run,
        } => run_update_dependencies(graph, charts, all, dry_run),
        Commands::Mermaid {
            chart,
            include_attrs,
            output,
            svg_output,
        } => run_mermaid(graph, chart.as_deref(), include_attrs, output, svg_output),
        Commands::Completions { .. } => unreachable!("handled before graph construction"),
    }
}

/// Discover and parse every chart under the scan roots. Parse failures warn
/// and skip the one manifest; the rest of the graph is still built.
fn load_graph(roots: &[PathBuf], internal_only: bool) -> Result<ChartGraph> {
    let roots = if roots.is_empty() {
        vec![repo_root().context("no --roots given and no enclosing git repository")?]
    } else {
        roots.to_vec()
    };

    let mut manifests = Vec::new();
    for chart_file in find_chart_files(&roots) {
        match ChartManifest::load(&chart_file) {
            Ok(manifest) => manifests.push(manifest),
            Err(err) => eprintln!("warning: {err:#}"),
        }
    }
    Ok(ChartGraph::from_manifests(manifests, internal_only))
}

fn run_charts(graph: &ChartGraph, json: bool, sort: bool, reverse: bool) -> Result<ExitCode> {
    let style = current_output_style();
    if sort {
        let names: Vec<String> = graph.charts().keys().cloned().collect();
        let sorted = graph.sort_by_depth(&names, reverse);
        if json {
            let manifests: Vec<&ChartManifest> = sorted
                .iter()
                .filter_map(|name| graph.charts().get(name))
                .collect();
            println!("{}", serde_json::to_string_pretty(&manifests)?);
        } else {
            for name in &sorted {
                for line in render::chart_info_lines(graph.get(name)?, style) {
                    println!("{line}");
                }
            }
        }
        return Ok(ExitCode::SUCCESS);
    }

    let mut roots = graph.roots();
    roots.sort();
    if json {
        let trees = roots
            .iter()
            .map(|root| graph.dependency_tree(root))
            .collect::<Result<Vec<_>>>()?;
        println!("{}", serde_json::to_string_pretty(&trees)?);
    } else {
        for root in &roots {
            let tree = graph.dependency_tree(root)?;
            for line in render::tree_lines(&tree, false, style) {
                println!("{line}");
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_chart(graph: &ChartGraph, name: &str, mode: ChartMode, json: bool) -> Result<ExitCode> {
    let style = current_output_style();
    match mode {
        ChartMode::Dependency | ChartMode::Dependent => {
            let tree = match mode {
                ChartMode::Dependency => graph.dependency_tree(name)?,
                _ => graph.dependent_tree(name)?,
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&tree)?);
            } else {
                for line in render::tree_lines(&tree, false, style) {
                    println!("{line}");
                }
            }
        }
        ChartMode::Info => {
            let manifest = graph.get(name)?;
            if json {
                println!("{}", serde_json::to_string_pretty(manifest)?);
            } else {
                for line in render::chart_info_lines(manifest, style) {
                    println!("{line}");
                }
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_version_list(graph: &ChartGraph, charts: Vec<String>) -> Result<ExitCode> {
    let style = current_output_style();
    let names = if charts.is_empty() {
        graph.charts().keys().cloned().collect()
    } else {
        resolve_chart_names(graph, &charts)
    };
    for name in graph.sort_known_by_depth(&names, false) {
        let tree = graph.dependent_tree(&name)?;
        for line in render::tree_lines(&tree, true, style) {
            println!("{line}");
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_bump(
    graph: &ChartGraph,
    charts: Vec<String>,
    part: BumpPart,
    dry_run: bool,
    json: bool,
    staged: bool,
) -> Result<ExitCode> {
    let seeds = gather_seed_charts(graph, charts, staged)?;
    if seeds.is_empty() {
        return Ok(ExitCode::from(1));
    }

    let mut cascade = CascadeState::new(graph)?;
    // lower-depth seeds (dependencies) go first, so a seed that depends on
    // another seed is reached by the cascade before its own turn
    for name in graph.sort_known_by_depth(&seeds, false) {
        cascade.cascade_bump(&name, part);
    }

    let report = cascade.report();
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in render::bump_report_lines(&report, current_output_style()) {
            println!("{line}");
        }
    }

    if dry_run {
        println!("Dry run; no changes made.");
    } else {
        cascade.save_updated()?;
        println!("Chart versions updated.");
    }
    Ok(ExitCode::SUCCESS)
}

fn run_check(
    graph: &ChartGraph,
    charts: Vec<String>,
    revision: &str,
    staged: bool,
) -> Result<ExitCode> {
    let names = gather_seed_charts(graph, charts, staged)?;
    if names.is_empty() {
        if staged {
            println!("No staged chart changes found.");
            return Ok(ExitCode::SUCCESS);
        }
        return Ok(ExitCode::from(1));
    }

    let mut pending = Vec::new();
    for name in graph.sort_known_by_depth(&names, false) {
        let manifest = graph.get(&name)?;
        let current = Version::parse(&manifest.version).with_context(|| {
            format!(
                "chart '{}' has invalid version '{}'",
                name, manifest.version
            )
        })?;
        let previous = match previous_version(&manifest.manifest_path(), revision)? {
            Some(raw) => Version::parse(&raw).with_context(|| {
                format!("chart '{name}' has invalid version '{raw}' at revision {revision}")
            })?,
            None => Version::new(0, 0, 0),
        };
        if current <= previous {
            pending.push(name);
        }
    }

    if pending.is_empty() {
        println!("All specified charts are up to date.");
        return Ok(ExitCode::SUCCESS);
    }
    eprintln!("The following charts need version bumps:");
    for name in &pending {
        eprintln!("  - {name}");
    }
    eprintln!("Bump them with 'chartgraph version bump'.");
    Ok(ExitCode::from(1))
}

fn run_update_dependencies(
    graph: &ChartGraph,
    charts: Vec<String>,
    all: bool,
    dry_run: bool,
) -> Result<ExitCode> {
    let names = if all {
        graph.charts().keys().cloned().collect()
    } else {
        resolve_chart_names(graph, &charts)
    };
    if names.is_empty() {
        eprintln!("at least one chart name or file path must be given (or use --all)");
        return Ok(ExitCode::from(1));
    }

    for name in graph.sort_known_by_depth(&names, false) {
        update_chart_dependencies(graph.get(&name)?, dry_run);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_mermaid(
    graph: &ChartGraph,
    chart: Option<&str>,
    include_attrs: bool,
    output: Option<PathBuf>,
    svg_output: Option<PathBuf>,
) -> Result<ExitCode> {
    let diagram = MermaidDiagram::from_graph(graph, include_attrs, chart)?;

    if let Some(path) = &output {
        fs::write(path, &diagram.text)
            .with_context(|| format!("failed writing diagram to {}", path.display()))?;
        println!("mermaid diagram written to {}", path.display());
    }
    if let Some(path) = &svg_output {
        diagram.render_svg(path)?;
    }
    if output.is_none() && svg_output.is_none() {
        print!("{}", diagram.text);
    }
    Ok(ExitCode::SUCCESS)
}

/// Turn bump/check arguments into chart names: staged git files when
/// `--staged` is set, otherwise the given names or file paths. Prints the
/// usage complaint itself; the caller only maps empty to exit code 1.
fn gather_seed_charts(graph: &ChartGraph, charts: Vec<String>, staged: bool) -> Result<Vec<String>> {
    if staged {
        let staged_paths = staged_files()?;
        if staged_paths.is_empty() {
            eprintln!("No staged changes found in any charts.");
            return Ok(Vec::new());
        }
        return Ok(resolve_chart_names(graph, &staged_paths));
    }
    if charts.is_empty() {
        eprintln!("at least one chart name or file path must be given");
        return Ok(Vec::new());
    }
    Ok(resolve_chart_names(graph, &charts))
}

/// Accept chart names and file paths interchangeably: entries that are not
/// known chart names are resolved to the chart owning that path.
fn resolve_chart_names(graph: &ChartGraph, entries: &[String]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    let mut paths: Vec<String> = Vec::new();
    for entry in entries {
        if graph.contains(entry) {
            names.push(entry.clone());
        } else {
            paths.push(entry.clone());
        }
    }
    if !paths.is_empty() {
        let base = repo_root().unwrap_or_else(|_| PathBuf::from("."));
        names.extend(paths_to_chart_names(&paths, &base));
    }
    names
}
