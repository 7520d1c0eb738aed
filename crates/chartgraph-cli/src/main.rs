mod commands;
mod mermaid;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use chartgraph_core::BumpPart;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

#[derive(Parser, Debug)]
#[command(name = "chartgraph")]
#[command(about = "Dependency graph and version tooling for nested Helm charts", long_about = None)]
#[command(version)]
struct Cli {
    /// Root directories to scan for charts; defaults to the git repository root.
    #[arg(long = "roots", short = 'r', global = true, value_name = "DIR")]
    roots: Vec<PathBuf>,
    /// Keep only dependency edges whose target chart was found in the scan.
    #[arg(long, global = true)]
    internal_only: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the chart dependency forest, or a depth-sorted chart list.
    Charts {
        #[arg(long)]
        json: bool,
        /// Sort charts by dependency depth instead of printing trees.
        #[arg(long)]
        sort: bool,
        #[arg(long)]
        reverse: bool,
    },
    /// Show one chart, or its dependency / dependent tree.
    Chart {
        name: String,
        #[arg(long, value_enum, default_value_t = ChartMode::Info)]
        mode: ChartMode,
        #[arg(long)]
        json: bool,
    },
    /// Manage chart versions.
    Version {
        #[command(subcommand)]
        command: VersionCommands,
    },
    /// Run `helm dependency update` for charts, deepest first.
    UpdateDependencies {
        charts: Vec<String>,
        /// Update every discovered chart.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        dry_run: bool,
    },
    /// Emit a mermaid ER diagram of the dependency graph.
    Mermaid {
        /// Restrict the diagram to one chart's dependency subtree.
        chart: Option<String>,
        /// Include version and type attributes in entity bodies.
        #[arg(long)]
        include_attrs: bool,
        /// Write the diagram text to a file instead of stdout.
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Render the diagram to SVG via the mermaid CLI.
        #[arg(long, value_name = "FILE")]
        svg_output: Option<PathBuf>,
    },
    /// Generate shell completions.
    Completions { shell: Shell },
}

#[derive(Subcommand, Debug)]
enum VersionCommands {
    /// Print dependent trees for charts, deepest last, with versions.
    List { charts: Vec<String> },
    /// Bump chart versions and cascade the bump to all dependents.
    Bump {
        charts: Vec<String>,
        /// Version part to bump.
        #[arg(long, default_value_t = BumpPart::Patch)]
        part: BumpPart,
        /// Compute and report the cascade without writing any manifest.
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        json: bool,
        /// Derive the charts to bump from staged git changes.
        #[arg(long)]
        staged: bool,
    },
    /// Exit 1 listing charts whose version was not bumped since a revision.
    Check {
        charts: Vec<String>,
        /// Revision to compare against.
        #[arg(long, default_value = "HEAD")]
        revision: String,
        /// Derive the charts to check from staged git changes.
        #[arg(long)]
        staged: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum ChartMode {
    Dependency,
    Dependent,
    Info,
}

fn main() -> ExitCode {
    // usage problems exit 1, unlike clap's default of 2; 2 is reserved for
    // "no chart manifests discovered"
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                clap::error::ErrorKind::DisplayHelp
                | clap::error::ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };
    match commands::run_cli(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}
