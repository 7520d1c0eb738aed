use std::io::IsTerminal;

use anstyle::{AnsiColor, Effects, Style};
use chartgraph_cascade::BumpReport;
use chartgraph_core::ChartManifest;
use chartgraph_graph::ChartTree;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum OutputStyle {
    Plain,
    Rich,
}

pub(crate) fn current_output_style() -> OutputStyle {
    if std::env::var_os("NO_COLOR").is_some() {
        return OutputStyle::Plain;
    }
    if std::io::stdout().is_terminal() {
        OutputStyle::Rich
    } else {
        OutputStyle::Plain
    }
}

fn name_style() -> Style {
    Style::new()
        .fg_color(Some(AnsiColor::BrightCyan.into()))
        .effects(Effects::BOLD)
}

fn colorize(style: Style, text: &str) -> String {
    format!("{}{}{}", style.render(), text, style.render_reset())
}

fn styled_name(name: &str, style: OutputStyle) -> String {
    match style {
        OutputStyle::Plain => name.to_string(),
        OutputStyle::Rich => colorize(name_style(), name),
    }
}

/// Render a subtree as box-drawing lines, root unindented.
pub(crate) fn tree_lines(tree: &ChartTree, show_versions: bool, style: OutputStyle) -> Vec<String> {
    let mut lines = Vec::new();
    push_tree_lines(tree, 1, true, show_versions, style, &mut lines);
    lines
}

fn push_tree_lines(
    node: &ChartTree,
    level: usize,
    is_last: bool,
    show_versions: bool,
    style: OutputStyle,
    lines: &mut Vec<String>,
) {
    let prefix = if level == 1 {
        String::new()
    } else {
        format!(
            "{}{}",
            "│   ".repeat(level - 1),
            if is_last { "└──" } else { "├──" }
        )
    };
    let version_suffix = if show_versions {
        format!(" v{}", node.info.version)
    } else {
        String::new()
    };
    lines.push(format!(
        "{prefix}{}{version_suffix}",
        styled_name(&node.name, style)
    ));

    let child_count = node.children.len();
    for (index, child) in node.children.iter().enumerate() {
        push_tree_lines(
            child,
            level + 1,
            index == child_count - 1,
            show_versions,
            style,
            lines,
        );
    }
}

pub(crate) fn chart_info_lines(manifest: &ChartManifest, style: OutputStyle) -> Vec<String> {
    let dependencies = if manifest.dependencies.is_empty() {
        "(none)".to_string()
    } else {
        manifest
            .dependencies
            .iter()
            .map(|dependency| {
                let mut label = dependency.name.clone();
                if let Some(alias) = &dependency.alias {
                    label.push_str(&format!(" as {alias}"));
                }
                if let Some(version) = &dependency.version {
                    label.push_str(&format!(" ({version})"));
                }
                label
            })
            .collect::<Vec<_>>()
            .join(", ")
    };

    vec![
        format!("Chart: {}", styled_name(&manifest.name, style)),
        format!("    Type: {}", manifest.kind),
        format!("    Version: {}", manifest.version),
        format!("    Path: {}", manifest.path.display()),
        format!("    Dependencies: {dependencies}"),
    ]
}

pub(crate) fn bump_report_lines(report: &BumpReport, style: OutputStyle) -> Vec<String> {
    let mut lines = vec!["Updating chart versions:".to_string()];
    for chart in &report.updated {
        lines.push(format!(
            "{}: {}",
            styled_name(&chart.name, style),
            chart.version
        ));
        for pin in &chart.dependencies {
            lines.push(format!("    - dependency: {} -> {}", pin.name, pin.version));
        }
    }
    lines
}
