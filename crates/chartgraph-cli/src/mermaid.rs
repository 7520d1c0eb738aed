use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{bail, Context, Result};
use chartgraph_core::ChartManifest;
use chartgraph_graph::{ChartEdge, ChartGraph};

/// Mermaid ER diagram text over the dependency graph, optionally scoped to
/// one chart's dependency subtree.
pub(crate) struct MermaidDiagram {
    pub(crate) text: String,
}

impl MermaidDiagram {
    pub(crate) fn from_graph(
        graph: &ChartGraph,
        include_attrs: bool,
        root_chart: Option<&str>,
    ) -> Result<Self> {
        let scope: Option<BTreeSet<String>> = match root_chart {
            Some(root) => Some(
                graph
                    .dependency_tree(root)?
                    .flatten()
                    .iter()
                    .map(|manifest| manifest.name.clone())
                    .collect(),
            ),
            None => None,
        };

        let in_scope = |name: &str| scope.as_ref().map_or(true, |names| names.contains(name));
        let charts: Vec<&ChartManifest> = graph
            .charts()
            .values()
            .filter(|manifest| in_scope(&manifest.name))
            .collect();
        let edges: Vec<&ChartEdge> = graph
            .edges()
            .iter()
            .filter(|edge| in_scope(&edge.parent))
            .collect();

        Ok(Self {
            text: generate(&charts, &edges, include_attrs),
        })
    }

    /// Render to SVG via the mermaid CLI. A failure here is fatal: the SVG is
    /// the one output the caller asked for.
    pub(crate) fn render_svg(&self, output: &Path) -> Result<()> {
        let temp_path = std::env::temp_dir().join(format!("chartgraph-{}.mmd", unique_suffix()));
        fs::write(&temp_path, &self.text)
            .with_context(|| format!("failed writing diagram to {}", temp_path.display()))?;

        println!(
            "running mermaid renderer: npx -p @mermaid-js/mermaid-cli mmdc -i {} -o {}",
            temp_path.display(),
            output.display()
        );
        let status = Command::new("npx")
            .arg("-p")
            .arg("@mermaid-js/mermaid-cli")
            .arg("mmdc")
            .arg("-i")
            .arg(&temp_path)
            .arg("-o")
            .arg(output)
            .status();
        let _ = fs::remove_file(&temp_path);

        match status {
            Ok(status) if status.success() => {
                println!("svg written to {}", output.display());
                Ok(())
            }
            Ok(status) => bail!("mermaid renderer failed: {status}"),
            Err(err) => Err(err).context("failed launching mermaid renderer (npx)"),
        }
    }
}

fn generate(charts: &[&ChartManifest], edges: &[&ChartEdge], include_attrs: bool) -> String {
    let mut sorted_charts: Vec<&ChartManifest> = charts.to_vec();
    sorted_charts.sort_by_key(|manifest| manifest.name.to_lowercase());

    let mut lines = vec!["erDiagram".to_string()];
    for manifest in &sorted_charts {
        let identifier = sanitize_identifier(&manifest.name);
        lines.push(format!("    {identifier} {{"));
        if include_attrs {
            lines.push(format!("        string version \"{}\"", manifest.version));
            lines.push(format!("        string type \"{}\"", manifest.kind));
        } else {
            // mermaid ER entities need a body; emit a single bare attribute
            lines.push("        string type".to_string());
        }
        lines.push("    }".to_string());
    }

    for edge in edges {
        lines.push(format!(
            "    {} ||--o{{ {} : DEPENDS_ON",
            sanitize_identifier(&edge.parent),
            sanitize_identifier(&edge.child)
        ));
    }

    lines.push(String::new());
    lines.push("%% Legend: chart name -> identifier".to_string());
    for manifest in &sorted_charts {
        lines.push(format!(
            "%%   {} -> {}",
            manifest.name,
            sanitize_identifier(&manifest.name)
        ));
    }

    lines.join("\n") + "\n"
}

/// Mermaid ER identifiers tolerate only [A-Za-z0-9_] and must not start with
/// a digit.
pub(crate) fn sanitize_identifier(name: &str) -> String {
    let mut identifier: String = name
        .chars()
        .map(|ch| if ch.is_ascii_alphanumeric() || ch == '_' { ch } else { '_' })
        .collect();
    if identifier.starts_with(|ch: char| ch.is_ascii_digit()) {
        identifier.insert(0, '_');
    }
    if identifier.is_empty() {
        identifier = "_unnamed_".to_string();
    }
    identifier
}

fn unique_suffix() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos()
}
