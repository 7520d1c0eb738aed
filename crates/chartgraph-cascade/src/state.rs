use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Context, Result};
use chartgraph_core::{BumpPart, ChartManifest};
use chartgraph_graph::ChartGraph;
use semver::Version;

/// State of one propagation run. Owns a working copy of the manifest map so
/// dependency pins can be rewritten without touching the graph, and tracks
/// which charts were bumped so converging cascade paths bump each chart at
/// most once.
#[derive(Debug)]
pub struct CascadeState<'g> {
    graph: &'g ChartGraph,
    charts: BTreeMap<String, ChartManifest>,
    version_map: BTreeMap<String, Version>,
    updated: BTreeSet<String>,
    dependency_rewrites: BTreeMap<String, Vec<String>>,
}

impl<'g> CascadeState<'g> {
    /// Seed the version map from every chart in the graph. Any malformed
    /// version string fails the run up front, naming the chart.
    pub fn new(graph: &'g ChartGraph) -> Result<Self> {
        let mut version_map = BTreeMap::new();
        for (name, manifest) in graph.charts() {
            let version = Version::parse(&manifest.version).with_context(|| {
                format!(
                    "chart '{}' has invalid version '{}'",
                    name, manifest.version
                )
            })?;
            version_map.insert(name.clone(), version);
        }

        Ok(Self {
            graph,
            charts: graph.charts().clone(),
            version_map,
            updated: BTreeSet::new(),
            dependency_rewrites: BTreeMap::new(),
        })
    }

    pub fn version_of(&self, name: &str) -> Option<&Version> {
        self.version_map.get(name)
    }

    pub fn updated(&self) -> &BTreeSet<String> {
        &self.updated
    }

    pub fn dependency_rewrites(&self) -> &BTreeMap<String, Vec<String>> {
        &self.dependency_rewrites
    }

    /// The working copy of a chart, including any pin rewrites so far.
    pub fn chart(&self, name: &str) -> Option<&ChartManifest> {
        self.charts.get(name)
    }

    /// Bump `name` by `part` and cascade through every transitive dependent,
    /// rewriting each dependent's pin on the chart that triggered it.
    pub fn cascade_bump(&mut self, name: &str, part: BumpPart) {
        let mut path = BTreeSet::new();
        self.bump_chart(name, part, None, &mut path);
    }

    fn bump_chart(
        &mut self,
        name: &str,
        part: BumpPart,
        trigger: Option<&str>,
        path: &mut BTreeSet<String>,
    ) {
        // Charts outside the tracked set cannot be bumped.
        if !self.version_map.contains_key(name) {
            return;
        }
        // Recursion is capped to the current cascade path; revisiting a name
        // already on it means the graph has a cycle.
        if !path.insert(name.to_string()) {
            return;
        }

        // Rewrite this chart's pin on the dependency that triggered the
        // visit, before deciding whether the chart itself gets bumped.
        let pin_rewritten = match trigger {
            Some(dependency) => self.rewrite_pin(name, dependency),
            None => false,
        };

        if self.updated.contains(name) {
            path.remove(name);
            return;
        }

        // A seed is always bumped; a dependent only when its pin actually
        // matched and was rewritten.
        if trigger.is_none() || pin_rewritten {
            let current = &self.version_map[name];
            let next = part.apply(current);
            if let Some(manifest) = self.charts.get_mut(name) {
                manifest.version = next.to_string();
            }
            self.version_map.insert(name.to_string(), next);
            self.updated.insert(name.to_string());
        }

        // Keep cascading outward even when this chart's own version did not
        // change; each hop re-applies the rewrite-then-decide logic.
        for parent in self.graph.parents_of(name) {
            self.bump_chart(&parent, part, Some(name), path);
        }

        path.remove(name);
    }

    /// Set `chart`'s declared pin on `dependency` to the dependency's current
    /// version. Returns whether a matching dependency entry existed.
    fn rewrite_pin(&mut self, chart: &str, dependency: &str) -> bool {
        let Some(new_version) = self.version_map.get(dependency).map(Version::to_string) else {
            return false;
        };
        let Some(manifest) = self.charts.get_mut(chart) else {
            return false;
        };

        let mut rewritten = false;
        for entry in &mut manifest.dependencies {
            if entry.name == dependency {
                entry.version = Some(new_version);
                rewritten = true;
                break;
            }
        }

        if rewritten {
            let rewrites = self.dependency_rewrites.entry(chart.to_string()).or_default();
            if !rewrites.iter().any(|name| name == dependency) {
                rewrites.push(dependency.to_string());
            }
        }
        rewritten
    }

    /// Write every bumped chart's manifest back to disk with its new version
    /// and rewritten dependency list.
    pub fn save_updated(&self) -> Result<()> {
        for name in &self.updated {
            if let Some(manifest) = self.charts.get(name) {
                manifest
                    .save()
                    .with_context(|| format!("failed saving chart '{name}'"))?;
            }
        }
        Ok(())
    }
}
