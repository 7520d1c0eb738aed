use std::collections::{BTreeMap, BTreeSet};

use anyhow::{anyhow, Result};
use chartgraph_core::ChartManifest;

use crate::types::{ChartEdge, ChartGraph};

impl ChartGraph {
    /// Build the graph from an ordered manifest list. Two manifests sharing a
    /// name collapse to the later one (last-wins, in the caller's scan order).
    /// With `internal_only`, edges pointing at names outside the collected set
    /// are dropped; manifests themselves are never dropped.
    pub fn from_manifests(manifests: Vec<ChartManifest>, internal_only: bool) -> Self {
        let mut charts: BTreeMap<String, ChartManifest> = BTreeMap::new();
        for manifest in manifests {
            charts.insert(manifest.name.clone(), manifest);
        }

        let mut edges: BTreeSet<ChartEdge> = BTreeSet::new();
        for (parent, manifest) in &charts {
            for dependency in &manifest.dependencies {
                let Some(child) = dependency.effective_child() else {
                    continue;
                };
                if internal_only && !charts.contains_key(child) {
                    continue;
                }
                edges.insert(ChartEdge {
                    parent: parent.clone(),
                    child: child.to_string(),
                });
            }
        }

        Self { charts, edges }
    }

    pub fn charts(&self) -> &BTreeMap<String, ChartManifest> {
        &self.charts
    }

    pub fn edges(&self) -> &BTreeSet<ChartEdge> {
        &self.edges
    }

    pub fn contains(&self, name: &str) -> bool {
        self.charts.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Result<&ChartManifest> {
        self.charts.get(name).ok_or_else(|| {
            anyhow!(
                "chart '{}' not found (known charts: {})",
                name,
                self.charts.keys().cloned().collect::<Vec<_>>().join(", ")
            )
        })
    }
}
