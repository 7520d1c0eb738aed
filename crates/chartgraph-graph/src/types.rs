use std::collections::{BTreeMap, BTreeSet};

use chartgraph_core::ChartManifest;
use serde::Serialize;

/// A "parent depends on child" pair. Kept in a set, so declaring the same
/// dependency twice yields a single edge.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChartEdge {
    pub parent: String,
    pub child: String,
}

/// The dependency graph over one scan: a name-keyed manifest map plus the
/// edge set. Rebuilt from disk on every invocation; never assumed acyclic.
#[derive(Debug, Clone)]
pub struct ChartGraph {
    pub(crate) charts: BTreeMap<String, ChartManifest>,
    pub(crate) edges: BTreeSet<ChartEdge>,
}

/// A subtree rooted at one chart, in either traversal direction.
#[derive(Debug, Clone, Serialize)]
pub struct ChartTree {
    pub name: String,
    pub info: ChartManifest,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ChartTree>,
}

impl ChartTree {
    /// Preorder list of every manifest in the subtree, root first.
    pub fn flatten(&self) -> Vec<&ChartManifest> {
        let mut manifests = vec![&self.info];
        for child in &self.children {
            manifests.extend(child.flatten());
        }
        manifests
    }
}
