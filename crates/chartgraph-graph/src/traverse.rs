use std::collections::BTreeSet;

use anyhow::Result;

use crate::types::{ChartGraph, ChartTree};

/// Traversal direction over the edge set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Dependencies,
    Dependents,
}

impl ChartGraph {
    /// Direct dependencies of `name`.
    pub fn children_of(&self, name: &str) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter(|edge| edge.parent == name)
            .map(|edge| edge.child.clone())
            .collect()
    }

    /// Direct dependents of `name`.
    pub fn parents_of(&self, name: &str) -> BTreeSet<String> {
        self.edges
            .iter()
            .filter(|edge| edge.child == name)
            .map(|edge| edge.parent.clone())
            .collect()
    }

    /// Charts no edge points at. When that set is empty (no edges at all, or
    /// every chart is someone's dependency), every chart counts as a root.
    pub fn roots(&self) -> Vec<String> {
        let all_children: BTreeSet<&str> =
            self.edges.iter().map(|edge| edge.child.as_str()).collect();
        let roots: Vec<String> = self
            .charts
            .keys()
            .filter(|name| !all_children.contains(name.as_str()))
            .cloned()
            .collect();
        if roots.is_empty() {
            return self.charts.keys().cloned().collect();
        }
        roots
    }

    pub fn dependency_tree(&self, name: &str) -> Result<ChartTree> {
        self.subtree(name, Direction::Dependencies, &mut BTreeSet::new())
    }

    pub fn dependent_tree(&self, name: &str) -> Result<ChartTree> {
        self.subtree(name, Direction::Dependents, &mut BTreeSet::new())
    }

    fn subtree(
        &self,
        name: &str,
        direction: Direction,
        path: &mut BTreeSet<String>,
    ) -> Result<ChartTree> {
        let info = self.get(name)?.clone();
        path.insert(name.to_string());

        let related = match direction {
            Direction::Dependencies => self.children_of(name),
            Direction::Dependents => self.parents_of(name),
        };
        let mut children = Vec::new();
        for related_name in related {
            // A name already on the current path marks a cycle; stop there
            // instead of recursing forever.
            if path.contains(&related_name) {
                continue;
            }
            children.push(self.subtree(&related_name, direction, path)?);
        }

        path.remove(name);
        Ok(ChartTree {
            name: name.to_string(),
            info,
            children,
        })
    }

    /// Longest dependency chain below `name`, counting `name` itself.
    /// Recomputed per query; used as a sort key.
    pub fn depth(&self, name: &str) -> Result<usize> {
        self.get(name)?;
        Ok(self.depth_inner(name, &mut BTreeSet::new()))
    }

    fn depth_inner(&self, name: &str, path: &mut BTreeSet<String>) -> usize {
        path.insert(name.to_string());
        let mut deepest = 0;
        for child in self.children_of(name).iter() {
            if path.contains(child) {
                continue;
            }
            deepest = deepest.max(self.depth_inner(child, path));
        }
        path.remove(name);
        1 + deepest
    }

    /// Sort names by depth, keeping unknown names and treating them as
    /// depth 0.
    pub fn sort_by_depth(&self, names: &[String], reverse: bool) -> Vec<String> {
        let mut sorted = names.to_vec();
        if reverse {
            sorted.sort_by_key(|name| std::cmp::Reverse(self.depth(name).unwrap_or(0)));
        } else {
            sorted.sort_by_key(|name| self.depth(name).unwrap_or(0));
        }
        sorted
    }

    /// Sort names by depth, excluding names the scan did not find.
    pub fn sort_known_by_depth(&self, names: &[String], reverse: bool) -> Vec<String> {
        let known: Vec<String> = names
            .iter()
            .filter(|name| self.contains(name))
            .cloned()
            .collect();
        self.sort_by_depth(&known, reverse)
    }
}
