use std::path::PathBuf;

use chartgraph_core::{ChartDependency, ChartManifest};

use super::*;

fn dependency(name: &str, version: &str) -> ChartDependency {
    ChartDependency {
        name: name.to_string(),
        version: Some(version.to_string()),
        alias: None,
        condition: None,
        extra: serde_yaml::Mapping::new(),
    }
}

fn manifest(name: &str, version: &str, dependencies: Vec<ChartDependency>) -> ChartManifest {
    ChartManifest {
        name: name.to_string(),
        kind: "application".to_string(),
        version: version.to_string(),
        path: PathBuf::from(format!("charts/{name}")),
        dependencies,
    }
}

/// web -> auth -> storage, plus web -> cache.
fn sample_graph() -> ChartGraph {
    ChartGraph::from_manifests(
        vec![
            manifest("storage", "1.0.0", vec![]),
            manifest("auth", "1.0.0", vec![dependency("storage", "1.0.0")]),
            manifest("cache", "1.0.0", vec![]),
            manifest(
                "web",
                "1.0.0",
                vec![dependency("auth", "1.0.0"), dependency("cache", "1.0.0")],
            ),
        ],
        true,
    )
}

#[test]
fn builds_deduplicated_edges() {
    let graph = ChartGraph::from_manifests(
        vec![
            manifest("lib", "1.0.0", vec![]),
            manifest(
                "app",
                "1.0.0",
                vec![dependency("lib", "1.0.0"), dependency("lib", "1.0.0")],
            ),
        ],
        true,
    );
    assert_eq!(graph.edges().len(), 1);
    let edge = graph.edges().iter().next().expect("must have an edge");
    assert_eq!(edge.parent, "app");
    assert_eq!(edge.child, "lib");
}

#[test]
fn alias_wins_over_name_and_blanks_are_dropped() {
    let mut aliased = dependency("cache", "1.0.0");
    aliased.alias = Some("redis".to_string());
    let blank = dependency("  ", "1.0.0");
    let graph = ChartGraph::from_manifests(
        vec![
            manifest("redis", "1.0.0", vec![]),
            manifest("app", "1.0.0", vec![aliased, blank]),
        ],
        true,
    );
    assert_eq!(graph.children_of("app"), ["redis".to_string()].into());
}

#[test]
fn internal_only_drops_external_edges_but_keeps_the_manifest() {
    let graph = ChartGraph::from_manifests(
        vec![manifest(
            "app",
            "1.0.0",
            vec![dependency("postgresql", "12.1.0")],
        )],
        true,
    );
    assert!(graph.contains("app"));
    assert!(graph.edges().is_empty());
    // the chart behaves as a leaf
    assert_eq!(graph.depth("app").expect("chart is known"), 1);

    let unfiltered = ChartGraph::from_manifests(
        vec![manifest(
            "app",
            "1.0.0",
            vec![dependency("postgresql", "12.1.0")],
        )],
        false,
    );
    assert_eq!(unfiltered.edges().len(), 1);
}

#[test]
fn last_manifest_wins_on_name_collision() {
    let mut first = manifest("app", "1.0.0", vec![]);
    first.path = PathBuf::from("charts/first");
    let mut second = manifest("app", "2.0.0", vec![]);
    second.path = PathBuf::from("charts/second");

    let graph = ChartGraph::from_manifests(vec![first, second], true);
    let kept = graph.get("app").expect("chart is known");
    assert_eq!(kept.version, "2.0.0");
    assert_eq!(kept.path, PathBuf::from("charts/second"));
}

#[test]
fn children_and_parents_are_exact_inverses() {
    let graph = sample_graph();
    for edge in graph.edges() {
        assert!(graph.children_of(&edge.parent).contains(&edge.child));
        assert!(graph.parents_of(&edge.child).contains(&edge.parent));
    }
    for name in graph.charts().keys() {
        for child in graph.children_of(name) {
            assert!(graph.parents_of(&child).contains(name));
        }
    }
}

#[test]
fn roots_fall_back_to_all_charts() {
    let graph = sample_graph();
    assert_eq!(graph.roots(), vec!["web".to_string()]);

    // a pure cycle leaves no chart without an incoming edge
    let cyclic = ChartGraph::from_manifests(
        vec![
            manifest("a", "1.0.0", vec![dependency("b", "1.0.0")]),
            manifest("b", "1.0.0", vec![dependency("a", "1.0.0")]),
        ],
        true,
    );
    assert_eq!(cyclic.roots(), vec!["a".to_string(), "b".to_string()]);
}

#[test]
fn depth_counts_the_longest_dependency_chain() {
    let graph = sample_graph();
    assert_eq!(graph.depth("storage").expect("known"), 1);
    assert_eq!(graph.depth("cache").expect("known"), 1);
    assert_eq!(graph.depth("auth").expect("known"), 2);
    assert_eq!(graph.depth("web").expect("known"), 3);

    let err = graph.depth("ghost").expect_err("unknown chart should fail");
    assert!(err.to_string().contains("chart 'ghost' not found"));
    assert!(err.to_string().contains("auth"));
}

#[test]
fn depth_sort_is_monotonic_in_both_orders() {
    let graph = sample_graph();
    let names: Vec<String> = graph.charts().keys().cloned().collect();

    let ascending = graph.sort_by_depth(&names, false);
    let depths: Vec<usize> = ascending
        .iter()
        .map(|name| graph.depth(name).expect("known"))
        .collect();
    assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));

    let descending = graph.sort_by_depth(&names, true);
    assert_eq!(descending.first().map(String::as_str), Some("web"));
}

#[test]
fn unknown_names_sort_first_or_are_excluded_per_variant() {
    let graph = sample_graph();
    let names = vec!["web".to_string(), "ghost".to_string(), "auth".to_string()];

    let lenient = graph.sort_by_depth(&names, false);
    assert_eq!(lenient, vec!["ghost", "auth", "web"]);

    let strict = graph.sort_known_by_depth(&names, false);
    assert_eq!(strict, vec!["auth", "web"]);
}

#[test]
fn dependency_tree_mirrors_the_edges() {
    let graph = sample_graph();
    let tree = graph.dependency_tree("web").expect("chart is known");
    assert_eq!(tree.name, "web");
    let child_names: Vec<&str> = tree.children.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(child_names, vec!["auth", "cache"]);
    assert_eq!(tree.children[0].children[0].name, "storage");

    let flattened: Vec<&str> = tree.flatten().iter().map(|m| m.name.as_str()).collect();
    assert_eq!(flattened, vec!["web", "auth", "storage", "cache"]);
}

#[test]
fn dependent_tree_walks_the_other_direction() {
    let graph = sample_graph();
    let tree = graph.dependent_tree("storage").expect("chart is known");
    assert_eq!(tree.name, "storage");
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].name, "auth");
    assert_eq!(tree.children[0].children[0].name, "web");
}

#[test]
fn subtree_of_unknown_chart_reports_available_names() {
    let graph = sample_graph();
    let err = graph
        .dependency_tree("ghost")
        .expect_err("unknown chart should fail");
    assert!(err.to_string().contains("known charts"));
}

#[test]
fn cyclic_graphs_terminate_in_subtree_and_depth() {
    let graph = ChartGraph::from_manifests(
        vec![
            manifest("a", "1.0.0", vec![dependency("b", "1.0.0")]),
            manifest("b", "1.0.0", vec![dependency("c", "1.0.0")]),
            manifest("c", "1.0.0", vec![dependency("a", "1.0.0")]),
        ],
        true,
    );

    let tree = graph.dependency_tree("a").expect("chart is known");
    assert_eq!(tree.children[0].name, "b");
    assert_eq!(tree.children[0].children[0].name, "c");
    assert!(tree.children[0].children[0].children.is_empty());

    assert_eq!(graph.depth("a").expect("known"), 3);
}
