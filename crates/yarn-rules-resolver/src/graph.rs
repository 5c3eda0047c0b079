//! Graph view of a package registry, used for cycle diagnostics.

use std::collections::{BTreeSet, HashMap};

use petgraph::algo::{is_cyclic_directed, tarjan_scc};
use petgraph::graph::{DiGraph, NodeIndex};

use yarn_rules_core::registry::PackageRegistry;

/// A directed graph with one node per package and one edge per dependency.
pub struct RegistryGraph {
    graph: DiGraph<String, ()>,
}

impl RegistryGraph {
    /// Build the graph. Dependencies on unregistered names are skipped.
    pub fn from_registry(registry: &PackageRegistry) -> Self {
        let mut graph = DiGraph::new();
        let mut index: HashMap<String, NodeIndex> = HashMap::new();
        for (name, _) in registry.iter() {
            let idx = graph.add_node(name.to_string());
            index.insert(name.to_string(), idx);
        }
        for (name, record) in registry.iter() {
            let Some(&from) = index.get(name) else {
                continue;
            };
            for dep in &record.dependencies {
                match index.get(dep.as_str()) {
                    Some(&to) => {
                        graph.update_edge(from, to, ());
                    }
                    None => tracing::trace!("Skipping edge {name} -> {dep}: not registered"),
                }
            }
        }
        Self { graph }
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.graph)
    }

    /// Names of all packages that lie on at least one cycle, sorted.
    pub fn cyclic_packages(&self) -> Vec<String> {
        let mut names = BTreeSet::new();
        for component in tarjan_scc(&self.graph) {
            let on_cycle = component.len() > 1
                || self.graph.contains_edge(component[0], component[0]);
            if on_cycle {
                names.extend(component.iter().map(|&idx| self.graph[idx].clone()));
            }
        }
        names.into_iter().collect()
    }
}
