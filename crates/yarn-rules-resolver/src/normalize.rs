//! Top-down cycle elimination.
//!
//! Starting from each root package, walk the registry depth-first. Every
//! dependency that already appears on the path from the root to the current
//! package is dropped; all others are normalized recursively and kept. The
//! surviving list replaces the package's dependencies in the registry.

use std::collections::{HashMap, HashSet};

use yarn_rules_core::registry::PackageRegistry;
use yarn_rules_util::errors::{YarnRulesError, YarnRulesResult};

/// The package names on the current root-to-node path.
///
/// Each frame borrows its parent's path and adds one name, so a recursive
/// call owns an immutable snapshot and sibling branches never see each
/// other's additions.
#[derive(Debug, Clone, Copy)]
pub struct Ancestry<'a> {
    name: &'a str,
    parent: Option<&'a Ancestry<'a>>,
}

impl<'a> Ancestry<'a> {
    /// Extend `parent` (or the empty path) with `name`.
    pub fn new(name: &'a str, parent: Option<&'a Ancestry<'a>>) -> Self {
        Self { name, parent }
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn contains(&self, name: &str) -> bool {
        self.iter().any(|n| n == name)
    }

    /// Names from the current package back up to the root.
    pub fn iter(&self) -> impl Iterator<Item = &'a str> + '_ {
        std::iter::successors(Some(self), |a| a.parent).map(|a| a.name)
    }

    /// Names from the root down to the current package.
    pub fn path(&self) -> Vec<&'a str> {
        let mut path: Vec<&str> = self.iter().collect();
        path.reverse();
        path
    }
}

/// An edge removed because it pointed back into the ancestry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedEdge {
    pub from: String,
    pub to: String,
}

/// What a normalization pass did.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    /// Removed edges, in the order they were cut.
    pub dropped: Vec<DroppedEdge>,
    /// Number of package visits, counting revisits through shared dependencies.
    pub visits: usize,
    /// Revisits answered from the reachability cache without walking.
    pub skipped: usize,
}

/// Break cycles reachable from `roots`, processing the roots in order.
pub fn normalize(
    registry: &mut PackageRegistry,
    roots: &[String],
) -> YarnRulesResult<NormalizeReport> {
    let mut normalizer = Normalizer::new(registry);
    for root in roots {
        if !normalizer.registry.contains(root) {
            return Err(YarnRulesError::UnknownRoot { name: root.clone() }.into());
        }
        tracing::debug!("Normalizing from root {root}");
        normalizer.normalize_package(root, None)?;
    }
    Ok(normalizer.into_report())
}

/// Depth-first cycle breaker over one registry.
///
/// Once a package has been fully normalized, the graph below it is acyclic
/// and later visits can only shrink its lists. A revisit whose reachable set
/// is disjoint from the current ancestry would therefore change nothing, and
/// is skipped. Cached sets are taken at completion, so they stay supersets
/// of what is reachable later.
pub struct Normalizer<'r> {
    registry: &'r mut PackageRegistry,
    /// Names reachable from each completed package, the package excluded.
    reachable: HashMap<String, HashSet<String>>,
    report: NormalizeReport,
}

impl<'r> Normalizer<'r> {
    pub fn new(registry: &'r mut PackageRegistry) -> Self {
        Self {
            registry,
            reachable: HashMap::new(),
            report: NormalizeReport::default(),
        }
    }

    pub fn into_report(self) -> NormalizeReport {
        self.report
    }

    /// Normalize one package below `parent` and return its name.
    ///
    /// The package's dependency list in the registry is replaced with the
    /// cycle-free list.
    pub fn normalize_package(
        &mut self,
        name: &str,
        parent: Option<&Ancestry<'_>>,
    ) -> YarnRulesResult<String> {
        let ancestry = Ancestry::new(name, parent);
        self.report.visits += 1;

        if let Some(below) = self.reachable.get(name) {
            if !ancestry.iter().any(|n| below.contains(n)) {
                tracing::trace!("Skipping {name}: already normalized, no cycle through the path");
                self.report.skipped += 1;
                return Ok(name.to_string());
            }
        }

        let declared = match self.registry.get(name) {
            Some(record) => record.dependencies.clone(),
            None => {
                let err = match parent {
                    Some(p) => YarnRulesError::MissingPackage {
                        package: p.name().to_string(),
                        dependency: name.to_string(),
                    },
                    None => YarnRulesError::UnknownRoot {
                        name: name.to_string(),
                    },
                };
                return Err(err.into());
            }
        };

        let mut kept = Vec::with_capacity(declared.len());
        for dep in &declared {
            if ancestry.contains(dep) {
                tracing::debug!(
                    "Dropping cyclic edge {name} -> {dep} (path: {})",
                    ancestry.path().join(" -> ")
                );
                self.report.dropped.push(DroppedEdge {
                    from: name.to_string(),
                    to: dep.clone(),
                });
                continue;
            }
            kept.push(self.normalize_package(dep, Some(&ancestry))?);
        }

        let mut below = HashSet::new();
        for dep in &kept {
            if let Some(further) = self.reachable.get(dep) {
                below.extend(further.iter().cloned());
            }
            below.insert(dep.clone());
        }
        self.reachable.insert(name.to_string(), below);

        let rewritten = self.registry.set_dependencies(name, kept);
        debug_assert!(rewritten, "{name} vanished from the registry during normalization");
        Ok(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::RegistryGraph;
    use yarn_rules_core::package::PackageId;

    fn registry(entries: &[(&str, &[&str])]) -> PackageRegistry {
        let mut reg = PackageRegistry::new();
        for (name, deps) in entries {
            reg.register(
                &PackageId::parse(&format!("{name}@1.0")),
                deps.iter().map(|d| d.to_string()).collect(),
            );
        }
        reg
    }

    fn deps<'a>(reg: &'a PackageRegistry, name: &str) -> Vec<&'a str> {
        reg.get(name)
            .unwrap()
            .dependencies
            .iter()
            .map(String::as_str)
            .collect()
    }

    fn roots(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ancestry_snapshots_are_independent() {
        let root = Ancestry::new("a", None);
        let left = Ancestry::new("b", Some(&root));
        let right = Ancestry::new("c", Some(&root));
        assert!(left.contains("a") && left.contains("b"));
        assert!(!left.contains("c"));
        assert!(right.contains("c") && !right.contains("b"));
        assert_eq!(left.path(), vec!["a", "b"]);
        assert_eq!(right.path(), vec!["a", "c"]);
    }

    #[test]
    fn two_cycle_cut_at_back_edge() {
        let mut reg = registry(&[("a", &["b"]), ("b", &["a"])]);
        let report = normalize(&mut reg, &roots(&["a"])).unwrap();
        assert_eq!(deps(&reg, "a"), vec!["b"]);
        assert!(deps(&reg, "b").is_empty());
        assert_eq!(
            report.dropped,
            vec![DroppedEdge {
                from: "b".into(),
                to: "a".into()
            }]
        );
    }

    #[test]
    fn self_edge_dropped() {
        let mut reg = registry(&[("a", &["a", "b"]), ("b", &[])]);
        normalize(&mut reg, &roots(&["a"])).unwrap();
        assert_eq!(deps(&reg, "a"), vec!["b"]);
    }

    #[test]
    fn diamond_keeps_all_edges() {
        let mut reg = registry(&[
            ("a", &["b", "c"]),
            ("b", &["d"]),
            ("c", &["d"]),
            ("d", &[]),
        ]);
        let report = normalize(&mut reg, &roots(&["a"])).unwrap();
        assert!(report.dropped.is_empty());
        assert_eq!(report.visits, 5);
        assert_eq!(deps(&reg, "a"), vec!["b", "c"]);
        assert_eq!(deps(&reg, "b"), vec!["d"]);
        assert_eq!(deps(&reg, "c"), vec!["d"]);
    }

    #[test]
    fn sibling_branches_do_not_share_ancestry() {
        // c is reached through b first; a later sibling edge a -> c must survive.
        let mut reg = registry(&[("a", &["b", "c"]), ("b", &["c"]), ("c", &[])]);
        normalize(&mut reg, &roots(&["a"])).unwrap();
        assert_eq!(deps(&reg, "a"), vec!["b", "c"]);
        assert_eq!(deps(&reg, "b"), vec!["c"]);
    }

    #[test]
    fn longer_cycle_cut_only_at_closing_edge() {
        let mut reg = registry(&[("a", &["b"]), ("b", &["c"]), ("c", &["a", "d"]), ("d", &[])]);
        normalize(&mut reg, &roots(&["a"])).unwrap();
        assert_eq!(deps(&reg, "a"), vec!["b"]);
        assert_eq!(deps(&reg, "b"), vec!["c"]);
        assert_eq!(deps(&reg, "c"), vec!["d"]);
    }

    #[test]
    fn root_order_decides_cut_direction() {
        let mut first_a = registry(&[("a", &["b"]), ("b", &["a"])]);
        normalize(&mut first_a, &roots(&["a", "b"])).unwrap();
        assert_eq!(deps(&first_a, "a"), vec!["b"]);
        assert!(deps(&first_a, "b").is_empty());

        let mut first_b = registry(&[("a", &["b"]), ("b", &["a"])]);
        normalize(&mut first_b, &roots(&["b", "a"])).unwrap();
        assert!(deps(&first_b, "a").is_empty());
        assert_eq!(deps(&first_b, "b"), vec!["a"]);
    }

    #[test]
    fn unreachable_packages_untouched() {
        let mut reg = registry(&[("a", &[]), ("x", &["y"]), ("y", &["x"])]);
        normalize(&mut reg, &roots(&["a"])).unwrap();
        assert_eq!(deps(&reg, "x"), vec!["y"]);
        assert_eq!(deps(&reg, "y"), vec!["x"]);
    }

    #[test]
    fn no_roots_is_a_no_op() {
        let original = registry(&[("a", &["a"])]);
        let mut reg = original.clone();
        let report = normalize(&mut reg, &[]).unwrap();
        assert_eq!(reg, original);
        assert_eq!(report.visits, 0);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let mut reg = registry(&[
            ("a", &["b", "c"]),
            ("b", &["c", "a"]),
            ("c", &["a", "b"]),
        ]);
        normalize(&mut reg, &roots(&["a"])).unwrap();
        let once = reg.clone();
        normalize(&mut reg, &roots(&["a"])).unwrap();
        assert_eq!(reg, once);
    }

    #[test]
    fn reachable_graph_is_acyclic_after_normalize() {
        let mut reg = registry(&[
            ("a", &["b", "c"]),
            ("b", &["c", "a", "b"]),
            ("c", &["d", "a"]),
            ("d", &["b", "e"]),
            ("e", &["a", "c"]),
        ]);
        assert!(!RegistryGraph::from_registry(&reg).is_acyclic());
        normalize(&mut reg, &roots(&["a"])).unwrap();
        assert!(RegistryGraph::from_registry(&reg).is_acyclic());
    }

    /// Two chains where every rung depends on both packages of the next rung.
    fn ladder(levels: usize) -> Vec<(String, Vec<String>)> {
        let mut entries = vec![("app".to_string(), vec!["l0".to_string(), "r0".to_string()])];
        for i in 0..levels {
            let next = if i + 1 < levels {
                vec![format!("l{}", i + 1), format!("r{}", i + 1)]
            } else {
                Vec::new()
            };
            entries.push((format!("l{i}"), next.clone()));
            entries.push((format!("r{i}"), next));
        }
        entries
    }

    fn registry_owned(entries: &[(String, Vec<String>)]) -> PackageRegistry {
        let mut reg = PackageRegistry::new();
        for (name, deps) in entries {
            reg.register(&PackageId::parse(&format!("{name}@1.0")), deps.clone());
        }
        reg
    }

    /// Path-tracking walk with no reachability cache.
    fn walk_uncached(reg: &mut PackageRegistry, name: &str, path: &mut Vec<String>) {
        path.push(name.to_string());
        let declared = reg.get(name).unwrap().dependencies.clone();
        let mut kept = Vec::new();
        for dep in declared {
            if path.contains(&dep) {
                continue;
            }
            walk_uncached(reg, &dep, path);
            kept.push(dep);
        }
        reg.set_dependencies(name, kept);
        path.pop();
    }

    #[test]
    fn deep_shared_ladder_visits_each_rung_once() {
        let levels = 30;
        let entries = ladder(levels);
        let original = registry_owned(&entries);
        let mut reg = original.clone();

        let report = normalize(&mut reg, &roots(&["app"])).unwrap();

        assert!(report.dropped.is_empty());
        assert_eq!(reg, original);
        assert_eq!(report.visits, 4 * levels - 1);
        assert_eq!(report.skipped, 2 * levels - 2);
    }

    #[test]
    fn cached_walk_matches_uncached_walk() {
        let mut back_edged = ladder(4);
        for (name, deps) in back_edged.iter_mut() {
            if name == "l3" || name == "r2" {
                deps.push("l0".to_string());
            }
            if name == "r1" {
                deps.insert(0, "app".to_string());
            }
        }
        let dense: Vec<(String, Vec<String>)> = [
            ("a", vec!["b", "c"]),
            ("b", vec!["c", "a", "b"]),
            ("c", vec!["d", "a"]),
            ("d", vec!["b", "e"]),
            ("e", vec!["a", "c"]),
        ]
        .into_iter()
        .map(|(n, d)| (n.to_string(), d.into_iter().map(String::from).collect()))
        .collect();

        for (entries, start) in [(back_edged, vec!["app", "r2"]), (dense, vec!["a", "d"])] {
            let mut cached = registry_owned(&entries);
            let mut uncached = cached.clone();

            normalize(&mut cached, &roots(&start)).unwrap();
            for root in &start {
                walk_uncached(&mut uncached, root, &mut Vec::new());
            }

            assert_eq!(cached, uncached);
            assert!(RegistryGraph::from_registry(&cached).is_acyclic());
        }
    }

    #[test]
    fn rewritten_list_is_stored() {
        let mut reg = registry(&[("a", &["b", "a"]), ("b", &["a", "b"])]);
        normalize(&mut reg, &roots(&["b"])).unwrap();
        assert_eq!(deps(&reg, "b"), vec!["a"]);
        assert!(deps(&reg, "a").is_empty());
    }

    #[test]
    fn missing_dependency_is_error() {
        let mut reg = registry(&[("a", &["ghost"])]);
        let err = normalize(&mut reg, &roots(&["a"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Package 'a' depends on 'ghost', which does not appear in the tree"
        );
    }

    #[test]
    fn unknown_root_is_error() {
        let mut reg = registry(&[("a", &[])]);
        let err = normalize(&mut reg, &roots(&["nope"])).unwrap_err();
        assert!(err.to_string().contains("Root package 'nope'"));
    }
}
