//! The flattened name → (version, dependencies) mapping.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use crate::package::PackageId;
use crate::tree::{DependencyTree, TreeNode};

/// Version and direct dependency names of one package.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRecord {
    pub version: Option<String>,
    pub dependencies: Vec<String>,
}

impl PackageRecord {
    /// The version as rendered in a rule; empty when the tree gave none.
    pub fn version_str(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

/// One record per unique package name, iterated in name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageRegistry {
    packages: BTreeMap<String, PackageRecord>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten every node of the tree, top-level and nested, in pre-order.
    /// References only contribute their name to the parent's dependencies.
    pub fn from_tree(tree: &DependencyTree) -> Self {
        let mut registry = Self::new();
        for node in &tree.trees {
            registry.register_node(node);
        }
        tracing::debug!("Registered {} packages", registry.len());
        registry
    }

    fn register_node(&mut self, node: &TreeNode) {
        if node.reference {
            return;
        }
        self.register(&node.id, node.child_names());
        for child in &node.children {
            self.register_node(child);
        }
    }

    /// Record a package occurrence.
    ///
    /// The first occurrence of a name fixes its version; every occurrence
    /// replaces its dependency list.
    pub fn register(&mut self, id: &PackageId, dependencies: Vec<String>) {
        match self.packages.entry(id.name.clone()) {
            Entry::Occupied(mut e) => {
                let record = e.get_mut();
                if record.version != id.version {
                    tracing::debug!(
                        "Keeping first version {:?} of {}, ignoring {:?}",
                        record.version,
                        id.name,
                        id.version
                    );
                }
                record.dependencies = dependencies;
            }
            Entry::Vacant(e) => {
                e.insert(PackageRecord {
                    version: id.version.clone(),
                    dependencies,
                });
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    /// Replace the dependency list of an existing package.
    ///
    /// Returns `false` if the package is not registered.
    pub fn set_dependencies(&mut self, name: &str, dependencies: Vec<String>) -> bool {
        match self.packages.get_mut(name) {
            Some(record) => {
                record.dependencies = dependencies;
                true
            }
            None => false,
        }
    }

    /// All packages, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PackageRecord)> {
        self.packages.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}
