//! The dependency tree document produced by `yarn list --json`.

use serde::Deserialize;

use yarn_rules_util::errors::{YarnRulesError, YarnRulesResult};

use crate::package::PackageId;

/// Value of the `color` attribute that marks a top-level node as a root.
pub const ROOT_COLOR: &str = "bold";

#[derive(Debug, Deserialize)]
struct Document {
    data: DocumentData,
}

#[derive(Debug, Deserialize)]
struct DocumentData {
    trees: Vec<TreeNode>,
}

/// A node as it appears in the JSON. Unknown attributes are ignored.
#[derive(Debug, Deserialize)]
struct RawTreeNode {
    name: String,
    #[serde(default)]
    children: Option<Vec<RawTreeNode>>,
    #[serde(default)]
    color: Option<String>,
}

/// One node of the dependency tree.
///
/// A nested node without a `children` attribute (yarn's "shadow" entries)
/// is a reference: it names a dependency whose own node appears elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTreeNode")]
pub struct TreeNode {
    pub id: PackageId,
    /// Whether the node is a traversal root for cycle elimination.
    pub root: bool,
    pub reference: bool,
    pub children: Vec<TreeNode>,
}

impl From<RawTreeNode> for TreeNode {
    fn from(raw: RawTreeNode) -> Self {
        Self {
            id: PackageId::parse(&raw.name),
            root: raw.color.as_deref() == Some(ROOT_COLOR),
            reference: raw.children.is_none(),
            children: raw
                .children
                .unwrap_or_default()
                .into_iter()
                .map(TreeNode::from)
                .collect(),
        }
    }
}

impl TreeNode {
    /// Names of the direct children, in declaration order.
    pub fn child_names(&self) -> Vec<String> {
        self.children.iter().map(|c| c.id.name.clone()).collect()
    }
}

/// The parsed list of top-level trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyTree {
    pub trees: Vec<TreeNode>,
}

impl DependencyTree {
    /// Parse the JSON document read from `yarn list --json`.
    pub fn parse(input: &str) -> YarnRulesResult<Self> {
        let doc: Document =
            serde_json::from_str(input).map_err(|e| YarnRulesError::Parse {
                message: e.to_string(),
            })?;
        if let Some(node) = doc.data.trees.iter().find(|t| t.reference) {
            return Err(YarnRulesError::Parse {
                message: format!("missing field `children` in top-level node `{}`", node.id),
            }
            .into());
        }
        Ok(Self {
            trees: doc.data.trees,
        })
    }

    /// Names of the top-level nodes marked as roots, in input order.
    pub fn roots(&self) -> Vec<String> {
        self.trees
            .iter()
            .filter(|t| t.root)
            .map(|t| t.id.name.clone())
            .collect()
    }
}
