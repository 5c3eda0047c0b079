//! Operation: rewrite a `yarn list --json` dependency tree into build rules.

use std::path::PathBuf;

use yarn_rules_core::config::{is_rule_kind, RenderConfig};
use yarn_rules_core::registry::PackageRegistry;
use yarn_rules_core::rule::render_registry;
use yarn_rules_core::tree::DependencyTree;
use yarn_rules_resolver::graph::RegistryGraph;
use yarn_rules_resolver::normalize;
use yarn_rules_util::errors::YarnRulesError;
use yarn_rules_util::fs::{read_input, write_output};

/// Options for `yarn-rules`.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Read the tree from this file instead of stdin.
    pub input: Option<PathBuf>,
    /// Write the rules to this file instead of stdout.
    pub output: Option<PathBuf>,
    /// Append to `output` rather than truncating it.
    pub append: bool,
    pub render: RenderConfig,
}

/// Counts describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub packages: usize,
    pub roots: usize,
    pub dropped_edges: usize,
    /// Packages still on a cycle because no root reaches them.
    pub residual_cycles: Vec<String>,
}

/// Rendered rules together with the run summary.
#[derive(Debug, Clone)]
pub struct Generated {
    pub text: String,
    pub summary: GenerateSummary,
}

/// Read the tree, break its cycles and write the rules.
///
/// Nothing is written unless the whole transformation succeeds.
pub fn generate(opts: &GenerateOptions) -> miette::Result<GenerateSummary> {
    let input = read_input(opts.input.as_deref()).map_err(YarnRulesError::Io)?;
    let generated = transform(&input, &opts.render)?;
    write_output(opts.output.as_deref(), &generated.text, opts.append)
        .map_err(YarnRulesError::Io)?;

    let s = &generated.summary;
    tracing::info!(
        "Wrote {} rules ({} roots, {} cyclic edges dropped)",
        s.packages,
        s.roots,
        s.dropped_edges
    );
    Ok(generated.summary)
}

/// Transform the JSON document into rule text without touching any files.
pub fn generate_from_str(input: &str, render: &RenderConfig) -> miette::Result<String> {
    Ok(transform(input, render)?.text)
}

/// Parse, normalize and render `input`, returning text and summary.
pub fn transform(input: &str, render: &RenderConfig) -> miette::Result<Generated> {
    if !is_rule_kind(&render.rule_kind) {
        return Err(YarnRulesError::Config {
            message: format!("Invalid rule-kind '{}'", render.rule_kind),
        }
        .into());
    }

    let tree = DependencyTree::parse(input)?;
    let mut registry = PackageRegistry::from_tree(&tree);
    let roots = tree.roots();
    if roots.is_empty() && !registry.is_empty() {
        tracing::warn!("No root packages marked in the tree; dependencies are emitted as declared");
    }

    let report = normalize::normalize(&mut registry, &roots)?;
    tracing::debug!(
        "Normalization visited {} packages ({} answered from cache), dropped {} edges",
        report.visits,
        report.skipped,
        report.dropped.len()
    );

    let residual_cycles = RegistryGraph::from_registry(&registry).cyclic_packages();
    if !residual_cycles.is_empty() {
        tracing::warn!(
            "Packages not reachable from any root still form cycles: {}",
            residual_cycles.join(", ")
        );
    }

    let text = render_registry(&registry, render);
    Ok(Generated {
        text,
        summary: GenerateSummary {
            packages: registry.len(),
            roots: roots.len(),
            dropped_edges: report.dropped.len(),
            residual_cycles,
        },
    })
}
