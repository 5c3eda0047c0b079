//! Formatting of build rules.

use std::fmt;

use crate::config::RenderConfig;
use crate::registry::{PackageRecord, PackageRegistry};

/// Rule emitted when no other kind is configured.
pub const DEFAULT_RULE_KIND: &str = "yarn_library";

/// A single build rule block for one package.
#[derive(Debug, Clone, Copy)]
pub struct BuildRule<'a> {
    pub kind: &'a str,
    pub name: &'a str,
    pub record: &'a PackageRecord,
}

impl fmt::Display for BuildRule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{}(", self.kind)?;
        writeln!(f, "    name = '{}',", self.name)?;
        writeln!(f, "    version = '{}',", self.record.version_str())?;
        if !self.record.dependencies.is_empty() {
            writeln!(f, "    deps = [")?;
            for dep in &self.record.dependencies {
                writeln!(f, "        ':{dep}',")?;
            }
            writeln!(f, "    ],")?;
        }
        writeln!(f, ")")
    }
}

/// Render one rule per registered package, in name order.
pub fn render_registry(registry: &PackageRegistry, config: &RenderConfig) -> String {
    let mut output = String::new();
    if let Some(header) = &config.header {
        output.push_str(header);
        if !header.ends_with('\n') {
            output.push('\n');
        }
    }
    for (name, record) in registry.iter() {
        let rule = BuildRule {
            kind: &config.rule_kind,
            name,
            record,
        };
        output.push_str(&rule.to_string());
    }
    output
}
