use serde::{Deserialize, Serialize};
use std::path::Path;

use yarn_rules_util::errors::YarnRulesError;

use crate::rule::DEFAULT_RULE_KIND;

/// Configuration file passed with `--config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct YarnRulesConfig {
    #[serde(default)]
    pub render: RenderConfig,
}

/// Output settings from `[render]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Name of the build rule emitted for each package.
    #[serde(default = "default_rule_kind", rename = "rule-kind")]
    pub rule_kind: String,
    /// Text written once before the first rule.
    #[serde(default)]
    pub header: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rule_kind: default_rule_kind(),
            header: None,
        }
    }
}

fn default_rule_kind() -> String {
    DEFAULT_RULE_KIND.to_string()
}

impl YarnRulesConfig {
    /// Load and parse a TOML configuration file.
    pub fn from_path(path: &Path) -> miette::Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| YarnRulesError::Config {
            message: format!("Failed to read {}: {e}", path.display()),
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> miette::Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| YarnRulesError::Config {
            message: format!("Failed to parse config: {e}"),
        })?;
        if !is_rule_kind(&config.render.rule_kind) {
            return Err(YarnRulesError::Config {
                message: format!("Invalid rule-kind '{}'", config.render.rule_kind),
            }
            .into());
        }
        Ok(config)
    }
}

/// Whether `s` can be used as a rule name: an identifier of ASCII letters,
/// digits and underscores, not starting with a digit.
pub fn is_rule_kind(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
