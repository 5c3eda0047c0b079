//! Handler for `yarn-rules`.

use miette::Result;

use yarn_rules_core::config::YarnRulesConfig;
use yarn_rules_ops::ops_generate::{self, GenerateOptions};

use crate::cli::Cli;

pub fn exec(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => YarnRulesConfig::from_path(path)?,
        None => YarnRulesConfig::default(),
    };
    if let Some(kind) = cli.rule_kind {
        config.render.rule_kind = kind;
    }

    let opts = GenerateOptions {
        input: cli.input,
        output: cli.output,
        append: cli.append,
        render: config.render,
    };

    let summary = ops_generate::generate(&opts)?;
    tracing::debug!("Run summary: {summary:?}");
    Ok(())
}
