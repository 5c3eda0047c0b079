//! CLI argument definitions for yarn-rules.
//!
//! With no arguments the tool reads `yarn list --json` output from stdin and
//! writes build rules to stdout.

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "yarn-rules",
    version,
    about = "Rewrite `yarn list --json` output into build rules",
    long_about = "Reads the JSON dependency tree printed by `yarn list --json`, breaks dependency \
                  cycles top-down from the packages yarn marks as direct dependencies, and prints \
                  one build rule per package, sorted by name.\n\n\
                  Usage: yarn list --json | yarn-rules >> third_party/js/BUILD"
)]
pub struct Cli {
    /// Read the dependency tree from a file instead of stdin
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Write rules to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Append to the output file instead of overwriting it
    #[arg(long, requires = "output")]
    pub append: bool,

    /// Build rule to emit for each package
    #[arg(long, env = "YARN_RULES_RULE_KIND")]
    pub rule_kind: Option<String>,

    /// TOML file with a [render] section
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
