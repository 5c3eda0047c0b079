//! Command handlers.

mod generate;

use miette::Result;

use crate::cli::Cli;

/// Run the parsed CLI invocation.
pub fn dispatch(cli: Cli) -> Result<()> {
    generate::exec(cli)
}
