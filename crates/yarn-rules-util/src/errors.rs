use miette::Diagnostic;
use thiserror::Error;

/// Unified error type for all yarn-rules operations.
#[derive(Debug, Error, Diagnostic)]
pub enum YarnRulesError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The input is not a well-formed dependency tree.
    #[error("Malformed dependency tree: {message}")]
    #[diagnostic(help(
        "Expected the JSON output of `yarn list --json`, where every node has `name` and `children`"
    ))]
    Parse { message: String },

    /// A package references a dependency that was never registered.
    #[error("Package '{package}' depends on '{dependency}', which does not appear in the tree")]
    MissingPackage { package: String, dependency: String },

    /// A root package is not part of the registry.
    #[error("Root package '{name}' does not appear in the tree")]
    UnknownRoot { name: String },

    /// Invalid or unreadable render configuration.
    #[error("Config error: {message}")]
    #[diagnostic(help("Check the TOML passed to --config"))]
    Config { message: String },
}

/// Convenience alias for `miette::Result<T>`.
pub type YarnRulesResult<T> = miette::Result<T>;
