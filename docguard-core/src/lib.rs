//! docguard core - validation of Markdown documentation bundles
//!
//! This library holds everything the `docguard` CLI does: it loads the
//! documents under a docs root, runs a fixed sequence of independent checks
//! over them and over a handful of remote endpoints, and reports each result
//! as pass, warning or fail.
//!
//! # Checks
//!
//! - **Frontmatter**: the entry document starts with the frontmatter marker
//! - **Packages / Accounts / URLs**: remote resources referenced by the docs
//!   still exist (skipped when offline)
//! - **Secrets, personal references, stale domains, endpoint shape**: line
//!   scans over every document
//! - **Local links**: relative Markdown links resolve to files
//! - **Inventory**: every document with its line count, informational only
//!
//! The process exit code is the number of failed results; warnings never
//! affect it.
//!
//! ```no_run
//! # async fn demo() -> docguard_core::DocGuardResult<()> {
//! use docguard_core::{DocGuardConfig, DocValidator};
//!
//! let root = std::path::Path::new("docs");
//! let config = DocGuardConfig::load(root, None)?;
//! let validator = DocValidator::for_root(root, config, None)?;
//! let report = validator.run().await;
//! std::process::exit(report.exit_code());
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod checks;
pub mod config;
pub mod corpus;
pub mod diagnostics;
pub mod error;
pub mod formatters;
pub mod links;
pub mod probe;
pub mod scan;
pub mod validation;

// Public API
pub use config::DocGuardConfig;
pub use diagnostics::{CheckKind, CheckResult, RunSummary, Status, ValidationReport};
pub use error::{DocGuardError, DocGuardResult};
pub use validation::DocValidator;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_defined() {
        assert!(!VERSION.is_empty(), "Version should be defined");
    }
}
