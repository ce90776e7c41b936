//! The documentation validator
//!
//! Runs every check in [`CheckKind::ALL`] order, one after another, and
//! collects the results into a [`ValidationReport`]. A failing check never
//! stops the ones after it.

use std::time::Instant;

use tracing::{
    debug,
    info,
};

use crate::{
    checks::{
        self,
        ScanPatterns,
    },
    config::DocGuardConfig,
    corpus::DocSet,
    diagnostics::{
        CheckKind,
        CheckResult,
        ValidationReport,
    },
    error::DocGuardResult,
    probe::Probe,
};

/// Validator over one docs root
pub struct DocValidator {
    config:   DocGuardConfig,
    docs:     DocSet,
    patterns: ScanPatterns,
    probe:    Option<Box<dyn Probe>>,
}

impl DocValidator {
    /// Create a validator; compiles patterns so bad config fails here
    pub fn new(
        config: DocGuardConfig,
        docs: DocSet,
        probe: Option<Box<dyn Probe>>,
    ) -> DocGuardResult<Self> {
        let patterns = ScanPatterns::compile(&config)?;
        Ok(Self {
            config,
            docs,
            patterns,
            probe,
        })
    }

    /// Load the docs root named by `root` and create a validator for it
    pub fn for_root(
        root: &std::path::Path,
        config: DocGuardConfig,
        probe: Option<Box<dyn Probe>>,
    ) -> DocGuardResult<Self> {
        let docs = DocSet::load(root, &config.extensions)?;
        Self::new(config, docs, probe)
    }

    /// Whether the network checks will run
    pub fn is_offline(&self) -> bool {
        self.probe.is_none()
    }

    /// Documents under validation
    pub fn docs(&self) -> &DocSet {
        &self.docs
    }

    /// Run a single check
    pub async fn run_check(&self, check: CheckKind) -> Vec<CheckResult> {
        match check {
            CheckKind::Frontmatter => checks::frontmatter(
                self.docs.root(),
                &self.config.entry_document,
                &self.config.frontmatter_marker,
            ),
            CheckKind::Packages => match &self.probe {
                Some(probe) => {
                    checks::packages(probe.as_ref(), &self.config.registry.packages).await
                },
                None => Vec::new(),
            },
            CheckKind::Accounts => match &self.probe {
                Some(probe) => {
                    checks::accounts(
                        probe.as_ref(),
                        &self.config.chain.accounts,
                        &self.config.chain.expected_field,
                    )
                    .await
                },
                None => Vec::new(),
            },
            CheckKind::Urls => match &self.probe {
                Some(probe) => checks::urls(probe.as_ref(), &self.config.http.urls).await,
                None => Vec::new(),
            },
            CheckKind::Secrets => checks::secrets(&self.docs, &self.patterns.secrets),
            CheckKind::PersonalReferences => {
                checks::personal_references(&self.docs, &self.patterns.personal)
            },
            CheckKind::StaleReferences => {
                checks::stale_references(&self.docs, &self.patterns.stale)
            },
            CheckKind::EndpointShape => checks::endpoint_shape(
                &self.docs,
                &self.patterns.endpoint,
                &self.patterns.endpoint_description,
            ),
            CheckKind::LocalLinks => {
                if self.config.check_local_links {
                    checks::local_links(&self.docs)
                } else {
                    Vec::new()
                }
            },
            CheckKind::Inventory => checks::inventory(&self.docs),
        }
    }

    /// Run every check, calling `on_section` as each one completes
    pub async fn run_with<F>(&self, mut on_section: F) -> ValidationReport
    where
        F: FnMut(CheckKind, &[CheckResult]),
    {
        let start = Instant::now();
        info!(
            "Validating {} documents under {}",
            self.docs.len(),
            self.docs.root().display()
        );

        let mut all = Vec::new();
        for check in CheckKind::ALL {
            if check.is_remote() && self.is_offline() {
                debug!("Skipping {} (offline)", check);
                continue;
            }
            debug!("Running {}", check);
            let results = self.run_check(check).await;
            if results.is_empty() {
                continue;
            }
            on_section(check, &results);
            all.extend(results);
        }

        let report = ValidationReport::from_results(all, start.elapsed());
        info!(
            "Validation finished: {} error(s), {} warning(s)",
            report.summary.errors, report.summary.warnings
        );
        report
    }

    /// Run every check without progress callbacks
    pub async fn run(&self) -> ValidationReport {
        self.run_with(|_, _| {}).await
    }
}
