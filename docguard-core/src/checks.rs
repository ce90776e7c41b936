//! The individual validation checks
//!
//! Each function maps its inputs to a list of [`CheckResult`]s and never
//! returns an error: anything that goes wrong while checking (an unreadable
//! entry document, a probe that times out) becomes a failed result. Pattern
//! compilation happens up front in [`ScanPatterns::compile`] so a bad config
//! is rejected before any check runs.

use std::path::Path;

use tracing::{
    debug,
    warn,
};

use crate::{
    config::DocGuardConfig,
    corpus::DocSet,
    diagnostics::{
        CheckKind,
        CheckResult,
        Finding,
    },
    error::DocGuardResult,
    links,
    probe::Probe,
    scan::PatternScan,
};

/// Compiled patterns for the scan checks
#[derive(Debug, Clone)]
pub struct ScanPatterns {
    /// One scan per secret format, with its label
    pub secrets:              Vec<(String, PatternScan)>,
    /// Personal identifier scans
    pub personal:             Vec<PatternScan>,
    /// Deprecated domain scan
    pub stale:                PatternScan,
    /// Malformed endpoint scan
    pub endpoint:             PatternScan,
    /// Description of the malformed endpoint shape
    pub endpoint_description: String,
}

impl ScanPatterns {
    /// Compile every pattern in the configuration
    pub fn compile(config: &DocGuardConfig) -> DocGuardResult<Self> {
        let secrets = config
            .secrets
            .formats
            .iter()
            .map(|format| {
                let scan = PatternScan::new(&format.pattern)?
                    .with_excludes(&config.secrets.placeholders)
                    .redacted();
                Ok((format.name.clone(), scan))
            })
            .collect::<DocGuardResult<Vec<_>>>()?;

        let personal = config
            .personal
            .patterns
            .iter()
            .map(|p| PatternScan::new(p))
            .collect::<DocGuardResult<Vec<_>>>()?;

        let stale = PatternScan::literals(&config.stale.domains)?
            .with_excludes(std::slice::from_ref(&config.stale.historical_marker));

        let endpoint = PatternScan::new(&config.endpoints.pattern)?;

        Ok(Self {
            secrets,
            personal,
            stale,
            endpoint,
            endpoint_description: config.endpoints.description.clone(),
        })
    }
}

/// Entry document must start with the frontmatter marker
pub fn frontmatter(root: &Path, entry_document: &str, marker: &str) -> Vec<CheckResult> {
    let path = root.join(entry_document);
    let content = match std::fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            return vec![CheckResult::fail(
                CheckKind::Frontmatter,
                format!("{} could not be read: {}", entry_document, e),
            )];
        },
    };

    let first_line = content.lines().next().map(|l| l.trim_start_matches('\u{feff}').trim_end());
    let result = if first_line == Some(marker) {
        CheckResult::pass(
            CheckKind::Frontmatter,
            format!("{} starts with `{}`", entry_document, marker),
        )
    } else {
        CheckResult::fail(
            CheckKind::Frontmatter,
            format!("{} does not start with `{}`", entry_document, marker),
        )
    };
    vec![result]
}

/// Every package must have a published version
pub async fn packages(probe: &dyn Probe, names: &[String]) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(names.len());
    for name in names {
        let result = match probe.package_version(name).await {
            Ok(version) => {
                CheckResult::pass(CheckKind::Packages, format!("{} ({})", name, version))
            },
            Err(e) => {
                debug!("Package lookup for {} failed: {}", name, e);
                CheckResult::fail(CheckKind::Packages, format!("{} not found: {}", name, e))
            },
        };
        results.push(result);
    }
    results
}

/// Every account lookup must return the expected field
pub async fn accounts(probe: &dyn Probe, ids: &[String], expected_field: &str) -> Vec<CheckResult> {
    let needle = format!("\"{}\"", expected_field);
    let mut results = Vec::with_capacity(ids.len());
    for id in ids {
        let result = match probe.account_body(id).await {
            Ok(body) if body.contains(&needle) => {
                CheckResult::pass(CheckKind::Accounts, format!("{} exists", id))
            },
            Ok(_) => CheckResult::fail(
                CheckKind::Accounts,
                format!("{}: response has no `{}`", id, expected_field),
            ),
            Err(e) => {
                debug!("Account lookup for {} failed: {}", id, e);
                CheckResult::fail(CheckKind::Accounts, format!("{}: {}", id, e))
            },
        };
        results.push(result);
    }
    results
}

/// Every URL must answer 200
pub async fn urls(probe: &dyn Probe, urls: &[String]) -> Vec<CheckResult> {
    let mut results = Vec::with_capacity(urls.len());
    for url in urls {
        let result = match probe.url_status(url).await {
            Ok(200) => CheckResult::pass(CheckKind::Urls, format!("{} (200)", url)),
            Ok(status) => CheckResult::fail(CheckKind::Urls, format!("{} ({})", url, status)),
            Err(e) => {
                debug!("Request to {} failed: {}", url, e);
                CheckResult::fail(CheckKind::Urls, format!("{} unreachable: {}", url, e))
            },
        };
        results.push(result);
    }
    results
}

/// No secret format may match outside placeholder lines
pub fn secrets(docs: &DocSet, scans: &[(String, PatternScan)]) -> Vec<CheckResult> {
    scans
        .iter()
        .map(|(name, scan)| {
            let findings = scan.scan(docs);
            if findings.is_empty() {
                CheckResult::pass(CheckKind::Secrets, format!("No {} found", name))
            } else {
                CheckResult::fail(
                    CheckKind::Secrets,
                    format!("{} possible {} leak(s)", findings.len(), name),
                )
                .with_findings(findings)
            }
        })
        .collect()
}

/// Personal identifiers only ever warn
pub fn personal_references(docs: &DocSet, scans: &[PatternScan]) -> Vec<CheckResult> {
    let mut findings: Vec<Finding> = scans.iter().flat_map(|scan| scan.scan(docs)).collect();
    findings.sort_by(|a, b| (&a.file, a.line).cmp(&(&b.file, b.line)));
    findings.dedup_by(|a, b| a.file == b.file && a.line == b.line);

    let result = if findings.is_empty() {
        CheckResult::pass(CheckKind::PersonalReferences, "No personal references")
    } else {
        CheckResult::warning(
            CheckKind::PersonalReferences,
            format!("{} line(s) with personal references", findings.len()),
        )
        .with_findings(findings)
    };
    vec![result]
}

/// Deprecated domains must not appear outside historical context
pub fn stale_references(docs: &DocSet, scan: &PatternScan) -> Vec<CheckResult> {
    let findings = scan.scan(docs);
    let result = if findings.is_empty() {
        CheckResult::pass(CheckKind::StaleReferences, "No stale domain references")
    } else {
        CheckResult::fail(
            CheckKind::StaleReferences,
            format!("{} stale domain reference(s)", findings.len()),
        )
        .with_findings(findings)
    };
    vec![result]
}

/// The malformed endpoint shape must not appear
pub fn endpoint_shape(docs: &DocSet, scan: &PatternScan, description: &str) -> Vec<CheckResult> {
    let findings = scan.scan(docs);
    let result = if findings.is_empty() {
        CheckResult::pass(CheckKind::EndpointShape, format!("No {}", description))
    } else {
        CheckResult::fail(
            CheckKind::EndpointShape,
            format!("{} x {}", findings.len(), description),
        )
        .with_findings(findings)
    };
    vec![result]
}

/// Relative links must resolve; one result per document with broken links
pub fn local_links(docs: &DocSet) -> Vec<CheckResult> {
    let broken = links::broken_links(docs);
    if broken.is_empty() {
        return vec![CheckResult::pass(CheckKind::LocalLinks, "All relative links resolve")];
    }

    let mut results: Vec<CheckResult> = Vec::new();
    for finding in broken {
        match results.last_mut() {
            Some(last) if last.findings.first().is_some_and(|f| f.file == finding.file) => {
                last.findings.push(finding);
            },
            _ => results.push(
                CheckResult::fail(CheckKind::LocalLinks, finding.file.clone())
                    .with_findings(vec![finding]),
            ),
        }
    }
    for result in &mut results {
        result.message = format!("{}: {} broken link(s)", result.message, result.findings.len());
    }
    results
}

/// List every document with its line count; never fails
pub fn inventory(docs: &DocSet) -> Vec<CheckResult> {
    if docs.is_empty() {
        return vec![CheckResult::pass(CheckKind::Inventory, "No documents found")];
    }
    docs.documents()
        .iter()
        .map(|doc| {
            CheckResult::pass(
                CheckKind::Inventory,
                format!("{} ({} lines)", doc.rel_path, doc.line_count()),
            )
        })
        .collect()
}
