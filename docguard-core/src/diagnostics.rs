//! Check results and run summaries
//!
//! Every check produces one or more [`CheckResult`]s. The [`RunSummary`]
//! counts them as they arrive and decides the exit code; nothing else carries
//! state between checks.

use std::fmt;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

/// Outcome of a single check result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// The check found nothing wrong
    Pass,
    /// Worth a look, does not affect the exit code
    Warning,
    /// Counted toward the exit code
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "pass"),
            Status::Warning => write!(f, "warning"),
            Status::Fail => write!(f, "fail"),
        }
    }
}

/// The checks the validator knows, in run order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckKind {
    /// Entry document starts with the frontmatter marker
    Frontmatter,
    /// Referenced packages are published
    Packages,
    /// Referenced accounts exist on chain
    Accounts,
    /// Referenced URLs answer 200
    Urls,
    /// No real secret keys in the docs
    Secrets,
    /// No personal identifiers in the docs
    PersonalReferences,
    /// No deprecated domains in the docs
    StaleReferences,
    /// No malformed API URLs in the docs
    EndpointShape,
    /// Document listing for manual review
    Inventory,
    /// Relative links resolve to files
    LocalLinks,
}

impl CheckKind {
    /// All checks in the order the validator runs them
    pub const ALL: [CheckKind; 10] = [
        CheckKind::Frontmatter,
        CheckKind::Packages,
        CheckKind::Accounts,
        CheckKind::Urls,
        CheckKind::Secrets,
        CheckKind::PersonalReferences,
        CheckKind::StaleReferences,
        CheckKind::EndpointShape,
        CheckKind::LocalLinks,
        CheckKind::Inventory,
    ];

    /// Section heading used in human output
    pub fn title(self) -> &'static str {
        match self {
            CheckKind::Frontmatter => "Frontmatter",
            CheckKind::Packages => "Package existence",
            CheckKind::Accounts => "Account existence",
            CheckKind::Urls => "URL reachability",
            CheckKind::Secrets => "Secret leaks",
            CheckKind::PersonalReferences => "Personal references",
            CheckKind::StaleReferences => "Stale references",
            CheckKind::EndpointShape => "Endpoint shape",
            CheckKind::Inventory => "Document inventory",
            CheckKind::LocalLinks => "Local links",
        }
    }

    /// Whether the check needs the network
    pub fn is_remote(self) -> bool {
        matches!(self, CheckKind::Packages | CheckKind::Accounts | CheckKind::Urls)
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckKind::Frontmatter => "frontmatter",
            CheckKind::Packages => "packages",
            CheckKind::Accounts => "accounts",
            CheckKind::Urls => "urls",
            CheckKind::Secrets => "secrets",
            CheckKind::PersonalReferences => "personal-references",
            CheckKind::StaleReferences => "stale-references",
            CheckKind::EndpointShape => "endpoint-shape",
            CheckKind::Inventory => "inventory",
            CheckKind::LocalLinks => "local-links",
        };
        write!(f, "{}", name)
    }
}

/// A pattern match inside a document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// File path relative to the docs root
    pub file:    String,
    /// Line number (1-indexed)
    pub line:    usize,
    /// The offending line, trimmed
    pub excerpt: String,
}

impl Finding {
    /// Create a new finding
    pub fn new(file: impl Into<String>, line: usize, excerpt: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line,
            excerpt: excerpt.into(),
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.file, self.line, self.excerpt)
    }
}

/// One result produced by a check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    /// Check that produced this result
    pub check:    CheckKind,
    /// Outcome
    pub status:   Status,
    /// Human-readable message
    pub message:  String,
    /// Matches backing a warning or failure
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub findings: Vec<Finding>,
}

impl CheckResult {
    /// Create a passing result
    pub fn pass(check: CheckKind, message: impl Into<String>) -> Self {
        Self::new(check, Status::Pass, message)
    }

    /// Create a warning result
    pub fn warning(check: CheckKind, message: impl Into<String>) -> Self {
        Self::new(check, Status::Warning, message)
    }

    /// Create a failing result
    pub fn fail(check: CheckKind, message: impl Into<String>) -> Self {
        Self::new(check, Status::Fail, message)
    }

    fn new(check: CheckKind, status: Status, message: impl Into<String>) -> Self {
        Self {
            check,
            status,
            message: message.into(),
            findings: Vec::new(),
        }
    }

    /// Attach findings
    pub fn with_findings(mut self, findings: Vec<Finding>) -> Self {
        self.findings = findings;
        self
    }
}

/// How a run ended, for the summary line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryOutcome {
    /// No warnings, no failures
    Clean,
    /// Warnings but no failures
    WarningsOnly,
    /// At least one failure
    Failed,
}

/// Counters accumulated over a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Passing results
    pub passed:   usize,
    /// Warning results
    pub warnings: usize,
    /// Failing results
    pub errors:   usize,
}

impl RunSummary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one result
    pub fn record(&mut self, result: &CheckResult) {
        match result.status {
            Status::Pass => self.passed += 1,
            Status::Warning => self.warnings += 1,
            Status::Fail => self.errors += 1,
        }
    }

    /// Classify the run
    pub fn outcome(&self) -> SummaryOutcome {
        if self.errors > 0 {
            SummaryOutcome::Failed
        } else if self.warnings > 0 {
            SummaryOutcome::WarningsOnly
        } else {
            SummaryOutcome::Clean
        }
    }

    /// Highest exit code a run reports; 255 is left for startup failures
    pub const MAX_EXIT_CODE: usize = 254;

    /// Process exit code: the fail count, clamped so it never wraps to 0
    pub fn exit_code(&self) -> i32 {
        self.errors.min(Self::MAX_EXIT_CODE) as i32
    }

    /// Summary line shown at the end of a run
    pub fn headline(&self) -> String {
        match self.outcome() {
            SummaryOutcome::Clean => "All checks passed!".to_string(),
            SummaryOutcome::WarningsOnly => {
                format!("Passed with {} warning(s)", self.warnings)
            },
            SummaryOutcome::Failed => format!(
                "Found {} error(s) and {} warning(s)",
                self.errors, self.warnings
            ),
        }
    }
}

/// Everything a run produced
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Results in the order they were produced
    pub checks:       Vec<CheckResult>,
    /// Counters over `checks`
    pub summary:      RunSummary,
    /// When the run finished
    pub generated_at: DateTime<Utc>,
    /// Wall-clock duration of the run
    pub duration_ms:  u64,
}

impl ValidationReport {
    /// Build a report from results, counting them into a fresh summary
    pub fn from_results(checks: Vec<CheckResult>, duration: std::time::Duration) -> Self {
        let mut summary = RunSummary::new();
        for result in &checks {
            summary.record(result);
        }
        Self {
            checks,
            summary,
            generated_at: Utc::now(),
            duration_ms: duration.as_millis() as u64,
        }
    }

    /// Results produced by one check
    pub fn results_for(&self, check: CheckKind) -> impl Iterator<Item = &CheckResult> {
        self.checks.iter().filter(move |r| r.check == check)
    }

    /// Number of failing results
    pub fn fail_count(&self) -> usize {
        self.summary.errors
    }

    /// Process exit code for this report
    pub fn exit_code(&self) -> i32 {
        self.summary.exit_code()
    }
}
