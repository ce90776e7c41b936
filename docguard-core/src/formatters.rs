//! Output formatters for validation results
//!
//! Human output is written section by section while the run progresses.
//! JSON output is a single document written once the run is complete.

use colored::Colorize;

use crate::{
    diagnostics::{
        CheckKind,
        CheckResult,
        RunSummary,
        Status,
        SummaryOutcome,
        ValidationReport,
    },
    error::{
        DocGuardError,
        DocGuardResult,
    },
};

/// Output formats supported by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable format with symbols and optional colors
    #[default]
    Human,
    /// Pretty-printed JSON report
    Json,
}

/// Most findings listed under one result before eliding the rest
const MAX_FINDINGS_SHOWN: usize = 20;

/// Formats results as line-oriented text
#[derive(Debug, Clone, Copy)]
pub struct HumanFormatter {
    use_colors: bool,
}

impl HumanFormatter {
    /// Create a formatter
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Prefix symbol for a status
    pub fn symbol(&self, status: Status) -> String {
        let symbol = match status {
            Status::Pass => "✅",
            Status::Warning => "⚠️",
            Status::Fail => "❌",
        };
        if !self.use_colors {
            return symbol.to_string();
        }
        match status {
            Status::Pass => symbol.bright_green().to_string(),
            Status::Warning => symbol.bright_yellow().to_string(),
            Status::Fail => symbol.bright_red().to_string(),
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.use_colors {
            format!("{} {}", "🔍".bright_blue(), text.bold())
        } else {
            format!("🔍 {}", text)
        }
    }

    /// Format the results of one check
    pub fn format_section(&self, check: CheckKind, results: &[CheckResult]) -> String {
        let mut out = String::new();
        out.push_str(&self.heading(check.title()));
        out.push('\n');

        for result in results {
            out.push_str(&format!("  {} {}\n", self.symbol(result.status), result.message));
            for finding in result.findings.iter().take(MAX_FINDINGS_SHOWN) {
                out.push_str(&format!("      {}\n", finding));
            }
            if result.findings.len() > MAX_FINDINGS_SHOWN {
                out.push_str(&format!(
                    "      ... and {} more\n",
                    result.findings.len() - MAX_FINDINGS_SHOWN
                ));
            }
        }
        out
    }

    /// Format the closing summary block
    pub fn format_summary(&self, summary: &RunSummary) -> String {
        let rule = "═".repeat(60);
        let status = match summary.outcome() {
            SummaryOutcome::Clean => Status::Pass,
            SummaryOutcome::WarningsOnly => Status::Warning,
            SummaryOutcome::Failed => Status::Fail,
        };

        let mut out = String::new();
        if self.use_colors {
            out.push_str(&format!("{}\n", rule.bright_blue()));
            out.push_str(&format!("{} Summary\n", "📊".bright_cyan()));
        } else {
            out.push_str(&format!("{}\n", rule));
            out.push_str("📊 Summary\n");
        }
        out.push_str(&format!("  Errors:   {}\n", summary.errors));
        out.push_str(&format!("  Warnings: {}\n", summary.warnings));
        out.push_str(&format!("{} {}\n", self.symbol(status), summary.headline()));
        out
    }
}

/// Formats a report as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonFormatter;

impl JsonFormatter {
    /// Serialize the report
    pub fn format_report(&self, report: &ValidationReport) -> DocGuardResult<String> {
        serde_json::to_string_pretty(report).map_err(|e| DocGuardError::Output(e.to_string()))
    }
}
