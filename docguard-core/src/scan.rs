//! Line-oriented pattern scanning over a document set

use regex::Regex;

use crate::{
    corpus::{
        DocSet,
        Document,
    },
    diagnostics::Finding,
    error::{
        DocGuardError,
        DocGuardResult,
    },
};

/// Longest excerpt kept in a finding, in characters
const MAX_EXCERPT_CHARS: usize = 160;

/// A compiled pattern plus the substrings that exempt a line from it
#[derive(Debug, Clone)]
pub struct PatternScan {
    regex:    Regex,
    excludes: Vec<String>,
    redact:   bool,
}

impl PatternScan {
    /// Compile a regex pattern
    pub fn new(pattern: &str) -> DocGuardResult<Self> {
        let regex = Regex::new(pattern).map_err(|source| DocGuardError::Pattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            regex,
            excludes: Vec::new(),
            redact: false,
        })
    }

    /// Match any of the given strings literally
    pub fn literals<S: AsRef<str>>(words: &[S]) -> DocGuardResult<Self> {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w.as_ref()))
            .collect::<Vec<_>>()
            .join("|");
        // An empty alternation would match every line
        let pattern = if alternation.is_empty() { r"\b\B".to_string() } else { alternation };
        Self::new(&pattern)
    }

    /// Skip lines containing any of these substrings
    pub fn with_excludes<S: AsRef<str>>(mut self, excludes: &[S]) -> Self {
        self.excludes = excludes
            .iter()
            .map(|s| s.as_ref().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// Mask the matched text in excerpts
    pub fn redacted(mut self) -> Self {
        self.redact = true;
        self
    }

    /// Whether a single line is reported by this scan
    pub fn matches_line(&self, line: &str) -> bool {
        self.regex.is_match(line) && !self.excludes.iter().any(|ex| line.contains(ex.as_str()))
    }

    /// Scan one document
    pub fn scan_document(&self, doc: &Document) -> Vec<Finding> {
        doc.numbered_lines()
            .filter(|(_, line)| self.matches_line(line))
            .map(|(number, line)| Finding::new(doc.rel_path.clone(), number, self.excerpt(line)))
            .collect()
    }

    /// Scan every document in the set
    pub fn scan(&self, docs: &DocSet) -> Vec<Finding> {
        docs.documents().iter().flat_map(|doc| self.scan_document(doc)).collect()
    }

    fn excerpt(&self, line: &str) -> String {
        let text = if self.redact {
            self.regex.replace_all(line, "[REDACTED]").into_owned()
        } else {
            line.to_string()
        };
        let text = text.trim();
        if text.chars().count() > MAX_EXCERPT_CHARS {
            let cut: String = text.chars().take(MAX_EXCERPT_CHARS).collect();
            format!("{}...", cut)
        } else {
            text.to_string()
        }
    }
}
