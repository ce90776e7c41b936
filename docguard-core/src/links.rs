//! Relative Markdown link resolution
//!
//! Only `[label](target)` links outside fenced code blocks are considered.
//! Links with a URI scheme, protocol-relative links and anchor-only links are
//! left to the URL reachability check or ignored.

use std::path::{
    Component,
    Path,
    PathBuf,
};

use crate::{
    corpus::{
        DocSet,
        Document,
    },
    diagnostics::Finding,
};

/// A link target found in a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkRef {
    /// Raw target as written
    pub target: String,
    /// Line number (1-indexed)
    pub line:   usize,
}

/// Extract link targets from Markdown text, skipping fenced code
pub fn extract_links(body: &str) -> Vec<LinkRef> {
    let mut links = Vec::new();
    let mut in_fence = false;

    for (idx, line) in body.lines().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        for target in link_targets_in_line(line) {
            links.push(LinkRef {
                target,
                line: idx + 1,
            });
        }
    }

    links
}

fn link_targets_in_line(line: &str) -> Vec<String> {
    let bytes = line.as_bytes();
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < bytes.len() {
        // Images are not links
        if bytes[i] != b'[' || (i > 0 && bytes[i - 1] == b'!') {
            i += 1;
            continue;
        }

        let Some(label_end) = find_byte(bytes, b']', i + 1) else {
            break;
        };
        if bytes.get(label_end + 1) != Some(&b'(') {
            i = label_end + 1;
            continue;
        }
        let Some(target_end) = find_byte(bytes, b')', label_end + 2) else {
            break;
        };

        let mut target = line[label_end + 2..target_end].trim();
        // Drop a trailing title: [x](path "title")
        if !target.starts_with('<') {
            if let Some((before, _)) = target.split_once(' ') {
                target = before;
            }
        }
        let target = target.trim_start_matches('<').trim_end_matches('>');
        out.push(target.to_string());
        i = target_end + 1;
    }

    out
}

fn find_byte(bytes: &[u8], target: u8, start: usize) -> Option<usize> {
    bytes
        .get(start..)?
        .iter()
        .position(|b| *b == target)
        .map(|offset| start + offset)
}

/// Whether the target starts with a URI scheme such as `https:` or `mailto:`
pub fn has_uri_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    first.is_ascii_alphabetic()
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
}

/// Resolve a link target to a filesystem path, or `None` when it is not local
pub fn resolve_target(root: &Path, doc: &Document, target: &str) -> Option<PathBuf> {
    if target.is_empty()
        || target.starts_with('#')
        || target.starts_with('?')
        || target.starts_with("//")
        || has_uri_scheme(target)
    {
        return None;
    }

    let path_part = target.split(['#', '?']).next().unwrap_or_default();
    if path_part.is_empty() {
        return None;
    }

    let base = if let Some(stripped) = path_part.strip_prefix('/') {
        root.join(stripped)
    } else {
        let parent = doc.path.parent().unwrap_or(root);
        parent.join(path_part)
    };
    Some(normalize(&base))
}

/// Whether a resolved path exists, trying `.md` and `index.md` variants
pub fn target_exists(resolved: &Path) -> bool {
    if resolved.exists() {
        return true;
    }
    if resolved.extension().is_none() {
        return resolved.with_extension("md").is_file() || resolved.join("index.md").is_file();
    }
    false
}

/// Links in the set whose local target does not exist
pub fn broken_links(docs: &DocSet) -> Vec<Finding> {
    let mut findings = Vec::new();
    for doc in docs.documents() {
        for link in extract_links(&doc.content) {
            let Some(resolved) = resolve_target(docs.root(), doc, &link.target) else {
                continue;
            };
            if !target_exists(&resolved) {
                findings.push(Finding::new(
                    doc.rel_path.clone(),
                    link.line,
                    format!("broken link `{}`", link.target),
                ));
            }
        }
    }
    findings
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {},
            // `..` above a relative start must be kept, not swallowed
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                },
                Some(Component::RootDir | Component::Prefix(_)) => {},
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }
    out
}
