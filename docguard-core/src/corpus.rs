//! Loading the documents under a docs root

use std::path::{
    Path,
    PathBuf,
};

use tracing::{
    debug,
    warn,
};
use walkdir::{
    DirEntry,
    WalkDir,
};

use crate::error::{
    DocGuardError,
    DocGuardResult,
};

/// Directories never descended into
const SKIPPED_DIRS: [&str; 2] = ["target", "node_modules"];

/// A document loaded into memory
#[derive(Debug, Clone)]
pub struct Document {
    /// Path relative to the docs root, `/`-separated
    pub rel_path: String,
    /// Absolute path on disk
    pub path:     PathBuf,
    /// File contents
    pub content:  String,
}

impl Document {
    /// Number of lines in the document
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Lines with their 1-indexed numbers
    pub fn numbered_lines(&self) -> impl Iterator<Item = (usize, &str)> {
        self.content.lines().enumerate().map(|(i, line)| (i + 1, line))
    }
}

/// All documents under a docs root, sorted by relative path
#[derive(Debug, Clone)]
pub struct DocSet {
    root:      PathBuf,
    documents: Vec<Document>,
}

impl DocSet {
    /// Walk `root` and load every file whose extension is in `extensions`
    pub fn load(root: &Path, extensions: &[String]) -> DocGuardResult<Self> {
        if !root.is_dir() {
            return Err(DocGuardError::DocsRoot(root.to_path_buf()));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped(e));

        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                let source = e
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop"));
                DocGuardError::io(path, source)
            })?;

            if !entry.file_type().is_file() || !has_extension(entry.path(), extensions) {
                continue;
            }

            let path = entry.path().to_path_buf();
            let content = read_text(&path)?;
            let rel_path = relative_posix(root, &path);
            documents.push(Document {
                rel_path,
                path,
                content,
            });
        }

        documents.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        debug!("Loaded {} documents from {}", documents.len(), root.display());

        Ok(Self {
            root: root.to_path_buf(),
            documents,
        })
    }

    /// Build a set from documents already in memory
    #[cfg(test)]
    pub(crate) fn from_documents(root: impl Into<PathBuf>, mut documents: Vec<Document>) -> Self {
        documents.sort_by(|a, b| a.rel_path.cmp(&b.rel_path));
        Self {
            root: root.into(),
            documents,
        }
    }

    /// Docs root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Documents in path order
    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Number of documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Read a document, replacing invalid UTF-8 so one bad file cannot stop the run
fn read_text(path: &Path) -> DocGuardResult<String> {
    let bytes = std::fs::read(path).map_err(|e| DocGuardError::io(path, e))?;
    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            warn!("{} is not valid UTF-8; invalid bytes replaced", path.display());
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        },
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || SKIPPED_DIRS.iter().any(|skipped| name == *skipped)
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| extensions.iter().any(|want| want.eq_ignore_ascii_case(ext)))
}

fn relative_posix(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn md() -> Vec<String> {
        vec!["md".to_string()]
    }

    #[test]
    fn test_load_sorted_and_filtered() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("guides")).unwrap();
        fs::create_dir_all(dir.path().join(".git")).unwrap();
        fs::create_dir_all(dir.path().join("node_modules/pkg")).unwrap();
        fs::create_dir_all(dir.path().join("vendor")).unwrap();
        fs::write(dir.path().join("SKILL.md"), "---\nname: x\n---\n").unwrap();
        fs::write(dir.path().join("guides/wallets.md"), "# Wallets\n").unwrap();
        fs::write(dir.path().join("install.sh"), "echo hi\n").unwrap();
        fs::write(dir.path().join(".git/notes.md"), "hidden\n").unwrap();
        fs::write(dir.path().join("node_modules/pkg/README.md"), "dep\n").unwrap();
        fs::write(dir.path().join("vendor/notes.md"), "kept\n").unwrap();

        let docs = DocSet::load(dir.path(), &md()).unwrap();
        let names: Vec<_> = docs.documents().iter().map(|d| d.rel_path.as_str()).collect();
        assert_eq!(names, vec!["SKILL.md", "guides/wallets.md", "vendor/notes.md"]);
        assert_eq!(docs.documents()[0].line_count(), 3);
    }

    #[test]
    fn test_latin1_document_is_loaded_lossily() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("SKILL.md"), "---\n").unwrap();
        fs::write(dir.path().join("latin1.md"), b"caf\xe9 notes\n").unwrap();

        let docs = DocSet::load(dir.path(), &md()).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs.documents()[1].content, "caf\u{fffd} notes\n");
    }

    #[test]
    fn test_missing_root_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = DocSet::load(&dir.path().join("absent"), &md()).unwrap_err();
        assert!(matches!(err, DocGuardError::DocsRoot(_)));
    }

    #[test]
    fn test_numbered_lines_start_at_one() {
        let doc = Document {
            rel_path: "a.md".to_string(),
            path:     PathBuf::from("a.md"),
            content:  "first\nsecond\n".to_string(),
        };
        let lines: Vec<_> = doc.numbered_lines().collect();
        assert_eq!(lines, vec![(1, "first"), (2, "second")]);
    }
}
