//! Read-only memory-file browser
//!
//! Lists, reads, and searches the flat memory directory. Search is a linear
//! case-insensitive substring scan over every file; nothing is indexed, so
//! cost grows with the directory. The browser never writes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use tracing::warn;

use crate::types::{HearthError, Result};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryFile {
    pub name: String,
    pub size: u64,
    pub modified: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    pub file: String,
    pub line: usize,
    pub text: String,
}

pub struct MemoryBrowser {
    dir: PathBuf,
}

impl MemoryBrowser {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Regular files in the memory directory, sorted by name. An absent
    /// directory is the empty state.
    pub fn list(&self) -> Result<Vec<MemoryFile>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(HearthError::Storage(format!(
                    "read {}: {}",
                    self.dir.display(),
                    e
                )))
            }
        };

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().to_string();
            if name.starts_with('.') {
                continue;
            }
            let Ok(meta) = entry.metadata() else { continue };
            if !meta.is_file() {
                continue;
            }
            files.push(MemoryFile {
                name,
                size: meta.len(),
                modified: meta.modified().ok().map(iso_stamp),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    /// Read one file by name. Names with path separators or `..` are
    /// rejected before touching the filesystem.
    pub fn read(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        let path = self.dir.join(name);
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(HearthError::NotFound {
                kind: "Memory file",
                id: name.to_string(),
            }),
            Err(e) => Err(HearthError::Storage(format!(
                "read {}: {}",
                path.display(),
                e
            ))),
        }
    }

    /// Linear case-insensitive substring scan across every listed file.
    pub fn search(&self, query: &str) -> Result<Vec<SearchMatch>> {
        let needle = query.to_lowercase();
        let mut matches = Vec::new();
        if needle.is_empty() {
            return Ok(matches);
        }

        for file in self.list()? {
            let content = match self.read(&file.name) {
                Ok(content) => content,
                Err(e) => {
                    // Unreadable (e.g. non-UTF-8) files are skipped, not fatal.
                    warn!(file = %file.name, error = %e, "Skipping unreadable memory file");
                    continue;
                }
            };
            for (index, line) in content.lines().enumerate() {
                if line.to_lowercase().contains(&needle) {
                    matches.push(SearchMatch {
                        file: file.name.clone(),
                        line: index + 1,
                        text: line.trim().to_string(),
                    });
                }
            }
        }
        Ok(matches)
    }
}

fn validate_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || Path::new(name).is_absolute();
    if bad {
        return Err(HearthError::BadRequest(format!(
            "Invalid memory file name: {}",
            name
        )));
    }
    Ok(())
}

fn iso_stamp(time: std::time::SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn browser() -> (tempfile::TempDir, MemoryBrowser) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("notes.md"), "# Notes\nRemember the milk\n").unwrap();
        std::fs::write(dir.path().join("ideas.md"), "Build a dashboard\n").unwrap();
        std::fs::write(dir.path().join(".hidden"), "secret").unwrap();
        let browser = MemoryBrowser::new(dir.path());
        (dir, browser)
    }

    #[test]
    fn test_list_sorts_and_skips_hidden() {
        let (_dir, browser) = browser();
        let files = browser.list().unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["ideas.md", "notes.md"]);
        assert!(files[0].size > 0);
    }

    #[test]
    fn test_read_missing_file_is_not_found() {
        let (_dir, browser) = browser();
        let err = browser.read("gone.md").unwrap_err();
        assert_eq!(err.to_string(), "Memory file not found");
    }

    #[test]
    fn test_read_rejects_traversal() {
        let (_dir, browser) = browser();
        assert!(browser.read("../etc/passwd").is_err());
        assert!(browser.read("a/b.md").is_err());
        assert!(browser.read("").is_err());
    }

    #[test]
    fn test_search_is_case_insensitive_with_line_numbers() {
        let (_dir, browser) = browser();
        let matches = browser.search("REMEMBER").unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].file, "notes.md");
        assert_eq!(matches[0].line, 2);
        assert_eq!(matches[0].text, "Remember the milk");
    }

    #[test]
    fn test_search_empty_query_matches_nothing() {
        let (_dir, browser) = browser();
        assert!(browser.search("").unwrap().is_empty());
    }

    #[test]
    fn test_absent_directory_is_empty_state() {
        let browser = MemoryBrowser::new("/nonexistent/hearth-memory");
        assert!(browser.list().unwrap().is_empty());
    }
}
