//! Reading catalog documents from a docs directory.

use crate::error::{ConfigError, Result};
use gael_markdown::SourceFile;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

static RE_CATALOG_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}-.*\.md$").expect("catalog filename regex"));

/// Returns `true` for names like `01-system.md`.
#[must_use]
pub fn is_catalog_filename(name: &str) -> bool {
    RE_CATALOG_FILENAME.is_match(name)
}

/// A file that matched but could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedFile {
    /// Path that failed.
    pub path: PathBuf,
    /// Error message.
    pub reason: String,
}

/// Files read from a docs directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedDocs {
    /// Readable documents, in filename order.
    pub files: Vec<SourceFile>,
    /// Documents that failed to read.
    pub skipped: Vec<SkippedFile>,
}

/// Read every `NN-*.md` file of `dir`, in filename order.
///
/// A file that cannot be read is logged and reported in
/// [`LoadedDocs::skipped`]; the others still load.
///
/// # Errors
///
/// Returns `ConfigError::DocsDirMissing` if `dir` is not a directory and
/// `Error::Io` if it cannot be listed.
pub async fn load_docs(dir: &Path) -> Result<LoadedDocs> {
    if !dir.is_dir() {
        return Err(ConfigError::DocsDirMissing(dir.to_path_buf()).into());
    }

    let mut names = Vec::new();
    let mut listing = tokio::fs::read_dir(dir).await?;
    while let Some(item) = listing.next_entry().await? {
        if let Some(name) = item.file_name().to_str().filter(|n| is_catalog_filename(n)) {
            names.push(name.to_string());
        }
    }
    names.sort();

    let mut loaded = LoadedDocs::default();
    for name in names {
        let path = dir.join(&name);
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => loaded.files.push(SourceFile::new(name, content)),
            Err(error) => {
                tracing::warn!(path = %path.display(), %error, "skipping unreadable document");
                loaded.skipped.push(SkippedFile {
                    path,
                    reason: error.to_string(),
                });
            }
        }
    }

    tracing::debug!(
        dir = %dir.display(),
        files = loaded.files.len(),
        skipped = loaded.skipped.len(),
        "loaded docs"
    );
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;
    use tempfile::TempDir;

    #[rstest]
    #[case::canonical("01-system.md", true)]
    #[case::three_digits("100-big.md", false)]
    #[case::no_dash("01system.md", false)]
    #[case::readme("README.md", false)]
    #[case::wrong_extension("01-system.txt", false)]
    #[case::bare_number("07-.md", true)]
    fn test_is_catalog_filename(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(is_catalog_filename(name), expected);
    }

    #[tokio::test]
    async fn test_load_docs_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["10-late.md", "02-early.md", "README.md", "notes.txt"] {
            std::fs::write(temp_dir.path().join(name), format!("# {name}\n")).unwrap();
        }
        std::fs::create_dir(temp_dir.path().join("03-dir.md.d")).unwrap();

        let loaded = load_docs(temp_dir.path()).await.unwrap();
        let names: Vec<_> = loaded.files.iter().map(|f| f.filename.as_str()).collect();
        assert_eq!(names, vec!["02-early.md", "10-late.md"]);
        assert!(loaded.skipped.is_empty());
    }

    #[tokio::test]
    async fn test_load_docs_skips_unreadable_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("01-ok.md"), "# 01 — Ok\n").unwrap();
        // A directory with a matching name cannot be read as a file.
        std::fs::create_dir(temp_dir.path().join("02-broken.md")).unwrap();

        let loaded = load_docs(temp_dir.path()).await.unwrap();
        assert_eq!(loaded.files.len(), 1);
        assert_eq!(loaded.skipped.len(), 1);
        assert!(loaded.skipped[0].path.ends_with("02-broken.md"));
    }

    #[tokio::test]
    async fn test_load_docs_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_docs(&temp_dir.path().join("absent")).await.unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::DocsDirMissing(_))));
    }
}
