//! Batch manifest: which repositories to pull, in which order.

use std::path::Path;

use tracing::debug;

use crate::error::{PagesError, Result};

/// One manifest row: repository url plus a human-readable label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoEntry {
    pub url: String,
    pub label: String,
}

/// Load the batch manifest.
///
/// The file is headerless CSV, one repository per row, url first and label
/// second. Rows with fewer than two fields carry no url/label pair and are
/// skipped; fields are trimmed. A missing file is a hard error.
pub fn load_manifest(path: &Path) -> Result<Vec<RepoEntry>> {
    if !path.exists() {
        return Err(PagesError::ManifestMissing {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)?;

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let url = record.get(0).unwrap_or("");
        match record.get(1) {
            Some(label) if !url.is_empty() => entries.push(RepoEntry {
                url: url.to_string(),
                label: label.to_string(),
            }),
            _ => debug!("skipping manifest row without a url/label pair"),
        }
    }
    Ok(entries)
}

/// Derive the local directory name for a repository url.
///
/// Trailing slashes are dropped, the last path segment is taken, and a
/// trailing `.git` is stripped: `https://github.com/a/b.git` and
/// `https://github.com/a/b/` both map to `b`.
pub fn repo_dir_name(url: &str) -> Result<String> {
    let trimmed = url.trim().trim_end_matches('/');
    let last = trimmed.rsplit('/').next().unwrap_or("");
    let name = last.strip_suffix(".git").unwrap_or(last);
    if name.is_empty() {
        return Err(PagesError::InvalidRepoUrl {
            url: url.to_string(),
        });
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn dir_name_strips_git_suffix() {
        assert_eq!(
            repo_dir_name("https://github.com/a/b.git").unwrap(),
            "b"
        );
    }

    #[test]
    fn dir_name_strips_trailing_slash() {
        assert_eq!(repo_dir_name("https://github.com/a/b/").unwrap(), "b");
    }

    #[test]
    fn dir_name_plain_url() {
        assert_eq!(repo_dir_name("https://github.com/a/b").unwrap(), "b");
    }

    #[test]
    fn dir_name_rejects_empty_result() {
        assert!(matches!(
            repo_dir_name("/"),
            Err(PagesError::InvalidRepoUrl { .. })
        ));
        assert!(matches!(
            repo_dir_name(".git"),
            Err(PagesError::InvalidRepoUrl { .. })
        ));
    }

    fn write_manifest(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn load_skips_short_rows() {
        let file = write_manifest(
            "https://github.com/a/b.git,Site B\n\
             onlyonefield\n\
             https://github.com/c/d/,Site D\n",
        );
        let entries = load_manifest(file.path()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].label, "Site B");
        assert_eq!(entries[1].url, "https://github.com/c/d/");
    }

    #[test]
    fn load_trims_fields() {
        let file = write_manifest("  https://github.com/a/b.git ,  Site B \n");
        let entries = load_manifest(file.path()).unwrap();
        assert_eq!(entries[0].url, "https://github.com/a/b.git");
        assert_eq!(entries[0].label, "Site B");
    }

    #[test]
    fn load_preserves_file_order() {
        let file = write_manifest("u1,first\nu2,second\nu3,third\n");
        let labels: Vec<String> = load_manifest(file.path())
            .unwrap()
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["first", "second", "third"]);
    }

    #[test]
    fn load_missing_file_is_hard_error() {
        let err = load_manifest(Path::new("/no/such/manifest.csv")).unwrap_err();
        assert!(matches!(err, PagesError::ManifestMissing { .. }));
    }
}
