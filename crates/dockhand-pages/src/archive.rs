//! Artifact archive extraction with entry-path validation.

use std::path::{Component, Path};

use tar::Archive;
use tracing::info;

use crate::config::PagesConfig;
use crate::error::{PagesError, Result};

/// Whether an entry path stays inside the extraction directory: relative,
/// no parent-dir hops, no prefix or root components.
fn is_safe_entry_path(path: &Path) -> bool {
    if path.as_os_str().is_empty() {
        return false;
    }
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Unpack `<artifact_dir>/<archive_file_name>` in place.
///
/// Every entry path is validated before anything is written; a single
/// entry pointing outside the directory rejects the whole archive and the
/// directory is left untouched. The archive file itself stays where it
/// was. Returns the number of entries extracted.
pub fn extract_archive(artifact_dir: &Path, config: &PagesConfig) -> Result<usize> {
    let archive_path = artifact_dir.join(&config.archive_file_name);
    if !archive_path.exists() {
        return Err(PagesError::ArchiveMissing { path: archive_path });
    }

    // Validation pass over every header.
    let file = std::fs::File::open(&archive_path)?;
    let mut archive = Archive::new(file);
    let mut entry_count = 0usize;
    for entry in archive.entries()? {
        let entry = entry?;
        let path = entry.path()?;
        if !is_safe_entry_path(&path) {
            return Err(PagesError::UnsafeArchiveEntry {
                entry: path.display().to_string(),
            });
        }
        entry_count += 1;
    }

    // Extraction pass over a fresh reader.
    let file = std::fs::File::open(&archive_path)?;
    let mut archive = Archive::new(file);
    archive.unpack(artifact_dir)?;

    info!(entries = entry_count, dir = %artifact_dir.display(), "archive extracted");
    Ok(entry_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_archive(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder
                .append_data(&mut header, path, contents.as_bytes())
                .unwrap();
        }
        builder.into_inner().unwrap()
    }

    // Builder refuses to encode `..` or absolute paths, so hostile headers
    // are written byte-wise.
    fn build_archive_with_raw_names(entries: &[(&[u8], &str)]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, contents) in entries {
            let mut header = tar::Header::new_gnu();
            header.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
            header.set_entry_type(tar::EntryType::Regular);
            header.set_size(contents.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append(&header, contents.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap()
    }

    fn artifact_dir_with(archive: &[u8], config: &PagesConfig) -> (tempfile::TempDir, std::path::PathBuf) {
        let parent = tempfile::tempdir().unwrap();
        let dir = parent.path().join("artifact");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(&config.archive_file_name), archive).unwrap();
        (parent, dir)
    }

    #[test]
    fn extract_unpacks_entries_in_place() {
        let config = PagesConfig::default();
        let archive = build_archive(&[
            ("index.html", "<html>home</html>"),
            ("assets/site.css", "body { margin: 0 }"),
        ]);
        let (_parent, dir) = artifact_dir_with(&archive, &config);

        let count = extract_archive(&dir, &config).unwrap();

        assert_eq!(count, 2);
        assert_eq!(
            std::fs::read_to_string(dir.join("index.html")).unwrap(),
            "<html>home</html>"
        );
        assert!(dir.join("assets/site.css").exists());
        // The archive is left in place next to its own contents.
        assert!(dir.join(&config.archive_file_name).exists());
    }

    #[test]
    fn extract_missing_archive_is_an_error() {
        let config = PagesConfig::default();
        let parent = tempfile::tempdir().unwrap();
        let dir = parent.path().join("artifact");
        std::fs::create_dir_all(&dir).unwrap();

        let err = extract_archive(&dir, &config).unwrap_err();
        assert!(matches!(err, PagesError::ArchiveMissing { .. }));
    }

    #[test]
    fn traversal_entry_rejects_whole_archive() {
        let config = PagesConfig::default();
        let archive = build_archive_with_raw_names(&[(b"../escape.html", "owned")]);
        let (parent, dir) = artifact_dir_with(&archive, &config);

        let err = extract_archive(&dir, &config).unwrap_err();

        assert!(matches!(err, PagesError::UnsafeArchiveEntry { .. }));
        assert!(!parent.path().join("escape.html").exists());
    }

    #[test]
    fn absolute_entry_rejects_whole_archive() {
        let config = PagesConfig::default();
        let archive = build_archive_with_raw_names(&[(b"/escape.html", "owned")]);
        let (_parent, dir) = artifact_dir_with(&archive, &config);

        let err = extract_archive(&dir, &config).unwrap_err();
        assert!(matches!(err, PagesError::UnsafeArchiveEntry { .. }));
    }

    #[test]
    fn nothing_is_written_when_a_later_entry_is_unsafe() {
        let config = PagesConfig::default();
        let mut builder = tar::Builder::new(Vec::new());

        let mut good = tar::Header::new_gnu();
        good.set_size(4);
        good.set_mode(0o644);
        good.set_cksum();
        builder.append_data(&mut good, "index.html", &b"home"[..]).unwrap();

        let mut bad = tar::Header::new_gnu();
        let name: &[u8] = b"../escape.html";
        bad.as_gnu_mut().unwrap().name[..name.len()].copy_from_slice(name);
        bad.set_entry_type(tar::EntryType::Regular);
        bad.set_size(5);
        bad.set_mode(0o644);
        bad.set_cksum();
        builder.append(&bad, &b"owned"[..]).unwrap();

        let archive = builder.into_inner().unwrap();
        let (_parent, dir) = artifact_dir_with(&archive, &config);

        extract_archive(&dir, &config).unwrap_err();
        assert!(!dir.join("index.html").exists());
    }

    #[test]
    fn dot_prefixed_paths_are_safe() {
        assert!(is_safe_entry_path(Path::new("./index.html")));
        assert!(is_safe_entry_path(Path::new("assets/site.css")));
        assert!(!is_safe_entry_path(Path::new("a/../../b")));
        assert!(!is_safe_entry_path(Path::new("")));
    }
}
