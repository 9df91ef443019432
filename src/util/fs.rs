//! Filesystem utilities.
//!
//! The main export is `copy_tree`, the asset mirror used to bundle an
//! auxiliary folder into each platform's build output. It skips sidecar
//! metadata files and never overwrites: a conflicting destination file is
//! an error, but the remaining files still copy, so a rerun after deleting
//! the new tree is the recovery path.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use glob::glob;
use thiserror::Error;
use walkdir::WalkDir;

/// Error from the asset mirror.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Source directory missing or not a directory, checked before any copy
    #[error("source directory does not exist or could not be found: {path}")]
    SourceNotFound {
        /// The missing source
        path: PathBuf,
    },

    /// A destination file already existed; it was left untouched
    #[error("destination file already exists: {path}")]
    DestinationExists {
        /// The conflicting destination file
        path: PathBuf,
    },

    /// Underlying I/O failure
    #[error("failed to copy into {path}")]
    Io {
        /// The path being written when the failure occurred
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Exclusion policy for the asset mirror.
///
/// Files whose extension matches an entry are skipped. The default skips
/// `meta` sidecar files.
#[derive(Debug, Clone)]
pub struct MirrorPolicy {
    /// File extensions (without the dot) to skip
    pub exclude_extensions: Vec<String>,
}

impl Default for MirrorPolicy {
    fn default() -> Self {
        MirrorPolicy {
            exclude_extensions: vec!["meta".to_string()],
        }
    }
}

impl MirrorPolicy {
    /// Whether a file should be skipped under this policy.
    fn is_excluded(&self, path: &Path) -> bool {
        match path.extension() {
            Some(ext) => {
                let ext = ext.to_string_lossy();
                self.exclude_extensions.iter().any(|e| *e == ext)
            }
            None => false,
        }
    }
}

/// Statistics from a completed mirror run.
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyStats {
    /// Number of files copied
    pub files_copied: usize,

    /// Total bytes copied
    pub bytes: u64,
}

/// Mirror `source` into `dest`, skipping policy-excluded files.
///
/// `dest` and intermediate directories are created as needed; a
/// pre-existing `dest` is fine. Existing destination files are never
/// overwritten: each conflict is recorded and the remaining files still
/// copy, then the call fails with the first conflict. When `recursive` is
/// false only the top-level files are considered.
pub fn copy_tree(
    source: &Path,
    dest: &Path,
    recursive: bool,
    policy: &MirrorPolicy,
) -> Result<CopyStats, MirrorError> {
    if !source.is_dir() {
        return Err(MirrorError::SourceNotFound {
            path: source.to_path_buf(),
        });
    }

    fs::create_dir_all(dest).map_err(|e| MirrorError::Io {
        path: dest.to_path_buf(),
        source: e,
    })?;

    let mut stats = CopyStats::default();
    let mut conflicts: Vec<PathBuf> = Vec::new();

    let max_depth = if recursive { usize::MAX } else { 1 };
    for entry in WalkDir::new(source).min_depth(1).max_depth(max_depth) {
        let entry = entry.map_err(|e| {
            let path = e
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| source.to_path_buf());
            MirrorError::Io {
                path,
                source: e.into(),
            }
        })?;

        // walkdir yields every entry under the root, so the prefix strip
        // cannot fail
        let rel = entry
            .path()
            .strip_prefix(source)
            .expect("walkdir entry outside source root");
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| MirrorError::Io {
                path: target.clone(),
                source: e,
            })?;
            continue;
        }

        if !entry.file_type().is_file() || policy.is_excluded(entry.path()) {
            continue;
        }

        if target.exists() {
            tracing::warn!("not overwriting existing file: {}", target.display());
            conflicts.push(target);
            continue;
        }

        let copied = fs::copy(entry.path(), &target).map_err(|e| MirrorError::Io {
            path: target.clone(),
            source: e,
        })?;
        stats.files_copied += 1;
        stats.bytes += copied;
    }

    if let Some(first) = conflicts.into_iter().next() {
        return Err(MirrorError::DestinationExists { path: first });
    }

    Ok(stats)
}

/// Ensure a directory exists, creating it if necessary.
pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .with_context(|| format!("failed to create directory: {}", path.display()))?;
    }
    Ok(())
}

/// Find files matching glob patterns relative to a base directory.
pub fn glob_files(base: &Path, patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut results = Vec::new();

    for pattern in patterns {
        let full_pattern = base.join(pattern);
        let pattern_str = full_pattern.to_string_lossy();

        for entry in
            glob(&pattern_str).with_context(|| format!("invalid glob pattern: {}", pattern))?
        {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        results.push(path);
                    }
                }
                Err(e) => {
                    tracing::warn!("glob error: {}", e);
                }
            }
        }
    }

    results.sort();
    results.dedup();
    Ok(results)
}

/// Total size in bytes of a file, or of every file under a directory.
///
/// Bundle artifacts (macOS `.app`) are directories, so size measurement
/// has to handle both shapes.
pub fn path_size(path: &Path) -> io::Result<u64> {
    let meta = fs::metadata(path)?;
    if meta.is_file() {
        return Ok(meta.len());
    }

    let mut total = 0;
    for entry in WalkDir::new(path).min_depth(1) {
        let entry = entry.map_err(io::Error::other)?;
        if entry.file_type().is_file() {
            total += entry.metadata().map_err(io::Error::other)?.len();
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn policy() -> MirrorPolicy {
        MirrorPolicy::default()
    }

    #[test]
    fn test_copy_tree_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = copy_tree(
            &tmp.path().join("nope"),
            &tmp.path().join("dst"),
            true,
            &policy(),
        )
        .unwrap_err();
        assert!(matches!(err, MirrorError::SourceNotFound { .. }));
    }

    #[test]
    fn test_copy_tree_source_is_file_not_dir() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("file.txt");
        fs::write(&file, "x").unwrap();
        let err = copy_tree(&file, &tmp.path().join("dst"), true, &policy()).unwrap_err();
        assert!(matches!(err, MirrorError::SourceNotFound { .. }));
    }

    #[test]
    fn test_copy_tree_copies_and_skips_metadata() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("readme.txt"), "hello").unwrap();
        fs::write(src.join("readme.txt.meta"), "sidecar").unwrap();

        let stats = copy_tree(&src, &dst, true, &policy()).unwrap();

        assert_eq!(stats.files_copied, 1);
        assert_eq!(stats.bytes, 5);
        assert!(dst.join("readme.txt").exists());
        assert!(!dst.join("readme.txt.meta").exists());
    }

    #[test]
    fn test_copy_tree_custom_exclusions() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.tmp"), "x").unwrap();
        fs::write(src.join("b.dat"), "y").unwrap();

        let custom = MirrorPolicy {
            exclude_extensions: vec!["tmp".to_string()],
        };
        copy_tree(&src, &dst, true, &custom).unwrap();

        assert!(!dst.join("a.tmp").exists());
        assert!(dst.join("b.dat").exists());
    }

    #[test]
    fn test_copy_tree_recursive_preserves_structure() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(src.join("nested/deeper")).unwrap();
        fs::write(src.join("top.txt"), "1").unwrap();
        fs::write(src.join("nested/mid.txt"), "2").unwrap();
        fs::write(src.join("nested/deeper/leaf.txt"), "3").unwrap();

        let stats = copy_tree(&src, &dst, true, &policy()).unwrap();

        assert_eq!(stats.files_copied, 3);
        assert!(dst.join("top.txt").exists());
        assert!(dst.join("nested/mid.txt").exists());
        assert!(dst.join("nested/deeper/leaf.txt").exists());
    }

    #[test]
    fn test_copy_tree_non_recursive_skips_subdirs() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(src.join("nested")).unwrap();
        fs::write(src.join("top.txt"), "1").unwrap();
        fs::write(src.join("nested/mid.txt"), "2").unwrap();

        let stats = copy_tree(&src, &dst, false, &policy()).unwrap();

        assert_eq!(stats.files_copied, 1);
        assert!(dst.join("top.txt").exists());
        assert!(!dst.join("nested/mid.txt").exists());
    }

    #[test]
    fn test_copy_tree_second_run_conflicts_but_copies_new_files() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();

        copy_tree(&src, &dst, true, &policy()).unwrap();

        // Add one more source file, then rerun without clearing dest
        fs::write(src.join("b.txt"), "b").unwrap();
        let err = copy_tree(&src, &dst, true, &policy()).unwrap_err();

        assert!(matches!(err, MirrorError::DestinationExists { .. }));
        // Conflicting file untouched, new file still copied
        assert_eq!(fs::read_to_string(dst.join("a.txt")).unwrap(), "a");
        assert!(dst.join("b.txt").exists());
    }

    #[test]
    fn test_copy_tree_preexisting_dest_dir_is_fine() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).unwrap();
        fs::create_dir_all(&dst).unwrap();
        fs::write(src.join("a.txt"), "a").unwrap();

        let stats = copy_tree(&src, &dst, true, &policy()).unwrap();
        assert_eq!(stats.files_copied, 1);
    }

    #[test]
    fn test_glob_files() {
        let tmp = TempDir::new().unwrap();
        let scenes = tmp.path().join("scenes");
        fs::create_dir_all(&scenes).unwrap();
        fs::write(scenes.join("main.scene"), "").unwrap();
        fs::write(scenes.join("menu.scene"), "").unwrap();
        fs::write(scenes.join("notes.txt"), "").unwrap();

        let files = glob_files(tmp.path(), &["scenes/*.scene".to_string()]).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_path_size_file_and_dir() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("f.bin");
        fs::write(&file, [0u8; 10]).unwrap();
        assert_eq!(path_size(&file).unwrap(), 10);

        let bundle = tmp.path().join("game.app");
        fs::create_dir_all(bundle.join("Contents")).unwrap();
        fs::write(bundle.join("Contents/exe"), [0u8; 7]).unwrap();
        fs::write(bundle.join("info"), [0u8; 3]).unwrap();
        assert_eq!(path_size(&bundle).unwrap(), 10);
    }
}
