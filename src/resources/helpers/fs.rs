//! File-system resource helpers.
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

/// Ensure the parent directory of `path` exists, creating it (and any
/// ancestors) if necessary.
///
/// # Errors
///
/// Returns an error if the directory cannot be created.
pub fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create parent: {}", parent.display()))?;
    }
    Ok(())
}

/// Resolve every symlink in `path` and return the absolute real path.
///
/// Uses [`dunce`] so Windows results carry no `\\?\` prefix and compare equal
/// to paths built from user input.
///
/// # Errors
///
/// Returns the underlying I/O error when any component does not exist.
pub fn real_path(path: &Path) -> std::io::Result<PathBuf> {
    dunce::canonicalize(path)
}

/// Create a symlink at `link` pointing to `dest`.
///
/// # Errors
///
/// Returns an error if the link cannot be created (e.g. `link` is occupied).
pub fn create_symlink(dest: &Path, link: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(dest, link).with_context(|| {
            format!("creating symlink {} -> {}", link.display(), dest.display())
        })?;
    }

    #[cfg(windows)]
    {
        let result = if dest.is_dir() {
            std::os::windows::fs::symlink_dir(dest, link)
        } else {
            std::os::windows::fs::symlink_file(dest, link)
        };
        result.with_context(|| {
            format!("creating symlink {} -> {}", link.display(), dest.display())
        })?;
    }

    Ok(())
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`), and `symlink_metadata().is_dir()` is `false` for them, so
/// the raw `FILE_ATTRIBUTE_DIRECTORY` flag is checked instead.
///
/// # Errors
///
/// Returns an error if `path` cannot be inspected or removed.
pub fn remove_symlink(path: &Path) -> Result<()> {
    let meta = std::fs::symlink_metadata(path)
        .with_context(|| format!("reading metadata: {}", path.display()))?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
            .with_context(|| format!("removing directory link: {}", path.display()))?;
    } else {
        std::fs::remove_file(path).with_context(|| format!("removing link: {}", path.display()))?;
    }
    Ok(())
}

/// Check if metadata represents a directory-like entry that must be removed
/// with `remove_dir`.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    // -----------------------------------------------------------------------
    // ensure_parent_dir
    // -----------------------------------------------------------------------

    #[test]
    fn ensure_parent_dir_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b").join("file.txt");
        ensure_parent_dir(&nested).unwrap();
        assert!(dir.path().join("a").join("b").is_dir());
    }

    #[test]
    fn ensure_parent_dir_noop_when_parent_exists() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        ensure_parent_dir(&file).unwrap();
        assert!(dir.path().exists());
    }

    // -----------------------------------------------------------------------
    // real_path
    // -----------------------------------------------------------------------

    #[cfg(unix)]
    #[test]
    fn real_path_follows_links() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file");
        let link = dir.path().join("link");
        std::fs::write(&file, "x").unwrap();
        std::os::unix::fs::symlink(&file, &link).unwrap();
        assert_eq!(real_path(&link).unwrap(), real_path(&file).unwrap());
    }

    #[test]
    fn real_path_fails_for_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(real_path(&dir.path().join("absent")).is_err());
    }

    // -----------------------------------------------------------------------
    // create_symlink / remove_symlink
    // -----------------------------------------------------------------------

    #[cfg(unix)]
    #[test]
    fn create_then_remove_file_link() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("dest");
        let link = dir.path().join("link");
        std::fs::write(&dest, "x").unwrap();

        create_symlink(&dest, &link).unwrap();
        assert_eq!(std::fs::read_link(&link).unwrap(), dest);

        remove_symlink(&link).unwrap();
        assert!(link.symlink_metadata().is_err());
        assert!(dest.exists(), "removing the link must keep its destination");
    }

    #[cfg(unix)]
    #[test]
    fn remove_directory_link_keeps_directory_contents() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("dest");
        let link = dir.path().join("link");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("inner"), "x").unwrap();

        create_symlink(&dest, &link).unwrap();
        remove_symlink(&link).unwrap();

        assert!(link.symlink_metadata().is_err());
        assert!(dest.join("inner").exists());
    }

    #[cfg(unix)]
    #[test]
    fn create_symlink_fails_when_occupied() {
        let dir = tempfile::tempdir().unwrap();
        let dest = dir.path().join("dest");
        let link = dir.path().join("link");
        std::fs::write(&dest, "x").unwrap();
        std::fs::write(&link, "occupied").unwrap();
        assert!(create_symlink(&dest, &link).is_err());
    }
}
