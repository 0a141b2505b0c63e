//! Symlink classification and mutation.
//!
//! Classification is a pure function over the [`FileSystemOps`] abstraction,
//! so the reconciler's whole conflict matrix is testable without a real
//! filesystem. The mutation half (create/remove) is kept separate and is
//! only ever invoked by the task layer after the policy decision.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::operations::{FileKind, FileSystemOps};

/// Classification of a link destination at reconciliation time.
///
/// Computed fresh on every run, never cached or persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkState {
    /// Nothing exists at the destination.
    Absent,
    /// A symlink already resolving to the declared source, the terminal
    /// "already converged" case.
    CorrectLink,
    /// A symlink resolving somewhere else; carries the actual target.
    WrongLink(PathBuf),
    /// A regular file occupies the destination.
    RegularFile,
    /// A real directory occupies the destination.
    Directory,
}

/// Classify `dest` relative to the declared `source`.
///
/// Distinguishes a symlink from a regular file or directory even when the
/// symlink's own target is missing.
///
/// # Errors
///
/// Returns an error if the destination is a symlink whose target cannot be
/// read.
pub fn classify(fs: &dyn FileSystemOps, source: &Path, dest: &Path) -> Result<LinkState> {
    match fs.file_kind(dest) {
        FileKind::Absent => Ok(LinkState::Absent),
        FileKind::File => Ok(LinkState::RegularFile),
        FileKind::Directory => Ok(LinkState::Directory),
        FileKind::Symlink => {
            let existing = fs
                .read_link(dest)
                .with_context(|| format!("reading link target: {}", dest.display()))?;
            if paths_equal(&existing, source) {
                Ok(LinkState::CorrectLink)
            } else {
                Ok(LinkState::WrongLink(existing))
            }
        }
    }
}

/// Compare two paths for equality, normalising the `\\?\` prefix that
/// Windows `read_link` prepends to extended-length paths.
#[must_use]
pub fn paths_equal(a: &Path, b: &Path) -> bool {
    let normalize = |p: &Path| -> PathBuf {
        #[cfg(windows)]
        {
            let s = p.to_string_lossy();
            if let Some(stripped) = s.strip_prefix(r"\\?\") {
                return PathBuf::from(stripped);
            }
        }
        p.to_path_buf()
    };

    normalize(a) == normalize(b)
}

/// Create a symlink at `dest` pointing to `source` (platform-specific).
///
/// # Errors
///
/// Returns an error if the link cannot be created.
pub fn create_symlink(source: &Path, dest: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(source, dest).with_context(|| {
            format!("creating symlink {} -> {}", dest.display(), source.display())
        })?;
    }

    #[cfg(windows)]
    {
        let result = if source.is_dir() {
            std::os::windows::fs::symlink_dir(source, dest)
        } else {
            std::os::windows::fs::symlink_file(source, dest)
        };
        result.with_context(|| {
            format!(
                "creating symlink {} -> {} (requires Developer Mode or admin)",
                dest.display(),
                source.display()
            )
        })?;
    }

    Ok(())
}

/// Remove a symlink, handling platform differences.
///
/// On Windows, directory symlinks must be removed with `remove_dir` (not
/// `remove_file`); the raw `FILE_ATTRIBUTE_DIRECTORY` flag identifies them
/// because `symlink_metadata().is_dir()` returns `false` for symlinks.
///
/// # Errors
///
/// Returns an error if the path metadata cannot be read or removal fails.
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

/// Check if metadata represents a directory-like entry.
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
