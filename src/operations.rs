//! Filesystem query abstractions for dependency injection.
//!
//! Provides the [`FileSystemOps`] trait so that link classification and the
//! tasks built on it can be unit-tested without touching a real filesystem.
//! Production code uses [`SystemFileSystemOps`]; unit tests use the
//! mockall-generated `MockFileSystemOps`.
//!
//! Mutations (creating and removing links, appending to files) deliberately
//! live elsewhere: queries feed the pure classification step, while every
//! mutation is gated on the dry-run flag by the task layer.

use std::io;
use std::path::{Path, PathBuf};

use anyhow::Result;

/// What occupies a filesystem path, without following symlinks.
///
/// A symlink whose target is missing still classifies as [`FileKind::Symlink`];
/// the distinction between link and linked-to content is exactly what the
/// reconciler's conflict matrix depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// Nothing exists at the path.
    Absent,
    /// A symbolic link (regardless of whether its target exists).
    Symlink,
    /// A regular file.
    File,
    /// A real directory (not a directory symlink).
    Directory,
}

/// Abstraction over the filesystem queries used by the reconciler.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemOps: Send + Sync {
    /// Classify what occupies `path`, without following symlinks.
    fn file_kind(&self, path: &Path) -> FileKind;

    /// Read the target of the symbolic link at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not a symlink or cannot be read.
    fn read_link(&self, path: &Path) -> io::Result<PathBuf>;

    /// Returns `true` if `path` exists on the filesystem (following symlinks).
    fn exists(&self, path: &Path) -> bool;

    /// Returns the immediate child paths inside `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` cannot be opened or read as a directory.
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn file_kind(&self, path: &Path) -> FileKind {
        match std::fs::symlink_metadata(path) {
            Err(_) => FileKind::Absent,
            Ok(meta) if meta.file_type().is_symlink() => FileKind::Symlink,
            Ok(meta) if meta.is_dir() => FileKind::Directory,
            Ok(_) => FileKind::File,
        }
    }

    fn read_link(&self, path: &Path) -> io::Result<PathBuf> {
        std::fs::read_link(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        std::fs::read_dir(path)?
            .map(|e| e.map(|entry| entry.path()).map_err(Into::into))
            .collect()
    }
}
