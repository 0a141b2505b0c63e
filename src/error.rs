//! Domain-specific error types for the setup engine.
//!
//! Every fatal condition in the engine maps to one [`SetupError`] variant.
//! Internal modules return `SetupError` (wrapped in [`anyhow::Error`] via the
//! standard `?` operator at call sites that mix error sources); the command
//! layer converts any failure into a non-zero process exit.
//!
//! There are no retries anywhere: each variant is either a broken declaration
//! (`MissingSource`), a state conflict the policy forbids resolving
//! (`ConflictingLink` / `ConflictingFile`), a deterministic external tool
//! failure (`ExternalCommand`), or a manually-authored prerequisite that is
//! absent (`PreconditionMissing`).

use std::path::PathBuf;

use thiserror::Error;

/// Fatal conditions raised by the setup engine.
#[derive(Error, Debug)]
pub enum SetupError {
    /// A declared link's source asset does not exist in the repository.
    ///
    /// This means the declared set itself is invalid, not that the home
    /// directory diverged; it aborts the run even under dry-run.
    #[error("link source does not exist: {}", path.display())]
    MissingSource {
        /// Repository path that the declaration expects to exist.
        path: PathBuf,
    },

    /// Destination is a symlink pointing somewhere other than the declared
    /// source, and neither `--rebuild` nor `--allow-custom` was given.
    #[error("{}: link exists but points to {}, pass --rebuild to replace it", path.display(), target.display())]
    ConflictingLink {
        /// Destination path in the home directory.
        path: PathBuf,
        /// Where the existing symlink actually points.
        target: PathBuf,
    },

    /// Destination is occupied by a real file or directory.
    ///
    /// Never resolved automatically, not even under `--rebuild`, because
    /// deleting it would be irreversible data loss.
    #[error("{}: file already exists, move it aside or pass --allow-custom", path.display())]
    ConflictingFile {
        /// Destination path in the home directory.
        path: PathBuf,
    },

    /// An invoked external process exited non-zero.
    ///
    /// The captured error stream is passed through unmodified for operator
    /// diagnosis.
    #[error("{command} failed (exit {code}): {stderr}")]
    ExternalCommand {
        /// Human-readable label of the invoked command.
        command: String,
        /// Exit code, or `-1` when the process was killed by a signal.
        code: i32,
        /// Trimmed standard error output of the process.
        stderr: String,
    },

    /// A required pre-existing file or directory that the engine does not
    /// itself create is absent.
    #[error("required file missing: {} (create it manually)", path.display())]
    PreconditionMissing {
        /// Path that must exist before the run can proceed.
        path: PathBuf,
    },
}
