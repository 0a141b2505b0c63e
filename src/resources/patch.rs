//! Idempotent text patching.
//!
//! Appends a fixed block to a text file exactly once. "Already applied" is
//! detected by scanning the file content for a sentinel substring rather
//! than a marker file, which keeps the operation idempotent across re-runs,
//! file recreation, and manual edits, at the cost of being fooled by a
//! manual edit that happens to contain the sentinel elsewhere.
use std::io::Write as _;
use std::path::PathBuf;

use anyhow::{Context as _, Result};

/// A block to append to a text file at most once.
#[derive(Debug, Clone)]
pub struct PatchBlock {
    /// The file to patch. Allowed to not exist: the append creates it.
    pub target: PathBuf,
    /// Substring whose presence anywhere in the target marks it as patched.
    pub sentinel: String,
    /// Comment line written above the payload.
    pub comment: String,
    /// The payload line itself. Must contain the sentinel, or the patch
    /// would re-apply on every run.
    pub payload: String,
}

impl PatchBlock {
    /// Human-readable description of this patch.
    #[must_use]
    pub fn description(&self) -> String {
        format!("append sourcing block to {}", self.target.display())
    }

    /// Scan the target for the sentinel substring.
    ///
    /// A missing target means "nothing to patch against" and reports
    /// unapplied rather than failing: the target is the user's own profile
    /// file, not a declared repository asset.
    ///
    /// # Errors
    ///
    /// Returns an error if the target exists but cannot be read.
    pub fn is_applied(&self) -> Result<bool> {
        match std::fs::read_to_string(&self.target) {
            Ok(contents) => Ok(contents.lines().any(|line| line.contains(&self.sentinel))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => {
                Err(e).with_context(|| format!("reading {}", self.target.display()))
            }
        }
    }

    /// The rendered block: a blank separator line, the comment, the payload.
    #[must_use]
    pub fn render(&self) -> String {
        format!("\n# {}\n{}\n", self.comment, self.payload)
    }

    /// Append the rendered block to the target in a single write, creating
    /// the target if it does not exist.
    ///
    /// Callers check [`is_applied`](Self::is_applied) first; `apply` itself
    /// is unconditional.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be opened or written.
    pub fn apply(&self) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.target)
            .with_context(|| format!("opening {} for append", self.target.display()))?;
        file.write_all(self.render().as_bytes())
            .with_context(|| format!("appending to {}", self.target.display()))
    }
}
