//! Generated-artifact regeneration.
//!
//! The artifact builder is intentionally not idempotence-checked: the output
//! is fully derived from its template and never hand-edited, so the invariant
//! is "output = header + preprocess(template)" unconditionally, never
//! "output unless already correct".
use std::io::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use crate::error::SetupError;
use crate::exec::Executor;

/// A derived configuration file regenerated from a preprocessed template.
#[derive(Debug, Clone)]
pub struct ArtifactSpec {
    /// Template read by the preprocessor.
    pub template: PathBuf,
    /// Output file, truncated and rewritten on every run.
    pub output: PathBuf,
    /// Preprocessor program name.
    pub program: String,
    /// Arguments passed before the template path.
    pub args: Vec<String>,
    /// Header comment written at the top of the output, warning that the
    /// file is generated.
    pub header: String,
}

impl ArtifactSpec {
    /// Human-readable description of this artifact.
    #[must_use]
    pub fn description(&self) -> String {
        format!(
            "{} from {}",
            self.output.display(),
            self.template.display()
        )
    }

    /// Return a copy with template and output paths resolved against `root`.
    #[must_use]
    pub fn resolved(&self, root: &Path) -> Self {
        Self {
            template: root.join(&self.template),
            output: root.join(&self.output),
            program: self.program.clone(),
            args: self.args.clone(),
            header: self.header.clone(),
        }
    }

    /// Regenerate the output: truncate it to the header, run the
    /// preprocessor over the template, and append the captured stdout.
    ///
    /// Deliberately not atomic: an interruption between the truncate and
    /// the append can leave only the header behind, which the next run
    /// repairs by regenerating from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::PreconditionMissing`] if the template is
    /// absent, [`SetupError::ExternalCommand`] (with exit code and stderr
    /// passed through) if the preprocessor fails, or an I/O error if the
    /// output cannot be written.
    pub fn generate(&self, executor: &dyn Executor) -> Result<()> {
        if !self.template.exists() {
            return Err(SetupError::PreconditionMissing {
                path: self.template.clone(),
            }
            .into());
        }

        std::fs::write(&self.output, &self.header)
            .with_context(|| format!("writing {}", self.output.display()))?;

        let template = self.template.to_string_lossy();
        let mut argv: Vec<&str> = self.args.iter().map(String::as_str).collect();
        argv.push(template.as_ref());
        let result = executor.run(&self.program, &argv)?;

        let mut file = std::fs::OpenOptions::new()
            .append(true)
            .open(&self.output)
            .with_context(|| format!("opening {} for append", self.output.display()))?;
        file.write_all(result.stdout.as_bytes())
            .with_context(|| format!("appending to {}", self.output.display()))
    }
}
