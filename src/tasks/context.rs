//! Shared context for task execution.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::config::Config;
use crate::exec::Executor;
use crate::logging::Log;
use crate::operations::FileSystemOps;
use crate::platform::Platform;

/// Shared context for task execution.
///
/// One `Context` is built at the start of a run and handed to every task.
/// All collaborators are explicit fields rather than ambient state so each
/// task can be exercised in isolation with injected fakes.
pub struct Context {
    /// Declared state and policy for this run.
    pub config: Config,
    /// Detected platform information.
    pub platform: Platform,
    /// User's home directory path, resolved once at startup.
    pub home: PathBuf,
    /// Logger for output and task recording.
    pub log: Arc<dyn Log>,
    /// Whether to perform a dry run (preview changes without applying).
    pub dry_run: bool,
    /// Command executor (for testing or real system calls).
    pub executor: Arc<dyn Executor>,
    /// Filesystem query abstraction (injectable for testing).
    pub fs: Arc<dyn FileSystemOps>,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .field("platform", &self.platform)
            .field("home", &self.home)
            .field("log", &"<dyn Log>")
            .field("dry_run", &self.dry_run)
            .field("executor", &"<dyn Executor>")
            .field("fs", &"<dyn FileSystemOps>")
            .finish()
    }
}

impl Context {
    /// Creates a new context for task execution, resolving the home
    /// directory from the platform's standard user-home mechanism.
    ///
    /// # Errors
    ///
    /// Returns an error if the HOME (or USERPROFILE on Windows) environment
    /// variable is not set.
    pub fn new(
        config: Config,
        platform: Platform,
        log: Arc<dyn Log>,
        dry_run: bool,
        executor: Arc<dyn Executor>,
        fs: Arc<dyn FileSystemOps>,
    ) -> Result<Self> {
        let home = if cfg!(target_os = "windows") {
            std::env::var("USERPROFILE")
                .or_else(|_| std::env::var("HOME"))
                .map_err(|_| {
                    anyhow::anyhow!("neither USERPROFILE nor HOME environment variable is set")
                })?
        } else {
            std::env::var("HOME")
                .map_err(|_| anyhow::anyhow!("HOME environment variable is not set"))?
        };

        Ok(Self {
            config,
            platform,
            home: PathBuf::from(home),
            log,
            dry_run,
            executor,
            fs,
        })
    }
}
