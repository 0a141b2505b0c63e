//! Named units of work run in a fixed order with fail-fast semantics.
pub mod artifacts;
pub mod context;
pub mod shell;
pub mod symlinks;
pub mod vim;

pub use context::Context;

use anyhow::Result;

use crate::logging::TaskStatus;

/// Outcome of a successfully completed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskResult {
    /// Task ran and converged (or was already converged).
    Ok,
    /// Task decided not to act, with a reason worth surfacing.
    Skipped(String),
    /// Task ran in dry-run mode; mutations were logged, not applied.
    DryRun,
}

/// A named, executable task.
pub trait Task: Send + Sync {
    /// Human-readable task name.
    fn name(&self) -> &str;

    /// Whether this task applies to the current system and declared state.
    fn should_run(&self, ctx: &Context) -> bool;

    /// Execute the task.
    ///
    /// # Errors
    ///
    /// Returns an error on any fatal condition: a broken declaration, a
    /// conflict the policy forbids resolving, or an external command
    /// failure. Errors abort the whole run.
    fn run(&self, ctx: &Context) -> Result<TaskResult>;
}

/// The complete set of install tasks, in execution order:
/// generate artifacts → reconcile links → patch text → bootstrap tooling.
///
/// The order is load-bearing: artifacts are link sources, and the vim
/// bootstrap requires the links to `.vimrc` and `.vim` to be in place.
#[must_use]
pub fn all_install_tasks() -> Vec<Box<dyn Task>> {
    vec![
        Box::new(artifacts::GenerateArtifacts),
        Box::new(symlinks::InstallSymlinks),
        Box::new(shell::PatchShellProfile),
        Box::new(vim::BootstrapVim),
        Box::new(vim::BuildVimCompleter),
    ]
}

/// Execute a task, recording the result in the logger.
///
/// # Errors
///
/// Propagates the task's error after recording it: one task's failure aborts
/// the whole run. A half-applied environment is considered worse than an
/// unmodified one plus a clear error.
pub fn execute(task: &dyn Task, ctx: &Context) -> Result<()> {
    if !task.should_run(ctx) {
        ctx.log
            .debug(&format!("skipping task: {} (not applicable)", task.name()));
        ctx.log
            .record_task(task.name(), TaskStatus::NotApplicable, None);
        return Ok(());
    }

    ctx.log.stage(task.name());

    match task.run(ctx) {
        Ok(TaskResult::Ok) => {
            ctx.log.record_task(task.name(), TaskStatus::Ok, None);
            Ok(())
        }
        Ok(TaskResult::Skipped(reason)) => {
            ctx.log.info(&format!("skipped: {reason}"));
            ctx.log
                .record_task(task.name(), TaskStatus::Skipped, Some(&reason));
            Ok(())
        }
        Ok(TaskResult::DryRun) => {
            ctx.log.record_task(task.name(), TaskStatus::DryRun, None);
            Ok(())
        }
        Err(e) => {
            ctx.log.error(&format!("{}: {e:#}", task.name()));
            ctx.log
                .record_task(task.name(), TaskStatus::Failed, Some(&format!("{e:#}")));
            Err(e)
        }
    }
}

/// Shared helpers for task unit tests.
///
/// Provides common factory functions and a capturing logger so each task
/// test module does not have to duplicate boilerplate.
#[cfg(test)]
pub mod test_helpers {
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex};

    use crate::config::{Config, LinkDeclaration, ReconcilePolicy};
    use crate::exec::Executor;
    use crate::logging::{Log, TaskStatus};
    use crate::operations::SystemFileSystemOps;
    use crate::platform::{Os, Platform};
    use crate::resources::test_helpers::MockExecutor;

    use super::Context;

    /// A capturing [`Log`] implementation for asserting on emitted messages.
    #[derive(Debug, Default)]
    pub struct MemoryLog {
        /// Captured `(level, message)` pairs in emission order.
        pub lines: Mutex<Vec<(&'static str, String)>>,
    }

    impl MemoryLog {
        /// All captured messages for a given level.
        pub fn messages(&self, level: &str) -> Vec<String> {
            self.lines.lock().map_or_else(
                |_| vec![],
                |lines| {
                    lines
                        .iter()
                        .filter(|(l, _)| *l == level)
                        .map(|(_, m)| m.clone())
                        .collect()
                },
            )
        }

        fn push(&self, level: &'static str, msg: &str) {
            if let Ok(mut lines) = self.lines.lock() {
                lines.push((level, msg.to_string()));
            }
        }
    }

    impl Log for MemoryLog {
        fn stage(&self, msg: &str) {
            self.push("stage", msg);
        }
        fn info(&self, msg: &str) {
            self.push("info", msg);
        }
        fn debug(&self, msg: &str) {
            self.push("debug", msg);
        }
        fn warn(&self, msg: &str) {
            self.push("warn", msg);
        }
        fn error(&self, msg: &str) {
            self.push("error", msg);
        }
        fn dry_run(&self, msg: &str) {
            self.push("dry_run", msg);
        }
        fn record_task(&self, name: &str, status: TaskStatus, _message: Option<&str>) {
            self.push("task", &format!("{name}: {status:?}"));
        }
    }

    /// Build a [`Config`] with no links and no artifacts.
    #[must_use]
    pub fn empty_config(root: PathBuf) -> Config {
        Config {
            root,
            links: vec![],
            artifacts: vec![],
            vundle_url: "https://example.invalid/vundle.git".to_string(),
            policy: ReconcilePolicy::default(),
            libclang: None,
        }
    }

    /// Build a [`Config`] declaring the given relative link paths.
    #[must_use]
    pub fn config_with_links(root: PathBuf, links: &[&str]) -> Config {
        let mut config = empty_config(root);
        config.links = links
            .iter()
            .map(|p| LinkDeclaration {
                relative_path: (*p).to_string(),
            })
            .collect();
        config
    }

    /// Build a [`Context`] with a no-op executor and the real filesystem.
    #[must_use]
    pub fn make_context(config: Config, home: PathBuf) -> Context {
        make_context_with_log(config, home, Arc::new(MockExecutor::with_responses(vec![]))).0
    }

    /// Build a [`Context`] with the given executor, returning the capturing
    /// log alongside it.
    #[must_use]
    pub fn make_context_with_log(
        config: Config,
        home: PathBuf,
        executor: Arc<dyn Executor>,
    ) -> (Context, Arc<MemoryLog>) {
        let log = Arc::new(MemoryLog::default());
        let ctx = Context {
            config,
            platform: Platform::new(Os::Unix),
            home,
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run: false,
            executor,
            fs: Arc::new(SystemFileSystemOps),
        };
        (ctx, log)
    }

}
