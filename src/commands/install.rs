//! The `install` command: reconcile the home directory against the declared
//! state, in a fixed order, aborting on the first failure.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, InstallOpts};
use crate::config::{self, Config, ReconcilePolicy};
use crate::error::SetupError;
use crate::exec::SystemExecutor;
use crate::logging::{Log, Logger};
use crate::operations::SystemFileSystemOps;
use crate::platform::Platform;
use crate::tasks::{self, Context, Task};

/// Run the install command.
///
/// # Errors
///
/// Returns an error if the repository root cannot be resolved, the site file
/// is missing, or any task fails; the first failing task aborts the run and
/// maps to a non-zero process exit.
pub fn run(global: &GlobalOpts, opts: &InstallOpts, log: &Arc<Logger>) -> Result<()> {
    let version = option_env!("HOMESETUP_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
    log.info(&format!("homesetup {version}"));

    let root = config::resolve_root(global.root.as_deref())?;
    log.debug(&format!("repository root: {}", root.display()));

    // The site file is authored by hand on each machine; its absence means
    // this checkout was never prepared for use.
    let site = root.join(config::SITE_FILE);
    if !site.exists() {
        return Err(SetupError::PreconditionMissing { path: site }.into());
    }

    let policy = ReconcilePolicy {
        rebuild: opts.rebuild,
        allow_custom: opts.allow_custom,
    };
    let config = Config::assemble(root, policy, opts.libclang.clone())?;
    log.debug(&format!(
        "declared {} links, {} artifacts",
        config.links.len(),
        config.artifacts.len()
    ));

    let ctx = Context::new(
        config,
        Platform::detect(),
        Arc::clone(log) as Arc<dyn Log>,
        global.dry_run,
        Arc::new(SystemExecutor),
        Arc::new(SystemFileSystemOps),
    )?;

    let all_tasks = tasks::all_install_tasks();
    let selected = filter_tasks(&all_tasks, &opts.skip, &opts.only);

    let result = selected
        .iter()
        .try_for_each(|task| tasks::execute(*task, &ctx));
    log.print_summary();
    result
}

/// Apply the `--skip` / `--only` task-name filters.
///
/// `--only` wins when both are given; matching is a case-insensitive
/// substring test against the task name, so `--skip vim` drops every
/// vim-related task.
#[must_use]
pub fn filter_tasks<'a>(
    all_tasks: &'a [Box<dyn Task>],
    skip: &[String],
    only: &[String],
) -> Vec<&'a dyn Task> {
    all_tasks
        .iter()
        .filter(|t| {
            let name = t.name().to_lowercase();
            if !only.is_empty() {
                return only.iter().any(|o| name.contains(&o.to_lowercase()));
            }
            if !skip.is_empty() {
                return !skip.iter().any(|s| name.contains(&s.to_lowercase()));
            }
            true
        })
        .map(AsRef::as_ref)
        .collect()
}
