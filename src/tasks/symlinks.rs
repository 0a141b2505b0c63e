//! Link reconciliation task.
use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::error::SetupError;
use crate::resources::link::{self, LinkState};

/// Reconcile the declared link set into the home directory.
///
/// Entries are processed in declaration order; each entry is independent, so
/// order only affects the log trace. The first conflicting entry aborts the
/// whole run unless the policy demotes it to a warning.
#[derive(Debug)]
pub struct InstallSymlinks;

impl Task for InstallSymlinks {
    fn name(&self) -> &str {
        "Install symlinks"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        !ctx.config.links.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let policy = ctx.config.policy;
        let mut created = 0u32;
        let mut replaced = 0u32;
        let mut already_ok = 0u32;
        let mut skipped = 0u32;

        for decl in &ctx.config.links {
            let source = ctx.config.root.join(&decl.relative_path);
            let dest = ctx.home.join(&decl.relative_path);

            // The declared set itself is invalid, not a runtime state
            // mismatch; fatal even under dry-run.
            if !ctx.fs.exists(&source) {
                return Err(SetupError::MissingSource { path: source }.into());
            }

            match link::classify(ctx.fs.as_ref(), &source, &dest)? {
                LinkState::Absent => {
                    let msg = format!("link {} -> {}", dest.display(), source.display());
                    if ctx.dry_run {
                        ctx.log.dry_run(&msg);
                    } else {
                        if let Some(parent) = dest.parent() {
                            std::fs::create_dir_all(parent)
                                .with_context(|| format!("create parent: {}", parent.display()))?;
                        }
                        link::create_symlink(&source, &dest)?;
                        ctx.log.debug(&msg);
                    }
                    created += 1;
                }
                LinkState::CorrectLink => {
                    ctx.log.debug(&format!("already linked: {}", dest.display()));
                    already_ok += 1;
                }
                LinkState::WrongLink(actual) => {
                    if policy.rebuild {
                        let msg = format!(
                            "relink {} -> {} (was {})",
                            dest.display(),
                            source.display(),
                            actual.display()
                        );
                        if ctx.dry_run {
                            ctx.log.dry_run(&msg);
                        } else {
                            link::remove_symlink(&dest)?;
                            link::create_symlink(&source, &dest)?;
                            ctx.log.debug(&msg);
                        }
                        replaced += 1;
                    } else if policy.allow_custom {
                        ctx.log.warn(&format!(
                            "{}: points to {}, leaving in place",
                            dest.display(),
                            actual.display()
                        ));
                        skipped += 1;
                    } else {
                        return Err(SetupError::ConflictingLink {
                            path: dest,
                            target: actual,
                        }
                        .into());
                    }
                }
                // rebuild never applies here: the engine refuses to delete a
                // real file or directory, whatever the flags say.
                LinkState::RegularFile | LinkState::Directory => {
                    if policy.allow_custom {
                        ctx.log.warn(&format!(
                            "{}: exists and is not a managed link, leaving in place",
                            dest.display()
                        ));
                        skipped += 1;
                    } else {
                        return Err(SetupError::ConflictingFile { path: dest }.into());
                    }
                }
            }
        }

        let summary =
            format!("{created} created, {replaced} replaced, {already_ok} already ok, {skipped} skipped");
        if ctx.dry_run {
            ctx.log.info(&summary);
            return Ok(TaskResult::DryRun);
        }
        ctx.log.info(&summary);
        Ok(TaskResult::Ok)
    }
}
