//! Vim toolchain bootstrap tasks.
//!
//! Two sequencing tasks around external collaborators: the editor (plugin
//! install) and the build system (native completer). Detection of "already
//! bootstrapped" is existence-based (a marker directory for the plugin
//! manager, a glob match on the build product for the completer), never
//! content-based. All collaborator failures propagate as fatal; these tasks
//! perform no recovery.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};

use super::{Context, Task, TaskResult};
use crate::error::SetupError;

/// Clone the plugin manager if its marker directory is absent, then run the
/// editor non-interactively to install the declared plugins.
#[derive(Debug)]
pub struct BootstrapVim;

impl Task for BootstrapVim {
    fn name(&self) -> &str {
        "Bootstrap vim plugins"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.executor.which("vim")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        // Both are produced by link reconciliation, but checked rather than
        // assumed: this task can be run on its own via --only.
        let vimrc = ctx.home.join(".vimrc");
        if !ctx.fs.exists(&vimrc) {
            return Err(SetupError::PreconditionMissing { path: vimrc }.into());
        }
        let bundle = ctx.home.join(".vim").join("bundle");
        if !ctx.fs.exists(&bundle) {
            return Err(SetupError::PreconditionMissing { path: bundle }.into());
        }

        let vundle = bundle.join("Vundle.vim");
        let bootstrapped = ctx
            .fs
            .read_dir(&vundle)
            .is_ok_and(|entries| !entries.is_empty());

        if bootstrapped && !ctx.config.policy.rebuild {
            ctx.log
                .debug(&format!("plugin manager present: {}", vundle.display()));
        } else {
            if bootstrapped {
                // Only the directory this task itself cloned is ever removed.
                let msg = format!("remove {}", vundle.display());
                if ctx.dry_run {
                    ctx.log.dry_run(&msg);
                } else {
                    std::fs::remove_dir_all(&vundle)
                        .with_context(|| format!("removing {}", vundle.display()))?;
                    ctx.log.debug(&msg);
                }
            }
            let msg = format!("git clone {} {}", ctx.config.vundle_url, vundle.display());
            if ctx.dry_run {
                ctx.log.dry_run(&msg);
            } else {
                let vundle_path = vundle.display().to_string();
                ctx.executor.run(
                    "git",
                    &["clone", ctx.config.vundle_url.as_str(), vundle_path.as_str()],
                )?;
                ctx.log.debug(&msg);
            }
        }

        let msg = "vim +PluginInstall +qall";
        if ctx.dry_run {
            ctx.log.dry_run(msg);
            return Ok(TaskResult::DryRun);
        }
        ctx.log.debug(msg);
        ctx.executor.run("vim", &["+PluginInstall", "+qall"])?;
        ctx.log.info("plugins installed");
        Ok(TaskResult::Ok)
    }
}

/// Configure and build the completion plugin's native component, if the
/// plugin is installed.
#[derive(Debug)]
pub struct BuildVimCompleter;

/// Where the completion plugin lands after the editor's plugin install.
fn completer_dir(ctx: &Context) -> PathBuf {
    ctx.home
        .join(".vim")
        .join("bundle")
        .join("YouCompleteMe")
}

/// First glob match for `pattern`, ignoring unreadable entries.
fn glob_first(pattern: &str) -> Option<PathBuf> {
    glob::glob(pattern).ok()?.filter_map(Result::ok).next()
}

impl Task for BuildVimCompleter {
    fn name(&self) -> &str {
        "Build vim completer"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        ctx.fs.exists(&completer_dir(ctx)) && ctx.executor.which("cmake")
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let plugin = completer_dir(ctx);

        let built_pattern = format!("{}/**/ycm_core*", plugin.display());
        if !ctx.config.policy.rebuild && glob_first(&built_pattern).is_some() {
            ctx.log.info("completer already built");
            return Ok(TaskResult::Ok);
        }

        let cpp_pattern = format!("{}/**/cpp/CMakeLists.txt", plugin.display());
        let Some(cmakelists) = glob_first(&cpp_pattern) else {
            return Ok(TaskResult::Skipped(
                "no native component to build".to_string(),
            ));
        };
        let cpp = cmakelists
            .parent()
            .map_or_else(|| plugin.clone(), Path::to_path_buf);
        let build_dir = plugin.join("build");

        let mut configure = vec![
            "-S".to_string(),
            cpp.display().to_string(),
            "-B".to_string(),
            build_dir.display().to_string(),
        ];
        if let Some(libclang) = &ctx.config.libclang {
            configure.push(format!("-DEXTERNAL_LIBCLANG_PATH={}", libclang.display()));
        }
        let build_args = vec!["--build".to_string(), build_dir.display().to_string()];

        let configure_msg = format!("cmake {}", configure.join(" "));
        let build_msg = format!("cmake {}", build_args.join(" "));

        if ctx.dry_run {
            ctx.log.dry_run(&configure_msg);
            ctx.log.dry_run(&build_msg);
            return Ok(TaskResult::DryRun);
        }

        ctx.log.debug(&configure_msg);
        let argv: Vec<&str> = configure.iter().map(String::as_str).collect();
        ctx.executor.run("cmake", &argv)?;

        ctx.log.debug(&build_msg);
        let argv: Vec<&str> = build_args.iter().map(String::as_str).collect();
        ctx.executor.run("cmake", &argv)?;

        ctx.log.info("completer built");
        Ok(TaskResult::Ok)
    }
}
