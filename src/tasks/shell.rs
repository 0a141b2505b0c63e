//! Shell profile patching task.
use anyhow::Result;

use super::{Context, Task, TaskResult};

/// Append the environment-sourcing block to the user's shell startup file,
/// exactly once.
#[derive(Debug)]
pub struct PatchShellProfile;

impl Task for PatchShellProfile {
    fn name(&self) -> &str {
        "Patch shell profile"
    }

    fn should_run(&self, _ctx: &Context) -> bool {
        true
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        let patch = ctx.config.shell_patch(&ctx.home);

        if patch.is_applied()? {
            ctx.log.info(&format!(
                "{} already sources the custom environment",
                patch.target.display()
            ));
            return Ok(TaskResult::Ok);
        }

        let msg = patch.description();
        if ctx.dry_run {
            ctx.log.dry_run(&msg);
            return Ok(TaskResult::DryRun);
        }

        patch.apply()?;
        ctx.log.info(&format!("patched {}", patch.target.display()));
        Ok(TaskResult::Ok)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::super::test_helpers::{empty_config, make_context_with_log};
    use super::*;
    use crate::resources::test_helpers::MockExecutor;
    use std::sync::Arc;

    fn context(home: std::path::PathBuf, dry_run: bool) -> Context {
        let (mut ctx, _) = make_context_with_log(
            empty_config(std::path::PathBuf::from("/repo")),
            home,
            Arc::new(MockExecutor::with_responses(vec![])),
        );
        ctx.dry_run = dry_run;
        ctx
    }

    #[test]
    fn creates_missing_profile_via_append() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path().to_path_buf(), false);

        let result = PatchShellProfile.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::Ok);

        let bashrc = tmp.path().join(".bashrc");
        assert!(bashrc.exists(), "append-mode open must create the profile");
        let contents = std::fs::read_to_string(&bashrc).unwrap();
        assert!(contents.contains(".bashrc.custom"));
    }

    #[test]
    fn patch_applies_exactly_once() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path().to_path_buf(), false);
        let bashrc = tmp.path().join(".bashrc");
        std::fs::write(&bashrc, "export EDITOR=vim\n").unwrap();

        PatchShellProfile.run(&ctx).unwrap();
        let after_first = std::fs::read(&bashrc).unwrap();
        PatchShellProfile.run(&ctx).unwrap();
        let after_second = std::fs::read(&bashrc).unwrap();

        assert_eq!(after_first, after_second);
        let contents = String::from_utf8(after_second).unwrap();
        assert!(contents.starts_with("export EDITOR=vim\n"));
        assert_eq!(contents.matches(".bashrc.custom").count(), 1);
    }

    #[test]
    fn dry_run_leaves_profile_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let ctx = context(tmp.path().to_path_buf(), true);

        let result = PatchShellProfile.run(&ctx).unwrap();
        assert_eq!(result, TaskResult::DryRun);
        assert!(!tmp.path().join(".bashrc").exists());
    }

    #[test]
    fn dry_run_on_patched_profile_reports_converged() {
        let tmp = tempfile::tempdir().unwrap();
        let real = context(tmp.path().to_path_buf(), false);
        PatchShellProfile.run(&real).unwrap();
        let before = std::fs::read(tmp.path().join(".bashrc")).unwrap();

        let dry = context(tmp.path().to_path_buf(), true);
        let result = PatchShellProfile.run(&dry).unwrap();
        assert_eq!(result, TaskResult::Ok, "already converged, nothing to preview");
        assert_eq!(std::fs::read(tmp.path().join(".bashrc")).unwrap(), before);
    }
}
