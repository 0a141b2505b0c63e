//! Artifact regeneration task.
use anyhow::Result;

use super::{Context, Task, TaskResult};
use crate::error::SetupError;

/// Regenerate every declared artifact from its template.
///
/// Runs first: generated outputs are link sources, so they must be fresh
/// before the reconciler checks them.
#[derive(Debug)]
pub struct GenerateArtifacts;

impl Task for GenerateArtifacts {
    fn name(&self) -> &str {
        "Generate artifacts"
    }

    fn should_run(&self, ctx: &Context) -> bool {
        // The macro preprocessor is a unix tool.
        ctx.platform.is_unix() && !ctx.config.artifacts.is_empty()
    }

    fn run(&self, ctx: &Context) -> Result<TaskResult> {
        for declared in &ctx.config.artifacts {
            let spec = declared.resolved(&ctx.config.root);
            let msg = format!("generate {}", spec.description());

            if ctx.dry_run {
                // Template authoring errors surface in dry runs too; only
                // the preprocessor spawn and the overwrite are suppressed.
                if !spec.template.exists() {
                    return Err(SetupError::PreconditionMissing {
                        path: spec.template,
                    }
                    .into());
                }
                ctx.log.dry_run(&msg);
                continue;
            }

            ctx.log.debug(&msg);
            spec.generate(ctx.executor.as_ref())?;
        }

        if ctx.dry_run {
            return Ok(TaskResult::DryRun);
        }
        ctx.log
            .info(&format!("{} artifact(s) regenerated", ctx.config.artifacts.len()));
        Ok(TaskResult::Ok)
    }
}
