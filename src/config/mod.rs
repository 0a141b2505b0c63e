//! Declared state and reconcile policy.
//!
//! The link set, the shell patch block, and the artifact list are fixed at
//! compile time: changing what gets linked means changing this module, not a
//! runtime input. Everything here is assembled fresh at the start of a run
//! and handed to the task layer as one immutable [`Config`] value.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::resources::artifact::ArtifactSpec;
use crate::resources::patch::PatchBlock;

/// Site-specific environment file. Must be authored manually in the
/// repository root before the first run; it is deliberately never generated.
pub const SITE_FILE: &str = ".site.customrc";

/// Files symlinked from the repository root into the home directory.
///
/// Relative paths into both trees: destination is `$HOME/<path>`, source is
/// `<repo>/<path>`.
const DECLARED_LINKS: &[&str] = &[
    // Bash environment. The system-installed ~/.bashrc is never clobbered;
    // it gets a sourcing block appended instead (see shell_patch).
    ".bashrc.custom",
    SITE_FILE,
    // Git
    ".gitconfig",
    // Tmux
    ".tmux.conf",
    // Vim
    ".vim",
    ".vimrc",
    // Xterm, urxvt, etc.
    ".Xdefaults",
];

/// Shell startup file that receives the sourcing block.
const PROFILE_FILE: &str = ".bashrc";

/// Substring whose presence anywhere in the profile marks it as patched.
const PATCH_SENTINEL: &str = ".bashrc.custom";

/// Comment line written above the sourcing line.
const PATCH_COMMENT: &str = "Load the repository-managed bash environment";

/// The sourcing line itself.
const PATCH_PAYLOAD: &str = r#"[ -f "$HOME/.bashrc.custom" ] && . "$HOME/.bashrc.custom""#;

/// Where the vim plugin manager is cloned from.
const VUNDLE_URL: &str = "https://github.com/VundleVim/Vundle.vim.git";

/// One entry in the declared link set.
#[derive(Debug, Clone)]
pub struct LinkDeclaration {
    /// Path relative to both the repository root and the home directory.
    pub relative_path: String,
}

/// How the reconciler resolves destinations that diverge from the declared
/// state.
///
/// Both flags default to `false`: the safe behavior for conflicting state is
/// to fail loudly, never to overwrite user files silently.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReconcilePolicy {
    /// Replace symlinks that point somewhere other than the declared source.
    /// Never applies to regular files or directories.
    pub rebuild: bool,
    /// Leave occupied destinations in place with a warning instead of
    /// failing.
    pub allow_custom: bool,
}

/// All declared state for one reconciliation run.
#[derive(Debug)]
pub struct Config {
    /// Repository root holding the link sources and templates.
    pub root: PathBuf,
    /// The declared link set, in declaration order.
    pub links: Vec<LinkDeclaration>,
    /// Generated artifacts, with template/output paths relative to `root`.
    pub artifacts: Vec<ArtifactSpec>,
    /// Clone URL for the vim plugin manager.
    pub vundle_url: String,
    /// Conflict resolution policy.
    pub policy: ReconcilePolicy,
    /// Optional external libclang path forwarded to the completer build.
    pub libclang: Option<PathBuf>,
}

impl Config {
    /// Assemble the compiled-in declared state for a run.
    ///
    /// # Errors
    ///
    /// Returns an error if the declared link set contains a duplicate
    /// relative path (a broken declaration, caught before any task runs).
    pub fn assemble(
        root: PathBuf,
        policy: ReconcilePolicy,
        libclang: Option<PathBuf>,
    ) -> Result<Self> {
        let links = declared_links();

        let mut seen: HashSet<&str> = HashSet::new();
        for link in &links {
            if !seen.insert(link.relative_path.as_str()) {
                bail!("duplicate declared link: {}", link.relative_path);
            }
        }

        Ok(Self {
            root,
            links,
            artifacts: declared_artifacts(),
            vundle_url: VUNDLE_URL.to_string(),
            policy,
            libclang,
        })
    }

    /// The sourcing block appended to the user's shell startup file.
    #[must_use]
    pub fn shell_patch(&self, home: &Path) -> PatchBlock {
        PatchBlock {
            target: home.join(PROFILE_FILE),
            sentinel: PATCH_SENTINEL.to_string(),
            comment: PATCH_COMMENT.to_string(),
            payload: PATCH_PAYLOAD.to_string(),
        }
    }

    /// The manually-authored site file expected in the repository root.
    #[must_use]
    pub fn site_file(&self) -> PathBuf {
        self.root.join(SITE_FILE)
    }
}

/// The compiled-in link set, in declaration order.
#[must_use]
pub fn declared_links() -> Vec<LinkDeclaration> {
    DECLARED_LINKS
        .iter()
        .map(|path| LinkDeclaration {
            relative_path: (*path).to_string(),
        })
        .collect()
}

/// The compiled-in artifact list, paths relative to the repository root.
#[must_use]
pub fn declared_artifacts() -> Vec<ArtifactSpec> {
    vec![ArtifactSpec {
        template: PathBuf::from("templates/Xdefaults.m4"),
        output: PathBuf::from(".Xdefaults"),
        program: "m4".to_string(),
        args: vec!["-undef".to_string()],
        header: "! Generated file; edit templates/Xdefaults.m4 instead.\n".to_string(),
    }]
}

/// Resolve the repository root directory.
///
/// Precedence: explicit `--root` argument, then the `HOMESETUP_ROOT`
/// environment variable, then the current directory when it looks like the
/// repository.
///
/// # Errors
///
/// Returns an error when no candidate resolves to a repository.
pub fn resolve_root(explicit: Option<&Path>) -> Result<PathBuf> {
    if let Some(root) = explicit {
        return Ok(root.to_path_buf());
    }

    if let Ok(root) = std::env::var("HOMESETUP_ROOT") {
        return Ok(PathBuf::from(root));
    }

    let cwd = std::env::current_dir()?;
    if cwd.join(".bashrc.custom").exists() {
        return Ok(cwd);
    }

    bail!("cannot determine repository root. Use --root or set HOMESETUP_ROOT env var")
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn declared_links_are_unique() {
        let links = declared_links();
        let mut seen = HashSet::new();
        for link in &links {
            assert!(
                seen.insert(link.relative_path.clone()),
                "duplicate declared link: {}",
                link.relative_path
            );
        }
    }

    #[test]
    fn declared_links_include_shell_and_vim() {
        let paths: Vec<String> = declared_links()
            .into_iter()
            .map(|l| l.relative_path)
            .collect();
        assert!(paths.contains(&".bashrc.custom".to_string()));
        assert!(paths.contains(&".vimrc".to_string()));
        assert!(paths.contains(&".vim".to_string()));
        assert!(paths.contains(&SITE_FILE.to_string()));
    }

    #[test]
    fn assemble_builds_full_config() {
        let config = Config::assemble(
            PathBuf::from("/repo"),
            ReconcilePolicy::default(),
            None,
        )
        .unwrap();
        assert_eq!(config.root, PathBuf::from("/repo"));
        assert_eq!(config.links.len(), DECLARED_LINKS.len());
        assert_eq!(config.artifacts.len(), 1);
        assert!(!config.policy.rebuild);
        assert!(!config.policy.allow_custom);
    }

    #[test]
    fn policy_default_is_strict() {
        let policy = ReconcilePolicy::default();
        assert!(!policy.rebuild);
        assert!(!policy.allow_custom);
    }

    #[test]
    fn shell_patch_targets_bashrc_in_home() {
        let config = Config::assemble(
            PathBuf::from("/repo"),
            ReconcilePolicy::default(),
            None,
        )
        .unwrap();
        let patch = config.shell_patch(Path::new("/home/user"));
        assert_eq!(patch.target, PathBuf::from("/home/user/.bashrc"));
        assert!(patch.payload.contains(".bashrc.custom"));
    }

    #[test]
    fn shell_patch_payload_contains_sentinel() {
        // The sentinel scan can only be idempotent if applying the payload
        // plants the sentinel.
        let config = Config::assemble(
            PathBuf::from("/repo"),
            ReconcilePolicy::default(),
            None,
        )
        .unwrap();
        let patch = config.shell_patch(Path::new("/home/user"));
        assert!(
            patch.payload.contains(&patch.sentinel),
            "payload must contain the sentinel substring"
        );
    }

    #[test]
    fn site_file_is_under_root() {
        let config = Config::assemble(
            PathBuf::from("/repo"),
            ReconcilePolicy::default(),
            None,
        )
        .unwrap();
        assert_eq!(config.site_file(), PathBuf::from("/repo/.site.customrc"));
    }

    #[test]
    fn artifact_declaration_uses_preprocessor() {
        let artifacts = declared_artifacts();
        assert_eq!(artifacts[0].program, "m4");
        assert_eq!(artifacts[0].args, vec!["-undef".to_string()]);
        assert_eq!(artifacts[0].output, PathBuf::from(".Xdefaults"));
    }

    #[test]
    fn resolve_root_uses_explicit_path() {
        let root = resolve_root(Some(Path::new("/explicit/path"))).unwrap();
        assert_eq!(root, PathBuf::from("/explicit/path"));
    }
}
