// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed repository + home pair and a fluent
// builder so each integration test can set up an isolated environment
// without repeating filesystem boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use homesetup_cli::config::{Config, LinkDeclaration, ReconcilePolicy};
use homesetup_cli::exec::SystemExecutor;
use homesetup_cli::logging::{Log, TaskStatus};
use homesetup_cli::operations::SystemFileSystemOps;
use homesetup_cli::platform::Platform;
use homesetup_cli::tasks::Context;

/// A [`Log`] implementation that records messages for assertions.
#[derive(Debug, Default)]
pub struct RecordingLog {
    lines: Mutex<Vec<(&'static str, String)>>,
}

impl RecordingLog {
    /// All captured messages for a given level tag.
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

impl Log for RecordingLog {
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

/// An isolated repository + home pair backed by a [`tempfile::TempDir`].
///
/// Both directories are deleted when the value is dropped.
pub struct TestEnv {
    tmp: tempfile::TempDir,
    /// Repository root (link sources, templates, site file).
    pub repo: PathBuf,
    /// Simulated user home directory.
    pub home: PathBuf,
}

impl TestEnv {
    /// Create a fresh environment with empty `repo/` and `home/` trees.
    pub fn new() -> Self {
        let tmp = tempfile::tempdir().expect("create temp dir");
        let repo = tmp.path().join("repo");
        let home = tmp.path().join("home");
        std::fs::create_dir_all(&repo).expect("create repo dir");
        std::fs::create_dir_all(&home).expect("create home dir");
        Self { tmp, repo, home }
    }

    /// Build a [`Config`] declaring the given relative link paths, rooted at
    /// this environment's repository.
    pub fn config_with_links(&self, links: &[&str], policy: ReconcilePolicy) -> Config {
        Config {
            root: self.repo.clone(),
            links: links
                .iter()
                .map(|p| LinkDeclaration {
                    relative_path: (*p).to_string(),
                })
                .collect(),
            artifacts: vec![],
            vundle_url: "https://example.invalid/vundle.git".to_string(),
            policy,
            libclang: None,
        }
    }

    /// Build a [`Context`] over this environment with the real executor and
    /// filesystem, returning the recording log alongside it.
    pub fn context(&self, config: Config, dry_run: bool) -> (Context, Arc<RecordingLog>) {
        let log = Arc::new(RecordingLog::default());
        let ctx = Context {
            config,
            platform: Platform::detect(),
            home: self.home.clone(),
            log: Arc::clone(&log) as Arc<dyn Log>,
            dry_run,
            executor: Arc::new(SystemExecutor),
            fs: Arc::new(SystemFileSystemOps),
        };
        (ctx, log)
    }

    /// Write `content` to `repo/<path>`, creating parent directories.
    pub fn seed_source(&self, path: &str, content: &str) -> &Self {
        let full = self.repo.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create source parent");
        }
        std::fs::write(&full, content).expect("write source file");
        self
    }

    /// Write `content` to `home/<path>`, creating parent directories.
    pub fn seed_home(&self, path: &str, content: &str) -> &Self {
        let full = self.home.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).expect("create home parent");
        }
        std::fs::write(&full, content).expect("write home file");
        self
    }

    /// Recursively snapshot `(relative path, kind, link target)` for every
    /// entry under `home/`, sorted. Used to prove dry-run purity.
    pub fn home_snapshot(&self) -> Vec<String> {
        let mut entries = Vec::new();
        snapshot_into(&self.home, &self.home, &mut entries);
        entries.sort();
        entries
    }
}

fn snapshot_into(root: &Path, dir: &Path, entries: &mut Vec<String>) {
    let Ok(read) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in read.flatten() {
        let path = entry.path();
        let rel = path
            .strip_prefix(root)
            .expect("entry under root")
            .display()
            .to_string();
        let meta = std::fs::symlink_metadata(&path).expect("symlink metadata");
        if meta.file_type().is_symlink() {
            let target = std::fs::read_link(&path).expect("read link");
            entries.push(format!("{rel} -> {}", target.display()));
        } else if meta.is_dir() {
            entries.push(format!("{rel}/"));
            snapshot_into(root, &path, entries);
        } else {
            let content = std::fs::read(&path).expect("read file");
            entries.push(format!("{rel} [{} bytes]", content.len()));
        }
    }
}
