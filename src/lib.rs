//! Home directory setup engine.
//!
//! Reconciles a declared set of dotfile symlinks into `$HOME`, idempotently
//! patches the shell startup file, regenerates preprocessed configuration
//! artifacts, and bootstraps the vim plugin toolchain, all against whatever
//! state the home directory is already in, never destroying user data.
//!
//! The public API is organised into layers:
//!
//! - **[`config`]** — the compiled-in declared state and reconcile policy
//! - **[`resources`]** — classification + mutation primitives (links, patches, artifacts)
//! - **[`tasks`]** — named units of work run in a fixed order with fail-fast semantics
//! - **[`commands`]** — top-level subcommand orchestration (`install`)
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod logging;
pub mod operations;
pub mod platform;
pub mod resources;
pub mod tasks;
