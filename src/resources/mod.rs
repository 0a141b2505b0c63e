//! Reconciliation primitives: classification and mutation, kept separate.
//!
//! Each submodule owns one primitive: [`link`] classifies and realizes
//! symlinks, [`patch`] appends a block to a text file exactly once, and
//! [`artifact`] regenerates a derived file from a preprocessed template.
//! None of them knows about policy or dry-run; that belongs to the task
//! layer, which decides *whether* to call the mutation half.
pub mod artifact;
pub mod link;
pub mod patch;
