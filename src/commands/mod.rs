//! Top-level commands run by the binary.
pub mod rebase;
