//! Integration test suite for the workbench CLI.
//!
//! Each test drives the `cwb` binary against an isolated temp environment
//! (see `common::TestEnv`); nothing touches the real `~/.claude`.
//!
//! ```bash
//! cargo test --test integration
//! ```

#[path = "../common/mod.rs"]
mod common;

mod backup;
mod hooks;
mod mcp;
mod perm;
mod prompt;
mod settings;
mod template;
