//! Library side of the `rain-eval` CLI.
//!
//! Every subcommand is a clap [`Parser`](clap::Parser) with a `run` method, so it can be driven
//! from tests without spawning a process.

mod cmd;
pub use cmd::*;

/// Shared argument groups, input loading and errors.
pub mod common;
/// The `disasm` subcommand.
pub mod disasm;
/// The `run` subcommand.
pub mod run;
