//! Test utilities for the interpreter.

mod builder;
mod host;
mod signer;

pub use builder::*;
pub use host::*;
pub use signer::*;
