//! Prints the decoded instructions of an expression.

mod cmd;

pub use cmd::*;
