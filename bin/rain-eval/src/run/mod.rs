//! Evaluates one entrypoint of an expression against JSON-supplied context, host and store.

mod cmd;

pub use cmd::*;
