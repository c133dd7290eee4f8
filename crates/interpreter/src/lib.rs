//! A deterministic stack machine that evaluates compiled expressions on behalf of calling
//! contracts.
//!
//! Calling contracts deploy an [`Expression`] once (sources plus constants), then evaluate one of
//! its entrypoints per call against a freshly assembled [`Context`] and a namespaced [`Store`].
//! The final stack is read back under the caller's own convention, see [`convention`].
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod bytecode;
pub use bytecode::*;

mod commitment;
pub use commitment::*;

mod context;
pub use context::*;

pub mod convention;

mod error;
pub use error::*;

mod eval;
pub use eval::*;

mod expression;
pub use expression::*;

mod host;
pub use host::*;

pub mod math;

mod memory;
pub use memory::*;

mod sentinel;
pub use sentinel::*;

mod spec;
pub use spec::*;

mod stack;
pub use stack::*;

mod store;
pub use store::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
