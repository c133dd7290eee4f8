//! Assembly of the read-only evaluation context.
//!
//! The context is a matrix of words rebuilt for every evaluation:
//! - row 0: base fields, the caller and the calling contract;
//! - row 1: arguments supplied by the caller;
//! - rows 2..: one row per signed context, in input order.

mod signed;
pub use signed::*;

use alloy_primitives::{Address, U256};
use tracing::debug;

use crate::{ContextError, EvalError};

/// Row holding the base fields.
pub const BASE_ROW: usize = 0;
/// Column of the caller in [`BASE_ROW`].
pub const CALLER_COLUMN: usize = 0;
/// Column of the calling contract in [`BASE_ROW`].
pub const THIS_ADDRESS_COLUMN: usize = 1;
/// Row holding caller-supplied arguments.
pub const ARGUMENTS_ROW: usize = 1;
/// First row holding signed context.
pub const SIGNED_CONTEXT_START_ROW: usize = 2;

/// Converts an address to a word, left-padded with zeros.
pub fn address_to_word(address: Address) -> U256 {
    U256::from_be_bytes(address.into_word().0)
}

/// Converts a word to an address, keeping its low 20 bytes.
pub fn word_to_address(word: U256) -> Address {
    Address::from_slice(&word.to_be_bytes::<32>()[12..])
}

/// The evaluation context.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::Deref)]
pub struct Context {
    #[deref]
    rows: Vec<Vec<U256>>,
    signers: Vec<Address>,
}

impl Context {
    /// Builds a context without signed rows.
    pub fn new(caller: Address, this_address: Address, arguments: Vec<U256>) -> Self {
        Self {
            rows: vec![vec![address_to_word(caller), address_to_word(this_address)], arguments],
            signers: Vec::new(),
        }
    }

    /// Reads a cell.
    pub fn get(&self, row: usize, column: usize) -> Result<U256, EvalError> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .ok_or(EvalError::ContextOutOfBounds { row, column })
    }

    /// The number of columns of a row.
    pub fn row_len(&self, row: usize) -> Result<usize, EvalError> {
        self.rows
            .get(row)
            .map(Vec::len)
            .ok_or(EvalError::ContextRowOutOfBounds { row, rows: self.rows.len() })
    }

    /// The caller.
    pub fn caller(&self) -> Address {
        self.get(BASE_ROW, CALLER_COLUMN).map(word_to_address).unwrap_or_default()
    }

    /// The calling contract.
    pub fn this_address(&self) -> Address {
        self.get(BASE_ROW, THIS_ADDRESS_COLUMN).map(word_to_address).unwrap_or_default()
    }

    /// The caller-supplied arguments.
    pub fn arguments(&self) -> &[U256] {
        self.rows.get(ARGUMENTS_ROW).map(Vec::as_slice).unwrap_or_default()
    }

    /// The verified signer of the signed context at `index`.
    pub fn signer(&self, index: usize) -> Result<Address, EvalError> {
        self.signers
            .get(index)
            .copied()
            .ok_or(EvalError::SignerOutOfBounds { index, signers: self.signers.len() })
    }

    /// The verified signers, in input order.
    pub fn signers(&self) -> &[Address] {
        &self.signers
    }

    /// Consumes the context, returning its rows.
    pub fn into_rows(self) -> Vec<Vec<U256>> {
        self.rows
    }
}

/// Builds the context of one evaluation, verifying every signed context.
///
/// Signed contexts are checked in order and the first failure is returned with its index.
pub fn build_context(
    caller: Address,
    this_address: Address,
    arguments: Vec<U256>,
    signed_contexts: &[SignedContextV1],
) -> Result<Context, ContextError> {
    let mut context = Context::new(caller, this_address, arguments);
    for (index, signed) in signed_contexts.iter().enumerate() {
        signed.verify(index)?;
        context.rows.push(signed.context.clone());
        context.signers.push(signed.signer);
    }
    debug!(
        target: "rain::context",
        %caller,
        %this_address,
        rows = context.rows.len(),
        signed = signed_contexts.len(),
        "Assembled context"
    );
    Ok(context)
}
