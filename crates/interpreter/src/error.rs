//! Error types of the interpreter.
//!
//! Every failure aborts the whole evaluation. Errors are grouped by the stage that raises them:
//! [`IntegrityError`] at deployment, [`ContextError`] during context assembly and [`EvalError`]
//! while executing. [`InterpreterError`] wraps all of them, and [`encode_revert`] turns one into
//! Solidity revert data.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolError;

use crate::{InterpreterSpecId, Opcode, Operand};

/// The class of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed bytecode or operands, rejected before any evaluation.
    Encoding,
    /// An index or height out of range: stack, constants, context, sources or lists.
    Bounds,
    /// An `ensure` observed a zero input.
    Assertion,
    /// A signed context failed signature verification.
    Authentication,
    /// Overflow or division by zero.
    Arithmetic,
    /// A host query failed.
    Host,
}

/// Errors raised by the integrity check when deploying an expression.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IntegrityError {
    /// The expression has no sources.
    #[error("expression has no sources")]
    NoSources,
    /// A source length is not a multiple of the instruction size.
    #[error("truncated source: source_index={source_index} length={length}")]
    TruncatedSource {
        /// Index of the offending source.
        source_index: usize,
        /// Byte length of the source.
        length: usize,
    },
    /// An opcode id is not in the registry.
    #[error("unknown opcode: source_index={source_index} position={position} opcode={opcode:#06x}")]
    UnknownOpcode {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// The raw opcode id.
        opcode: u16,
    },
    /// An opcode exists but is not available in the selected interpreter version.
    #[error("opcode {opcode} is not enabled in {spec} at {source_index}:{position}")]
    OpcodeNotEnabled {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// The opcode.
        opcode: Opcode,
        /// The interpreter version the expression is deployed against.
        spec: InterpreterSpecId,
    },
    /// An operand is malformed for its opcode.
    #[error("invalid operand {operand} for {opcode} at {source_index}:{position}: {reason}")]
    InvalidOperand {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// The opcode.
        opcode: Opcode,
        /// The operand.
        operand: Operand,
        /// Why the operand was rejected.
        reason: &'static str,
    },
    /// A constant read points past the constants table.
    #[error("constant {index} out of bounds ({length}) at {source_index}:{position}")]
    ConstantOutOfBounds {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// The requested constant.
        index: usize,
        /// Number of constants.
        length: usize,
    },
    /// A stack read points below the bottom of the stack.
    #[error("stack read {offset} out of bounds ({height}) at {source_index}:{position}")]
    StackReadOutOfBounds {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// The requested offset from the top.
        offset: usize,
        /// The stack height at that point.
        height: usize,
    },
    /// An instruction pops more items than the stack holds.
    #[error("stack underflow at {source_index}:{position}: needed={needed} height={height}")]
    StackUnderflow {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// Number of inputs the instruction pops.
        needed: usize,
        /// The stack height at that point.
        height: usize,
    },
    /// The stack grows beyond the limit.
    #[error("stack overflow at {source_index}:{position}: height={height} > limit={limit}")]
    StackOverflow {
        /// Index of the offending source.
        source_index: usize,
        /// Instruction index within the source.
        position: usize,
        /// The height the stack would reach.
        height: usize,
        /// The stack limit.
        limit: usize,
    },
    /// A source leaves fewer items on the stack than its declared minimum.
    #[error("too few outputs: source_index={source_index} expected={expected} actual={actual}")]
    MinOutputs {
        /// Index of the offending source.
        source_index: usize,
        /// Declared minimum outputs.
        expected: usize,
        /// Final stack height.
        actual: usize,
    },
    /// More minimum outputs were declared than there are sources.
    #[error("min outputs declared for {min_outputs} entrypoints but only {sources} sources")]
    TooManyMinOutputs {
        /// Number of sources.
        sources: usize,
        /// Number of declared minimums.
        min_outputs: usize,
    },
    /// A memory offset does not fit in its operand.
    #[error("memory offset out of range: offset={offset}")]
    MemoryOffsetOutOfRange {
        /// The offset.
        offset: u16,
    },
}

/// Errors raised while assembling the evaluation context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// The signature of a signed context does not recover to its signer.
    #[error("invalid signature: index={index} signer={signer} recovered={recovered}")]
    InvalidSignature {
        /// Index of the signed context.
        index: usize,
        /// The claimed signer.
        signer: Address,
        /// The address the signature recovers to.
        recovered: Address,
    },
    /// The signature of a signed context cannot be parsed or recovered at all.
    #[error("malformed signature: index={index}")]
    MalformedSignature {
        /// Index of the signed context.
        index: usize,
    },
}

/// Arithmetic failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// The result does not fit in 256 bits.
    #[error("arithmetic overflow")]
    Overflow,
    /// Division or remainder by zero.
    #[error("division by zero")]
    DivisionByZero,
}

/// Errors raised by a [`crate::Host`] query.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The queried token does not exist.
    #[error("nonexistent token: token={token} id={id}")]
    NonexistentToken {
        /// The token contract.
        token: Address,
        /// The token id.
        id: U256,
    },
    /// The query itself failed.
    #[error("{query} failed on {token}: {reason}")]
    Call {
        /// The query name.
        query: &'static str,
        /// The token contract.
        token: Address,
        /// Failure detail.
        reason: String,
    },
}

/// Errors raised while executing an entrypoint.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// The entrypoint does not exist.
    #[error("entrypoint out of bounds: entrypoint={entrypoint} sources={sources}")]
    EntrypointOutOfBounds {
        /// The requested entrypoint.
        entrypoint: usize,
        /// Number of sources.
        sources: usize,
    },
    /// An instruction popped from an empty stack.
    #[error("stack underflow at position={position}")]
    StackUnderflow {
        /// Instruction index.
        position: usize,
    },
    /// The stack grew beyond its bound.
    #[error("stack overflow: limit={limit}")]
    StackOverflow {
        /// The stack bound.
        limit: usize,
    },
    /// A constant read points past the constants table.
    #[error("constant out of bounds: index={index} length={length}")]
    ConstantOutOfBounds {
        /// The requested constant.
        index: usize,
        /// Number of constants.
        length: usize,
    },
    /// A stack read points below the bottom of the stack.
    #[error("stack read out of bounds: offset={offset} height={height}")]
    StackReadOutOfBounds {
        /// The requested offset from the top.
        offset: usize,
        /// The current height.
        height: usize,
    },
    /// A context cell does not exist.
    #[error("context out of bounds: row={row} column={column}")]
    ContextOutOfBounds {
        /// The row.
        row: usize,
        /// The column.
        column: usize,
    },
    /// A context row does not exist.
    #[error("context row out of bounds: row={row} rows={rows}")]
    ContextRowOutOfBounds {
        /// The row.
        row: usize,
        /// Number of rows.
        rows: usize,
    },
    /// A signed context index does not exist.
    #[error("signer out of bounds: index={index} signers={signers}")]
    SignerOutOfBounds {
        /// The requested signed context.
        index: usize,
        /// Number of signed contexts.
        signers: usize,
    },
    /// A sentinel was consumed as a value.
    #[error("sentinel used as a value by {opcode}")]
    SentinelAsValue {
        /// The consuming opcode.
        opcode: Opcode,
    },
    /// An `ensure` observed a zero input.
    #[error("ensure failed: position={position} input={input}")]
    EnsureFailed {
        /// Instruction index of the `ensure`.
        position: usize,
        /// Index of the zero input.
        input: usize,
    },
    /// An opcode failed arithmetically.
    #[error("{opcode}: {error}")]
    Math {
        /// The failing opcode.
        opcode: Opcode,
        /// The failure.
        #[source]
        error: MathError,
    },
    /// A host query failed.
    #[error(transparent)]
    Host(#[from] HostError),
    /// An operand the handler cannot decode.
    #[error("invalid operand {operand} for {opcode}")]
    InvalidOperand {
        /// The opcode.
        opcode: Opcode,
        /// The operand.
        operand: Operand,
    },
    /// An opcode id without a handler in the instruction table.
    #[error("unknown opcode {opcode:#06x}")]
    UnknownOpcode {
        /// The raw opcode id.
        opcode: u16,
    },
    /// The expression was deployed against a newer registry than the interpreter runs.
    #[error("expression deployed for {expression} cannot run on {interpreter}")]
    SpecMismatch {
        /// The version the expression was deployed against.
        expression: InterpreterSpecId,
        /// The version of the interpreter.
        interpreter: InterpreterSpecId,
    },
}

/// Errors raised when decoding sentinel-delimited lists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// Fewer sentinels were found than lists were expected.
    #[error("missing sentinel: expected={expected} found={found}")]
    MissingSentinel {
        /// Number of lists expected.
        expected: usize,
        /// Number of sentinels found.
        found: usize,
    },
    /// A list length is not a multiple of its record width.
    #[error("misaligned list: list={list} width={width} length={length}")]
    MisalignedList {
        /// Index of the list in push order, the bottom list being `0`.
        list: usize,
        /// Expected record width.
        width: usize,
        /// Number of words in the list.
        length: usize,
    },
}

/// Errors raised when reading a final stack under a calling convention.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConventionError {
    /// The stack is shorter than the convention requires.
    #[error("stack too short: expected={expected} actual={actual}")]
    StackTooShort {
        /// Required height.
        expected: usize,
        /// Actual height.
        actual: usize,
    },
    /// A sentinel sits where the convention expects a value.
    #[error("sentinel in value slot {slot}")]
    UnexpectedSentinel {
        /// Index of the slot within the convention.
        slot: usize,
    },
    /// A sentinel-delimited list is malformed.
    #[error(transparent)]
    List(#[from] ListError),
    /// Arithmetic failed while applying the convention.
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Any error raised by the interpreter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InterpreterError {
    /// Deployment rejected the expression.
    #[error("integrity check failed: {0}")]
    Integrity(#[from] IntegrityError),
    /// Context assembly failed.
    #[error("context assembly failed: {0}")]
    Context(#[from] ContextError),
    /// Evaluation reverted.
    #[error("evaluation reverted: {0}")]
    Eval(#[from] EvalError),
    /// Output decoding failed.
    #[error("convention: {0}")]
    Convention(#[from] ConventionError),
}

impl IntegrityError {
    /// The class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::StackOverflow { .. } | Self::StackUnderflow { .. } => ErrorKind::Bounds,
            _ => ErrorKind::Encoding,
        }
    }
}

impl ContextError {
    /// The class of this error.
    pub const fn kind(&self) -> ErrorKind {
        ErrorKind::Authentication
    }

    /// Index of the signed context that failed.
    pub const fn index(&self) -> usize {
        match self {
            Self::InvalidSignature { index, .. } | Self::MalformedSignature { index } => *index,
        }
    }
}

impl EvalError {
    /// The class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EnsureFailed { .. } => ErrorKind::Assertion,
            Self::Math { .. } => ErrorKind::Arithmetic,
            Self::Host(_) => ErrorKind::Host,
            Self::UnknownOpcode { .. } |
            Self::InvalidOperand { .. } |
            Self::SpecMismatch { .. } => ErrorKind::Encoding,
            Self::EntrypointOutOfBounds { .. } |
            Self::StackUnderflow { .. } |
            Self::StackOverflow { .. } |
            Self::ConstantOutOfBounds { .. } |
            Self::StackReadOutOfBounds { .. } |
            Self::ContextOutOfBounds { .. } |
            Self::ContextRowOutOfBounds { .. } |
            Self::SignerOutOfBounds { .. } |
            Self::SentinelAsValue { .. } => ErrorKind::Bounds,
        }
    }
}

impl ConventionError {
    /// The class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Math(_) => ErrorKind::Arithmetic,
            _ => ErrorKind::Bounds,
        }
    }
}

impl InterpreterError {
    /// The class of this error.
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Integrity(err) => err.kind(),
            Self::Context(err) => err.kind(),
            Self::Eval(err) => err.kind(),
            Self::Convention(err) => err.kind(),
        }
    }
}

#[allow(missing_docs)]
mod abi {
    alloy_sol_types::sol! {
        interface IInterpreterErrors {
            error IntegrityCheckFailed(string reason);
            error InvalidSignature(uint256 index);
            error StackUnderflow();
            error StackOverflow();
            error OutOfBoundsRead(string reason);
            error EnsureFailed(uint256 position, uint256 input);
            error MathOverflow(uint16 opcode);
            error DivisionByZero(uint16 opcode);
            error HostQueryFailed(string reason);
            error SentinelAsValue(uint16 opcode);
            error MalformedList(string reason);
        }
    }
}

pub use abi::IInterpreterErrors;

/// Encodes an interpreter error as ABI-encoded revert data.
///
/// Uses the Solidity error bindings of [`IInterpreterErrors`], so a host contract can bubble the
/// failure up unchanged.
pub fn encode_revert(error: &InterpreterError) -> Bytes {
    match error {
        InterpreterError::Integrity(err) => {
            IInterpreterErrors::IntegrityCheckFailed { reason: err.to_string() }
                .abi_encode()
                .into()
        }
        InterpreterError::Context(err) => {
            IInterpreterErrors::InvalidSignature { index: U256::from(err.index()) }
                .abi_encode()
                .into()
        }
        InterpreterError::Eval(err) => encode_eval_revert(err),
        InterpreterError::Convention(err) => {
            IInterpreterErrors::MalformedList { reason: err.to_string() }.abi_encode().into()
        }
    }
}

fn encode_eval_revert(error: &EvalError) -> Bytes {
    match error {
        EvalError::StackUnderflow { .. } => {
            IInterpreterErrors::StackUnderflow {}.abi_encode().into()
        }
        EvalError::StackOverflow { .. } => IInterpreterErrors::StackOverflow {}.abi_encode().into(),
        EvalError::EnsureFailed { position, input } => IInterpreterErrors::EnsureFailed {
            position: U256::from(*position),
            input: U256::from(*input),
        }
        .abi_encode()
        .into(),
        EvalError::Math { opcode, error: MathError::Overflow } => {
            IInterpreterErrors::MathOverflow { opcode: *opcode as u16 }.abi_encode().into()
        }
        EvalError::Math { opcode, error: MathError::DivisionByZero } => {
            IInterpreterErrors::DivisionByZero { opcode: *opcode as u16 }.abi_encode().into()
        }
        EvalError::SentinelAsValue { opcode } => {
            IInterpreterErrors::SentinelAsValue { opcode: *opcode as u16 }.abi_encode().into()
        }
        EvalError::Host(err) => {
            IInterpreterErrors::HostQueryFailed { reason: err.to_string() }.abi_encode().into()
        }
        EvalError::UnknownOpcode { .. } |
        EvalError::InvalidOperand { .. } |
        EvalError::SpecMismatch { .. } => {
            IInterpreterErrors::IntegrityCheckFailed { reason: error.to_string() }
                .abi_encode()
                .into()
        }
        EvalError::EntrypointOutOfBounds { .. } |
        EvalError::ConstantOutOfBounds { .. } |
        EvalError::StackReadOutOfBounds { .. } |
        EvalError::ContextOutOfBounds { .. } |
        EvalError::ContextRowOutOfBounds { .. } |
        EvalError::SignerOutOfBounds { .. } => {
            IInterpreterErrors::OutOfBoundsRead { reason: error.to_string() }.abi_encode().into()
        }
    }
}
