//! Expressions and their deploy-time integrity check.

use alloy_primitives::{Bytes, U256};
use delegate::delegate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::v1::STACK_LIMIT, decode_source, EvalError, Instruction, IntegrityError,
    InterpreterSpecId, MemoryOperand, MemoryType, Opcode,
};

/// A compiled expression as supplied by a calling contract.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    /// Bytecode sources, addressed by entrypoint index.
    pub sources: Vec<Bytes>,
    /// The constants table.
    pub constants: Vec<U256>,
    /// Minimum final stack height of the leading entrypoints. Entrypoints without an entry have
    /// no minimum.
    #[serde(default)]
    pub min_outputs: Vec<u16>,
}

/// An expression that passed the integrity check.
///
/// Only deployed expressions can be evaluated. Every opcode is known and enabled, every operand
/// is well formed, constant reads are in range and no instruction can underflow the stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedExpression {
    spec: InterpreterSpecId,
    sources: Vec<Vec<Instruction>>,
    constants: Vec<U256>,
    stack_heights: Vec<SourceHeights>,
}

/// Static stack heights of one source.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SourceHeights {
    /// The highest the stack gets.
    pub max: usize,
    /// The height at the end of the source.
    pub outputs: usize,
}

impl Expression {
    /// Creates an expression without declared minimum outputs.
    pub fn new(sources: Vec<Bytes>, constants: Vec<U256>) -> Self {
        Self { sources, constants, min_outputs: Vec::new() }
    }

    /// Declares the minimum final stack height of the leading entrypoints.
    pub fn with_min_outputs(mut self, min_outputs: Vec<u16>) -> Self {
        self.min_outputs = min_outputs;
        self
    }

    /// Runs the integrity check against the opcode registry of `spec`.
    pub fn deploy(self, spec: InterpreterSpecId) -> Result<DeployedExpression, IntegrityError> {
        if self.sources.is_empty() {
            return Err(IntegrityError::NoSources);
        }
        if self.min_outputs.len() > self.sources.len() {
            return Err(IntegrityError::TooManyMinOutputs {
                sources: self.sources.len(),
                min_outputs: self.min_outputs.len(),
            });
        }

        let mut sources = Vec::with_capacity(self.sources.len());
        let mut stack_heights = Vec::with_capacity(self.sources.len());
        for (source_index, source) in self.sources.iter().enumerate() {
            let instructions = decode_source(source_index, source)?;
            let heights = check_source(spec, source_index, &instructions, self.constants.len())?;
            let expected = self.min_outputs.get(source_index).copied().unwrap_or_default() as usize;
            if heights.outputs < expected {
                return Err(IntegrityError::MinOutputs {
                    source_index,
                    expected,
                    actual: heights.outputs,
                });
            }
            sources.push(instructions);
            stack_heights.push(heights);
        }

        debug!(
            target: "rain::integrity",
            %spec,
            sources = sources.len(),
            constants = self.constants.len(),
            "Deployed expression"
        );
        Ok(DeployedExpression { spec, sources, constants: self.constants, stack_heights })
    }
}

/// Simulates the stack height through one source.
fn check_source(
    spec: InterpreterSpecId,
    source_index: usize,
    instructions: &[Instruction],
    constants: usize,
) -> Result<SourceHeights, IntegrityError> {
    let mut height = 0usize;
    let mut max = 0usize;
    for (position, instruction) in instructions.iter().enumerate() {
        let operand = instruction.operand;
        let opcode = Opcode::from_u16(instruction.opcode).ok_or(IntegrityError::UnknownOpcode {
            source_index,
            position,
            opcode: instruction.opcode,
        })?;
        if !opcode.is_enabled_in(spec) {
            return Err(IntegrityError::OpcodeNotEnabled { source_index, position, opcode, spec });
        }
        opcode.check_operand(operand).map_err(|reason| IntegrityError::InvalidOperand {
            source_index,
            position,
            opcode,
            operand,
            reason,
        })?;

        if opcode == Opcode::ReadMemory {
            let memory = MemoryOperand::decode(operand);
            let offset = memory.offset as usize;
            match memory.memory_type {
                MemoryType::Constant if offset >= constants => {
                    return Err(IntegrityError::ConstantOutOfBounds {
                        source_index,
                        position,
                        index: offset,
                        length: constants,
                    });
                }
                MemoryType::Stack if offset >= height => {
                    return Err(IntegrityError::StackReadOutOfBounds {
                        source_index,
                        position,
                        offset,
                        height,
                    });
                }
                _ => {}
            }
        }

        let needed = opcode.inputs(operand);
        if needed > height {
            return Err(IntegrityError::StackUnderflow { source_index, position, needed, height });
        }
        height = height - needed + opcode.outputs();
        if height > STACK_LIMIT {
            return Err(IntegrityError::StackOverflow {
                source_index,
                position,
                height,
                limit: STACK_LIMIT,
            });
        }
        max = max.max(height);
    }
    Ok(SourceHeights { max, outputs: height })
}

impl DeployedExpression {
    /// The interpreter version the expression was checked against.
    pub const fn spec(&self) -> InterpreterSpecId {
        self.spec
    }

    delegate! {
        to self.sources {
            /// The number of entrypoints.
            pub fn len(&self) -> usize;
            /// Whether the expression has no entrypoints. Never true for a deployed expression.
            pub fn is_empty(&self) -> bool;
        }
    }

    /// The constants table.
    pub fn constants(&self) -> &[U256] {
        &self.constants
    }

    /// The decoded instructions of an entrypoint.
    pub fn source(&self, entrypoint: usize) -> Result<&[Instruction], EvalError> {
        self.sources.get(entrypoint).map(Vec::as_slice).ok_or(EvalError::EntrypointOutOfBounds {
            entrypoint,
            sources: self.sources.len(),
        })
    }

    /// The static stack heights of an entrypoint.
    pub fn heights(&self, entrypoint: usize) -> Result<SourceHeights, EvalError> {
        self.stack_heights.get(entrypoint).copied().ok_or(EvalError::EntrypointOutOfBounds {
            entrypoint,
            sources: self.sources.len(),
        })
    }
}
