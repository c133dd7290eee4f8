use core::fmt;

use crate::{decode_source, Instruction, IntegrityError, Opcode, Operand};

/// An instruction annotated with its position and, if known, its opcode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Index of the instruction within its source.
    pub position: usize,
    /// The raw instruction.
    pub instruction: Instruction,
    /// The opcode, or `None` if the id is not in the registry.
    pub opcode: Option<Opcode>,
}

impl DecodedInstruction {
    /// The operand of the instruction.
    pub const fn operand(&self) -> Operand {
        self.instruction.operand
    }
}

impl fmt::Display for DecodedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.opcode {
            Some(opcode) => write!(f, "{}<{}>", opcode.name(), self.instruction.operand),
            None => {
                write!(f, "unknown({:#06x})<{}>", self.instruction.opcode, self.instruction.operand)
            }
        }
    }
}

/// Decodes source `source_index` into human-readable instructions.
///
/// Unknown opcode ids are kept so that malformed sources can still be inspected.
pub fn disassemble(
    source_index: usize,
    source: &[u8],
) -> Result<Vec<DecodedInstruction>, IntegrityError> {
    Ok(decode_source(source_index, source)?
        .into_iter()
        .enumerate()
        .map(|(position, instruction)| DecodedInstruction {
            position,
            instruction,
            opcode: Opcode::from_u16(instruction.opcode),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode_source;

    #[test]
    fn test_disassemble_display() {
        let source = encode_source([
            Instruction::new(Opcode::Caller, Operand(0)),
            Instruction::new(Opcode::Add, Operand(2)),
            Instruction { opcode: 0xBEEF, operand: Operand(1) },
        ]);
        let decoded = disassemble(0, &source).unwrap();
        let rendered: Vec<String> = decoded.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["caller<0x0000>", "add<0x0002>", "unknown(0xbeef)<0x0001>"]);
        assert_eq!(decoded[2].position, 2);
        assert_eq!(decoded[2].opcode, None);
    }

    #[test]
    fn test_truncated_source_reports_its_index() {
        let mut source = encode_source([Instruction::new(Opcode::Caller, Operand(0))]).to_vec();
        source.pop();
        assert_eq!(
            disassemble(3, &source),
            Err(IntegrityError::TruncatedSource { source_index: 3, length: 3 })
        );
    }
}
