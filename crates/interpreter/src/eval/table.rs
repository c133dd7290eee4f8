use super::{instructions::*, Machine};
use crate::{EvalError, Host, InterpreterSpecId, Opcode, Store};

/// An instruction handler.
pub(crate) type InstructionFn<H, S> = fn(&mut Machine<'_, H, S>) -> Result<(), EvalError>;

/// The handlers of one interpreter version, indexed by opcode id.
pub(crate) struct InstructionTable<H, S> {
    table: [InstructionFn<H, S>; 256],
}

impl<H: Host, S: Store> InstructionTable<H, S> {
    /// Builds the table for `spec`. Opcodes introduced after `spec` dispatch to the unknown
    /// handler.
    pub(crate) fn new(spec: InterpreterSpecId) -> Self {
        let mut table = instruction_table::<H, S>();
        for opcode in Opcode::ALL {
            if !opcode.is_enabled_in(spec) {
                table[opcode as usize] = control::unknown;
            }
        }
        Self { table }
    }

    /// The handler of an opcode id.
    pub(crate) fn get(&self, opcode: u16) -> InstructionFn<H, S> {
        self.table.get(opcode as usize).copied().unwrap_or(control::unknown)
    }
}

/// Returns the instruction table of the latest interpreter version.
const fn instruction_table<H: Host, S: Store>() -> [InstructionFn<H, S>; 256] {
    let mut table = [control::unknown as InstructionFn<H, S>; 256];

    table[Opcode::ReadMemory as usize] = memory::read_memory;

    table[Opcode::Context as usize] = context::context;
    table[Opcode::Caller as usize] = context::caller;
    table[Opcode::ThisAddress as usize] = context::this_address;
    table[Opcode::BlockNumber as usize] = context::block_number;
    table[Opcode::BlockTimestamp as usize] = context::block_timestamp;
    table[Opcode::Signer as usize] = context::signer;
    table[Opcode::ContextRowLen as usize] = context::context_row_len;

    table[Opcode::Add as usize] = arithmetic::add;
    table[Opcode::Sub as usize] = arithmetic::sub;
    table[Opcode::Mul as usize] = arithmetic::mul;
    table[Opcode::Div as usize] = arithmetic::div;
    table[Opcode::Mod as usize] = arithmetic::rem;
    table[Opcode::Exp as usize] = arithmetic::exp;
    table[Opcode::Min as usize] = arithmetic::min;
    table[Opcode::Max as usize] = arithmetic::max;
    table[Opcode::SaturatingAdd as usize] = arithmetic::saturating_add;
    table[Opcode::SaturatingSub as usize] = arithmetic::saturating_sub;

    table[Opcode::EqualTo as usize] = logic::equal_to;
    table[Opcode::GreaterThan as usize] = logic::greater_than;
    table[Opcode::LessThan as usize] = logic::less_than;
    table[Opcode::IsZero as usize] = logic::is_zero;
    table[Opcode::Every as usize] = logic::every;
    table[Opcode::Any as usize] = logic::any;
    table[Opcode::EagerIf as usize] = logic::eager_if;
    table[Opcode::Ensure as usize] = logic::ensure;

    table[Opcode::Get as usize] = store::get;
    table[Opcode::Set as usize] = store::set;

    table[Opcode::FixedPointMul as usize] = math::fixed_point_mul;
    table[Opcode::FixedPointDiv as usize] = math::fixed_point_div;
    table[Opcode::Scale18 as usize] = math::scale18;
    table[Opcode::ScaleN as usize] = math::scale_n;
    table[Opcode::ScaleBy as usize] = math::scale_by;
    table[Opcode::Scale18Dynamic as usize] = math::scale18_dynamic;
    table[Opcode::ScaleNDynamic as usize] = math::scale_n_dynamic;

    table[Opcode::Erc20BalanceOf as usize] = token::erc20_balance_of;
    table[Opcode::Erc20TotalSupply as usize] = token::erc20_total_supply;
    table[Opcode::Erc721BalanceOf as usize] = token::erc721_balance_of;
    table[Opcode::Erc721OwnerOf as usize] = token::erc721_owner_of;
    table[Opcode::Erc1155BalanceOf as usize] = token::erc1155_balance_of;

    table[Opcode::Sentinel as usize] = list::sentinel;

    table[Opcode::Hash as usize] = hash::hash;
    table[Opcode::RandomId as usize] = hash::random_id;

    table
}
