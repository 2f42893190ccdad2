//! Instruction handler implementations.
//!
//! Each handler consumes the execution state and returns a [Control]
//! telling the dispatcher where to go next. Gas sufficiency and stack
//! height for the enclosing basic block were already verified by the
//! preceding [begin_block]; only dynamic costs are charged here.

#[macro_use]
mod macros;
pub(crate) mod arithmetic;
pub(crate) mod bitwise;
pub(crate) mod call;
pub(crate) mod misc;
pub(crate) mod system;

use core::ops::{BitAnd, BitOr, BitXor};

use primitive_types::U256;

use crate::analysis::Instruction;
use crate::consts::STACK_LIMIT;
use crate::costs;
use crate::error::{ExitException, ExitResult, ExitSucceed};
use crate::machine::ExecutionState;

/// Control state returned by every handler.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Control {
	/// Continue with the next instruction in the stream.
	Continue,
	/// Continue at the given instruction-stream index.
	Jump(usize),
	/// Terminate the frame.
	Exit(ExitResult),
}

/// The block-begin handler: the single place where base gas and stack
/// bounds are checked, once for the whole basic block.
pub fn begin_block(instr: &Instruction, state: &mut ExecutionState) -> Control {
	let block = instr.arg.block();

	state.gas_left -= i64::from(block.gas_cost);
	if state.gas_left < 0 {
		return Control::Exit(ExitException::OutOfGas.into());
	}
	state.current_block_cost = block.gas_cost;

	let height = state.stack.len() as i32;
	if height < i32::from(block.stack_req) {
		return Control::Exit(ExitException::StackUnderflow.into());
	}
	if height + i32::from(block.stack_max_growth) > STACK_LIMIT as i32 {
		return Control::Exit(ExitException::StackOverflow.into());
	}

	Control::Continue
}

/// `STOP`
pub fn stop(_instr: &Instruction, _state: &mut ExecutionState) -> Control {
	Control::Exit(ExitSucceed::Stopped.into())
}

/// The designated `INVALID` instruction.
pub fn invalid(_instr: &Instruction, _state: &mut ExecutionState) -> Control {
	Control::Exit(ExitException::DesignatedInvalid.into())
}

/// Any opcode undefined in the active revision.
pub fn undefined(instr: &Instruction, _state: &mut ExecutionState) -> Control {
	let opcode = crate::Opcode(instr.arg.number() as u8);
	Control::Exit(ExitException::InvalidOpcode(opcode).into())
}

/// `ADD`
pub fn add(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_tuple!(state, overflowing_add)
}

/// `MUL`
pub fn mul(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_tuple!(state, overflowing_mul)
}

/// `SUB`
pub fn sub(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_tuple!(state, overflowing_sub)
}

/// `DIV`
pub fn div(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::arithmetic::div)
}

/// `SDIV`
pub fn sdiv(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::arithmetic::sdiv)
}

/// `MOD`
pub fn rem(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::arithmetic::rem)
}

/// `SMOD`
pub fn srem(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::arithmetic::srem)
}

/// `ADDMOD`
pub fn addmod(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op3_u256_fn!(state, self::arithmetic::addmod)
}

/// `MULMOD`
pub fn mulmod(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op3_u256_fn!(state, self::arithmetic::mulmod)
}

/// `EXP`, charging the per-byte exponent fee.
pub fn exp(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, base, power);
	try_or_exit!(state.charge(costs::exp_cost(power, state.revision)));
	push_u256!(state, self::arithmetic::exp(base, power));
	Control::Continue
}

/// `SIGNEXTEND`
pub fn signextend(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::arithmetic::signextend)
}

/// `LT`
pub fn lt(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_bool_ref!(state, lt)
}

/// `GT`
pub fn gt(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_bool_ref!(state, gt)
}

/// `SLT`
pub fn slt(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::bitwise::slt)
}

/// `SGT`
pub fn sgt(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::bitwise::sgt)
}

/// `EQ`
pub fn eq(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_bool_ref!(state, eq)
}

/// `ISZERO`
pub fn iszero(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op1_u256_fn!(state, self::bitwise::iszero)
}

/// `AND`
pub fn and(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256!(state, bitand)
}

/// `OR`
pub fn or(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256!(state, bitor)
}

/// `XOR`
pub fn xor(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256!(state, bitxor)
}

/// `NOT`
pub fn not(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op1_u256_fn!(state, self::bitwise::not)
}

/// `BYTE`
pub fn byte(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::bitwise::byte)
}

/// `SHL`
pub fn shl(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::bitwise::shl)
}

/// `SHR`
pub fn shr(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::bitwise::shr)
}

/// `SAR`
pub fn sar(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	op2_u256_fn!(state, self::bitwise::sar)
}
