use core::cmp::min;

use primitive_types::U256;

use crate::analysis::Instruction;
use crate::costs;
use crate::error::{ExitError, ExitException, ExitSucceed};
use crate::eval::Control;
use crate::machine::ExecutionState;
use crate::memory::Memory;

/// Write `len` bytes taken from `src[src_offset..]` at `mem_offset`,
/// zero-filling everything past the end of the source.
fn write_padded(
	memory: &mut Memory,
	mem_offset: usize,
	src: &[u8],
	src_offset: U256,
	len: usize,
) {
	let slice = match crate::utils::u256_to_usize(src_offset) {
		Ok(src_offset) if src_offset < src.len() => {
			&src[src_offset..min(src.len(), src_offset + len)]
		}
		_ => &[],
	};
	memory.set(mem_offset, slice, Some(len));
}

pub fn push_small(instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::from(instr.arg.small_push()));
	Control::Continue
}

pub fn push_full(instr: &Instruction, state: &mut ExecutionState) -> Control {
	let value = state
		.analysis
		.push_values
		.get(instr.arg.push_index())
		.copied()
		.unwrap_or_default();
	push_u256!(state, value);
	Control::Continue
}

pub fn push0(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::zero());
	Control::Continue
}

pub fn dup<const N: usize>(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	state.stack.dup(N - 1);
	Control::Continue
}

pub fn swap<const N: usize>(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	state.stack.swap(N);
	Control::Continue
}

pub fn pop(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, _val);
	Control::Continue
}

pub fn mload(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, index);
	try_or_exit!(state.resize_memory(index, U256::from(32)));
	let index = as_usize_or_fail!(index);
	let value = U256::from_big_endian(state.memory.view(index, 32));
	push_u256!(state, value);
	Control::Continue
}

pub fn mstore(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, index, value);
	try_or_exit!(state.resize_memory(index, U256::from(32)));
	let index = as_usize_or_fail!(index);
	value.to_big_endian(state.memory.view_mut(index, 32));
	Control::Continue
}

pub fn mstore8(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, index, value);
	try_or_exit!(state.resize_memory(index, U256::one()));
	let index = as_usize_or_fail!(index);
	state.memory.set(index, &[value.low_u32() as u8], Some(1));
	Control::Continue
}

pub fn msize(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::from(state.memory.len()));
	Control::Continue
}

pub fn mcopy(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, dst, src, len);

	// Expansion covers the union of the source and destination windows.
	try_or_exit!(state.resize_memory(core::cmp::max(dst, src), len));
	if len.is_zero() {
		return Control::Continue;
	}
	let len = as_usize_or_fail!(len);
	try_or_exit!(state.charge(costs::copy_cost(len)));

	let dst = as_usize_or_fail!(dst);
	let src = as_usize_or_fail!(src);
	state.memory.copy_within(src, dst, len);
	Control::Continue
}

pub fn calldataload(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, index);

	let mut load = [0u8; 32];
	#[allow(clippy::needless_range_loop)]
	for i in 0..32 {
		if let Some(p) = index.checked_add(U256::from(i)) {
			if p <= U256::from(usize::MAX) {
				let p = p.as_usize();
				if p < state.message.input_data.len() {
					load[i] = state.message.input_data[p];
				}
			}
		}
	}

	push_u256!(state, U256::from_big_endian(&load));
	Control::Continue
}

pub fn calldatasize(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::from(state.message.input_data.len()));
	Control::Continue
}

pub fn calldatacopy(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, memory_offset, data_offset, len);

	try_or_exit!(state.resize_memory(memory_offset, len));
	if len.is_zero() {
		return Control::Continue;
	}
	let len = as_usize_or_fail!(len);
	try_or_exit!(state.charge(costs::copy_cost(len)));

	let memory_offset = as_usize_or_fail!(memory_offset);
	write_padded(
		&mut state.memory,
		memory_offset,
		&state.message.input_data,
		data_offset,
		len,
	);
	Control::Continue
}

pub fn codesize(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::from(state.code.len()));
	Control::Continue
}

pub fn codecopy(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, memory_offset, code_offset, len);

	try_or_exit!(state.resize_memory(memory_offset, len));
	if len.is_zero() {
		return Control::Continue;
	}
	let len = as_usize_or_fail!(len);
	try_or_exit!(state.charge(costs::copy_cost(len)));

	let memory_offset = as_usize_or_fail!(memory_offset);
	write_padded(&mut state.memory, memory_offset, state.code, code_offset, len);
	Control::Continue
}

pub fn returndatasize(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::from(state.retbuf.len()));
	Control::Continue
}

pub fn returndatacopy(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, memory_offset, data_offset, len);

	try_or_exit!(state.resize_memory(memory_offset, len));

	// Reading past the end of the return buffer is an error, unlike the
	// zero-padded copy family.
	if data_offset
		.checked_add(len)
		.map_or(true, |end| end > U256::from(state.retbuf.len()))
	{
		return Control::Exit(ExitException::OutOfOffset.into());
	}

	if len.is_zero() {
		return Control::Continue;
	}
	let len = as_usize_or_fail!(len);
	try_or_exit!(state.charge(costs::copy_cost(len)));

	let memory_offset = as_usize_or_fail!(memory_offset);
	let data_offset = as_usize_or_fail!(data_offset);
	let data = state.retbuf[data_offset..data_offset + len].to_vec();
	state.memory.set(memory_offset, &data, Some(len));
	Control::Continue
}

pub fn jump(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, dest);

	match state.analysis.find_jumpdest(dest) {
		Some(target) => Control::Jump(target),
		None => Control::Exit(ExitException::InvalidJump.into()),
	}
}

pub fn jumpi(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, dest, value);

	if value.is_zero() {
		return Control::Continue;
	}

	match state.analysis.find_jumpdest(dest) {
		Some(target) => Control::Jump(target),
		None => Control::Exit(ExitException::InvalidJump.into()),
	}
}

pub fn pc(instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, U256::from(instr.arg.number() as u64));
	Control::Continue
}

pub fn ret(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, start, len);
	try_or_exit!(state.resize_memory(start, len));
	if !len.is_zero() {
		let start = as_usize_or_fail!(start);
		let len = as_usize_or_fail!(len);
		state.retval = state.memory.get(start, len);
	}
	Control::Exit(ExitSucceed::Returned.into())
}

pub fn revert(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, start, len);
	try_or_exit!(state.resize_memory(start, len));
	if !len.is_zero() {
		let start = as_usize_or_fail!(start);
		let len = as_usize_or_fail!(len);
		state.retval = state.memory.get(start, len);
	}
	Control::Exit(ExitError::Reverted.into())
}
