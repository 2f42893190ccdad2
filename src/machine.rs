use alloc::vec::Vec;

use primitive_types::U256;

use crate::analysis::Analysis;
use crate::costs;
use crate::error::ExitException;
use crate::memory::Memory;
use crate::revision::Revision;
use crate::runtime::{Host, Message};
use crate::stack::Stack;
use crate::utils::u256_to_usize;

/// Mutable state of one call frame.
///
/// The gas counter only reflects the base costs of fully entered basic
/// blocks; [ExecutionState::corrected_gas_left] recovers the exact
/// per-instruction value where it is observable.
pub struct ExecutionState<'a> {
	/// Remaining frame gas. May transiently dip below the per-instruction
	/// value inside a prepaid block.
	pub gas_left: i64,
	/// Accumulated gas refund.
	pub gas_refund: i64,
	/// Operand stack.
	pub stack: Stack,
	/// Frame memory.
	pub memory: Memory,
	/// Return value of this frame, set by `RETURN` and `REVERT`.
	///
	/// Note the difference to `retbuf`, which holds the output of the most
	/// recent sub-call.
	pub retval: Vec<u8>,
	/// Return-data buffer of the most recent sub-call.
	pub retbuf: Vec<u8>,
	/// The message that created this frame.
	pub message: &'a Message,
	/// Raw code bytes, for `CODESIZE`/`CODECOPY`.
	pub code: &'a [u8],
	/// The pre-decoded instruction stream this frame runs.
	pub analysis: &'a Analysis,
	/// Host interface.
	pub host: &'a mut dyn Host,
	/// Active protocol revision.
	pub revision: Revision,
	/// Base gas cost of the currently executing basic block.
	pub current_block_cost: u32,
}

impl<'a> ExecutionState<'a> {
	/// Create the state for a fresh frame.
	pub fn new(
		message: &'a Message,
		revision: Revision,
		host: &'a mut dyn Host,
		analysis: &'a Analysis,
		code: &'a [u8],
	) -> Self {
		Self {
			gas_left: message.gas,
			gas_refund: 0,
			stack: Stack::new(),
			memory: Memory::new(),
			retval: Vec::new(),
			retbuf: Vec::new(),
			message,
			code,
			analysis,
			host,
			revision,
			current_block_cost: 0,
		}
	}

	/// Charge a dynamic cost against the remaining gas.
	#[inline]
	pub fn charge(&mut self, cost: u64) -> Result<(), ExitException> {
		self.gas_left = costs::check_gas(self.gas_left, cost)?;
		Ok(())
	}

	/// Exact remaining gas at an instruction carrying a gas-position
	/// argument: the block is prepaid, so the costs of instructions after
	/// this one are handed back.
	#[inline]
	#[must_use]
	pub fn corrected_gas_left(&self, consumed_in_block: i64) -> i64 {
		self.gas_left + (i64::from(self.current_block_cost) - consumed_in_block)
	}

	/// Expand memory to cover `offset..offset + len`, charging the memory
	/// fee delta for any growth.
	pub fn resize_memory(&mut self, offset: U256, len: U256) -> Result<(), ExitException> {
		if len.is_zero() {
			return Ok(());
		}

		let offset = u256_to_usize(offset)?;
		let len = u256_to_usize(len)?;
		let end = offset.checked_add(len).ok_or(ExitException::OutOfMemory)?;

		if end <= self.memory.len() {
			return Ok(());
		}

		let current_words = (self.memory.len() / 32) as u64;
		let new_words = costs::num_words(end);
		let cost = costs::memory_gas(new_words) - costs::memory_gas(current_words);
		self.charge(cost)?;
		self.memory.grow(end);

		Ok(())
	}
}
