//! Code analysis: a single pass over raw bytecode producing a flat,
//! pre-decoded instruction stream annotated with per-basic-block gas and
//! stack requirements.

use alloc::vec::Vec;

use primitive_types::U256;

use crate::eval::{self, Control};
use crate::machine::ExecutionState;
use crate::opcode::Opcode;
use crate::optable::op_table;
use crate::revision::Revision;

/// The function implementing an instruction's execution.
pub type Efn = for<'i, 's, 'h> fn(&'i Instruction, &'s mut ExecutionState<'h>) -> Control;

/// Compressed information about an instruction basic block.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BlockInfo {
	/// The total base gas cost of all instructions in the block.
	pub gas_cost: u32,
	/// The stack height required to execute the block.
	pub stack_req: i16,
	/// The maximum stack height growth relative to the height at block
	/// start.
	pub stack_max_growth: i16,
}

/// Argument of a pre-decoded instruction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InstructionArg {
	/// No argument.
	None,
	/// Immediate of `PUSH1`..`PUSH8`.
	SmallPushValue(u64),
	/// Index into the push-value pool for `PUSH9`..`PUSH32`.
	PushValue(u32),
	/// A number: the code offset for `PC`, the block gas consumed through
	/// this instruction for gas-observing instructions.
	Number(i64),
	/// Aggregated requirements of the block opened by a block-begin
	/// instruction.
	Block(BlockInfo),
}

impl InstructionArg {
	/// The block info carried by a block-begin instruction.
	#[inline]
	#[must_use]
	pub fn block(&self) -> BlockInfo {
		match self {
			Self::Block(block) => *block,
			_ => BlockInfo::default(),
		}
	}

	/// The numeric argument.
	#[inline]
	#[must_use]
	pub fn number(&self) -> i64 {
		match self {
			Self::Number(n) => *n,
			_ => 0,
		}
	}

	/// The inlined small push immediate.
	#[inline]
	#[must_use]
	pub fn small_push(&self) -> u64 {
		match self {
			Self::SmallPushValue(v) => *v,
			_ => 0,
		}
	}

	/// The push-value pool index.
	#[inline]
	#[must_use]
	pub fn push_index(&self) -> usize {
		match self {
			Self::PushValue(i) => *i as usize,
			_ => 0,
		}
	}
}

/// A pre-decoded instruction: the handler and its argument.
#[derive(Clone, Copy)]
pub struct Instruction {
	/// Handler implementing the instruction.
	pub exec: Efn,
	/// Pre-decoded argument.
	pub arg: InstructionArg,
}

impl Instruction {
	const fn new(exec: Efn) -> Self {
		Self {
			exec,
			arg: InstructionArg::None,
		}
	}
}

impl core::fmt::Debug for Instruction {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.debug_struct("Instruction").field("arg", &self.arg).finish()
	}
}

/// Result of analyzing one code blob under one revision.
///
/// Immutable after construction; safe to share between concurrent frames
/// executing the same code, and to cache keyed by `(revision, code hash)`.
pub struct Analysis {
	/// The pre-decoded instruction stream. The first element is always a
	/// block-begin; the last is a synthetic `STOP`.
	pub instrs: Vec<Instruction>,
	/// Storage for large push values.
	pub push_values: Vec<U256>,
	/// The byte offsets of `JUMPDEST`s in the original code, sorted.
	jumpdest_offsets: Vec<u32>,
	/// The instruction-stream indexes matching `jumpdest_offsets`.
	jumpdest_targets: Vec<u32>,
}

impl Analysis {
	/// Resolve a jump target byte offset to an instruction-stream index.
	#[must_use]
	pub fn find_jumpdest(&self, offset: U256) -> Option<usize> {
		if offset > U256::from(u32::MAX) {
			return None;
		}
		let offset = offset.as_u32();
		self.jumpdest_offsets
			.binary_search(&offset)
			.ok()
			.map(|index| self.jumpdest_targets[index] as usize)
	}

	/// The recorded `(byte offset, instruction index)` jump destinations.
	pub fn jumpdests(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
		self.jumpdest_offsets
			.iter()
			.copied()
			.zip(self.jumpdest_targets.iter().copied())
	}
}

/// Block accumulation state during analysis.
struct OpenBlock {
	/// Index of the block-begin instruction in the output stream.
	begin_index: usize,
	gas_cost: i64,
	stack_req: i32,
	stack_change: i32,
	stack_max_growth: i32,
}

impl OpenBlock {
	const fn new(begin_index: usize) -> Self {
		Self {
			begin_index,
			gas_cost: 0,
			stack_req: 0,
			stack_change: 0,
			stack_max_growth: 0,
		}
	}

	fn close(&self) -> BlockInfo {
		// Saturate on over-long code: a clamped requirement can never be
		// satisfied, so the block keeps failing instead of under-charging.
		let gas_cost = if self.gas_cost > i64::from(u32::MAX) {
			u32::MAX
		} else {
			self.gas_cost as u32
		};
		let stack_req = if self.stack_req > i32::from(i16::MAX) {
			i16::MAX
		} else {
			self.stack_req as i16
		};
		let stack_max_growth = if self.stack_max_growth > i32::from(i16::MAX) {
			i16::MAX
		} else {
			self.stack_max_growth as i16
		};

		BlockInfo {
			gas_cost,
			stack_req,
			stack_max_growth,
		}
	}
}

/// Analyze the code under the given revision.
///
/// Complexity is O(n) in the code length; the output is pure in its inputs.
#[must_use]
pub fn analyze(revision: Revision, code: &[u8]) -> Analysis {
	let table = op_table(revision);

	let mut analysis = Analysis {
		instrs: Vec::with_capacity(code.len() + 2),
		push_values: Vec::new(),
		jumpdest_offsets: Vec::new(),
		jumpdest_targets: Vec::new(),
	};

	analysis.instrs.push(Instruction::new(eval::begin_block));
	let mut block = OpenBlock::new(0);

	let mut pos = 0usize;
	while pos < code.len() {
		let opcode = Opcode(code[pos]);
		let entry = &table[opcode.as_usize()];
		pos += 1;

		if opcode == Opcode::JUMPDEST {
			// A JUMPDEST closes the previous block and doubles as the
			// block-begin of the block it opens.
			let info = block.close();
			analysis.instrs[block.begin_index].arg = InstructionArg::Block(info);

			analysis.jumpdest_offsets.push((pos - 1) as u32);
			analysis.jumpdest_targets.push(analysis.instrs.len() as u32);

			block = OpenBlock::new(analysis.instrs.len());
		}
		analysis.instrs.push(Instruction::new(entry.exec));

		block.stack_req = core::cmp::max(
			block.stack_req,
			i32::from(entry.stack_req) - block.stack_change,
		);
		block.stack_change += i32::from(entry.stack_change);
		block.stack_max_growth = core::cmp::max(block.stack_max_growth, block.stack_change);
		block.gas_cost += i64::from(entry.gas_cost);

		if let Some(push_len) = opcode.is_push() {
			let push_len = push_len as usize;
			let mut immediate = [0u8; 32];
			let available = core::cmp::min(push_len, code.len() - pos);
			// A truncated immediate is zero-padded at the end.
			immediate[32 - push_len..32 - push_len + available]
				.copy_from_slice(&code[pos..pos + available]);
			pos += push_len;

			let arg = if push_len <= 8 {
				let mut small = [0u8; 8];
				small[8 - push_len..].copy_from_slice(&immediate[32 - push_len..]);
				InstructionArg::SmallPushValue(u64::from_be_bytes(small))
			} else {
				let index = analysis.push_values.len() as u32;
				analysis.push_values.push(U256::from_big_endian(&immediate));
				InstructionArg::PushValue(index)
			};
			if let Some(instr) = analysis.instrs.last_mut() {
				instr.arg = arg;
			}
		} else if opcode == Opcode::PC {
			if let Some(instr) = analysis.instrs.last_mut() {
				instr.arg = InstructionArg::Number((pos - 1) as i64);
			}
		} else if matches!(
			opcode,
			Opcode::GAS
				| Opcode::SSTORE | Opcode::CALL
				| Opcode::CALLCODE
				| Opcode::DELEGATECALL
				| Opcode::STATICCALL
				| Opcode::CREATE | Opcode::CREATE2
		) {
			// Gas-observing instructions remember how much of the block
			// cost is consumed through them, so the exact per-instruction
			// gas can be recovered at run time.
			if let Some(instr) = analysis.instrs.last_mut() {
				instr.arg = InstructionArg::Number(block.gas_cost);
			}
		} else if opcode.is_terminator() {
			let info = block.close();
			analysis.instrs[block.begin_index].arg = InstructionArg::Block(info);

			block = OpenBlock::new(analysis.instrs.len());
			analysis.instrs.push(Instruction::new(eval::begin_block));
		} else if opcode != Opcode::JUMPDEST {
			// Remember the raw opcode; undefined-opcode failures report it.
			if let Some(instr) = analysis.instrs.last_mut() {
				instr.arg = InstructionArg::Number(i64::from(opcode.0));
			}
		}
	}

	// The dispatcher must not fall off the end of the stream.
	analysis.instrs.push(Instruction::new(eval::stop));
	let info = block.close();
	analysis.instrs[block.begin_index].arg = InstructionArg::Block(info);

	analysis
}
