//! Per-revision opcode tables: for each of the 256 opcodes, the handler,
//! the scheduled base cost, and the stack requirement and net change used
//! by the analyzer to aggregate per-block requirements.
//!
//! The tables are pure, computed once at compile time and shared
//! process-wide. Each revision's table is derived from its predecessor,
//! patching in the opcodes and prices that revision introduced.

use crate::analysis::Efn;
use crate::consts::*;
use crate::eval;
use crate::opcode::Opcode;
use crate::revision::Revision;

/// One opcode table entry.
#[derive(Clone, Copy)]
pub struct OpTableEntry {
	/// Handler implementing the opcode.
	pub exec: Efn,
	/// Scheduled base cost, aggregated into the enclosing block.
	pub gas_cost: u16,
	/// Minimum stack height to execute the opcode.
	pub stack_req: i8,
	/// Net stack height change.
	pub stack_change: i8,
}

/// A complete 256-entry opcode table.
pub type OpTable = [OpTableEntry; 256];

const fn entry(exec: Efn, gas_cost: u16, stack_req: i8, stack_change: i8) -> OpTableEntry {
	OpTableEntry {
		exec,
		gas_cost,
		stack_req,
		stack_change,
	}
}

const fn frontier() -> OpTable {
	let mut t = [entry(eval::undefined, 0, 0, 0); 256];

	t[Opcode::STOP.as_usize()] = entry(eval::stop, G_ZERO, 0, 0);
	t[Opcode::ADD.as_usize()] = entry(eval::add, G_VERYLOW, 2, -1);
	t[Opcode::MUL.as_usize()] = entry(eval::mul, G_LOW, 2, -1);
	t[Opcode::SUB.as_usize()] = entry(eval::sub, G_VERYLOW, 2, -1);
	t[Opcode::DIV.as_usize()] = entry(eval::div, G_LOW, 2, -1);
	t[Opcode::SDIV.as_usize()] = entry(eval::sdiv, G_LOW, 2, -1);
	t[Opcode::MOD.as_usize()] = entry(eval::rem, G_LOW, 2, -1);
	t[Opcode::SMOD.as_usize()] = entry(eval::srem, G_LOW, 2, -1);
	t[Opcode::ADDMOD.as_usize()] = entry(eval::addmod, G_MID, 3, -2);
	t[Opcode::MULMOD.as_usize()] = entry(eval::mulmod, G_MID, 3, -2);
	t[Opcode::EXP.as_usize()] = entry(eval::exp, G_HIGH, 2, -1);
	t[Opcode::SIGNEXTEND.as_usize()] = entry(eval::signextend, G_LOW, 2, -1);

	t[Opcode::LT.as_usize()] = entry(eval::lt, G_VERYLOW, 2, -1);
	t[Opcode::GT.as_usize()] = entry(eval::gt, G_VERYLOW, 2, -1);
	t[Opcode::SLT.as_usize()] = entry(eval::slt, G_VERYLOW, 2, -1);
	t[Opcode::SGT.as_usize()] = entry(eval::sgt, G_VERYLOW, 2, -1);
	t[Opcode::EQ.as_usize()] = entry(eval::eq, G_VERYLOW, 2, -1);
	t[Opcode::ISZERO.as_usize()] = entry(eval::iszero, G_VERYLOW, 1, 0);
	t[Opcode::AND.as_usize()] = entry(eval::and, G_VERYLOW, 2, -1);
	t[Opcode::OR.as_usize()] = entry(eval::or, G_VERYLOW, 2, -1);
	t[Opcode::XOR.as_usize()] = entry(eval::xor, G_VERYLOW, 2, -1);
	t[Opcode::NOT.as_usize()] = entry(eval::not, G_VERYLOW, 1, 0);
	t[Opcode::BYTE.as_usize()] = entry(eval::byte, G_VERYLOW, 2, -1);

	t[Opcode::SHA3.as_usize()] = entry(eval::system::sha3, G_SHA3, 2, -1);

	t[Opcode::ADDRESS.as_usize()] = entry(eval::system::address, G_BASE, 0, 1);
	t[Opcode::BALANCE.as_usize()] = entry(eval::system::balance, 20, 1, 0);
	t[Opcode::ORIGIN.as_usize()] = entry(eval::system::origin, G_BASE, 0, 1);
	t[Opcode::CALLER.as_usize()] = entry(eval::system::caller, G_BASE, 0, 1);
	t[Opcode::CALLVALUE.as_usize()] = entry(eval::system::callvalue, G_BASE, 0, 1);
	t[Opcode::CALLDATALOAD.as_usize()] = entry(eval::misc::calldataload, G_VERYLOW, 1, 0);
	t[Opcode::CALLDATASIZE.as_usize()] = entry(eval::misc::calldatasize, G_BASE, 0, 1);
	t[Opcode::CALLDATACOPY.as_usize()] = entry(eval::misc::calldatacopy, G_VERYLOW, 3, -3);
	t[Opcode::CODESIZE.as_usize()] = entry(eval::misc::codesize, G_BASE, 0, 1);
	t[Opcode::CODECOPY.as_usize()] = entry(eval::misc::codecopy, G_VERYLOW, 3, -3);
	t[Opcode::GASPRICE.as_usize()] = entry(eval::system::gasprice, G_BASE, 0, 1);
	t[Opcode::EXTCODESIZE.as_usize()] = entry(eval::system::extcodesize, 20, 1, 0);
	t[Opcode::EXTCODECOPY.as_usize()] = entry(eval::system::extcodecopy, 20, 4, -4);

	t[Opcode::BLOCKHASH.as_usize()] = entry(eval::system::blockhash, 20, 1, 0);
	t[Opcode::COINBASE.as_usize()] = entry(eval::system::coinbase, G_BASE, 0, 1);
	t[Opcode::TIMESTAMP.as_usize()] = entry(eval::system::timestamp, G_BASE, 0, 1);
	t[Opcode::NUMBER.as_usize()] = entry(eval::system::number, G_BASE, 0, 1);
	t[Opcode::PREVRANDAO.as_usize()] = entry(eval::system::prevrandao, G_BASE, 0, 1);
	t[Opcode::GASLIMIT.as_usize()] = entry(eval::system::gaslimit, G_BASE, 0, 1);

	t[Opcode::POP.as_usize()] = entry(eval::misc::pop, G_BASE, 1, -1);
	t[Opcode::MLOAD.as_usize()] = entry(eval::misc::mload, G_VERYLOW, 1, 0);
	t[Opcode::MSTORE.as_usize()] = entry(eval::misc::mstore, G_VERYLOW, 2, -2);
	t[Opcode::MSTORE8.as_usize()] = entry(eval::misc::mstore8, G_VERYLOW, 2, -2);
	t[Opcode::SLOAD.as_usize()] = entry(eval::system::sload, 50, 1, 0);
	t[Opcode::SSTORE.as_usize()] = entry(eval::system::sstore, G_ZERO, 2, -2);
	t[Opcode::JUMP.as_usize()] = entry(eval::misc::jump, G_MID, 1, -1);
	t[Opcode::JUMPI.as_usize()] = entry(eval::misc::jumpi, G_HIGH, 2, -2);
	t[Opcode::PC.as_usize()] = entry(eval::misc::pc, G_BASE, 0, 1);
	t[Opcode::MSIZE.as_usize()] = entry(eval::misc::msize, G_BASE, 0, 1);
	t[Opcode::GAS.as_usize()] = entry(eval::system::gas, G_BASE, 0, 1);
	t[Opcode::JUMPDEST.as_usize()] = entry(eval::begin_block, G_JUMPDEST, 0, 0);

	let mut i = Opcode::PUSH1.as_usize();
	while i <= Opcode::PUSH8.as_usize() {
		t[i] = entry(eval::misc::push_small, G_VERYLOW, 0, 1);
		i += 1;
	}
	while i <= Opcode::PUSH32.as_usize() {
		t[i] = entry(eval::misc::push_full, G_VERYLOW, 0, 1);
		i += 1;
	}

	t[Opcode::DUP1.as_usize()] = entry(eval::misc::dup::<1>, G_VERYLOW, 1, 1);
	t[Opcode::DUP1.as_usize() + 1] = entry(eval::misc::dup::<2>, G_VERYLOW, 2, 1);
	t[Opcode::DUP1.as_usize() + 2] = entry(eval::misc::dup::<3>, G_VERYLOW, 3, 1);
	t[Opcode::DUP1.as_usize() + 3] = entry(eval::misc::dup::<4>, G_VERYLOW, 4, 1);
	t[Opcode::DUP1.as_usize() + 4] = entry(eval::misc::dup::<5>, G_VERYLOW, 5, 1);
	t[Opcode::DUP1.as_usize() + 5] = entry(eval::misc::dup::<6>, G_VERYLOW, 6, 1);
	t[Opcode::DUP1.as_usize() + 6] = entry(eval::misc::dup::<7>, G_VERYLOW, 7, 1);
	t[Opcode::DUP1.as_usize() + 7] = entry(eval::misc::dup::<8>, G_VERYLOW, 8, 1);
	t[Opcode::DUP1.as_usize() + 8] = entry(eval::misc::dup::<9>, G_VERYLOW, 9, 1);
	t[Opcode::DUP1.as_usize() + 9] = entry(eval::misc::dup::<10>, G_VERYLOW, 10, 1);
	t[Opcode::DUP1.as_usize() + 10] = entry(eval::misc::dup::<11>, G_VERYLOW, 11, 1);
	t[Opcode::DUP1.as_usize() + 11] = entry(eval::misc::dup::<12>, G_VERYLOW, 12, 1);
	t[Opcode::DUP1.as_usize() + 12] = entry(eval::misc::dup::<13>, G_VERYLOW, 13, 1);
	t[Opcode::DUP1.as_usize() + 13] = entry(eval::misc::dup::<14>, G_VERYLOW, 14, 1);
	t[Opcode::DUP1.as_usize() + 14] = entry(eval::misc::dup::<15>, G_VERYLOW, 15, 1);
	t[Opcode::DUP16.as_usize()] = entry(eval::misc::dup::<16>, G_VERYLOW, 16, 1);

	t[Opcode::SWAP1.as_usize()] = entry(eval::misc::swap::<1>, G_VERYLOW, 2, 0);
	t[Opcode::SWAP1.as_usize() + 1] = entry(eval::misc::swap::<2>, G_VERYLOW, 3, 0);
	t[Opcode::SWAP1.as_usize() + 2] = entry(eval::misc::swap::<3>, G_VERYLOW, 4, 0);
	t[Opcode::SWAP1.as_usize() + 3] = entry(eval::misc::swap::<4>, G_VERYLOW, 5, 0);
	t[Opcode::SWAP1.as_usize() + 4] = entry(eval::misc::swap::<5>, G_VERYLOW, 6, 0);
	t[Opcode::SWAP1.as_usize() + 5] = entry(eval::misc::swap::<6>, G_VERYLOW, 7, 0);
	t[Opcode::SWAP1.as_usize() + 6] = entry(eval::misc::swap::<7>, G_VERYLOW, 8, 0);
	t[Opcode::SWAP1.as_usize() + 7] = entry(eval::misc::swap::<8>, G_VERYLOW, 9, 0);
	t[Opcode::SWAP1.as_usize() + 8] = entry(eval::misc::swap::<9>, G_VERYLOW, 10, 0);
	t[Opcode::SWAP1.as_usize() + 9] = entry(eval::misc::swap::<10>, G_VERYLOW, 11, 0);
	t[Opcode::SWAP1.as_usize() + 10] = entry(eval::misc::swap::<11>, G_VERYLOW, 12, 0);
	t[Opcode::SWAP1.as_usize() + 11] = entry(eval::misc::swap::<12>, G_VERYLOW, 13, 0);
	t[Opcode::SWAP1.as_usize() + 12] = entry(eval::misc::swap::<13>, G_VERYLOW, 14, 0);
	t[Opcode::SWAP1.as_usize() + 13] = entry(eval::misc::swap::<14>, G_VERYLOW, 15, 0);
	t[Opcode::SWAP1.as_usize() + 14] = entry(eval::misc::swap::<15>, G_VERYLOW, 16, 0);
	t[Opcode::SWAP16.as_usize()] = entry(eval::misc::swap::<16>, G_VERYLOW, 17, 0);

	t[Opcode::LOG0.as_usize()] = entry(eval::system::log::<0>, G_LOG, 2, -2);
	t[Opcode::LOG0.as_usize() + 1] = entry(eval::system::log::<1>, 2 * G_LOG, 3, -3);
	t[Opcode::LOG0.as_usize() + 2] = entry(eval::system::log::<2>, 3 * G_LOG, 4, -4);
	t[Opcode::LOG0.as_usize() + 3] = entry(eval::system::log::<3>, 4 * G_LOG, 5, -5);
	t[Opcode::LOG4.as_usize()] = entry(eval::system::log::<4>, 5 * G_LOG, 6, -6);

	t[Opcode::CREATE.as_usize()] = entry(eval::call::create, G_CREATE, 3, -2);
	t[Opcode::CALL.as_usize()] = entry(eval::call::call, 40, 7, -6);
	t[Opcode::CALLCODE.as_usize()] = entry(eval::call::call_code, 40, 7, -6);
	t[Opcode::RETURN.as_usize()] = entry(eval::misc::ret, G_ZERO, 2, -2);
	t[Opcode::INVALID.as_usize()] = entry(eval::invalid, G_ZERO, 0, 0);
	t[Opcode::SELFDESTRUCT.as_usize()] = entry(eval::system::selfdestruct, G_ZERO, 1, -1);

	t
}

const fn homestead() -> OpTable {
	let mut t = frontier();
	t[Opcode::DELEGATECALL.as_usize()] = entry(eval::call::delegate_call, 40, 6, -5);
	t
}

const fn tangerine_whistle() -> OpTable {
	let mut t = homestead();
	t[Opcode::BALANCE.as_usize()].gas_cost = 400;
	t[Opcode::EXTCODESIZE.as_usize()].gas_cost = 700;
	t[Opcode::EXTCODECOPY.as_usize()].gas_cost = 700;
	t[Opcode::SLOAD.as_usize()].gas_cost = 200;
	t[Opcode::CALL.as_usize()].gas_cost = 700;
	t[Opcode::CALLCODE.as_usize()].gas_cost = 700;
	t[Opcode::DELEGATECALL.as_usize()].gas_cost = 700;
	t[Opcode::SELFDESTRUCT.as_usize()].gas_cost = G_SELFDESTRUCT;
	t
}

const fn spurious_dragon() -> OpTable {
	// EIP-160 only reprices the dynamic EXP byte fee.
	tangerine_whistle()
}

const fn byzantium() -> OpTable {
	let mut t = spurious_dragon();
	t[Opcode::RETURNDATASIZE.as_usize()] = entry(eval::misc::returndatasize, G_BASE, 0, 1);
	t[Opcode::RETURNDATACOPY.as_usize()] = entry(eval::misc::returndatacopy, G_VERYLOW, 3, -3);
	t[Opcode::STATICCALL.as_usize()] = entry(eval::call::static_call, 700, 6, -5);
	t[Opcode::REVERT.as_usize()] = entry(eval::misc::revert, G_ZERO, 2, -2);
	t
}

const fn constantinople() -> OpTable {
	let mut t = byzantium();
	t[Opcode::SHL.as_usize()] = entry(eval::shl, G_VERYLOW, 2, -1);
	t[Opcode::SHR.as_usize()] = entry(eval::shr, G_VERYLOW, 2, -1);
	t[Opcode::SAR.as_usize()] = entry(eval::sar, G_VERYLOW, 2, -1);
	t[Opcode::EXTCODEHASH.as_usize()] = entry(eval::system::extcodehash, 400, 1, 0);
	t[Opcode::CREATE2.as_usize()] = entry(eval::call::create2, G_CREATE, 4, -3);
	t
}

const fn petersburg() -> OpTable {
	// EIP-1283 removal changes only the SSTORE dynamic schedule.
	constantinople()
}

const fn istanbul() -> OpTable {
	let mut t = petersburg();
	t[Opcode::BALANCE.as_usize()].gas_cost = 700;
	t[Opcode::EXTCODEHASH.as_usize()].gas_cost = 700;
	t[Opcode::SLOAD.as_usize()].gas_cost = 800;
	t[Opcode::CHAINID.as_usize()] = entry(eval::system::chainid, G_BASE, 0, 1);
	t[Opcode::SELFBALANCE.as_usize()] = entry(eval::system::selfbalance, G_LOW, 0, 1);
	t
}

const fn berlin() -> OpTable {
	// EIP-2929: the scheduled cost is the warm one; handlers charge the
	// cold surcharge.
	let mut t = istanbul();
	let warm = WARM_STORAGE_READ_COST as u16;
	t[Opcode::BALANCE.as_usize()].gas_cost = warm;
	t[Opcode::EXTCODESIZE.as_usize()].gas_cost = warm;
	t[Opcode::EXTCODECOPY.as_usize()].gas_cost = warm;
	t[Opcode::EXTCODEHASH.as_usize()].gas_cost = warm;
	t[Opcode::SLOAD.as_usize()].gas_cost = warm;
	t[Opcode::CALL.as_usize()].gas_cost = warm;
	t[Opcode::CALLCODE.as_usize()].gas_cost = warm;
	t[Opcode::DELEGATECALL.as_usize()].gas_cost = warm;
	t[Opcode::STATICCALL.as_usize()].gas_cost = warm;
	t
}

const fn london() -> OpTable {
	let mut t = berlin();
	t[Opcode::BASEFEE.as_usize()] = entry(eval::system::basefee, G_BASE, 0, 1);
	t
}

const fn paris() -> OpTable {
	// PREVRANDAO reuses the DIFFICULTY slot; the host serves the beacon.
	london()
}

const fn shanghai() -> OpTable {
	let mut t = paris();
	t[Opcode::PUSH0.as_usize()] = entry(eval::misc::push0, G_BASE, 0, 1);
	t
}

const fn cancun() -> OpTable {
	let mut t = shanghai();
	t[Opcode::TLOAD.as_usize()] = entry(eval::system::tload, WARM_STORAGE_READ_COST as u16, 1, 0);
	t[Opcode::TSTORE.as_usize()] =
		entry(eval::system::tstore, WARM_STORAGE_READ_COST as u16, 2, -2);
	t[Opcode::MCOPY.as_usize()] = entry(eval::misc::mcopy, G_VERYLOW, 3, -3);
	t[Opcode::BLOBHASH.as_usize()] = entry(eval::system::blobhash, G_VERYLOW, 1, 0);
	t[Opcode::BLOBBASEFEE.as_usize()] = entry(eval::system::blobbasefee, G_BASE, 0, 1);
	t
}

const fn prague() -> OpTable {
	cancun()
}

static TABLES: [OpTable; Revision::COUNT] = [
	frontier(),
	homestead(),
	tangerine_whistle(),
	spurious_dragon(),
	byzantium(),
	constantinople(),
	petersburg(),
	istanbul(),
	berlin(),
	london(),
	paris(),
	shanghai(),
	cancun(),
	prague(),
];

/// The opcode table of a revision.
#[must_use]
pub fn op_table(revision: Revision) -> &'static OpTable {
	&TABLES[revision as usize]
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn availability_by_revision() {
		// Repriced opcodes keep their handler but change cost.
		assert_eq!(op_table(Revision::Frontier)[Opcode::SLOAD.as_usize()].gas_cost, 50);
		assert_eq!(
			op_table(Revision::TangerineWhistle)[Opcode::SLOAD.as_usize()].gas_cost,
			200
		);
		assert_eq!(op_table(Revision::Istanbul)[Opcode::SLOAD.as_usize()].gas_cost, 800);
		assert_eq!(op_table(Revision::Berlin)[Opcode::SLOAD.as_usize()].gas_cost, 100);

		// Late opcodes are undefined before their fork: undefined entries
		// carry a zero schedule.
		let shl_byzantium = &op_table(Revision::Byzantium)[Opcode::SHL.as_usize()];
		assert_eq!(shl_byzantium.gas_cost, 0);
		assert_eq!(shl_byzantium.stack_req, 0);
		let shl = &op_table(Revision::Constantinople)[Opcode::SHL.as_usize()];
		assert_eq!(shl.gas_cost, 3);
		assert_eq!(shl.stack_req, 2);

		assert_eq!(op_table(Revision::Paris)[Opcode::PUSH0.as_usize()].gas_cost, 0);
		assert_eq!(op_table(Revision::Shanghai)[Opcode::PUSH0.as_usize()].gas_cost, 2);
		assert_eq!(op_table(Revision::Cancun)[Opcode::MCOPY.as_usize()].gas_cost, 3);
	}

	#[test]
	fn call_and_log_schedule() {
		assert_eq!(op_table(Revision::Frontier)[Opcode::CALL.as_usize()].gas_cost, 40);
		assert_eq!(op_table(Revision::London)[Opcode::CALL.as_usize()].gas_cost, 100);
		assert_eq!(op_table(Revision::London)[Opcode::CALL.as_usize()].stack_req, 7);
		assert_eq!(op_table(Revision::London)[Opcode::LOG4.as_usize()].gas_cost, 1875);
	}
}
