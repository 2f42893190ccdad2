use alloc::vec;
use alloc::vec::Vec;

use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use crate::analysis::Instruction;
use crate::consts::*;
use crate::costs;
use crate::error::{ExitException, ExitSucceed};
use crate::eval::Control;
use crate::machine::ExecutionState;
use crate::revision::Revision;
use crate::runtime::{AccessStatus, Log};
use crate::tracing::Event;
use crate::utils::{h256_to_u256, u256_to_h160, u256_to_h256};

/// Charge the EIP-2929 cold-account surcharge on top of the warm base cost
/// already covered by the block.
pub(crate) fn charge_cold_account(
	state: &mut ExecutionState,
	address: H160,
) -> Result<(), ExitException> {
	if state.revision >= Revision::Berlin
		&& state.host.access_account(address) == AccessStatus::Cold
	{
		state.charge(COLD_ACCOUNT_ACCESS_COST - WARM_STORAGE_READ_COST)?;
	}
	Ok(())
}

pub fn sha3(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, from, len);

	try_or_exit!(state.resize_memory(from, len));
	let data = if len.is_zero() {
		Vec::new()
	} else {
		let from = as_usize_or_fail!(from);
		let len = as_usize_or_fail!(len);
		try_or_exit!(state.charge(costs::sha3_word_cost(len)));

		state.memory.get(from, len)
	};

	let ret = Keccak256::digest(data.as_slice());
	push_u256!(state, U256::from_big_endian(ret.as_slice()));

	Control::Continue
}

pub fn address(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = h256_to_u256(state.message.recipient.into());
	push_u256!(state, ret);
	Control::Continue
}

pub fn balance(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, target);
	let target = u256_to_h160(target);
	try_or_exit!(charge_cold_account(state, target));
	let value = state.host.balance(target);
	push_u256!(state, value);
	Control::Continue
}

pub fn selfbalance(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let value = state.host.balance(state.message.recipient);
	push_u256!(state, value);
	Control::Continue
}

pub fn origin(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = h256_to_u256(state.host.tx_context().origin.into());
	push_u256!(state, ret);
	Control::Continue
}

pub fn caller(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = h256_to_u256(state.message.sender.into());
	push_u256!(state, ret);
	Control::Continue
}

pub fn callvalue(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	push_u256!(state, state.message.value);
	Control::Continue
}

pub fn gasprice(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = state.host.tx_context().gas_price;
	push_u256!(state, ret);
	Control::Continue
}

pub fn extcodesize(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, target);
	let target = u256_to_h160(target);
	try_or_exit!(charge_cold_account(state, target));
	let size = state.host.code_size(target);
	push_u256!(state, U256::from(size));
	Control::Continue
}

pub fn extcodehash(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, target);
	let target = u256_to_h160(target);
	try_or_exit!(charge_cold_account(state, target));
	let hash = h256_to_u256(state.host.code_hash(target));
	push_u256!(state, hash);
	Control::Continue
}

pub fn extcodecopy(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, target, memory_offset, code_offset, len);
	let target = u256_to_h160(target);

	try_or_exit!(charge_cold_account(state, target));
	try_or_exit!(state.resize_memory(memory_offset, len));
	if len.is_zero() {
		return Control::Continue;
	}
	let len = as_usize_or_fail!(len);
	try_or_exit!(state.charge(costs::copy_cost(len)));

	let code_offset = crate::utils::u256_to_usize(code_offset).unwrap_or(usize::MAX);
	let mut buffer = vec![0u8; len];
	state.host.copy_code(target, code_offset, &mut buffer);

	let memory_offset = as_usize_or_fail!(memory_offset);
	state.memory.set(memory_offset, &buffer, Some(len));
	Control::Continue
}

pub fn blockhash(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, number);

	let hash = if number > U256::from(u64::MAX) {
		H256::default()
	} else {
		state.host.block_hash(number.as_u64())
	};
	push_u256!(state, h256_to_u256(hash));
	Control::Continue
}

pub fn coinbase(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = h256_to_u256(state.host.tx_context().coinbase.into());
	push_u256!(state, ret);
	Control::Continue
}

pub fn timestamp(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = U256::from(state.host.tx_context().block_timestamp);
	push_u256!(state, ret);
	Control::Continue
}

pub fn number(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = U256::from(state.host.tx_context().block_number);
	push_u256!(state, ret);
	Control::Continue
}

/// Reports the randomness beacon from Paris onwards, the block difficulty
/// before; the host serves both through the same context field.
pub fn prevrandao(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = h256_to_u256(state.host.tx_context().prev_randao);
	push_u256!(state, ret);
	Control::Continue
}

pub fn gaslimit(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = U256::from(state.host.tx_context().block_gas_limit);
	push_u256!(state, ret);
	Control::Continue
}

pub fn chainid(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = state.host.tx_context().chain_id;
	push_u256!(state, ret);
	Control::Continue
}

pub fn basefee(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = state.host.tx_context().base_fee;
	push_u256!(state, ret);
	Control::Continue
}

pub fn blobbasefee(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	let ret = state.host.tx_context().blob_base_fee;
	push_u256!(state, ret);
	Control::Continue
}

pub fn blobhash(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, index);

	let context = state.host.tx_context();
	let hash = if index < U256::from(context.blob_hashes.len()) {
		h256_to_u256(context.blob_hashes[index.as_usize()])
	} else {
		U256::zero()
	};
	push_u256!(state, hash);
	Control::Continue
}

pub fn sload(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, key);
	let key = u256_to_h256(key);
	let address = state.message.recipient;

	if state.revision >= Revision::Berlin
		&& state.host.access_storage(address, key) == AccessStatus::Cold
	{
		try_or_exit!(state.charge(COLD_SLOAD_COST));
	}

	let value = h256_to_u256(state.host.storage(address, key));
	push_u256!(state, value);
	Control::Continue
}

pub fn sstore(instr: &Instruction, state: &mut ExecutionState) -> Control {
	if state.message.is_static {
		return Control::Exit(ExitException::StaticModeViolation.into());
	}

	// EIP-2200: fail unless more than the call stipend remains.
	if state.revision >= Revision::Istanbul
		&& state.corrected_gas_left(instr.arg.number()) <= G_CALLSTIPEND as i64
	{
		return Control::Exit(ExitException::OutOfGas.into());
	}

	pop_u256!(state, key, value);
	let key = u256_to_h256(key);
	let value = u256_to_h256(value);
	let address = state.message.recipient;

	if state.revision >= Revision::Berlin
		&& state.host.access_storage(address, key) == AccessStatus::Cold
	{
		try_or_exit!(state.charge(COLD_SLOAD_COST));
	}

	let status = state.host.set_storage(address, key, value);
	let (cost, refund) = costs::sstore_cost_refund(status, state.revision);
	try_or_exit!(state.charge(cost));
	state.gas_refund += refund;

	Control::Continue
}

pub fn tload(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	pop_u256!(state, key);
	let key = u256_to_h256(key);
	let value = h256_to_u256(
		state
			.host
			.transient_storage(state.message.recipient, key),
	);
	push_u256!(state, value);
	Control::Continue
}

pub fn tstore(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	if state.message.is_static {
		return Control::Exit(ExitException::StaticModeViolation.into());
	}

	pop_u256!(state, key, value);
	let key = u256_to_h256(key);
	let value = u256_to_h256(value);
	state
		.host
		.set_transient_storage(state.message.recipient, key, value);
	Control::Continue
}

pub fn gas(instr: &Instruction, state: &mut ExecutionState) -> Control {
	let gas_left = state.corrected_gas_left(instr.arg.number());
	push_u256!(state, U256::from(gas_left));
	Control::Continue
}

pub fn log<const N: usize>(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	if state.message.is_static {
		return Control::Exit(ExitException::StaticModeViolation.into());
	}

	pop_u256!(state, offset, len);

	try_or_exit!(state.resize_memory(offset, len));
	let data = if len.is_zero() {
		Vec::new()
	} else {
		let offset = as_usize_or_fail!(offset);
		let len = as_usize_or_fail!(len);
		try_or_exit!(state.charge(costs::log_data_cost(len)));

		state.memory.get(offset, len)
	};

	let mut topics = Vec::with_capacity(N);
	for _ in 0..N {
		topics.push(u256_to_h256(state.stack.pop()));
	}

	state.host.emit_log(Log {
		address: state.message.recipient,
		topics,
		data,
	});
	Control::Continue
}

pub fn selfdestruct(_instr: &Instruction, state: &mut ExecutionState) -> Control {
	if state.message.is_static {
		return Control::Exit(ExitException::StaticModeViolation.into());
	}

	pop_u256!(state, beneficiary);
	let beneficiary = u256_to_h160(beneficiary);
	let address = state.message.recipient;

	if state.revision >= Revision::Berlin
		&& state.host.access_account(beneficiary) == AccessStatus::Cold
	{
		try_or_exit!(state.charge(COLD_ACCOUNT_ACCESS_COST));
	}

	// Surcharge for conjuring the beneficiary into existence.
	if state.revision >= Revision::TangerineWhistle {
		let charge_new_account = if state.revision >= Revision::SpuriousDragon {
			!state.host.balance(address).is_zero() && !state.host.account_exists(beneficiary)
		} else {
			!state.host.account_exists(beneficiary)
		};
		if charge_new_account {
			try_or_exit!(state.charge(G_NEWACCOUNT));
		}
	}

	let balance = state.host.balance(address);
	Event::SelfDestruct {
		address,
		beneficiary,
		balance,
	}
	.emit();

	if state.host.selfdestruct(address, beneficiary) && state.revision < Revision::London {
		state.gas_refund += R_SELFDESTRUCT;
	}

	Control::Exit(ExitSucceed::SelfDestructed.into())
}
