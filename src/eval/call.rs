//! The frame manager: `CALL`-family and `CREATE`-family handlers. They
//! build a sub-message, hand it to the host for recursive execution, and
//! splice the result back into the calling frame.

use alloc::vec::Vec;
use core::cmp::min;

use primitive_types::{H160, H256, U256};

use crate::analysis::Instruction;
use crate::call_create::CallScheme;
use crate::consts::*;
use crate::costs;
use crate::error::{ExitException, StatusCode};
use crate::eval::system::charge_cold_account;
use crate::eval::Control;
use crate::machine::ExecutionState;
use crate::revision::Revision;
use crate::runtime::{Message, MessageKind};
use crate::tracing::Event;
use crate::utils::{h256_to_u256, u256_to_h160, u256_to_h256};

pub fn call(instr: &Instruction, state: &mut ExecutionState) -> Control {
	call_family(instr, state, CallScheme::Call)
}

pub fn call_code(instr: &Instruction, state: &mut ExecutionState) -> Control {
	call_family(instr, state, CallScheme::CallCode)
}

pub fn delegate_call(instr: &Instruction, state: &mut ExecutionState) -> Control {
	call_family(instr, state, CallScheme::DelegateCall)
}

pub fn static_call(instr: &Instruction, state: &mut ExecutionState) -> Control {
	call_family(instr, state, CallScheme::StaticCall)
}

pub fn create(instr: &Instruction, state: &mut ExecutionState) -> Control {
	create_family(instr, state, false)
}

pub fn create2(instr: &Instruction, state: &mut ExecutionState) -> Control {
	create_family(instr, state, true)
}

fn call_family(instr: &Instruction, state: &mut ExecutionState, scheme: CallScheme) -> Control {
	pop_u256!(state, gas_limit, target);
	let target = u256_to_h160(target);
	let value = if scheme.has_value_argument() {
		state.stack.pop()
	} else {
		U256::zero()
	};
	let has_value = !value.is_zero();
	pop_u256!(state, input_offset, input_len, output_offset, output_len);

	try_or_exit!(charge_cold_account(state, target));

	if scheme == CallScheme::Call && has_value && state.message.is_static {
		return Control::Exit(ExitException::StaticModeViolation.into());
	}

	try_or_exit!(state.resize_memory(input_offset, input_len));
	try_or_exit!(state.resize_memory(output_offset, output_len));

	// Surcharges on top of the scheduled base cost.
	let mut cost = 0u64;
	if has_value {
		cost += G_CALLVALUE;
	}
	if scheme == CallScheme::Call {
		// EIP-161 narrows the new-account surcharge to value transfers.
		let charge_new_account = if state.revision >= Revision::SpuriousDragon {
			has_value && !state.host.account_exists(target)
		} else {
			!state.host.account_exists(target)
		};
		if charge_new_account {
			cost += G_NEWACCOUNT;
		}
	}
	try_or_exit!(state.charge(cost));

	let input_data = if input_len.is_zero() {
		Vec::new()
	} else {
		let input_offset = as_usize_or_fail!(input_offset);
		let input_len = as_usize_or_fail!(input_len);
		state.memory.get(input_offset, input_len)
	};

	state.retbuf = Vec::new();

	let gas_left = state.corrected_gas_left(instr.arg.number());
	let requested = if gas_limit > U256::from(i64::MAX) {
		i64::MAX
	} else {
		gas_limit.low_u64() as i64
	};
	let forwarded = if state.revision >= Revision::TangerineWhistle {
		min(requested, costs::max_call_gas(gas_left))
	} else if requested > gas_left {
		return Control::Exit(ExitException::OutOfGas.into());
	} else {
		requested
	};
	state.gas_left -= forwarded;

	let mut callee_gas = forwarded;
	if has_value {
		callee_gas += G_CALLSTIPEND as i64;
	}

	// A too-deep call or an unfunded value transfer is not a frame
	// failure: the caller sees 0 and keeps the gas it would have
	// forwarded, stipend included.
	if state.message.depth >= CALL_DEPTH_LIMIT
		|| (has_value && state.host.balance(state.message.recipient) < value)
	{
		state.gas_left += callee_gas;
		push_u256!(state, U256::zero());
		return Control::Continue;
	}

	let (recipient, sender, msg_value) = match scheme {
		CallScheme::Call => (target, state.message.recipient, value),
		CallScheme::CallCode => (state.message.recipient, state.message.recipient, value),
		CallScheme::DelegateCall => (
			state.message.recipient,
			state.message.sender,
			state.message.value,
		),
		CallScheme::StaticCall => (target, state.message.recipient, U256::zero()),
	};

	let msg = Message {
		kind: scheme.into(),
		is_static: state.message.is_static || scheme == CallScheme::StaticCall,
		depth: state.message.depth + 1,
		gas: callee_gas,
		recipient,
		sender,
		input_data,
		value: msg_value,
		code_address: target,
		create2_salt: H256::default(),
	};

	Event::Call {
		scheme,
		code_address: target,
		input: &msg.input_data,
		gas: callee_gas,
		value: msg_value,
		is_static: msg.is_static,
	}
	.emit();

	let result = state.host.call(msg);

	if !output_len.is_zero() && !result.output_data.is_empty() {
		let output_offset = as_usize_or_fail!(output_offset);
		let output_len = as_usize_or_fail!(output_len);
		let copy_len = min(output_len, result.output_data.len());
		state
			.memory
			.set(output_offset, &result.output_data[..copy_len], None);
	}

	state.gas_left += result.gas_left;
	let succeeded = result.status_code == StatusCode::Success;
	if succeeded {
		state.gas_refund += result.gas_refund;
	}
	state.retbuf = result.output_data;

	push_u256!(
		state,
		if succeeded { U256::one() } else { U256::zero() }
	);
	Control::Continue
}

fn create_family(instr: &Instruction, state: &mut ExecutionState, is_create2: bool) -> Control {
	if state.message.is_static {
		return Control::Exit(ExitException::StaticModeViolation.into());
	}

	pop_u256!(state, value, code_offset, code_len);
	let salt = if is_create2 {
		u256_to_h256(state.stack.pop())
	} else {
		H256::default()
	};

	try_or_exit!(state.resize_memory(code_offset, code_len));
	let code_len_usize = if code_len.is_zero() {
		0
	} else {
		as_usize_or_fail!(code_len)
	};

	if state.revision >= Revision::Shanghai {
		// EIP-3860: oversized initcode is a hard failure.
		if code_len_usize > MAX_INITCODE_SIZE {
			return Control::Exit(ExitException::OutOfGas.into());
		}
		try_or_exit!(state.charge(costs::initcode_cost(code_len_usize)));
	}
	if is_create2 {
		try_or_exit!(state.charge(costs::sha3_word_cost(code_len_usize)));
	}

	let init_code = if code_len_usize == 0 {
		Vec::new()
	} else {
		let code_offset = as_usize_or_fail!(code_offset);
		state.memory.get(code_offset, code_len_usize)
	};

	state.retbuf = Vec::new();

	if state.message.depth >= CALL_DEPTH_LIMIT
		|| (!value.is_zero() && state.host.balance(state.message.recipient) < value)
	{
		push_u256!(state, U256::zero());
		return Control::Continue;
	}

	let gas_left = state.corrected_gas_left(instr.arg.number());
	let forwarded = if state.revision >= Revision::TangerineWhistle {
		costs::max_call_gas(gas_left)
	} else {
		gas_left
	};
	state.gas_left -= forwarded;

	let msg = Message {
		kind: if is_create2 {
			MessageKind::Create2
		} else {
			MessageKind::Create
		},
		is_static: false,
		depth: state.message.depth + 1,
		gas: forwarded,
		recipient: H160::default(),
		sender: state.message.recipient,
		input_data: init_code,
		value,
		code_address: H160::default(),
		create2_salt: salt,
	};

	Event::Create {
		caller: state.message.recipient,
		value,
		init_code: &msg.input_data,
		gas: forwarded,
		salt: is_create2.then_some(salt),
	}
	.emit();

	let result = state.host.call(msg);

	state.gas_left += result.gas_left;
	if result.status_code == StatusCode::Success {
		state.gas_refund += result.gas_refund;
		let address = result.create_address.unwrap_or_default();
		push_u256!(state, h256_to_u256(address.into()));
	} else {
		// The return buffer observes create output only for reverts
		// (EIP-211).
		if result.status_code == StatusCode::Revert {
			state.retbuf = result.output_data;
		}
		push_u256!(state, U256::zero());
	}

	Control::Continue
}
