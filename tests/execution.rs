mod common;

use common::{call_message, MockHost};
use evm_advanced::call_create::{initcode_hash, CreateScheme};
use evm_advanced::{execute, Host, MessageKind, Revision, StatusCode};
use primitive_types::{H160, H256, U256};

fn run(
	host: &mut MockHost,
	code: &[u8],
	gas: i64,
) -> evm_advanced::ExecutionResult {
	let recipient = H160::from_low_u64_be(0xaaaa);
	let msg = call_message(recipient, gas);
	let revision = host.revision;
	execute(host, revision, &msg, code)
}

fn word(value: u64) -> Vec<u8> {
	let mut out = [0u8; 32];
	U256::from(value).to_big_endian(&mut out);
	out.to_vec()
}

#[test]
fn addition_returns_five() {
	// PUSH1 3; PUSH1 2; ADD; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
	let code = hex::decode("600360020160005260206000f3").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, word(5));
	// 7 static instructions at 3 gas, plus one word of memory expansion.
	assert_eq!(100_000 - result.gas_left, 24);
}

#[test]
fn jump_past_code_end_is_bad_jumpdest() {
	// PUSH1 8; JUMP; JUMPDEST; STOP -- offset 8 is past the end.
	let code = hex::decode("6008565b00").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100);
	assert_eq!(result.status_code, StatusCode::BadJumpDestination);
	assert_eq!(result.gas_left, 0);
	assert_eq!(result.output_data, Vec::<u8>::new());
}

#[test]
fn jump_to_jumpdest() {
	// PUSH1 4; JUMP; STOP; JUMPDEST; STOP
	let code = hex::decode("600456005b00").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100);
	assert_eq!(result.status_code, StatusCode::Success);
	// PUSH1 3 + JUMP 8 + JUMPDEST 1.
	assert_eq!(100 - result.gas_left, 12);
}

#[test]
fn jump_into_push_immediate_is_bad_jumpdest() {
	// PUSH1 4; JUMP; PUSH2 0x5b00 -- the 0x5b at offset 4 is an
	// immediate, not a JUMPDEST.
	let code = hex::decode("600456615b00").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100);
	assert_eq!(result.status_code, StatusCode::BadJumpDestination);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn huge_mstore_offset_is_out_of_gas() {
	// PUSH1 0; PUSH4 0xFFFFFFFF; MSTORE -- the expansion to
	// 0x100000020 bytes prices far beyond the gas limit.
	let code = hex::decode("600063ffffffff5200").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 1_000_000);
	assert_eq!(result.status_code, StatusCode::OutOfGas);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn sstore_in_static_frame_fails() {
	// PUSH1 1; PUSH1 0; SSTORE; STOP
	let code = hex::decode("600160005500").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let recipient = H160::from_low_u64_be(0xaaaa);
	let mut msg = call_message(recipient, 100_000);
	msg.is_static = true;
	let result = execute(&mut host, Revision::Cancun, &msg, &code);

	assert_eq!(result.status_code, StatusCode::StaticModeViolation);
	assert_eq!(result.gas_left, 0);
	assert_eq!(host.storage(recipient, H256::default()), H256::default());
}

#[test]
fn staticcall_parent_sees_zero_flag() {
	let target = H160::from_low_u64_be(0xbbbb);
	let mut host = MockHost::new(Revision::Cancun);
	host.account_mut(target).code = hex::decode("600160005500").unwrap();

	// STATICCALL(gas=0xffff, target, 0, 0, 0, 0), then return the flag.
	let mut code = hex::decode("6000600060006000").unwrap();
	code.push(0x73);
	code.extend_from_slice(target.as_bytes());
	code.extend_from_slice(&hex::decode("61fffffa60005260206000f3").unwrap());

	let result = run(&mut host, &code, 200_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, word(0));
	// The child's write was never applied.
	assert_eq!(host.storage(target, H256::default()), H256::default());
}

#[test]
fn call_with_value_to_empty_account() {
	let caller = H160::from_low_u64_be(0xaaaa);
	let target = H160::from_low_u64_be(0xeeee);
	let mut host = MockHost::new(Revision::Berlin);
	host.account_mut(caller).balance = U256::from(10);

	// CALL(gas=0xffff, target, value=1, 0, 0, 0, 0); STOP
	let mut code = hex::decode("60006000600060006001").unwrap();
	code.push(0x73);
	code.extend_from_slice(target.as_bytes());
	code.extend_from_slice(&hex::decode("61fffff100").unwrap());

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);

	// Base block: 7 pushes + warm CALL = 121. Dynamic: cold account 2500,
	// value transfer 9000, new account 25000. The unused 2300 stipend
	// flows back uncharged.
	assert_eq!(100_000 - result.gas_left, 121 + 2500 + 9000 + 25000 - 2300);

	// The target became non-empty.
	assert!(host.balance(target) == U256::one());
	let submsg = host.recorded_messages.last().unwrap();
	assert_eq!(submsg.kind, MessageKind::Call);
	assert_eq!(submsg.value, U256::one());
	// Forwarded gas: 63/64 of what remained after charges, plus stipend.
	let after_charges = 100_000 - 121 - 2500 - 9000 - 25000;
	assert_eq!(submsg.gas, after_charges - after_charges / 64 + 2300);
}

#[test]
fn revert_preserves_gas_and_output() {
	// PUSH1 42; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; REVERT
	let code = hex::decode("602a60005260206000fd").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 10_000);
	assert_eq!(result.status_code, StatusCode::Revert);
	assert_eq!(result.output_data, word(42));
	assert_eq!(10_000 - result.gas_left, 15 + 3);
}

#[test]
fn returndata_round_trips_through_call() {
	let target = H160::from_low_u64_be(0xbbbb);
	let mut host = MockHost::new(Revision::Cancun);
	// PUSH4 0xdeadbeef; PUSH1 0; MSTORE; PUSH1 4; PUSH1 28; RETURN
	host.account_mut(target).code = hex::decode("63deadbeef6000526004601cf3").unwrap();

	// CALL, POP the flag, then copy the full return buffer out.
	let mut code = hex::decode("60006000600060006000").unwrap();
	code.push(0x73);
	code.extend_from_slice(target.as_bytes());
	code.extend_from_slice(&hex::decode("61fffff150").unwrap());
	// RETURNDATASIZE; PUSH1 0; PUSH1 0; RETURNDATACOPY;
	// RETURNDATASIZE; PUSH1 0; RETURN
	code.extend_from_slice(&hex::decode("3d600060003e3d6000f3").unwrap());

	let result = run(&mut host, &code, 200_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, hex::decode("deadbeef").unwrap());
}

#[test]
fn gas_opcode_reports_per_instruction_value() {
	// GAS; PUSH1 0; MSTORE; PUSH1 32; PUSH1 0; RETURN
	let code = hex::decode("5a60005260206000f3").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 1_000);
	assert_eq!(result.status_code, StatusCode::Success);
	// The whole block is prepaid, yet GAS must observe only its own cost
	// spent: 1000 - 2.
	assert_eq!(result.output_data, word(998));
	assert_eq!(result.gas_left, 1_000 - 14 - 3);
}

#[test]
fn sstore_clear_refunds() {
	let recipient = H160::from_low_u64_be(0xaaaa);
	let mut host = MockHost::new(Revision::London);
	host.account_mut(recipient)
		.storage
		.insert(H256::default(), H256::from_low_u64_be(5));

	// PUSH1 0; PUSH1 0; SSTORE; STOP
	let code = hex::decode("600060005500").unwrap();
	let result = run(&mut host, &code, 100_000);

	assert_eq!(result.status_code, StatusCode::Success);
	// Cold slot 2100 + reset 2900 on top of the two pushes.
	assert_eq!(100_000 - result.gas_left, 6 + 2100 + 2900);
	assert_eq!(result.gas_refund, 4800);
	assert_eq!(host.storage(recipient, H256::default()), H256::default());
}

#[test]
fn sstore_without_stipend_headroom_is_out_of_gas() {
	let mut host = MockHost::new(Revision::Istanbul);
	// PUSH1 1; PUSH1 0; SSTORE with gas that leaves exactly the stipend.
	let code = hex::decode("600160005500").unwrap();

	// Block base is 6; 2306 left leaves exactly 2300 at SSTORE.
	let result = run(&mut host, &code, 2_306);
	assert_eq!(result.status_code, StatusCode::OutOfGas);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn selfdestruct_moves_balance_and_refunds_before_london() {
	let recipient = H160::from_low_u64_be(0xaaaa);
	let beneficiary = H160::from_low_u64_be(0xbbbb);
	let mut host = MockHost::new(Revision::Istanbul);
	host.account_mut(recipient).balance = U256::from(7);
	host.account_mut(beneficiary).balance = U256::from(1);

	let mut code = vec![0x73];
	code.extend_from_slice(beneficiary.as_bytes());
	code.push(0xff);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(100_000 - result.gas_left, 3 + 5000);
	assert_eq!(result.gas_refund, 24_000);
	assert_eq!(host.balance(beneficiary), U256::from(8));
	assert_eq!(host.balance(recipient), U256::zero());
}

#[test]
fn create_deploys_code() {
	let creator = H160::from_low_u64_be(0xaaaa);
	let mut host = MockHost::new(Revision::Cancun);

	// Initcode: PUSH1 1; PUSH1 0; RETURN -- deploys the single byte 0x00.
	// PUSH5 initcode; PUSH1 0; MSTORE; CREATE(0, 27, 5), then return the
	// new address.
	let code = hex::decode("6460016000f36000526005601b6000f060005260206000f3").unwrap();

	let result = run(&mut host, &code, 1_000_000);
	assert_eq!(result.status_code, StatusCode::Success);

	let expected = CreateScheme::Legacy {
		caller: creator,
		nonce: U256::zero(),
	}
	.address();
	assert_eq!(result.output_data, {
		let mut out = [0u8; 32];
		out[12..].copy_from_slice(expected.as_bytes());
		out.to_vec()
	});
	assert_eq!(host.code(expected), vec![0x00]);
	assert_eq!(host.account_mut(creator).nonce, U256::one());
}

#[test]
fn create2_address_depends_on_salt() {
	let creator = H160::from_low_u64_be(0xaaaa);
	let mut host = MockHost::new(Revision::Cancun);

	// Same initcode as above, salt 0x07.
	let code = hex::decode("6460016000f360005260076005601b6000f560005260206000f3").unwrap();

	let result = run(&mut host, &code, 1_000_000);
	assert_eq!(result.status_code, StatusCode::Success);

	let init_code = hex::decode("60016000f3").unwrap();
	let expected = CreateScheme::Create2 {
		caller: creator,
		code_hash: initcode_hash(&init_code),
		salt: H256::from_low_u64_be(7),
	}
	.address();
	assert_eq!(&result.output_data[12..], expected.as_bytes());
	assert_eq!(host.code(expected), vec![0x00]);
}

#[test]
fn add_on_empty_stack_underflows() {
	let code = hex::decode("01").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100);
	assert_eq!(result.status_code, StatusCode::StackUnderflow);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn pushing_beyond_limit_overflows() {
	let code = [0x60u8, 0x01].repeat(1025);
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::StackOverflow);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn undefined_opcode_fails() {
	let code = hex::decode("0c").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100);
	assert_eq!(result.status_code, StatusCode::InvalidInstruction);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn invalid_opcode_consumes_all_gas() {
	let code = hex::decode("fe").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 12_345);
	assert_eq!(result.status_code, StatusCode::InvalidInstruction);
	assert_eq!(result.gas_left, 0);
}

#[test]
fn backward_jump_loop_accounts_per_block() {
	// PUSH1 2; JUMPDEST; PUSH1 1; SWAP1; SUB; DUP1; PUSH1 2; JUMPI; STOP
	// Counts down from 2; the loop body runs twice.
	let code = hex::decode("60025b600190038060025700").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 10_000);
	assert_eq!(result.status_code, StatusCode::Success);
	// Entry block 3, loop block (1+3+3+3+3+3+10) executed twice.
	assert_eq!(10_000 - result.gas_left, 3 + 2 * 26);
}

#[test]
fn deterministic_replay() {
	let code = hex::decode("60025b600190038060025700").unwrap();

	let mut host1 = MockHost::new(Revision::Cancun);
	let mut host2 = MockHost::new(Revision::Cancun);
	let first = run(&mut host1, &code, 10_000);
	let second = run(&mut host2, &code, 10_000);

	assert_eq!(first.status_code, second.status_code);
	assert_eq!(first.gas_left, second.gas_left);
	assert_eq!(first.output_data, second.output_data);
}

#[test]
fn transient_storage_round_trips() {
	// PUSH1 42; PUSH1 0; TSTORE; PUSH1 0; TLOAD; PUSH1 0; MSTORE;
	// PUSH1 32; PUSH1 0; RETURN
	let code = hex::decode("602a60005d60005c60005260206000f3").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, word(42));
}

#[test]
fn tstore_in_static_frame_fails() {
	let code = hex::decode("602a60005d00").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let recipient = H160::from_low_u64_be(0xaaaa);
	let mut msg = call_message(recipient, 100_000);
	msg.is_static = true;
	let result = execute(&mut host, Revision::Cancun, &msg, &code);
	assert_eq!(result.status_code, StatusCode::StaticModeViolation);
}

#[test]
fn mcopy_copies_within_memory() {
	// PUSH1 0x7f; PUSH1 0; MSTORE; MCOPY(dst=0x40, src=0, len=0x20);
	// return memory[0x40..0x60].
	let code = hex::decode("607f6000526020600060405e60206040f3").unwrap();
	let mut host = MockHost::new(Revision::Cancun);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, word(0x7f));
}

#[test]
fn sload_warms_the_slot() {
	// PUSH1 0; SLOAD; POP; PUSH1 0; SLOAD; POP; STOP
	let code = hex::decode("600054506000545000").unwrap();
	let mut host = MockHost::new(Revision::Berlin);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	// Base block 210, plus one cold-slot surcharge; the second SLOAD is
	// warm.
	assert_eq!(100_000 - result.gas_left, 210 + 2100);
}

#[test]
fn pre_berlin_charges_no_access_surcharge() {
	let code = hex::decode("600054506000545000").unwrap();
	let mut host = MockHost::new(Revision::Istanbul);

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	// Istanbul SLOAD is 800 flat.
	assert_eq!(100_000 - result.gas_left, 2 * (3 + 800 + 2));
}

#[test]
fn call_depth_limit_pushes_zero() {
	let recipient = H160::from_low_u64_be(0xaaaa);
	let mut host = MockHost::new(Revision::Cancun);

	// CALL(gas=0xffff, self, 0, ...), return the flag.
	let mut code = hex::decode("6000600060006000600073").unwrap();
	code.extend_from_slice(recipient.as_bytes());
	code.extend_from_slice(&hex::decode("61fffff160005260206000f3").unwrap());

	let mut msg = call_message(recipient, 100_000);
	msg.depth = 1024;
	let result = execute(&mut host, Revision::Cancun, &msg, &code);

	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, word(0));
	assert!(host.recorded_messages.is_empty());
}

#[test]
fn unfunded_value_call_pushes_zero() {
	let recipient = H160::from_low_u64_be(0xaaaa);
	let target = H160::from_low_u64_be(0xbbbb);
	let mut host = MockHost::new(Revision::Cancun);

	// CALL with value 5 from a penniless caller.
	let mut code = hex::decode("60006000600060006005").unwrap();
	code.push(0x73);
	code.extend_from_slice(target.as_bytes());
	code.extend_from_slice(&hex::decode("61fffff160005260206000f3").unwrap());

	let result = run(&mut host, &code, 100_000);
	assert_eq!(result.status_code, StatusCode::Success);
	assert_eq!(result.output_data, word(0));
	assert!(host.recorded_messages.is_empty());
	assert_eq!(host.balance(recipient), U256::zero());
}

#[test]
fn delegatecall_keeps_caller_context() {
	let recipient = H160::from_low_u64_be(0xaaaa);
	let library = H160::from_low_u64_be(0xbbbb);
	let mut host = MockHost::new(Revision::Cancun);
	// The library stores CALLER at slot 0.
	host.account_mut(library).code = hex::decode("3360005500").unwrap();

	// DELEGATECALL(gas=0xffff, library, 0, 0, 0, 0); STOP
	let mut code = hex::decode("6000600060006000").unwrap();
	code.push(0x73);
	code.extend_from_slice(library.as_bytes());
	code.extend_from_slice(&hex::decode("61fffff400").unwrap());

	let msg = call_message(recipient, 200_000);
	let sender = msg.sender;
	let result = execute(&mut host, Revision::Cancun, &msg, &code);
	assert_eq!(result.status_code, StatusCode::Success);

	// The write happened in the caller's storage, attributed to the
	// caller's own caller.
	let stored = host.storage(recipient, H256::default());
	assert_eq!(H160::from(stored), sender);
	assert_eq!(host.storage(library, H256::default()), H256::default());

	let submsg = host.recorded_messages.last().unwrap();
	assert_eq!(submsg.kind, MessageKind::DelegateCall);
	assert_eq!(submsg.recipient, recipient);
	assert_eq!(submsg.sender, sender);
	assert_eq!(submsg.code_address, library);
}
