//! The host boundary: everything the engine observes or mutates outside of
//! its own frame goes through the [Host] trait.

use alloc::vec::Vec;

use primitive_types::{H160, H256, U256};

use crate::error::StatusCode;

/// Kind of a call-like message.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MessageKind {
	/// `CALL`, also the kind of a top-level transaction message.
	Call,
	/// `CALLCODE`
	CallCode,
	/// `DELEGATECALL`
	DelegateCall,
	/// `STATICCALL`
	StaticCall,
	/// `CREATE`
	Create,
	/// `CREATE2`
	Create2,
}

impl MessageKind {
	/// Whether the message creates a new contract.
	#[must_use]
	pub const fn is_create(&self) -> bool {
		matches!(self, Self::Create | Self::Create2)
	}
}

/// A message describing one call frame.
#[derive(Clone, Debug)]
pub struct Message {
	/// Message kind.
	pub kind: MessageKind,
	/// Whether the frame runs in static mode.
	pub is_static: bool,
	/// Call depth, `0` for the transaction-level frame.
	pub depth: u32,
	/// Gas available to the frame.
	pub gas: i64,
	/// Account whose storage and balance the frame operates on.
	pub recipient: H160,
	/// Caller of the frame.
	pub sender: H160,
	/// Call data, or initcode for create kinds.
	pub input_data: Vec<u8>,
	/// Apparent value of the frame.
	pub value: U256,
	/// Account whose code is executed. Differs from `recipient` for
	/// `CALLCODE` and `DELEGATECALL`.
	pub code_address: H160,
	/// Salt of a `CREATE2` message, zero otherwise.
	pub create2_salt: H256,
}

/// Transaction and block context, as reported by the host.
#[derive(Clone, Debug, Default)]
pub struct TxContext {
	/// Transaction origin.
	pub origin: H160,
	/// Effective gas price of the transaction.
	pub gas_price: U256,
	/// Block beneficiary.
	pub coinbase: H160,
	/// Block number.
	pub block_number: u64,
	/// Block timestamp.
	pub block_timestamp: u64,
	/// Block gas limit.
	pub block_gas_limit: u64,
	/// Block randomness beacon; reported as difficulty before Paris.
	pub prev_randao: H256,
	/// Chain identifier.
	pub chain_id: U256,
	/// Block base fee (EIP-1559), zero before London.
	pub base_fee: U256,
	/// Blob base fee (EIP-7516), zero before Cancun.
	pub blob_base_fee: U256,
	/// Versioned hashes of the transaction blobs (EIP-4844).
	pub blob_hashes: Vec<H256>,
}

/// A log emitted by `LOGn`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Log {
	/// Address of the emitting account.
	pub address: H160,
	/// Log topics, at most four.
	pub topics: Vec<H256>,
	/// Log data.
	pub data: Vec<u8>,
}

/// Warm/cold state of an account or storage slot under EIP-2929.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AccessStatus {
	/// First access within this transaction.
	Cold,
	/// Previously accessed within this transaction.
	Warm,
}

/// Storage transition reported by [Host::set_storage], driving the
/// `SSTORE` gas and refund schedule.
///
/// Named from the `original -> current -> new` value triple: `Added` is
/// `0 -> 0 -> X`, `AddedDeleted` is `0 -> X -> 0`, `ModifiedRestored` is
/// `X -> Y -> X`, and so on.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StorageStatus {
	/// The new value equals the current one, or a dirty slot was assigned
	/// yet another non-zero value.
	Unchanged,
	/// A clean non-zero slot received a different non-zero value.
	Modified,
	/// A clean non-zero slot was cleared.
	Deleted,
	/// A clean zero slot received a non-zero value.
	Added,
	/// A dirty slot was restored to its original non-zero value.
	ModifiedRestored,
	/// A slot added earlier in the transaction was cleared again.
	AddedDeleted,
	/// A dirty non-zero slot was cleared.
	ModifiedDeleted,
}

/// Result record of one frame execution, also what [Host::call] returns.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
	/// Status of the frame.
	pub status_code: StatusCode,
	/// Gas left in the frame. Zero unless the status is `Success` or
	/// `Revert`.
	pub gas_left: i64,
	/// Accumulated gas refund. Zero unless the status is `Success`.
	pub gas_refund: i64,
	/// Output bytes: return or revert data.
	pub output_data: Vec<u8>,
	/// Address of the created contract for successful create frames.
	pub create_address: Option<H160>,
}

impl ExecutionResult {
	/// A failure result with the given status, consuming all gas.
	#[must_use]
	pub fn failure(status_code: StatusCode) -> Self {
		Self {
			status_code,
			gas_left: 0,
			gas_refund: 0,
			output_data: Vec::new(),
			create_address: None,
		}
	}
}

/// The embedder-supplied interface through which the engine observes and
/// mutates blockchain state.
///
/// All methods are synchronous; [Host::call] is the sole reentry point for
/// sub-frames and may recurse back into the engine. The host owns commit
/// and rollback semantics across frames.
pub trait Host {
	/// Whether the account is non-empty under the EIP-161 rules of the
	/// active revision.
	fn account_exists(&self, address: H160) -> bool;
	/// Current storage value.
	fn storage(&self, address: H160, key: H256) -> H256;
	/// Set a storage value, reporting the transition.
	fn set_storage(&mut self, address: H160, key: H256, value: H256) -> StorageStatus;
	/// Current transient storage value (EIP-1153).
	fn transient_storage(&self, address: H160, key: H256) -> H256;
	/// Set a transient storage value (EIP-1153).
	fn set_transient_storage(&mut self, address: H160, key: H256, value: H256);
	/// Account balance.
	fn balance(&self, address: H160) -> U256;
	/// Size of the account code.
	fn code_size(&self, address: H160) -> usize;
	/// Hash of the account code; the empty hash for empty accounts
	/// (EIP-1052).
	fn code_hash(&self, address: H160) -> H256;
	/// Copy account code starting at `code_offset` into `buffer`,
	/// returning the number of bytes copied.
	fn copy_code(&self, address: H160, code_offset: usize, buffer: &mut [u8]) -> usize;
	/// Mark the account for destruction, moving its balance to the
	/// beneficiary. Returns whether the account was not yet marked.
	fn selfdestruct(&mut self, address: H160, beneficiary: H160) -> bool;
	/// Execute a sub-message. The host applies the value transfer, runs
	/// the callee (possibly through this engine) and rolls its writes back
	/// on failure.
	fn call(&mut self, msg: Message) -> ExecutionResult;
	/// Transaction and block context.
	fn tx_context(&self) -> TxContext;
	/// Hash of one of the 256 most recent blocks, zero outside that range.
	fn block_hash(&self, number: u64) -> H256;
	/// Record a log entry.
	fn emit_log(&mut self, log: Log);
	/// Warm/cold state of an account; the account becomes warm.
	fn access_account(&mut self, address: H160) -> AccessStatus;
	/// Warm/cold state of a storage slot; the slot becomes warm.
	fn access_storage(&mut self, address: H160, key: H256) -> AccessStatus;
}
