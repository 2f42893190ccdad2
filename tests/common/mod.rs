//! An in-memory host for end-to-end tests: accounts, storage, warm sets,
//! recursive sub-call execution and rollback on failure.

use std::collections::{BTreeMap, BTreeSet};

use evm_advanced::call_create::{initcode_hash, CreateScheme};
use evm_advanced::consts::{G_CODEDEPOSIT, MAX_CODE_SIZE};
use evm_advanced::{
	execute, AccessStatus, ExecutionResult, Host, Log, Message, MessageKind, Revision,
	StatusCode, StorageStatus, TxContext,
};
use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

#[derive(Default, Clone, Debug)]
pub struct MockAccount {
	pub balance: U256,
	pub code: Vec<u8>,
	pub nonce: U256,
	pub storage: BTreeMap<H256, H256>,
}

impl MockAccount {
	fn is_empty(&self) -> bool {
		self.balance.is_zero() && self.nonce.is_zero() && self.code.is_empty()
	}
}

#[derive(Clone, Debug)]
pub struct MockHost {
	pub revision: Revision,
	pub state: BTreeMap<H160, MockAccount>,
	pub transient: BTreeMap<(H160, H256), H256>,
	pub original: BTreeMap<(H160, H256), H256>,
	pub warm_accounts: BTreeSet<H160>,
	pub warm_slots: BTreeSet<(H160, H256)>,
	pub destructed: BTreeSet<H160>,
	pub logs: Vec<Log>,
	pub context: TxContext,
	pub block_hashes: BTreeMap<u64, H256>,
	/// Every message seen by [Host::call], for assertions.
	pub recorded_messages: Vec<Message>,
}

/// The mutable portion of the host, snapshotted around sub-calls.
#[derive(Clone)]
struct Snapshot {
	state: BTreeMap<H160, MockAccount>,
	transient: BTreeMap<(H160, H256), H256>,
	original: BTreeMap<(H160, H256), H256>,
	warm_accounts: BTreeSet<H160>,
	warm_slots: BTreeSet<(H160, H256)>,
	destructed: BTreeSet<H160>,
	logs_len: usize,
}

impl MockHost {
	pub fn new(revision: Revision) -> Self {
		Self {
			revision,
			state: BTreeMap::new(),
			transient: BTreeMap::new(),
			original: BTreeMap::new(),
			warm_accounts: BTreeSet::new(),
			warm_slots: BTreeSet::new(),
			destructed: BTreeSet::new(),
			logs: Vec::new(),
			context: TxContext::default(),
			block_hashes: BTreeMap::new(),
			recorded_messages: Vec::new(),
		}
	}

	pub fn account_mut(&mut self, address: H160) -> &mut MockAccount {
		self.state.entry(address).or_default()
	}

	pub fn code(&self, address: H160) -> Vec<u8> {
		self.state
			.get(&address)
			.map(|account| account.code.clone())
			.unwrap_or_default()
	}

	fn checkpoint(&self) -> Snapshot {
		Snapshot {
			state: self.state.clone(),
			transient: self.transient.clone(),
			original: self.original.clone(),
			warm_accounts: self.warm_accounts.clone(),
			warm_slots: self.warm_slots.clone(),
			destructed: self.destructed.clone(),
			logs_len: self.logs.len(),
		}
	}

	fn rollback(&mut self, snapshot: Snapshot) {
		self.state = snapshot.state;
		self.transient = snapshot.transient;
		self.original = snapshot.original;
		self.warm_accounts = snapshot.warm_accounts;
		self.warm_slots = snapshot.warm_slots;
		self.destructed = snapshot.destructed;
		self.logs.truncate(snapshot.logs_len);
	}

	fn transfer(&mut self, from: H160, to: H160, value: U256) -> bool {
		if value.is_zero() {
			return true;
		}
		{
			let from_account = self.account_mut(from);
			if from_account.balance < value {
				return false;
			}
			from_account.balance -= value;
		}
		self.account_mut(to).balance += value;
		true
	}

	fn run_call(&mut self, msg: Message) -> ExecutionResult {
		let snapshot = self.checkpoint();

		if msg.kind == MessageKind::Call && !self.transfer(msg.sender, msg.recipient, msg.value)
		{
			self.rollback(snapshot);
			return ExecutionResult::failure(StatusCode::Failure);
		}

		let code = self.code(msg.code_address);
		let revision = self.revision;
		let result = execute(self, revision, &msg, &code);

		if result.status_code != StatusCode::Success {
			self.rollback(snapshot);
		}
		result
	}

	fn run_create(&mut self, msg: Message) -> ExecutionResult {
		let snapshot = self.checkpoint();

		let nonce = self.account_mut(msg.sender).nonce;
		self.account_mut(msg.sender).nonce = nonce + U256::one();

		let scheme = if msg.kind == MessageKind::Create2 {
			CreateScheme::Create2 {
				caller: msg.sender,
				code_hash: initcode_hash(&msg.input_data),
				salt: msg.create2_salt,
			}
		} else {
			CreateScheme::Legacy {
				caller: msg.sender,
				nonce,
			}
		};
		let address = scheme.address();

		// Address collision fails the create outright.
		if self
			.state
			.get(&address)
			.map_or(false, |a| !a.code.is_empty() || !a.nonce.is_zero())
		{
			self.rollback(snapshot);
			return ExecutionResult::failure(StatusCode::Failure);
		}

		if self.revision >= Revision::SpuriousDragon {
			self.account_mut(address).nonce = U256::one();
		}
		if !self.transfer(msg.sender, address, msg.value) {
			self.rollback(snapshot);
			return ExecutionResult::failure(StatusCode::Failure);
		}

		// The initcode frame runs with the initcode as code and empty
		// call data.
		let init_code = msg.input_data.clone();
		let exec_msg = Message {
			recipient: address,
			code_address: address,
			input_data: Vec::new(),
			..msg
		};
		let revision = self.revision;
		let mut result = execute(self, revision, &exec_msg, &init_code);

		if result.status_code == StatusCode::Success {
			let deposit = G_CODEDEPOSIT * result.output_data.len() as u64;
			let oversized = self.revision >= Revision::SpuriousDragon
				&& result.output_data.len() > MAX_CODE_SIZE;
			if oversized || (result.gas_left as u64) < deposit {
				self.rollback(snapshot);
				return ExecutionResult::failure(StatusCode::OutOfGas);
			}
			result.gas_left -= deposit as i64;
			self.account_mut(address).code = result.output_data.clone();
			result.output_data = Vec::new();
			result.create_address = Some(address);
		} else {
			self.rollback(snapshot);
		}
		result
	}
}

impl Host for MockHost {
	fn account_exists(&self, address: H160) -> bool {
		self.state.get(&address).map_or(false, |a| !a.is_empty())
	}

	fn storage(&self, address: H160, key: H256) -> H256 {
		self.state
			.get(&address)
			.and_then(|account| account.storage.get(&key).copied())
			.unwrap_or_default()
	}

	fn set_storage(&mut self, address: H160, key: H256, value: H256) -> StorageStatus {
		let current = self.storage(address, key);
		let original = *self.original.entry((address, key)).or_insert(current);
		self.account_mut(address).storage.insert(key, value);

		if value == current {
			StorageStatus::Unchanged
		} else if original == current {
			if original.is_zero() {
				StorageStatus::Added
			} else if value.is_zero() {
				StorageStatus::Deleted
			} else {
				StorageStatus::Modified
			}
		} else if value.is_zero() {
			if original.is_zero() {
				StorageStatus::AddedDeleted
			} else {
				StorageStatus::ModifiedDeleted
			}
		} else if value == original {
			StorageStatus::ModifiedRestored
		} else {
			StorageStatus::Unchanged
		}
	}

	fn transient_storage(&self, address: H160, key: H256) -> H256 {
		self.transient
			.get(&(address, key))
			.copied()
			.unwrap_or_default()
	}

	fn set_transient_storage(&mut self, address: H160, key: H256, value: H256) {
		self.transient.insert((address, key), value);
	}

	fn balance(&self, address: H160) -> U256 {
		self.state
			.get(&address)
			.map(|account| account.balance)
			.unwrap_or_default()
	}

	fn code_size(&self, address: H160) -> usize {
		self.state
			.get(&address)
			.map(|account| account.code.len())
			.unwrap_or_default()
	}

	fn code_hash(&self, address: H160) -> H256 {
		match self.state.get(&address) {
			Some(account) if !account.is_empty() => {
				H256::from_slice(Keccak256::digest(&account.code).as_slice())
			}
			_ => H256::default(),
		}
	}

	fn copy_code(&self, address: H160, code_offset: usize, buffer: &mut [u8]) -> usize {
		let code = self
			.state
			.get(&address)
			.map(|account| account.code.as_slice())
			.unwrap_or_default();
		if code_offset >= code.len() {
			return 0;
		}
		let n = std::cmp::min(buffer.len(), code.len() - code_offset);
		buffer[..n].copy_from_slice(&code[code_offset..code_offset + n]);
		n
	}

	fn selfdestruct(&mut self, address: H160, beneficiary: H160) -> bool {
		let balance = self.balance(address);
		self.account_mut(address).balance = U256::zero();
		self.account_mut(beneficiary).balance += balance;
		self.destructed.insert(address)
	}

	fn call(&mut self, msg: Message) -> ExecutionResult {
		self.recorded_messages.push(msg.clone());

		if msg.kind.is_create() {
			self.run_create(msg)
		} else {
			self.run_call(msg)
		}
	}

	fn tx_context(&self) -> TxContext {
		self.context.clone()
	}

	fn block_hash(&self, number: u64) -> H256 {
		self.block_hashes.get(&number).copied().unwrap_or_default()
	}

	fn emit_log(&mut self, log: Log) {
		self.logs.push(log);
	}

	fn access_account(&mut self, address: H160) -> AccessStatus {
		if self.warm_accounts.insert(address) {
			AccessStatus::Cold
		} else {
			AccessStatus::Warm
		}
	}

	fn access_storage(&mut self, address: H160, key: H256) -> AccessStatus {
		if self.warm_slots.insert((address, key)) {
			AccessStatus::Cold
		} else {
			AccessStatus::Warm
		}
	}
}

/// A transaction-level call message with everything else defaulted.
pub fn call_message(recipient: H160, gas: i64) -> Message {
	Message {
		kind: MessageKind::Call,
		is_static: false,
		depth: 0,
		gas,
		recipient,
		sender: H160::from_low_u64_be(0xca11e4),
		input_data: Vec::new(),
		value: U256::zero(),
		code_address: recipient,
		create2_salt: H256::default(),
	}
}
