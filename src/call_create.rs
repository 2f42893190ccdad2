//! Call and create schemes, and the contract address derivations.

use primitive_types::{H160, H256, U256};
use sha3::{Digest, Keccak256};

use crate::runtime::MessageKind;

/// Call scheme.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CallScheme {
	/// `CALL`
	Call,
	/// `CALLCODE`
	CallCode,
	/// `DELEGATECALL`
	DelegateCall,
	/// `STATICCALL`
	StaticCall,
}

impl CallScheme {
	/// Whether the opcode pops a value argument.
	#[must_use]
	pub const fn has_value_argument(&self) -> bool {
		matches!(self, Self::Call | Self::CallCode)
	}
}

impl From<CallScheme> for MessageKind {
	fn from(scheme: CallScheme) -> Self {
		match scheme {
			CallScheme::Call => Self::Call,
			CallScheme::CallCode => Self::CallCode,
			CallScheme::DelegateCall => Self::DelegateCall,
			CallScheme::StaticCall => Self::StaticCall,
		}
	}
}

/// Create scheme.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
pub enum CreateScheme {
	/// Legacy create scheme of `CREATE`.
	Legacy {
		/// Caller of the create.
		caller: H160,
		/// Nonce of the caller at the time of the create.
		nonce: U256,
	},
	/// Create scheme of `CREATE2`.
	Create2 {
		/// Caller of the create.
		caller: H160,
		/// Hash of the initcode.
		code_hash: H256,
		/// Salt.
		salt: H256,
	},
}

impl CreateScheme {
	/// The address the scheme deploys to: `keccak256(rlp([caller,
	/// nonce]))[12..]` for `CREATE`, `keccak256(0xff ++ caller ++ salt ++
	/// keccak256(initcode))[12..]` for `CREATE2`.
	#[must_use]
	pub fn address(&self) -> H160 {
		match self {
			Self::Create2 {
				caller,
				code_hash,
				salt,
			} => {
				let mut hasher = Keccak256::new();
				hasher.update([0xff]);
				hasher.update(&caller[..]);
				hasher.update(&salt[..]);
				hasher.update(&code_hash[..]);
				H256::from_slice(hasher.finalize().as_slice()).into()
			}
			Self::Legacy { caller, nonce } => {
				let mut stream = rlp::RlpStream::new_list(2);
				stream.append(caller);
				stream.append(nonce);
				H256::from_slice(Keccak256::digest(&stream.out()).as_slice()).into()
			}
		}
	}
}

/// Hash of the initcode for a [CreateScheme::Create2] derivation.
#[must_use]
pub fn initcode_hash(init_code: &[u8]) -> H256 {
	H256::from_slice(Keccak256::digest(init_code).as_slice())
}
