//! Dynamic cost functions, computed inside instruction handlers on top of
//! the per-block base costs.

use primitive_types::U256;

use crate::consts::*;
use crate::error::ExitException;
use crate::revision::Revision;
use crate::runtime::StorageStatus;

/// Number of 32-byte words required to hold `size` bytes.
#[inline]
#[must_use]
pub const fn num_words(size: usize) -> u64 {
	(size as u64).div_ceil(32)
}

/// Total memory fee for `words` 32-byte words: `3·w + w²/512`.
///
/// The result saturates far above any affordable gas limit, so expansion to
/// a saturated size always fails as out-of-gas.
#[must_use]
pub fn memory_gas(words: u64) -> u64 {
	let linear = G_MEMORY.saturating_mul(words);
	let quadratic = words
		.checked_mul(words)
		.map(|w| w / G_QUADRATIC_DENOM)
		.unwrap_or(u64::MAX);
	linear.saturating_add(quadratic)
}

/// Per-word cost of the copy family.
#[must_use]
pub fn copy_cost(len: usize) -> u64 {
	G_COPY.saturating_mul(num_words(len))
}

/// Dynamic portion of `SHA3` and the `CREATE2` hashing surcharge.
#[must_use]
pub fn sha3_word_cost(len: usize) -> u64 {
	G_SHA3WORD.saturating_mul(num_words(len))
}

/// Dynamic portion of `LOGn`: the data fee. The topic fees are part of the
/// static schedule.
#[must_use]
pub fn log_data_cost(len: usize) -> u64 {
	G_LOGDATA.saturating_mul(len as u64)
}

/// Dynamic portion of `EXP`: the per-byte exponent fee.
#[must_use]
pub fn exp_cost(power: U256, revision: Revision) -> u64 {
	if power.is_zero() {
		return 0;
	}
	let byte_len = (power.bits() as u64).div_ceil(8);
	let per_byte = if revision >= Revision::SpuriousDragon {
		G_EXPBYTE_EIP160
	} else {
		G_EXPBYTE
	};
	per_byte.saturating_mul(byte_len)
}

/// Initcode word fee from Shanghai (EIP-3860).
#[must_use]
pub fn initcode_cost(len: usize) -> u64 {
	G_INITCODE_WORD.saturating_mul(num_words(len))
}

/// Whether net gas metering of `SSTORE` is active (EIP-1283 in
/// Constantinople, removed in Petersburg, EIP-2200 from Istanbul).
#[must_use]
pub const fn sstore_net_metered(revision: Revision) -> bool {
	matches!(revision, Revision::Constantinople)
		|| revision as usize >= Revision::Istanbul as usize
}

/// Warm-equivalent `SSTORE` dirty-write cost for the revision.
const fn sstore_dirty_cost(revision: Revision) -> u64 {
	match revision {
		Revision::Constantinople => 200,
		Revision::Istanbul => 800,
		_ => WARM_STORAGE_READ_COST,
	}
}

/// `SSTORE` reset cost for the revision. From Berlin the cold surcharge is
/// charged separately, so the reset cost shrinks by `COLD_SLOAD_COST`.
const fn sstore_reset_cost(revision: Revision) -> u64 {
	if revision as usize >= Revision::Berlin as usize {
		G_SRESET - COLD_SLOAD_COST
	} else {
		G_SRESET
	}
}

/// Refund for clearing a storage slot.
const fn sstore_clears_refund(revision: Revision) -> i64 {
	if revision as usize >= Revision::London as usize {
		R_SCLEAR_EIP3529
	} else {
		R_SCLEAR
	}
}

/// `SSTORE` cost and refund from the storage transition status.
///
/// The EIP-2929 cold surcharge is not included; the caller charges it from
/// the access status.
#[must_use]
pub fn sstore_cost_refund(status: StorageStatus, revision: Revision) -> (u64, i64) {
	if sstore_net_metered(revision) {
		let warm = sstore_dirty_cost(revision);
		let reset = sstore_reset_cost(revision);
		let clears = sstore_clears_refund(revision);

		match status {
			StorageStatus::Unchanged => (warm, 0),
			StorageStatus::Added => (G_SSET, 0),
			StorageStatus::Deleted => (reset, clears),
			StorageStatus::Modified => (reset, 0),
			StorageStatus::AddedDeleted => (warm, G_SSET as i64 - warm as i64),
			StorageStatus::ModifiedDeleted => (warm, clears),
			StorageStatus::ModifiedRestored => (warm, reset as i64 - warm as i64),
		}
	} else {
		// Legacy schedule: 20000 to fill a zero slot, 5000 otherwise, and a
		// 15000 refund whenever a non-zero slot is cleared.
		match status {
			StorageStatus::Added => (G_SSET, 0),
			StorageStatus::Deleted
			| StorageStatus::AddedDeleted
			| StorageStatus::ModifiedDeleted => (G_SRESET, R_SCLEAR),
			StorageStatus::Unchanged
			| StorageStatus::Modified
			| StorageStatus::ModifiedRestored => (G_SRESET, 0),
		}
	}
}

/// The callee gas allowance under the 63/64 rule (EIP-150): the caller
/// retains one 64th of its remaining gas.
#[inline]
#[must_use]
pub const fn max_call_gas(gas_left: i64) -> i64 {
	gas_left - gas_left / 64
}

/// Check a dynamic cost against the remaining frame gas.
pub fn check_gas(gas_left: i64, cost: u64) -> Result<i64, ExitException> {
	if cost > i64::MAX as u64 {
		return Err(ExitException::OutOfGas);
	}
	let gas_left = gas_left - cost as i64;
	if gas_left < 0 {
		return Err(ExitException::OutOfGas);
	}
	Ok(gas_left)
}
