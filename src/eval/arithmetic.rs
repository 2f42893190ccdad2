use primitive_types::{U256, U512};

use crate::utils::I256;

/// Truncate a 512-bit intermediate back into the 256-bit domain. The value
/// is a remainder of a 256-bit modulus, so the high limbs are zero.
#[inline]
fn u512_to_u256(v: U512) -> U256 {
	U256([v.0[0], v.0[1], v.0[2], v.0[3]])
}

#[inline]
pub fn div(op1: U256, op2: U256) -> U256 {
	if op2.is_zero() {
		U256::zero()
	} else {
		op1 / op2
	}
}

#[inline]
pub fn sdiv(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	(op1 / op2).into()
}

#[inline]
pub fn rem(op1: U256, op2: U256) -> U256 {
	if op2.is_zero() {
		U256::zero()
	} else {
		op1 % op2
	}
}

#[inline]
pub fn srem(op1: U256, op2: U256) -> U256 {
	if op2.is_zero() {
		U256::zero()
	} else {
		let op1: I256 = op1.into();
		let op2: I256 = op2.into();
		(op1 % op2).into()
	}
}

#[inline]
pub fn addmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3.is_zero() {
		return U256::zero();
	}

	let op1 = U512::from(op1);
	let op2 = U512::from(op2);
	let op3 = U512::from(op3);
	u512_to_u256((op1 + op2) % op3)
}

#[inline]
pub fn mulmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3.is_zero() {
		return U256::zero();
	}

	let op1 = U512::from(op1);
	let op2 = U512::from(op2);
	let op3 = U512::from(op3);
	u512_to_u256((op1 * op2) % op3)
}

#[inline]
pub fn exp(op1: U256, op2: U256) -> U256 {
	op1.overflowing_pow(op2).0
}

#[inline]
pub fn signextend(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32) {
		return op2;
	}

	let bit_index = (8 * op1.low_u32() + 7) as usize;
	let bit = op2.bit(bit_index);
	let mask = (U256::one() << bit_index) - U256::one();
	if bit {
		op2 | !mask
	} else {
		op2 & mask
	}
}
