/// EVM protocol revisions.
///
/// The variants are totally ordered; comparisons gate opcode availability,
/// gas-cost variants and warm/cold account access rules.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Revision {
	/// Frontier: the launch revision.
	Frontier = 0,
	/// Homestead: EIP-2, EIP-7 (`DELEGATECALL`).
	Homestead = 1,
	/// Tangerine Whistle: EIP-150 gas repricing and the 63/64 rule.
	TangerineWhistle = 2,
	/// Spurious Dragon: EIP-160, EIP-161 empty-account rules, EIP-170.
	SpuriousDragon = 3,
	/// Byzantium: `REVERT`, `STATICCALL`, return-data opcodes.
	Byzantium = 4,
	/// Constantinople: shifts, `CREATE2`, `EXTCODEHASH`, EIP-1283.
	Constantinople = 5,
	/// Petersburg: Constantinople with EIP-1283 removed again.
	Petersburg = 6,
	/// Istanbul: EIP-1884 repricing, `CHAINID`, `SELFBALANCE`, EIP-2200.
	Istanbul = 7,
	/// Berlin: EIP-2929 warm/cold access accounting.
	Berlin = 8,
	/// London: EIP-1559, `BASEFEE`, EIP-3529 refund reduction.
	London = 9,
	/// Paris: the Merge, `PREVRANDAO`.
	Paris = 10,
	/// Shanghai: `PUSH0`, EIP-3860 initcode metering.
	Shanghai = 11,
	/// Cancun: transient storage, `MCOPY`, blob opcodes.
	Cancun = 12,
	/// Prague.
	Prague = 13,
}

impl Revision {
	/// Number of supported revisions.
	pub const COUNT: usize = 14;

	/// The most recent supported revision.
	pub const LATEST: Revision = Revision::Prague;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn ordering() {
		assert!(Revision::Frontier < Revision::Homestead);
		assert!(Revision::Berlin < Revision::London);
		assert!(Revision::Shanghai >= Revision::Shanghai);
		assert_eq!(Revision::LATEST as usize, Revision::COUNT - 1);
	}
}
