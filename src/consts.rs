//! Named gas constants of the fee schedule.

/// Zero-cost tier.
pub const G_ZERO: u16 = 0;
/// Base tier (`ADDRESS`, `ORIGIN`, `POP`, ...).
pub const G_BASE: u16 = 2;
/// Very-low tier (`ADD`, `PUSH`, `DUP`, ...).
pub const G_VERYLOW: u16 = 3;
/// Low tier (`MUL`, `DIV`, ...).
pub const G_LOW: u16 = 5;
/// Mid tier (`ADDMOD`, `MULMOD`, `JUMP`).
pub const G_MID: u16 = 8;
/// High tier (`JUMPI`).
pub const G_HIGH: u16 = 10;
/// `JUMPDEST` cost.
pub const G_JUMPDEST: u16 = 1;

/// Static portion of `SHA3`.
pub const G_SHA3: u16 = 30;
/// Per-word cost of `SHA3` input, also the `CREATE2` hashing cost.
pub const G_SHA3WORD: u64 = 6;
/// Per-word cost of the copy family.
pub const G_COPY: u64 = 3;
/// Per-byte cost of `EXP` exponent, before Spurious Dragon.
pub const G_EXPBYTE: u64 = 10;
/// Per-byte cost of `EXP` exponent, from Spurious Dragon (EIP-160).
pub const G_EXPBYTE_EIP160: u64 = 50;

/// Static portion of `LOGn`, also the per-topic cost.
pub const G_LOG: u16 = 375;
/// Per-byte cost of log data.
pub const G_LOGDATA: u64 = 8;

/// `CREATE` and `CREATE2` base cost.
pub const G_CREATE: u16 = 32000;
/// Per-byte cost of deployed code, charged by the host on `CREATE` exit.
pub const G_CODEDEPOSIT: u64 = 200;
/// Per-word cost of initcode from Shanghai (EIP-3860).
pub const G_INITCODE_WORD: u64 = 2;

/// Surcharge for calls transferring value.
pub const G_CALLVALUE: u64 = 9000;
/// Gas stipend granted to the callee of a value-transferring call.
pub const G_CALLSTIPEND: u64 = 2300;
/// Surcharge for touching a non-existent account with value.
pub const G_NEWACCOUNT: u64 = 25000;
/// `SELFDESTRUCT` base cost from Tangerine Whistle.
pub const G_SELFDESTRUCT: u16 = 5000;
/// `SELFDESTRUCT` refund before London.
pub const R_SELFDESTRUCT: i64 = 24000;

/// `SSTORE` cost of setting a zero slot to non-zero.
pub const G_SSET: u64 = 20000;
/// `SSTORE` cost of any other modification, before Berlin.
pub const G_SRESET: u64 = 5000;
/// `SSTORE` refund for clearing a slot, before London (EIP-3529 lowers it).
pub const R_SCLEAR: i64 = 15000;
/// `SSTORE` refund for clearing a slot from London.
pub const R_SCLEAR_EIP3529: i64 = 4800;

/// Cold account access cost (EIP-2929).
pub const COLD_ACCOUNT_ACCESS_COST: u64 = 2600;
/// Cold storage slot access cost (EIP-2929).
pub const COLD_SLOAD_COST: u64 = 2100;
/// Warm storage/account access cost (EIP-2929).
pub const WARM_STORAGE_READ_COST: u64 = 100;

/// Linear coefficient of the memory fee.
pub const G_MEMORY: u64 = 3;
/// Quadratic divisor of the memory fee.
pub const G_QUADRATIC_DENOM: u64 = 512;

/// Operand stack capacity.
pub const STACK_LIMIT: usize = 1024;
/// Maximum call depth.
pub const CALL_DEPTH_LIMIT: u32 = 1024;
/// Maximum deployed code size from Spurious Dragon (EIP-170).
pub const MAX_CODE_SIZE: usize = 0x6000;
/// Maximum initcode size from Shanghai (EIP-3860).
pub const MAX_INITCODE_SIZE: usize = 2 * MAX_CODE_SIZE;
