use crate::Opcode;

/// Exit result of a frame.
pub type ExitResult = Result<ExitSucceed, ExitError>;

/// Exit reason of a non-successful frame.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitError {
	/// Machine encountered an explicit revert. Unused gas and the revert
	/// output are preserved.
	Reverted,
	/// Machine returned a normal EVM error. All remaining gas is consumed.
	Exception(ExitException),
}

/// Exit succeed reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitSucceed {
	/// Machine encountered an explicit stop.
	Stopped,
	/// Machine encountered an explicit return.
	Returned,
	/// Machine encountered an explicit selfdestruct.
	SelfDestructed,
}

impl From<ExitSucceed> for ExitResult {
	fn from(s: ExitSucceed) -> Self {
		Ok(s)
	}
}

/// Exit error reason.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExitException {
	/// Execution runs out of gas.
	OutOfGas,
	/// Trying to pop from an empty stack.
	StackUnderflow,
	/// Trying to push into a stack over stack limit.
	StackOverflow,
	/// Jump destination is invalid.
	InvalidJump,
	/// Encountered the designated invalid opcode.
	DesignatedInvalid,
	/// Invalid opcode during execution.
	InvalidOpcode(Opcode),
	/// A state-mutating opcode was executed in a static frame.
	StaticModeViolation,
	/// Call stack is too deep.
	CallTooDeep,
	/// Memory-size arithmetic overflowed.
	OutOfMemory,
	/// An opcode accesses external information, but the request is off
	/// offset limit.
	OutOfOffset,
	/// A precompiled contract failed, surfaced through the host.
	PrecompileFailure,
}

impl From<ExitError> for ExitResult {
	fn from(e: ExitError) -> Self {
		Err(e)
	}
}

impl From<ExitException> for ExitResult {
	fn from(e: ExitException) -> Self {
		Err(ExitError::Exception(e))
	}
}

impl From<ExitException> for ExitError {
	fn from(e: ExitException) -> Self {
		Self::Exception(e)
	}
}

#[cfg(feature = "std")]
impl std::error::Error for ExitError {}

#[cfg(feature = "std")]
impl std::fmt::Display for ExitError {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self)
	}
}

/// Status code of an execution result, as observed by the embedder.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCode {
	/// Execution finished with success.
	Success,
	/// Generic execution failure.
	Failure,
	/// Execution terminated with `REVERT`.
	Revert,
	/// Execution ran out of gas.
	OutOfGas,
	/// An undefined instruction or the designated `INVALID` instruction
	/// was executed.
	InvalidInstruction,
	/// The operand stack underflowed its block requirement.
	StackUnderflow,
	/// The operand stack would grow over 1024 items.
	StackOverflow,
	/// `JUMP`/`JUMPI` targeted an offset that is not a `JUMPDEST`.
	BadJumpDestination,
	/// A state-mutating opcode was executed in a static frame.
	StaticModeViolation,
	/// The call depth limit of 1024 was exceeded.
	CallDepthExceeded,
	/// Memory-size arithmetic overflowed.
	OutOfMemory,
	/// A precompiled contract failed.
	PrecompileFailure,
}

impl StatusCode {
	/// Whether the status is [StatusCode::Success].
	#[must_use]
	pub fn is_success(&self) -> bool {
		*self == Self::Success
	}
}

impl From<ExitException> for StatusCode {
	fn from(e: ExitException) -> Self {
		match e {
			ExitException::OutOfGas => Self::OutOfGas,
			ExitException::StackUnderflow => Self::StackUnderflow,
			ExitException::StackOverflow => Self::StackOverflow,
			ExitException::InvalidJump => Self::BadJumpDestination,
			ExitException::DesignatedInvalid | ExitException::InvalidOpcode(_) => {
				Self::InvalidInstruction
			}
			ExitException::StaticModeViolation => Self::StaticModeViolation,
			ExitException::CallTooDeep => Self::CallDepthExceeded,
			ExitException::OutOfMemory => Self::OutOfMemory,
			ExitException::OutOfOffset => Self::Failure,
			ExitException::PrecompileFailure => Self::PrecompileFailure,
		}
	}
}
