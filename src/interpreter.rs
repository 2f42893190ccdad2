//! The dispatch loop over a pre-decoded instruction stream.

use crate::analysis::{analyze, Analysis};
use crate::error::{ExitError, ExitResult, ExitSucceed, StatusCode};
use crate::eval::Control;
use crate::machine::ExecutionState;
use crate::revision::Revision;
use crate::runtime::{ExecutionResult, Host, Message};
use crate::tracing::Event;

/// Analyze and execute `code` in a fresh frame described by `message`.
pub fn execute(
	host: &mut dyn Host,
	revision: Revision,
	message: &Message,
	code: &[u8],
) -> ExecutionResult {
	let analysis = analyze(revision, code);
	execute_analyzed(host, revision, message, &analysis, code)
}

/// Execute a previously produced analysis. The analysis must come from
/// `analyze(revision, code)` with the same arguments; an embedder caching
/// analyses by `(revision, code hash)` calls this directly.
pub fn execute_analyzed(
	host: &mut dyn Host,
	revision: Revision,
	message: &Message,
	analysis: &Analysis,
	code: &[u8],
) -> ExecutionResult {
	let mut state = ExecutionState::new(message, revision, host, analysis, code);

	let mut pc = 0usize;
	let reason = loop {
		let Some(instr) = analysis.instrs.get(pc) else {
			// Unreachable: the stream ends with a synthetic STOP.
			break ExitSucceed::Stopped.into();
		};
		match (instr.exec)(instr, &mut state) {
			Control::Continue => pc += 1,
			Control::Jump(target) => pc = target,
			Control::Exit(reason) => break reason,
		}
	};

	finalize(state, reason)
}

fn finalize(state: ExecutionState, reason: ExitResult) -> ExecutionResult {
	let result = match reason {
		Ok(_) => ExecutionResult {
			status_code: StatusCode::Success,
			gas_left: state.gas_left,
			gas_refund: state.gas_refund,
			output_data: state.retval,
			create_address: None,
		},
		Err(ExitError::Reverted) => ExecutionResult {
			status_code: StatusCode::Revert,
			gas_left: state.gas_left,
			gas_refund: 0,
			output_data: state.retval,
			create_address: None,
		},
		Err(ExitError::Exception(e)) => ExecutionResult::failure(e.into()),
	};

	Event::Exit {
		status_code: result.status_code,
		gas_left: result.gas_left,
	}
	.emit();

	result
}
