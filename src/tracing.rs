//! Allows to listen to runtime events.

use primitive_types::{H160, H256, U256};

use crate::call_create::CallScheme;
use crate::error::StatusCode;

environmental::environmental!(listener: dyn EventListener + 'static);

/// Receiver of [Event]s emitted during execution.
pub trait EventListener {
	/// Handle one event.
	fn event(&mut self, event: Event);
}

/// A runtime event.
#[derive(Debug, Copy, Clone)]
pub enum Event<'a> {
	/// A call-family instruction is about to invoke the host.
	Call {
		/// Call scheme.
		scheme: CallScheme,
		/// Account whose code will run.
		code_address: H160,
		/// Call data.
		input: &'a [u8],
		/// Gas handed to the callee, stipend included.
		gas: i64,
		/// Apparent value of the callee frame.
		value: U256,
		/// Whether the callee runs in static mode.
		is_static: bool,
	},
	/// A create-family instruction is about to invoke the host.
	Create {
		/// Creating account.
		caller: H160,
		/// Endowment.
		value: U256,
		/// Initcode.
		init_code: &'a [u8],
		/// Gas handed to the initcode frame.
		gas: i64,
		/// `CREATE2` salt, if any.
		salt: Option<H256>,
	},
	/// `SELFDESTRUCT` executed.
	SelfDestruct {
		/// The destructing account.
		address: H160,
		/// Balance beneficiary.
		beneficiary: H160,
		/// Balance moved.
		balance: U256,
	},
	/// A frame finished.
	Exit {
		/// Resulting status.
		status_code: StatusCode,
		/// Remaining gas.
		gas_left: i64,
	},
}

impl<'a> Event<'a> {
	pub(crate) fn emit(self) {
		listener::with(|listener| listener.event(self));
	}
}

/// Run closure with provided listener.
pub fn using<R, F: FnOnce() -> R>(new: &mut (dyn EventListener + 'static), f: F) -> R {
	listener::using(new, f)
}
