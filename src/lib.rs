//! Analysis-based execution engine for the Ethereum Virtual Machine.
//!
//! Raw bytecode is first converted by a single code-analysis pass into a
//! flat, pre-decoded instruction stream annotated with per-basic-block gas
//! and stack requirements, then executed by a function-pointer dispatch
//! loop. Per-instruction gas and stack checks disappear from the hot loop;
//! only instructions with dynamic costs do extra accounting.
//!
//! The engine performs no I/O: all external effects go through the
//! [runtime::Host] trait, and a sub-call is a synchronous reentrant call
//! through the host.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod analysis;
pub mod call_create;
pub mod consts;
pub mod costs;
mod error;
mod eval;
mod interpreter;
pub mod machine;
mod memory;
mod opcode;
pub mod optable;
mod revision;
pub mod runtime;
mod stack;
pub mod tracing;
pub mod utils;

pub use crate::analysis::{analyze, Analysis, BlockInfo, Efn, Instruction, InstructionArg};
pub use crate::error::{ExitError, ExitException, ExitResult, ExitSucceed, StatusCode};
pub use crate::eval::Control;
pub use crate::interpreter::{execute, execute_analyzed};
pub use crate::memory::Memory;
pub use crate::opcode::Opcode;
pub use crate::revision::Revision;
pub use crate::runtime::{
	AccessStatus, ExecutionResult, Host, Log, Message, MessageKind, StorageStatus, TxContext,
};
pub use crate::stack::Stack;
