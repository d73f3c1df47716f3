//! Per-invocation call context (§3 "Call context").
//!
//! One `CallContext` is constructed before guest entry, mutated only through
//! host calls during that invocation, and discarded afterwards. It is
//! exclusively owned by the invocation and shared by reference with every
//! host-function handler through the process handle — in this crate that is
//! `wasmer`'s `FunctionEnvMut<HostState>` (see `host.rs`).

use crate::storage::Storage;
use std::sync::Arc;

/// State threaded through a single guest invocation.
#[derive(Clone)]
pub struct CallContext {
    /// Immutable byte sequence handed to the contract.
    pub input: Vec<u8>,
    /// Byte sequence reserved for inter-contract call results. Writable;
    /// empty in this single-contract harness.
    pub call_out: Vec<u8>,
    /// Byte sequence the contract fills on return via `platon_return`.
    pub output: Vec<u8>,
    /// Gas counter the guest can inspect through `platon_debug_gas`. Nothing
    /// decrements it automatically — see the ABI's gas-metering Non-goal.
    pub gas: u64,
    /// Opcode counter, likewise observable only, never metered.
    pub op_code: u64,
    /// Storage handle. Shared by reference during the invocation; the core
    /// makes no concurrency assumption beyond "one invocation at a time".
    pub db: Arc<dyn Storage>,
}

impl CallContext {
    pub fn new(input: Vec<u8>, db: Arc<dyn Storage>) -> Self {
        Self {
            input,
            call_out: Vec::new(),
            output: Vec::new(),
            gas: 0,
            op_code: 0,
            db,
        }
    }
}
