//! Error types for the pieces of the host boundary that can fail before
//! any guest call happens, plus the invocation driver's own failure modes.
//!
//! Host function handlers never return `Result` across the WASM boundary —
//! the ABI's return types are the plain scalars in the export table. This
//! module exists for the codec preconditions that are checked ahead of a
//! guest call (§7 of the platon ABI notes) and for `Harness` itself.

use thiserror::Error;

/// Error surfaced by the RLP codec or bigint arithmetic before a guest-visible
/// return value would be produced.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HostError {
    /// The RLP length-prefix byte would exceed `0xff`. Unreachable for any
    /// 32-bit length, but a mandatory defensive check per the ABI notes.
    #[error("rlp-itemcount-overflow")]
    RlpItemCountOverflow,

    /// A bigint call was made with `arr_size == 0`.
    #[error("bigint arr_size must be nonzero")]
    ZeroArraySize,
}

/// Errors that can abort an invocation before or during driver setup,
/// distinct from the in-band guest outcomes reported by `InvocationOutcome`.
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("failed to compile guest module: {0}")]
    Compile(String),

    #[error("failed to instantiate guest module: {0}")]
    Instantiate(String),

    #[error("entry point {0:?} not found in guest module exports")]
    EntryNotFound(String),

    #[error("guest module does not export linear memory")]
    NoMemory,
}
