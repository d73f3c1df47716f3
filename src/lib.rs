// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PLATON-HARNESS
//
// Host environment for running a single WASM smart-contract invocation
// against the `platon` test ABI.
// - Wasmer runtime with Cranelift compiler
// - RLP codec and fixed-width bigint arithmetic exposed as host functions
// - In-memory key/value storage, swappable via the `Storage` trait
// - No gas metering, no timeouts, no multi-contract or networked execution
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub mod bigint;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod error;
pub mod harness;
pub mod host;
pub mod memory;
pub mod rlp;
pub mod storage;

pub use config::HarnessConfig;
pub use context::CallContext;
pub use diagnostics::{CapturingSink, DiagSink, StdoutSink};
pub use error::{DriverError, HostError};
pub use harness::{Harness, InvocationOutcome};
pub use storage::{InMemoryStorage, Storage};
