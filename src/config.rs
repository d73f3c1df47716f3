//! Runtime configuration knobs for the invocation driver (§4.8 "Configuration").
//!
//! Plain data, constructible by the embedder. There is no file-format
//! parsing layer here — a long-running node service would load `toml`
//! configs, but this crate has no deployment or network surface to
//! configure; a test harness just needs these few fields set directly by
//! whatever drives it (a `#[test]`, or the `platon-harness-cli` smoke
//! binary).

/// Default guest bytecode size ceiling: 1 MiB, the same order of magnitude
/// a node's bytecode-size gate would use for the same purpose (rejecting
/// pathological inputs before handing them to Cranelift).
pub const DEFAULT_MAX_BYTECODE_SIZE: usize = 1_048_576;

/// Default guest entry point name.
pub const DEFAULT_ENTRY_POINT: &str = "invoke";

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Reject guest bytecode larger than this many bytes before compiling it.
    pub max_bytecode_size: usize,
    /// The exported guest function `Harness::run` calls.
    pub entry_point: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            max_bytecode_size: DEFAULT_MAX_BYTECODE_SIZE,
            entry_point: DEFAULT_ENTRY_POINT.to_string(),
        }
    }
}

impl HarnessConfig {
    pub fn with_entry_point(mut self, entry_point: impl Into<String>) -> Self {
        self.entry_point = entry_point.into();
        self
    }

    pub fn with_max_bytecode_size(mut self, max_bytecode_size: usize) -> Self {
        self.max_bytecode_size = max_bytecode_size;
        self
    }
}
