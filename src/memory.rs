//! Memory bridge (§4.1): typed read/write of guest linear memory at a byte
//! offset, provided by the engine. In this `wasmer` embedding these are thin
//! wrappers over `MemoryView::read`/`MemoryView::write`, reached through the
//! guest's exported `memory`.
//!
//! The engine guarantees that any `(offset, length)` pair either fully
//! refers to reachable guest memory or causes a trap; these helpers never
//! validate bounds themselves beyond what `wasmer` already checks, and a
//! missing or not-yet-attached `memory` export is itself treated as a
//! bridge failure rather than silently ignored.

use wasmer::{FunctionEnvMut, Memory};

/// Reads `len` bytes from guest linear memory at `offset`. Returns `None`
/// if no memory is attached yet or the read is out of bounds.
pub fn read_at<T>(
    store: &FunctionEnvMut<T>,
    memory: &Memory,
    offset: u32,
    len: u32,
) -> Option<Vec<u8>> {
    if len == 0 {
        return Some(Vec::new());
    }
    let view = memory.view(store);
    let mut buf = vec![0u8; len as usize];
    view.read(offset as u64, &mut buf).ok()?;
    Some(buf)
}

/// Reads a UTF-8 string from guest memory. `None` on invalid UTF-8 or a
/// memory-bridge failure.
pub fn read_utf8<T>(
    store: &FunctionEnvMut<T>,
    memory: &Memory,
    offset: u32,
    len: u32,
) -> Option<String> {
    read_at(store, memory, offset, len).and_then(|bytes| String::from_utf8(bytes).ok())
}

/// Writes `data` to guest linear memory starting at `offset`. Returns
/// `false` on a bridge failure (no memory attached, or out of bounds).
pub fn write_at<T>(store: &FunctionEnvMut<T>, memory: &Memory, offset: u32, data: &[u8]) -> bool {
    if data.is_empty() {
        return true;
    }
    let view = memory.view(store);
    view.write(offset as u64, data).is_ok()
}
