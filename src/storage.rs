//! Storage interface (§3 "Storage interface").
//!
//! An abstract byte-keyed, byte-valued mapping with `get`/`set`/`delete`.
//! No ordering, no iteration, no transactions. Absence and an empty stored
//! value are indistinguishable at this interface — `get` returns empty
//! bytes either way. Implementations own their own persistence and
//! concurrency; the core assumes single-threaded access during one
//! invocation, but the trait takes `&self` (not `&mut self`) so a single
//! `Arc<dyn Storage>` can be shared across every handler invoked during a
//! guest run without the context itself needing `&mut` access to it.
use std::collections::BTreeMap;
use std::sync::Mutex;

pub trait Storage: Send + Sync {
    /// Returns the stored value, or an empty `Vec` if `key` is absent.
    fn get(&self, key: &[u8]) -> Vec<u8>;
    /// Inserts or overwrites `key` with `value`.
    fn set(&self, key: &[u8], value: &[u8]);
    /// Removes `key`, if present. A no-op if absent.
    fn delete(&self, key: &[u8]);
}

/// The core's one shipped implementation: a `BTreeMap`-backed in-memory
/// store, sufficient for a test harness. Keys are raw bytes, not strings —
/// unlike the original Go implementation, which indexed by Go `string`
/// (necessarily valid UTF-8 only because it copies through a string
/// conversion); this crate keeps the ABI's documented byte-string keys.
#[derive(Default)]
pub struct InMemoryStorage {
    inner: Mutex<BTreeMap<Vec<u8>, Vec<u8>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Storage for InMemoryStorage {
    fn get(&self, key: &[u8]) -> Vec<u8> {
        self.inner
            .lock()
            .expect("storage mutex poisoned")
            .get(key)
            .cloned()
            .unwrap_or_default()
    }

    fn set(&self, key: &[u8], value: &[u8]) {
        self.inner
            .lock()
            .expect("storage mutex poisoned")
            .insert(key.to_vec(), value.to_vec());
    }

    fn delete(&self, key: &[u8]) {
        self.inner.lock().expect("storage mutex poisoned").remove(key);
    }
}
