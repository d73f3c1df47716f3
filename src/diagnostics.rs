//! Diagnostic stream (§6): line-buffered UTF-8 text on the host's standard
//! output. `platon_debug` writes without a trailing newline; `debug_gas`
//! writes a complete record terminated by a newline; `platon_return`
//! prefixes the raw bytes with `platon_return:`.
//!
//! The host functions that feed this stream could write directly with
//! `println!`, matching the original's direct stdout writes byte-for-byte.
//! Generalizing one step into a small trait instead lets tests capture the
//! stream instead of printing it, without changing the on-wire format those
//! three calls produce.
use std::io::Write;
use std::sync::Mutex;

pub trait DiagSink: Send + Sync {
    /// Writes a line already terminated by `\n` by the caller, if it wants one.
    fn write(&self, text: &str);
}

/// Default sink: the process's standard output, matching the original
/// implementation's behavior byte-for-byte.
#[derive(Default)]
pub struct StdoutSink;

impl DiagSink for StdoutSink {
    fn write(&self, text: &str) {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Test-observable sink: accumulates everything written to it.
#[derive(Default)]
pub struct CapturingSink {
    buf: Mutex<String>,
}

impl CapturingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        self.buf.lock().expect("capturing sink mutex poisoned").clone()
    }
}

impl DiagSink for CapturingSink {
    fn write(&self, text: &str) {
        self.buf.lock().expect("capturing sink mutex poisoned").push_str(text);
    }
}
