//! Host functions: the ABI boundary a guest contract links against (§4.2-4.6).
//!
//! Every handler here receives a `FunctionEnvMut<HostState>` — the "process
//! handle" of §2 — exposing the memory bridge (`memory.rs`) and the
//! attached `CallContext`. Guest-supplied pointers and lengths are treated
//! as untrusted: every memory access goes through `memory::read_at`/
//! `write_at`, and a bridge failure is propagated as a `HostTrap::Memory`
//! rather than caught here, matching "host handlers never validate bounds
//! themselves" and "propagate the trap upward rather than catching it".
//!
//! Handlers that cannot fail (no memory touched, e.g. `platon_nano_time`)
//! return their plain scalar directly; handlers that read or write guest
//! memory return `Result<_, RuntimeError>` (a `HostTrap` converted via
//! `RuntimeError::user`) so a bridge failure traps the guest instead of
//! silently no-opping.

use crate::bigint;
use crate::context::CallContext;
use crate::diagnostics::DiagSink;
use crate::memory::{read_at, read_utf8, write_at};
use crate::rlp;
use std::fmt;
use std::sync::Arc;
use wasmer::{imports, Function, FunctionEnv, FunctionEnvMut, Imports, Memory, RuntimeError, Store};

/// The three in-band ways a guest call can interrupt its own execution, or
/// report a host-side memory-bridge failure. Reserved as a distinct type
/// (rather than a bare string panic, as the original host language did) so
/// the invocation driver can tell a contract-requested failure apart from
/// an engine fault — see DESIGN.md "Panic-as-control-flow".
#[derive(Debug, Clone)]
pub enum HostTrap {
    /// `platon_panic` was called: a test-failure sentinel, not a normal revert.
    Panic,
    /// `platon_revert` was called: graceful guest-requested termination.
    Revert,
    /// A guest-supplied `(offset, length)` pair was out of bounds, or no
    /// `memory` export was attached yet.
    Memory(String),
    /// The RLP encoder's defensive length-prefix precondition failed.
    RlpItemCountOverflow,
}

impl fmt::Display for HostTrap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostTrap::Panic => write!(f, "test case panic"),
            HostTrap::Revert => write!(f, "reverted"),
            HostTrap::Memory(msg) => write!(f, "memory bridge failure: {msg}"),
            HostTrap::RlpItemCountOverflow => write!(f, "rlp-itemcount-overflow"),
        }
    }
}

impl std::error::Error for HostTrap {}

/// `Function::new_typed_with_env` only accepts handlers returning
/// `Result<Rets, RuntimeError>`, not an arbitrary error type, so every
/// fallible handler below propagates a `HostTrap` through this conversion.
/// Wrapping via `RuntimeError::user` (rather than `RuntimeError::new`, which
/// only keeps a message string) is what makes `downcast_trap` able to
/// recover the original `HostTrap` once the guest call unwinds.
impl From<HostTrap> for RuntimeError {
    fn from(trap: HostTrap) -> Self {
        RuntimeError::user(Box::new(trap))
    }
}

/// Host environment stored in wasmer's `FunctionEnv`. Exactly one of these
/// per invocation — see `CallContext`'s lifecycle note.
pub struct HostState {
    /// The guest's exported linear memory. `None` until `Harness` attaches
    /// it right after instantiation.
    pub memory: Option<Memory>,
    pub ctx: CallContext,
    pub diag: Arc<dyn DiagSink>,
}

impl HostState {
    pub fn new(ctx: CallContext, diag: Arc<dyn DiagSink>) -> Self {
        Self {
            memory: None,
            ctx,
            diag,
        }
    }

    fn memory(&self) -> Result<Memory, HostTrap> {
        self.memory
            .clone()
            .ok_or_else(|| HostTrap::Memory("no memory attached".into()))
    }
}

// ─────────────────────────────────────────────────────────────────
// §4.3 I/O, control, and diagnostics
// ─────────────────────────────────────────────────────────────────

fn platon_debug(env: FunctionEnvMut<HostState>, ptr: u32, len: u32) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let text = read_utf8(&env, &memory, ptr, len)
        .ok_or_else(|| HostTrap::Memory("platon_debug: out of bounds".into()))?;
    env.data().diag.write(&text);
    Ok(())
}

fn platon_panic(_env: FunctionEnvMut<HostState>) -> Result<(), RuntimeError> {
    Err(HostTrap::Panic.into())
}

fn platon_revert(_env: FunctionEnvMut<HostState>) -> Result<(), RuntimeError> {
    Err(HostTrap::Revert.into())
}

fn platon_return(mut env: FunctionEnvMut<HostState>, ptr: u32, len: u32) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let bytes = read_at(&env, &memory, ptr, len)
        .ok_or_else(|| HostTrap::Memory("platon_return: out of bounds".into()))?;
    env.data()
        .diag
        .write(&format!("platon_return:{}\n", String::from_utf8_lossy(&bytes)));
    // Earlier revisions of this ABI only printed these bytes without
    // retaining them; storing into `output` here is the corrected behavior
    // this crate implements — see DESIGN.md's resolution of this question.
    env.data_mut().ctx.output = bytes;
    Ok(())
}

fn platon_debug_gas(
    env: FunctionEnvMut<HostState>,
    line: u32,
    name_ptr: u32,
    name_len: u32,
) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let name = read_utf8(&env, &memory, name_ptr, name_len)
        .ok_or_else(|| HostTrap::Memory("platon_debug_gas: out of bounds".into()))?;
    let (gas, op_code) = (env.data().ctx.gas, env.data().ctx.op_code);
    env.data().diag.write(&format!(
        "debug gas: line: {line} func: {name} gas: {gas} opcode: {op_code}\n"
    ));
    Ok(())
}

fn platon_get_input_length(env: FunctionEnvMut<HostState>) -> u32 {
    env.data().ctx.input.len() as u32
}

fn platon_get_input(env: FunctionEnvMut<HostState>, dst: u32) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let input = env.data().ctx.input.clone();
    if !write_at(&env, &memory, dst, &input) {
        return Err((HostTrap::Memory("platon_get_input: out of bounds".into())).into());
    }
    Ok(())
}

fn platon_nano_time(_env: FunctionEnvMut<HostState>) -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_nanos() as i64)
        .unwrap_or(0)
}

// ─────────────────────────────────────────────────────────────────
// §4.2 Storage host functions
// ─────────────────────────────────────────────────────────────────

fn platon_set_state(
    env: FunctionEnvMut<HostState>,
    key_ptr: u32,
    key_len: u32,
    val_ptr: u32,
    val_len: u32,
) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let key = read_at(&env, &memory, key_ptr, key_len)
        .ok_or_else(|| HostTrap::Memory("platon_set_state: key out of bounds".into()))?;
    if val_len == 0 {
        env.data().ctx.db.delete(&key);
        return Ok(());
    }
    let val = read_at(&env, &memory, val_ptr, val_len)
        .ok_or_else(|| HostTrap::Memory("platon_set_state: value out of bounds".into()))?;
    env.data().ctx.db.set(&key, &val);
    Ok(())
}

fn platon_get_state_length(
    env: FunctionEnvMut<HostState>,
    key_ptr: u32,
    key_len: u32,
) -> Result<i32, RuntimeError> {
    let memory = env.data().memory()?;
    let key = read_at(&env, &memory, key_ptr, key_len)
        .ok_or_else(|| HostTrap::Memory("platon_get_state_length: out of bounds".into()))?;
    Ok(env.data().ctx.db.get(&key).len() as i32)
}

fn platon_get_state(
    env: FunctionEnvMut<HostState>,
    key_ptr: u32,
    key_len: u32,
    val_ptr: u32,
    val_buf_len: u32,
) -> Result<i32, RuntimeError> {
    let memory = env.data().memory()?;
    let key = read_at(&env, &memory, key_ptr, key_len)
        .ok_or_else(|| HostTrap::Memory("platon_get_state: key out of bounds".into()))?;
    let value = env.data().ctx.db.get(&key);
    if value.len() as u32 > val_buf_len {
        return Ok(-1);
    }
    if !write_at(&env, &memory, val_ptr, &value) {
        return Err((HostTrap::Memory("platon_get_state: buffer out of bounds".into())).into());
    }
    Ok(value.len() as i32)
}

// ─────────────────────────────────────────────────────────────────
// §4.4 RLP codec
// ─────────────────────────────────────────────────────────────────

fn rlp_u128_size(_env: FunctionEnvMut<HostState>, high: u64, low: u64) -> i32 {
    rlp::u128_size(high, low) as i32
}

fn platon_rlp_u128(
    env: FunctionEnvMut<HostState>,
    high: u64,
    low: u64,
    dest: u32,
) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let encoded = rlp::encode_u128(high, low);
    if !write_at(&env, &memory, dest, &encoded) {
        return Err((HostTrap::Memory("platon_rlp_u128: out of bounds".into())).into());
    }
    Ok(())
}

fn rlp_bytes_size(env: FunctionEnvMut<HostState>, src: u32, len: u32) -> Result<i32, RuntimeError> {
    let memory = env.data().memory()?;
    let first_byte = if len == 0 {
        None
    } else {
        let one = read_at(&env, &memory, src, 1)
            .ok_or_else(|| HostTrap::Memory("rlp_bytes_size: out of bounds".into()))?;
        one.first().copied()
    };
    rlp::bytes_size(len, first_byte)
        .map(|n| n as i32)
        .map_err(|_| RuntimeError::from(HostTrap::RlpItemCountOverflow))
}

fn platon_rlp_bytes(
    env: FunctionEnvMut<HostState>,
    src: u32,
    len: u32,
    dest: u32,
) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let data = read_at(&env, &memory, src, len)
        .ok_or_else(|| HostTrap::Memory("platon_rlp_bytes: source out of bounds".into()))?;
    let encoded = rlp::encode_bytes(&data).map_err(|_| HostTrap::RlpItemCountOverflow)?;
    if !write_at(&env, &memory, dest, &encoded) {
        return Err((HostTrap::Memory("platon_rlp_bytes: dest out of bounds".into())).into());
    }
    Ok(())
}

fn rlp_list_size(_env: FunctionEnvMut<HostState>, len: u32) -> Result<i32, RuntimeError> {
    rlp::list_size(len)
        .map(|n| n as i32)
        .map_err(|_| RuntimeError::from(HostTrap::RlpItemCountOverflow))
}

fn platon_rlp_list(
    env: FunctionEnvMut<HostState>,
    src: u32,
    len: u32,
    dest: u32,
) -> Result<(), RuntimeError> {
    let memory = env.data().memory()?;
    let data = read_at(&env, &memory, src, len)
        .ok_or_else(|| HostTrap::Memory("platon_rlp_list: source out of bounds".into()))?;
    let encoded = rlp::encode_list(&data).map_err(|_| HostTrap::RlpItemCountOverflow)?;
    if !write_at(&env, &memory, dest, &encoded) {
        return Err((HostTrap::Memory("platon_rlp_list: dest out of bounds".into())).into());
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────
// §4.5 Bigint arithmetic
// ─────────────────────────────────────────────────────────────────

fn bigint_binary_operators(
    env: FunctionEnvMut<HostState>,
    left: u32,
    left_neg: u32,
    right: u32,
    right_neg: u32,
    result: u32,
    arr_size: u32,
    op: u32,
) -> Result<i32, RuntimeError> {
    let memory = env.data().memory()?;
    let left_bytes = read_at(&env, &memory, left, arr_size)
        .ok_or_else(|| HostTrap::Memory("bigint_binary_operators: left out of bounds".into()))?;
    let right_bytes = read_at(&env, &memory, right, arr_size)
        .ok_or_else(|| HostTrap::Memory("bigint_binary_operators: right out of bounds".into()))?;
    let (bytes, flags) = bigint::binary_op(
        &left_bytes,
        left_neg,
        &right_bytes,
        right_neg,
        arr_size as usize,
        op,
    )
    .map_err(|e| HostTrap::Memory(e.to_string()))?;
    if !write_at(&env, &memory, result, &bytes) {
        return Err((HostTrap::Memory("bigint_binary_operators: result out of bounds".into())).into());
    }
    Ok(flags as i32)
}

fn bigint_cmp(
    env: FunctionEnvMut<HostState>,
    left: u32,
    left_neg: u32,
    right: u32,
    right_neg: u32,
    arr_size: u32,
) -> Result<i32, RuntimeError> {
    let memory = env.data().memory()?;
    let left_bytes = read_at(&env, &memory, left, arr_size)
        .ok_or_else(|| HostTrap::Memory("bigint_cmp: left out of bounds".into()))?;
    let right_bytes = read_at(&env, &memory, right, arr_size)
        .ok_or_else(|| HostTrap::Memory("bigint_cmp: right out of bounds".into()))?;
    Ok(bigint::cmp(&left_bytes, left_neg, &right_bytes, right_neg))
}

fn bigint_sh(
    env: FunctionEnvMut<HostState>,
    origin: u32,
    origin_neg: u32,
    n: u32,
    result: u32,
    arr_size: u32,
    direction: u32,
) -> Result<u32, RuntimeError> {
    let memory = env.data().memory()?;
    let origin_bytes = read_at(&env, &memory, origin, arr_size)
        .ok_or_else(|| HostTrap::Memory("bigint_sh: origin out of bounds".into()))?;
    let (bytes, flags) = bigint::shift(&origin_bytes, origin_neg, n, arr_size as usize, direction)
        .map_err(|e| HostTrap::Memory(e.to_string()))?;
    if !write_at(&env, &memory, result, &bytes) {
        return Err((HostTrap::Memory("bigint_sh: result out of bounds".into())).into());
    }
    Ok(flags)
}

// ─────────────────────────────────────────────────────────────────
// §4.6 Module assembly
// ─────────────────────────────────────────────────────────────────

/// Builds the `env` import module: a flat, declarative table of
/// `(export_name, handler)` — adding a host function is one entry. This is
/// the direct replacement for the original's runtime-reflection-based
/// registration (see DESIGN.md "Dynamic dispatch at the host boundary").
pub fn build_imports(store: &mut Store, env: &FunctionEnv<HostState>) -> Imports {
    macro_rules! f {
        ($handler:expr) => {
            Function::new_typed_with_env(store, env, $handler)
        };
    }

    imports! {
        "env" => {
            "platon_debug" => f!(platon_debug),
            "platon_panic" => f!(platon_panic),
            "platon_revert" => f!(platon_revert),
            "platon_get_state" => f!(platon_get_state),
            "platon_get_state_length" => f!(platon_get_state_length),
            "platon_set_state" => f!(platon_set_state),
            "platon_return" => f!(platon_return),
            "platon_debug_gas" => f!(platon_debug_gas),
            "platon_get_input_length" => f!(platon_get_input_length),
            "platon_get_input" => f!(platon_get_input),
            "rlp_u128_size" => f!(rlp_u128_size),
            "platon_rlp_u128" => f!(platon_rlp_u128),
            "rlp_bytes_size" => f!(rlp_bytes_size),
            "platon_rlp_bytes" => f!(platon_rlp_bytes),
            "rlp_list_size" => f!(rlp_list_size),
            "platon_rlp_list" => f!(platon_rlp_list),
            "platon_nano_time" => f!(platon_nano_time),
            "bigint_binary_operators" => f!(bigint_binary_operators),
            "bigint_cmp" => f!(bigint_cmp),
            "bigint_sh" => f!(bigint_sh),
        }
    }
}

/// Converts a trapped guest call's `RuntimeError` back into the `HostTrap`
/// that caused it, if the trap originated from one of the handlers above
/// rather than from `wasmer`/Cranelift itself (e.g. an unreachable
/// instruction, a stack overflow).
pub fn downcast_trap(err: RuntimeError) -> Result<HostTrap, RuntimeError> {
    err.downcast::<HostTrap>()
}
