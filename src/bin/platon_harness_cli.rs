// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// PLATON-HARNESS-CLI
//
// Smoke-test wrapper: loads a compiled guest module, runs it through
// `Harness` once, and prints the outcome. Not part of the ABI surface — the
// command-line wrapper and contract compilation pipeline are out of scope
// (§1 "Out of scope"); this binary exists only so the host-function set can
// be exercised against a real `.wasm` file without writing a `#[test]`.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use clap::Parser;
use platon_harness::{Harness, HarnessConfig, InMemoryStorage, InvocationOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "platon-harness-cli")]
#[command(about = "Run a single WASM guest contract against the platon host ABI", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to the compiled guest module (.wasm).
    wasm_path: PathBuf,

    /// Guest entry point to call.
    #[arg(short, long, default_value = "invoke")]
    entry_point: String,

    /// Input bytes handed to the contract, hex-encoded (e.g. "deadbeef").
    #[arg(short, long)]
    input: Option<String>,

    /// Reject guest bytecode larger than this many bytes before compiling it.
    #[arg(long, default_value_t = platon_harness::config::DEFAULT_MAX_BYTECODE_SIZE)]
    max_bytecode_size: usize,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let wasm_bytes = match std::fs::read(&cli.wasm_path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!("error: failed to read {:?}: {err}", cli.wasm_path);
            return ExitCode::FAILURE;
        }
    };

    let input = match cli.input {
        Some(hex_str) => match hex::decode(hex_str.trim_start_matches("0x")) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("error: --input is not valid hex: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => Vec::new(),
    };

    let config = HarnessConfig::default()
        .with_entry_point(cli.entry_point)
        .with_max_bytecode_size(cli.max_bytecode_size);
    let harness = Harness::new(config);
    let db = Arc::new(InMemoryStorage::new());

    match harness.run(&wasm_bytes, input, db) {
        Ok((outcome, ctx)) => {
            match &outcome {
                InvocationOutcome::Completed { return_code } => {
                    println!("completed: return_code={return_code}");
                }
                InvocationOutcome::Reverted => println!("reverted"),
                InvocationOutcome::TestPanic => println!("test case panic"),
                InvocationOutcome::Trap(msg) => println!("trap: {msg}"),
            }
            if !ctx.output.is_empty() {
                println!("output: {}", hex::encode(&ctx.output));
            }
            match outcome {
                InvocationOutcome::Completed { .. } | InvocationOutcome::Reverted => {
                    ExitCode::SUCCESS
                }
                InvocationOutcome::TestPanic | InvocationOutcome::Trap(_) => ExitCode::FAILURE,
            }
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
