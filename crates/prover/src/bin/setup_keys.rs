//! Generate and save a proving system for one circuit shape.
//!
//! Usage:
//!   setup-keys inclusion <depth> <utxos>
//!   setup-keys non-inclusion <depth> <utxos>
//!   setup-keys combined <depth> <utxos> <depth> <utxos>
//!
//! Files land in `$PROVER_KEYS_DIR` (default `./proving-keys`): the full
//! system as `<name>.key` and the verifying key alone as `<name>.vkey`.

use std::process;

use tracing_subscriber::EnvFilter;
use utxo_prover::{CircuitShape, ProverConfig, ProvingSystem};

fn parse_shape(args: &[String]) -> Result<CircuitShape, String> {
    let numbers = args
        .iter()
        .skip(1)
        .map(|a| a.parse::<u32>().map_err(|e| format!("Invalid number {a:?}: {e}")))
        .collect::<Result<Vec<_>, _>>()?;

    match (args.first().map(String::as_str), numbers.as_slice()) {
        (Some("inclusion"), [depth, utxos]) => Ok(CircuitShape::inclusion(*depth, *utxos)),
        (Some("non-inclusion"), [depth, utxos]) => Ok(CircuitShape::non_inclusion(*depth, *utxos)),
        (Some("combined"), [i_depth, i_utxos, ni_depth, ni_utxos]) => Ok(CircuitShape::combined(
            *i_depth, *i_utxos, *ni_depth, *ni_utxos,
        )),
        _ => Err("Usage: setup-keys <inclusion|non-inclusion|combined> <depth> <utxos> [<depth> <utxos>]".into()),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let shape = parse_shape(&args).unwrap_or_else(|e| {
        eprintln!("{e}");
        process::exit(2);
    });

    let config = ProverConfig::from_env();
    std::fs::create_dir_all(&config.keys_dir).expect("Failed to create keys directory");
    let key_path = config.key_path(&shape).expect("Invalid circuit shape");
    let vk_path = config.verifying_key_path(&shape).expect("Invalid circuit shape");

    println!("Running trusted setup for {shape} (this may take a while)...");
    let system = ProvingSystem::setup(shape).expect("Failed to setup circuit");

    let written = system.write_to_file(&key_path).expect("Failed to save proving system");
    println!("Proving system ({written} bytes) saved to {:?}", key_path);

    let vk_written = system
        .export_verifying_key(&vk_path)
        .expect("Failed to save verifying key");
    println!("Verifying key ({vk_written} bytes) saved to {:?}", vk_path);

    let vk_bytes = system.verifying_key_bytes().expect("Failed to serialize verifying key");
    println!("\n0x{}", hex::encode(&vk_bytes));
}
