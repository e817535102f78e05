//! Circuit statistics utility - reports constraint counts and proof timing
//!
//! Usage:
//!   cargo run --release --bin circuit-stats           # Just constraint counts
//!   cargo run --release --bin circuit-stats -- --time # Include setup/prove/verify timing

use std::time::Instant;

use utxo_prover::test_params::{
    combined_test_params, inclusion_test_params, non_inclusion_test_params,
};
use utxo_prover::{compile, CircuitShape, CircuitType, ProvingSystem};

const SHAPES: &[CircuitShape] = &[
    CircuitShape::inclusion(26, 1),
    CircuitShape::inclusion(26, 2),
    CircuitShape::inclusion(26, 4),
    CircuitShape::non_inclusion(26, 1),
    CircuitShape::non_inclusion(26, 2),
    CircuitShape::combined(26, 1, 26, 1),
    CircuitShape::combined(26, 2, 26, 2),
];

/// Small shapes for the timing pass, so a full run stays in seconds.
const TIMED_SHAPES: &[CircuitShape] = &[
    CircuitShape::inclusion(10, 1),
    CircuitShape::non_inclusion(10, 1),
    CircuitShape::combined(10, 1, 10, 1),
];

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let include_timing = args.iter().any(|a| a == "--time");

    println!("╔══════════════════════════════════════════════════════════╗");
    println!("║               UTXO MERKLE CIRCUIT STATS                  ║");
    println!("╚══════════════════════════════════════════════════════════╝\n");

    println!("─────────────────────────────────────────────────────────────");
    println!("CIRCUIT CONSTRAINTS:");
    println!("─────────────────────────────────────────────────────────────\n");

    println!("Shape                                   Constraints  Public  Witness");
    for shape in SHAPES {
        let compiled = compile(*shape).expect("Failed to compile circuit");
        println!(
            "{:38} {:>12} {:>7} {:>8}",
            shape.to_string(),
            compiled.num_constraints,
            // Exclude the constant one.
            compiled.num_instance_variables - 1,
            compiled.num_witness_variables
        );
    }

    if include_timing {
        println!("\n─────────────────────────────────────────────────────────────");
        println!("PROOF TIMING:");
        println!("─────────────────────────────────────────────────────────────\n");
        for shape in TIMED_SHAPES {
            run_timing(*shape);
        }
    } else {
        println!("\n(Run with --time to include proof generation timing)");
    }
}

fn run_timing(shape: CircuitShape) {
    println!("{shape}");

    let start = Instant::now();
    let system = match ProvingSystem::setup(shape) {
        Ok(s) => s,
        Err(e) => {
            println!("  Setup failed: {}", e);
            return;
        }
    };
    println!("  setup   {:>8}ms", start.elapsed().as_millis());

    let circuit_type = shape.circuit_type().expect("Timed shapes are valid");
    let (prove_ms, verified) = match circuit_type {
        CircuitType::Inclusion => {
            let params = inclusion_test_params(
                shape.inclusion_tree_depth,
                shape.inclusion_number_of_utxos,
            )
            .expect("Failed to build parameters");
            let start = Instant::now();
            let proof = system.prove_inclusion(&params).expect("Proving failed");
            let elapsed = start.elapsed().as_millis();
            (elapsed, system.verify_inclusion(&params.roots, &params.leaves, &proof))
        }
        CircuitType::NonInclusion => {
            let params = non_inclusion_test_params(
                shape.non_inclusion_tree_depth,
                shape.non_inclusion_number_of_utxos,
            )
            .expect("Failed to build parameters");
            let start = Instant::now();
            let proof = system.prove_non_inclusion(&params).expect("Proving failed");
            let elapsed = start.elapsed().as_millis();
            (elapsed, system.verify_non_inclusion(&params.roots, &params.values, &proof))
        }
        CircuitType::Combined => {
            let params = combined_test_params(
                shape.inclusion_tree_depth,
                shape.inclusion_number_of_utxos,
                shape.non_inclusion_tree_depth,
                shape.non_inclusion_number_of_utxos,
            )
            .expect("Failed to build parameters");
            let start = Instant::now();
            let proof = system.prove_combined(&params).expect("Proving failed");
            let elapsed = start.elapsed().as_millis();
            (
                elapsed,
                system.verify_combined(
                    &params.inclusion.roots,
                    &params.inclusion.leaves,
                    &params.non_inclusion.roots,
                    &params.non_inclusion.values,
                    &proof,
                ),
            )
        }
    };
    println!("  prove   {:>8}ms", prove_ms);
    match verified {
        Ok(accepted) => println!("  verify  {:>8}", if accepted { "ok" } else { "REJECTED" }),
        Err(e) => println!("  verify  failed: {}", e),
    }
}
