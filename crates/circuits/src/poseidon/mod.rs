//! Poseidon two-to-one compression over the BN254 scalar field.
//!
//! `hash_two` is the `Hash2` primitive every Merkle node in this crate is
//! built from. The permutation itself comes from arkworks' sponge; this
//! module only fixes the parameters and exposes a native and an R1CS form
//! that are guaranteed to agree.

mod config;
mod gadgets;
mod native;


pub use config::poseidon_config;
pub use gadgets::hash_two_var;
pub use native::hash_two;
