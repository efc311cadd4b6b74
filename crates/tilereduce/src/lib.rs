#![warn(missing_docs)]

//! Generic tiled parallel reduction.
//!
//! A slice is reduced in two phases. Cubes of up to 512 units each combine a strided share of the
//! input into one partial, first accumulating per unit and then folding the units in shared
//! memory as a binary tree. The host then combines the partials in order.
//!
//! ```
//! use tilereduce::{ReduceEngine, Sum};
//!
//! let mut engine = ReduceEngine::<i32, Sum>::try_default().unwrap();
//! assert_eq!(engine.reduce(&[1, 2, 3, 4, 5]).unwrap(), 15);
//! ```

/// Reduction sizing module.
pub mod config;
/// Operators a reduction can use.
pub mod instructions;
/// Reduction kernel module.
pub mod kernel;
/// Kernel dispatch module.
pub mod launch;

mod engine;
mod error;
mod strategy;

pub use config::{ReduceConfig, ReduceLimits, TileSize};
pub use engine::*;
pub use error::*;
pub use instructions::*;
pub use strategy::*;

pub use tilereduce_runtime as runtime;


use tilereduce_runtime::client::ComputeClient;
use tilereduce_runtime::element::CubeElement;

/// Reduce `input` with the instruction `I` on `client`.
///
/// This builds a single use [ReduceEngine] with the limits of the global configuration. Prefer
/// keeping an engine around when reducing repeatedly.
pub fn reduce<E, I>(
    client: &ComputeClient,
    input: &[E],
    strategy: ReduceStrategy,
) -> Result<E, ReduceError>
where
    E: CubeElement,
    I: ReduceInstruction<E>,
{
    ReduceEngine::<E, I>::new(client.clone())?
        .with_strategy(strategy)
        .reduce(input)
}

#[cfg(test)]
mod tests {
    crate::testgen_reduce!([f32, f64, i32, u32, i64]);
}
