mod max;
mod min;
mod prod;
mod sum;

pub use max::*;
pub use min::*;
pub use prod::*;
pub use sum::*;

use tilereduce_runtime::element::CubeElement;

/// An associative operator with its identity element, used both inside kernels and on the host.
///
/// `identity()` must be a two-sided identity of `combine`:
/// `combine(identity(), x) == x == combine(x, identity())`.
pub trait ReduceInstruction<E: CubeElement>: Send + Sync + 'static {
    /// Seed of every accumulator and result of reducing no element.
    fn identity() -> E;

    /// Merge two partial results. Must be associative.
    fn combine(lhs: E, rhs: E) -> E;
}
