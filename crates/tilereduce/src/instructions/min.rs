use tilereduce_runtime::element::Ordered;

use super::ReduceInstruction;

/// Return the smallest element, or the largest value of the type when there is none.
///
/// Only ordered scalars can be reduced this way, vectors have no natural order:
///
/// ```compile_fail
/// use tilereduce::{Min, ReduceEngine};
/// use tilereduce::runtime::element::Float3;
///
/// let engine = ReduceEngine::<Float3, Min>::try_default();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Min;

impl<E: Ordered> ReduceInstruction<E> for Min {
    fn identity() -> E {
        E::highest()
    }

    fn combine(lhs: E, rhs: E) -> E {
        lhs.min_elem(rhs)
    }
}
