use tilereduce_runtime::element::Numeric;

use super::ReduceInstruction;

/// Multiply every element, starting from one. Vector elements are multiplied component-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Prod;

impl<E: Numeric> ReduceInstruction<E> for Prod {
    fn identity() -> E {
        E::one()
    }

    fn combine(lhs: E, rhs: E) -> E {
        lhs.mul_elem(rhs)
    }
}
