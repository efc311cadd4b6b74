use tilereduce_runtime::element::Numeric;

use super::ReduceInstruction;

/// Add every element, starting from zero. Vector elements are added component-wise.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl<E: Numeric> ReduceInstruction<E> for Sum {
    fn identity() -> E {
        E::zero()
    }

    fn combine(lhs: E, rhs: E) -> E {
        lhs.add_elem(rhs)
    }
}
