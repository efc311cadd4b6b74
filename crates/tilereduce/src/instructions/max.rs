use tilereduce_runtime::element::Ordered;

use super::ReduceInstruction;

/// Return the largest element, or the smallest value of the type when there is none.
#[derive(Debug, Clone, Copy, Default)]
pub struct Max;

impl<E: Ordered> ReduceInstruction<E> for Max {
    fn identity() -> E {
        E::lowest()
    }

    fn combine(lhs: E, rhs: E) -> E {
        lhs.max_elem(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Min, Prod, Sum};
    use tilereduce_runtime::element::{Float4, Line};

    fn assert_identity<E, I>(values: &[E])
    where
        E: tilereduce_runtime::element::CubeElement,
        I: ReduceInstruction<E>,
    {
        for value in values {
            assert_eq!(I::combine(I::identity(), *value), *value);
            assert_eq!(I::combine(*value, I::identity()), *value);
        }
    }

    #[test_log::test]
    fn identities_are_two_sided() {
        let ints = [i32::MIN, -7, 0, 3, i32::MAX];
        assert_identity::<i32, Sum>(&ints);
        assert_identity::<i32, Prod>(&ints);
        assert_identity::<i32, Min>(&ints);
        assert_identity::<i32, Max>(&ints);

        let floats = [f32::NEG_INFINITY, f32::MIN, -0.5, 2.0, f32::MAX, f32::INFINITY];
        assert_identity::<f32, Min>(&floats);
        assert_identity::<f32, Max>(&floats);

        let unsigned = [0_u64, 1, u64::MAX];
        assert_identity::<u64, Min>(&unsigned);
        assert_identity::<u64, Max>(&unsigned);

        let lines = [Float4::new([1.0, -2.0, 0.5, 8.0]), Line::splat(3.0)];
        assert_identity::<Float4, Sum>(&lines);
        assert_identity::<Float4, Prod>(&lines);
    }

    #[test_log::test]
    fn combine_matches_operator() {
        assert_eq!(<Sum as ReduceInstruction<u32>>::combine(2, 5), 7);
        assert_eq!(<Prod as ReduceInstruction<f64>>::combine(2.0, 5.0), 10.0);
        assert_eq!(<Min as ReduceInstruction<i64>>::combine(-2, 5), -2);
        assert_eq!(<Max as ReduceInstruction<i64>>::combine(-2, 5), 5);
    }

    #[test_log::test]
    fn half_precision_bounds() {
        assert_eq!(
            <Max as ReduceInstruction<half::f16>>::identity(),
            half::f16::NEG_INFINITY
        );
        assert_eq!(
            <Min as ReduceInstruction<half::bf16>>::identity(),
            half::bf16::INFINITY
        );
    }
}
