use core::fmt::Debug;
use core::ops::{Index, IndexMut};
use num_traits::{Bounded, Float, One, WrappingAdd, WrappingMul, Zero};

/// Element that can live in kernel buffers and shared memory.
pub trait CubeElement: Copy + Send + Sync + Debug + PartialEq + 'static {}

/// Element supporting the arithmetic of additive and multiplicative reductions.
///
/// Integer arithmetic wraps on overflow, the way it does on a compute device.
pub trait Numeric: CubeElement {
    /// The additive identity.
    fn zero() -> Self;
    /// The multiplicative identity.
    fn one() -> Self;
    /// `self + rhs`.
    fn add_elem(self, rhs: Self) -> Self;
    /// `self * rhs`.
    fn mul_elem(self, rhs: Self) -> Self;
}

/// Numeric element with an order, required by min and max reductions.
///
/// Vector elements such as [Line] don't implement this trait.
pub trait Ordered: Numeric + PartialOrd {
    /// The smallest value of the type, identity of a max reduction.
    fn lowest() -> Self;
    /// The largest value of the type, identity of a min reduction.
    fn highest() -> Self;

    /// The smaller of both values, keeping `self` on ties.
    fn min_elem(self, rhs: Self) -> Self {
        if self > rhs { rhs } else { self }
    }

    /// The larger of both values, keeping `self` on ties.
    fn max_elem(self, rhs: Self) -> Self {
        if self < rhs { rhs } else { self }
    }
}

macro_rules! impl_integer {
    ($($ty:ty),*) => {
        $(
            impl CubeElement for $ty {}

            impl Numeric for $ty {
                fn zero() -> Self {
                    <$ty as Zero>::zero()
                }

                fn one() -> Self {
                    <$ty as One>::one()
                }

                fn add_elem(self, rhs: Self) -> Self {
                    WrappingAdd::wrapping_add(&self, &rhs)
                }

                fn mul_elem(self, rhs: Self) -> Self {
                    WrappingMul::wrapping_mul(&self, &rhs)
                }
            }

            impl Ordered for $ty {
                fn lowest() -> Self {
                    <$ty as Bounded>::min_value()
                }

                fn highest() -> Self {
                    <$ty as Bounded>::max_value()
                }
            }
        )*
    };
}

// Infinities are the only values that are identities for every float input.
macro_rules! impl_float {
    ($($ty:ty),*) => {
        $(
            impl CubeElement for $ty {}

            impl Numeric for $ty {
                fn zero() -> Self {
                    <$ty as Zero>::zero()
                }

                fn one() -> Self {
                    <$ty as One>::one()
                }

                fn add_elem(self, rhs: Self) -> Self {
                    self + rhs
                }

                fn mul_elem(self, rhs: Self) -> Self {
                    self * rhs
                }
            }

            impl Ordered for $ty {
                fn lowest() -> Self {
                    <$ty as Float>::neg_infinity()
                }

                fn highest() -> Self {
                    <$ty as Float>::infinity()
                }
            }
        )*
    };
}

impl_integer!(i32, u32, i64, u64);
impl_float!(f32, f64, half::f16, half::bf16);

/// A fixed-width vector of elements, operated on component-wise.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line<E, const N: usize> {
    values: [E; N],
}

/// Three packed `f32`.
pub type Float3 = Line<f32, 3>;
/// Four packed `f32`.
pub type Float4 = Line<f32, 4>;

impl<E: CubeElement, const N: usize> Line<E, N> {
    /// Create a line from its components.
    pub const fn new(values: [E; N]) -> Self {
        Self { values }
    }

    /// Create a line with every component set to `value`.
    pub fn splat(value: E) -> Self {
        Self { values: [value; N] }
    }

    /// Number of components.
    pub const fn size(&self) -> usize {
        N
    }

    /// The components of the line.
    pub fn into_array(self) -> [E; N] {
        self.values
    }

    fn zip_with(self, rhs: Self, func: impl Fn(E, E) -> E) -> Self {
        let mut values = self.values;
        for (lhs, rhs) in values.iter_mut().zip(rhs.values) {
            *lhs = func(*lhs, rhs);
        }
        Self { values }
    }
}

impl<E: CubeElement, const N: usize> From<[E; N]> for Line<E, N> {
    fn from(values: [E; N]) -> Self {
        Self::new(values)
    }
}

impl<E, const N: usize> Index<usize> for Line<E, N> {
    type Output = E;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl<E, const N: usize> IndexMut<usize> for Line<E, N> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.values[index]
    }
}

impl<E: CubeElement, const N: usize> CubeElement for Line<E, N> {}

impl<E: Numeric, const N: usize> Numeric for Line<E, N> {
    fn zero() -> Self {
        Self::splat(E::zero())
    }

    fn one() -> Self {
        Self::splat(E::one())
    }

    fn add_elem(self, rhs: Self) -> Self {
        self.zip_with(rhs, E::add_elem)
    }

    fn mul_elem(self, rhs: Self) -> Self {
        self.zip_with(rhs, E::mul_elem)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn integer_arithmetic_wraps() {
        assert_eq!(i32::MAX.add_elem(1), i32::MIN);
        assert_eq!(u32::MAX.mul_elem(2), u32::MAX - 1);
    }

    #[test_log::test]
    fn float_bounds_are_infinite() {
        assert_eq!(f32::lowest(), f32::NEG_INFINITY);
        assert_eq!(f64::highest(), f64::INFINITY);
        assert_eq!(half::f16::highest(), half::f16::INFINITY);
        assert_eq!(f32::lowest().max_elem(f32::NEG_INFINITY), f32::NEG_INFINITY);
    }

    #[test_log::test]
    fn min_and_max_elem() {
        assert_eq!(3_i32.min_elem(-2), -2);
        assert_eq!(3_i32.max_elem(-2), 3);
        assert_eq!(u64::highest().min_elem(7), 7);
        assert_eq!(u64::lowest().max_elem(7), 7);
    }

    #[test_log::test]
    fn line_is_component_wise() {
        let lhs = Float3::new([1.0, 2.0, 3.0]);
        let rhs = Float3::new([4.0, 5.0, 6.0]);

        assert_eq!(lhs.add_elem(rhs), Float3::new([5.0, 7.0, 9.0]));
        assert_eq!(lhs.mul_elem(rhs), Float3::new([4.0, 10.0, 18.0]));
        assert_eq!(Float4::one(), Float4::splat(1.0));
        assert_eq!(Float4::zero()[3], 0.0);
    }
}
