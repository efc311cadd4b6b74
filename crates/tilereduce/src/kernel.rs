use core::marker::PhantomData;

use tilereduce_runtime::prelude::*;

use crate::instructions::ReduceInstruction;

/// Strides of the tree reduction for the largest cube, halved at every step.
const TREE_STRIDES: [usize; 9] = [256, 128, 64, 32, 16, 8, 4, 2, 1];

/// Reduce a slice to one partial value per cube.
///
/// Every cube has `TILE` units and covers `2 * TILE` consecutive elements per pass, moving by the
/// whole grid between passes. Each unit accumulates its elements, then the cube reduces the
/// accumulators in shared memory by halving the active units until one value is left.
///
/// With `EXACT`, the length of the input must be a multiple of `2 * TILE` so that the second
/// load of a unit is always in bounds.
pub struct TileReduceKernel<'a, E, I, const TILE: usize, const EXACT: bool> {
    input: &'a [E],
    _instruction: PhantomData<I>,
}

impl<'a, E, I, const TILE: usize, const EXACT: bool> TileReduceKernel<'a, E, I, TILE, EXACT>
where
    E: CubeElement,
    I: ReduceInstruction<E>,
{
    /// Create the kernel reading `input`.
    pub fn new(input: &'a [E]) -> Self {
        Self {
            input,
            _instruction: PhantomData,
        }
    }

    fn accumulate(&self, cube: &Cube, unit_pos: usize) -> E {
        let len = self.input.len();
        let grid_size = TILE * 2 * cube.cube_count() as usize;
        let mut index = cube.cube_pos() as usize * TILE * 2 + unit_pos;
        let mut accumulator = I::identity();

        while index < len {
            accumulator = I::combine(accumulator, self.input[index]);
            if EXACT || index + TILE < len {
                accumulator = I::combine(accumulator, self.input[index + TILE]);
            }
            index += grid_size;
        }

        accumulator
    }
}

impl<E, I, const TILE: usize, const EXACT: bool> CubeKernel
    for TileReduceKernel<'_, E, I, TILE, EXACT>
where
    E: CubeElement,
    I: ReduceInstruction<E>,
{
    type Output = E;

    fn id(&self) -> KernelId {
        KernelId::new::<TileReduceKernel<'static, E, I, TILE, EXACT>>()
    }

    fn cube_dim(&self) -> CubeDim {
        CubeDim::new_1d(TILE as u32)
    }

    fn execute(&self, cube: &mut Cube, output: &mut WriteOnly<'_, E>) {
        let mut shared = SharedMemory::<E, TILE>::new(I::identity());

        for unit_pos in cube.units() {
            let unit_pos = unit_pos as usize;
            shared[unit_pos] = self.accumulate(cube, unit_pos);
        }
        cube.sync_units();

        let mut strides = TREE_STRIDES
            .iter()
            .copied()
            .filter(|stride| *stride < TILE)
            .peekable();

        while let Some(stride) = strides.next() {
            for unit_pos in 0..stride {
                shared[unit_pos] = I::combine(shared[unit_pos], shared[unit_pos + stride]);
            }
            if strides.peek().is_some() {
                cube.sync_units();
            }
        }

        output.write(shared[0]);
    }
}
