use tilereduce_runtime::client::{ComputeClient, LaunchReport};
use tilereduce_runtime::element::CubeElement;
use tilereduce_runtime::error::LaunchError;

use crate::config::{ReduceConfig, TileSize};
use crate::instructions::ReduceInstruction;
use crate::kernel::TileReduceKernel;

/// Launch the kernel specialization matching `config`, writing one partial per cube.
///
/// Exact kernels are only selected when `config` doesn't ask for bound checks.
pub fn launch_reduce<E, I>(
    client: &ComputeClient,
    input: &[E],
    config: &ReduceConfig,
    partials: &mut [E],
) -> Result<LaunchReport, LaunchError>
where
    E: CubeElement,
    I: ReduceInstruction<E>,
{
    let args = LaunchArgs {
        client,
        input,
        config,
    };

    match (config.tile, config.bound_checks) {
        (TileSize::T512, false) => args.launch::<I, 512, true>(partials),
        (TileSize::T512, true) => args.launch::<I, 512, false>(partials),
        (TileSize::T256, false) => args.launch::<I, 256, true>(partials),
        (TileSize::T256, true) => args.launch::<I, 256, false>(partials),
        (TileSize::T128, false) => args.launch::<I, 128, true>(partials),
        (TileSize::T128, true) => args.launch::<I, 128, false>(partials),
        (TileSize::T64, false) => args.launch::<I, 64, true>(partials),
        (TileSize::T64, true) => args.launch::<I, 64, false>(partials),
        (TileSize::T32, false) => args.launch::<I, 32, true>(partials),
        (TileSize::T32, true) => args.launch::<I, 32, false>(partials),
        (TileSize::T16, false) => args.launch::<I, 16, true>(partials),
        (TileSize::T16, true) => args.launch::<I, 16, false>(partials),
        (TileSize::T8, false) => args.launch::<I, 8, true>(partials),
        (TileSize::T8, true) => args.launch::<I, 8, false>(partials),
        (TileSize::T4, false) => args.launch::<I, 4, true>(partials),
        (TileSize::T4, true) => args.launch::<I, 4, false>(partials),
        (TileSize::T2, false) => args.launch::<I, 2, true>(partials),
        (TileSize::T2, true) => args.launch::<I, 2, false>(partials),
        (TileSize::T1, false) => args.launch::<I, 1, true>(partials),
        (TileSize::T1, true) => args.launch::<I, 1, false>(partials),
    }
}

/// Combine partials on the host, in index order.
pub fn combine_partials<E, I>(partials: &[E]) -> E
where
    E: CubeElement,
    I: ReduceInstruction<E>,
{
    partials
        .iter()
        .fold(I::identity(), |accumulator, partial| {
            I::combine(accumulator, *partial)
        })
}

struct LaunchArgs<'a, E> {
    client: &'a ComputeClient,
    input: &'a [E],
    config: &'a ReduceConfig,
}

impl<E: CubeElement> LaunchArgs<'_, E> {
    fn launch<I: ReduceInstruction<E>, const TILE: usize, const EXACT: bool>(
        &self,
        partials: &mut [E],
    ) -> Result<LaunchReport, LaunchError> {
        let kernel = TileReduceKernel::<E, I, TILE, EXACT>::new(self.input);
        self.client
            .launch(&kernel, self.config.cube_count, partials)
    }
}
