use core::marker::PhantomData;

use tilereduce_runtime::client::ComputeClient;
use tilereduce_runtime::config::GlobalConfig;
use tilereduce_runtime::element::CubeElement;
use tilereduce_runtime::CpuRuntime;

use crate::config::{ReduceConfig, ReduceLimits};
use crate::instructions::ReduceInstruction;
use crate::launch::{combine_partials, launch_reduce};
use crate::{ReduceError, ReduceStrategy};

/// Reduce slices of `E` with the instruction `I` on a bound compute client.
///
/// The engine owns one partial per cube of the largest launch and reuses it across calls.
/// Reducing takes `&mut self`, so one engine serves one reduction at a time while separate
/// engines run concurrently.
///
/// ```
/// use tilereduce::{Max, ReduceEngine};
///
/// let mut engine = ReduceEngine::<i32, Max>::try_default().unwrap();
/// assert_eq!(engine.reduce(&[3, 1, 4, 1, 5, 9, 2, 6]).unwrap(), 9);
/// ```
pub struct ReduceEngine<E: CubeElement, I: ReduceInstruction<E>> {
    client: ComputeClient,
    partials: Vec<E>,
    limits: ReduceLimits,
    strategy: ReduceStrategy,
    poisoned: bool,
    _instruction: PhantomData<I>,
}

impl<E: CubeElement, I: ReduceInstruction<E>> core::fmt::Debug for ReduceEngine<E, I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ReduceEngine")
            .field("device", self.client.device())
            .field("limits", &self.limits)
            .field("strategy", &self.strategy)
            .field("poisoned", &self.poisoned)
            .finish()
    }
}

impl<E: CubeElement, I: ReduceInstruction<E>> ReduceEngine<E, I> {
    /// Bind an engine to `client`, with the limits of the global configuration.
    pub fn new(client: ComputeClient) -> Result<Self, ReduceError> {
        let limits = ReduceLimits::from_config(&GlobalConfig::get())?;
        Ok(Self::with_limits(client, limits))
    }

    /// Bind an engine to `client` with explicit limits.
    ///
    /// The cube count is lowered to the largest grid the device launches.
    pub fn with_limits(client: ComputeClient, limits: ReduceLimits) -> Self {
        let device_max = client.properties().max_cube_count;
        if limits.max_cube_count() > device_max {
            log::warn!(
                "max_cube_count {} exceeds the device limit, using {device_max}",
                limits.max_cube_count()
            );
        }
        let limits = limits.clamp_cube_count(device_max);

        Self {
            client,
            partials: vec![I::identity(); limits.max_cube_count() as usize],
            limits,
            strategy: ReduceStrategy::default(),
            poisoned: false,
            _instruction: PhantomData,
        }
    }

    /// Bind an engine to the default device.
    pub fn try_default() -> Result<Self, ReduceError> {
        Self::new(CpuRuntime::default_client()?)
    }

    /// Use `strategy` for every later reduction.
    pub fn with_strategy(mut self, strategy: ReduceStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The client the engine launches on.
    pub fn client(&self) -> &ComputeClient {
        &self.client
    }

    /// Limits sizing every reduction.
    pub fn limits(&self) -> &ReduceLimits {
        &self.limits
    }

    /// Strategy of every reduction.
    pub fn strategy(&self) -> &ReduceStrategy {
        &self.strategy
    }

    /// Whether a failed launch made the engine unusable.
    pub fn is_poisoned(&self) -> bool {
        self.poisoned
    }

    /// Sizing used to reduce `len` elements, `None` when nothing is launched.
    pub fn config_for(&self, len: usize) -> Option<ReduceConfig> {
        ReduceConfig::generate(len, &self.limits, &self.strategy)
    }

    /// Combine every element of `input`, returning the identity for an empty slice.
    ///
    /// A timeout or a lost device poisons the engine: this call and every later one fail.
    pub fn reduce(&mut self, input: &[E]) -> Result<E, ReduceError> {
        if self.poisoned {
            return Err(ReduceError::Poisoned);
        }

        let Some(config) = self.config_for(input.len()) else {
            return Ok(I::identity());
        };

        let report = launch_reduce::<E, I>(&self.client, input, &config, &mut self.partials)
            .map_err(|err| {
                let err = ReduceError::from(err);
                if err.is_fatal() {
                    log::error!("Reduction of {} elements failed, engine poisoned", input.len());
                    self.poisoned = true;
                }
                err
            })?;

        log::trace!(
            "Reduced {} elements with {} cubes of {} units",
            input.len(),
            report.cubes,
            report.units_per_cube
        );

        Ok(combine_partials::<E, I>(
            &self.partials[..config.num_cubes() as usize],
        ))
    }
}
