use core::time::Duration;
use rayon::prelude::*;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crate::config::{GlobalConfig, logging::LaunchLogLevel};
use crate::cube::{Cube, CubeCount, CubeDim, WriteOnly};
use crate::device::{CpuDevice, DeviceProperties};
use crate::error::{BackTrace, DeviceError, LaunchError, ResourceLimitError};
use crate::kernel::{CubeKernel, KernelId};

/// Options applied to every launch of a client.
#[derive(Clone, Debug, Default)]
pub struct ClientOptions {
    /// Number of workers of a [CpuDevice::Default] device, the available parallelism if unset.
    pub num_threads: Option<usize>,
    /// Watchdog limit of a launch.
    pub launch_timeout: Option<Duration>,
    /// Verbosity of launch logs.
    pub log_level: LaunchLogLevel,
}

impl ClientOptions {
    /// Options read from the global configuration.
    pub fn from_config(config: &GlobalConfig) -> Self {
        Self {
            num_threads: config.runtime.num_threads,
            launch_timeout: config.runtime.launch_timeout(),
            log_level: config.logging.launch,
        }
    }
}

/// Summary of a completed launch.
#[derive(new, Debug, Clone)]
pub struct LaunchReport {
    /// The launched kernel.
    pub kernel: KernelId,
    /// Number of cubes executed.
    pub cubes: u32,
    /// Number of units in each cube.
    pub units_per_cube: u32,
    /// Barriers reached, summed over all cubes.
    pub barriers: u64,
    /// Wall time of the launch.
    pub elapsed: Duration,
}

/// The client is the entry point to launch kernels on a device.
///
/// Cloning a client is cheap, clones share the same workers and device state.
#[derive(Clone, Debug)]
pub struct ComputeClient {
    device: CpuDevice,
    pool: Arc<rayon::ThreadPool>,
    properties: Arc<DeviceProperties>,
    options: ClientOptions,
    lost: Arc<AtomicBool>,
}

impl ComputeClient {
    /// Bring up the device with the given options.
    pub fn new(device: CpuDevice, options: ClientOptions) -> Result<Self, DeviceError> {
        let num_threads = match device {
            CpuDevice::Threads(0) => {
                return Err(DeviceError::Unavailable {
                    reason: "A device needs at least one worker".to_string(),
                });
            }
            CpuDevice::Threads(num_threads) => num_threads,
            CpuDevice::Default => match options.num_threads {
                Some(0) | None => std::thread::available_parallelism()
                    .map(|num| num.get())
                    .unwrap_or(1),
                Some(num_threads) => num_threads,
            },
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|index| format!("tilereduce-worker-{index}"))
            .build()
            .map_err(|err| DeviceError::Unavailable {
                reason: err.to_string(),
            })?;

        log::debug!("Device {device:?} started with {num_threads} workers");

        Ok(Self {
            device,
            pool: Arc::new(pool),
            properties: Arc::new(DeviceProperties::cpu(num_threads)),
            options,
            lost: Arc::new(AtomicBool::new(false)),
        })
    }

    /// The device the client is bound to.
    pub fn device(&self) -> &CpuDevice {
        &self.device
    }

    /// Limits and topology of the device.
    pub fn properties(&self) -> &DeviceProperties {
        &self.properties
    }

    /// Options applied to launches.
    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Whether a previous launch made the device unusable.
    pub fn is_lost(&self) -> bool {
        self.lost.load(Ordering::Acquire)
    }

    /// Execute `kernel` once for every cube of `count`, cube `i` writing `output[i]`.
    ///
    /// Blocks until every cube completed. The launch fails if the device is lost, if the grid
    /// doesn't fit the device or the output, if the watchdog deadline passes, or if the kernel
    /// panics. A panic makes the device lost for every clone of this client.
    pub fn launch<K: CubeKernel>(
        &self,
        kernel: &K,
        count: CubeCount,
        output: &mut [K::Output],
    ) -> Result<LaunchReport, LaunchError> {
        if self.is_lost() {
            return Err(LaunchError::DeviceLost);
        }

        let cube_dim = kernel.cube_dim();
        let num_cubes = count.num_cubes();
        self.validate(cube_dim, num_cubes, output.len())?;

        let id = kernel.id().cube_dim(cube_dim);
        if self.options.log_level != LaunchLogLevel::Disabled {
            log::debug!(
                "Launching {id} on {num_cubes} cubes of {} units",
                cube_dim.num_elems()
            );
        }

        let start = Instant::now();
        let watchdog = self
            .options
            .launch_timeout
            .map(|limit| (limit, start.checked_add(limit)));
        let barriers = AtomicU64::new(0);

        let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.pool.install(|| {
                output[..num_cubes as usize]
                    .par_iter_mut()
                    .enumerate()
                    .try_for_each(|(cube_pos, slot)| {
                        if let Some((limit, Some(deadline))) = watchdog {
                            if Instant::now() >= deadline {
                                return Err(LaunchError::Timeout {
                                    limit,
                                    elapsed: start.elapsed(),
                                });
                            }
                        }

                        let mut cube = Cube::new(cube_pos as u32, cube_dim, num_cubes);
                        kernel.execute(&mut cube, &mut WriteOnly::new(slot));
                        barriers.fetch_add(cube.barriers() as u64, Ordering::Relaxed);

                        Ok(())
                    })
            })
        }));

        match result {
            Ok(Ok(())) => {
                // A cube that started before the deadline may still have finished after it.
                if let Some((limit, _)) = watchdog {
                    let elapsed = start.elapsed();
                    if elapsed > limit {
                        let err = LaunchError::Timeout { limit, elapsed };
                        log::warn!("Launch of {id} aborted: {err}");
                        return Err(err);
                    }
                }

                let report = LaunchReport::new(
                    id,
                    num_cubes,
                    cube_dim.num_elems(),
                    barriers.into_inner(),
                    start.elapsed(),
                );
                if self.options.log_level == LaunchLogLevel::Full {
                    log::trace!("{report:?}");
                }
                Ok(report)
            }
            Ok(Err(err)) => {
                log::warn!("Launch of {id} aborted: {err}");
                Err(err)
            }
            Err(payload) => {
                self.lost.store(true, Ordering::Release);
                let reason = panic_reason(payload.as_ref());
                log::error!("Kernel {id} panicked, device {:?} is lost: {reason}", self.device);
                Err(LaunchError::KernelPanicked { reason })
            }
        }
    }

    fn validate(
        &self,
        cube_dim: CubeDim,
        num_cubes: u32,
        output_len: usize,
    ) -> Result<(), ResourceLimitError> {
        if cube_dim.x == 0 || cube_dim.y == 0 || cube_dim.z == 0 {
            return Err(ResourceLimitError::EmptyCubeDim {
                requested: cube_dim,
                backtrace: BackTrace::capture(),
            });
        }

        let units = cube_dim.checked_num_elems();
        if units.map_or(true, |units| units > self.properties.max_units_per_cube) {
            return Err(ResourceLimitError::Units {
                requested: units.unwrap_or(u32::MAX),
                max: self.properties.max_units_per_cube,
                backtrace: BackTrace::capture(),
            });
        }

        if num_cubes > self.properties.max_cube_count {
            return Err(ResourceLimitError::CubeCount {
                requested: num_cubes,
                max: self.properties.max_cube_count,
                backtrace: BackTrace::capture(),
            });
        }

        if num_cubes as usize > output_len {
            return Err(ResourceLimitError::Output {
                requested: num_cubes,
                available: output_len,
                backtrace: BackTrace::capture(),
            });
        }

        Ok(())
    }
}

fn panic_reason(payload: &(dyn core::any::Any + Send)) -> String {
    if let Some(reason) = payload.downcast_ref::<&str>() {
        reason.to_string()
    } else if let Some(reason) = payload.downcast_ref::<String>() {
        reason.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
