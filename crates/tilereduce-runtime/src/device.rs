/// A CPU device whose workers execute the cubes of a launch in parallel.
#[derive(Clone, Debug, Default, Hash, PartialEq, Eq)]
pub enum CpuDevice {
    /// Worker count taken from the global config, or the available parallelism.
    #[default]
    Default,
    /// A device with exactly this many workers.
    Threads(usize),
}

/// Limits and topology of a device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceProperties {
    /// Maximum number of units in one cube.
    pub max_units_per_cube: u32,
    /// Maximum number of cubes in one launch.
    pub max_cube_count: u32,
    /// Number of workers executing cubes concurrently.
    pub num_workers: usize,
}

impl DeviceProperties {
    pub(crate) fn cpu(num_workers: usize) -> Self {
        Self {
            max_units_per_cube: 1024,
            max_cube_count: u16::MAX as u32,
            num_workers,
        }
    }
}
