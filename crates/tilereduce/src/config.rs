use tilereduce_runtime::config::GlobalConfig;
use tilereduce_runtime::cube::{CubeCount, CubeDim};

use crate::{BoundChecks, ReduceError, ReduceStrategy};

/// Number of units of a reduction cube, one variant per compiled kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[allow(missing_docs)]
pub enum TileSize {
    T1,
    T2,
    T4,
    T8,
    T16,
    T32,
    T64,
    T128,
    T256,
    T512,
}

impl TileSize {
    /// Every tile size, smallest first.
    pub const ALL: [TileSize; 10] = [
        TileSize::T1,
        TileSize::T2,
        TileSize::T4,
        TileSize::T8,
        TileSize::T16,
        TileSize::T32,
        TileSize::T64,
        TileSize::T128,
        TileSize::T256,
        TileSize::T512,
    ];

    /// The largest tile size.
    pub const MAX: TileSize = TileSize::T512;

    /// Number of units of the tile.
    pub const fn units(self) -> u32 {
        1 << self as u32
    }

    /// The tile with exactly `units` units, if there is one.
    pub fn from_units(units: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|tile| tile.units() == units)
    }

    /// Smallest tile with at least `units` units, never larger than `max`.
    pub fn fitting(units: usize, max: TileSize) -> Self {
        Self::ALL
            .into_iter()
            .find(|tile| tile.units() as usize >= units)
            .map_or(max, |tile| tile.min(max))
    }
}

/// Bounds used to size every reduction of an engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceLimits {
    max_tile: TileSize,
    max_cube_count: u32,
}

impl Default for ReduceLimits {
    fn default() -> Self {
        Self {
            max_tile: TileSize::MAX,
            max_cube_count: 64,
        }
    }
}

impl ReduceLimits {
    /// Validate the limits.
    ///
    /// `max_units_per_cube` must be a power of two no larger than 512, and `max_cube_count` can't
    /// be zero.
    pub fn new(max_units_per_cube: u32, max_cube_count: u32) -> Result<Self, ReduceError> {
        let max_tile =
            TileSize::from_units(max_units_per_cube).ok_or_else(|| ReduceError::InvalidLimits {
                reason: format!(
                    "max_units_per_cube must be a power of two between 1 and {}, got {max_units_per_cube}",
                    TileSize::MAX.units()
                ),
            })?;

        if max_cube_count == 0 {
            return Err(ReduceError::InvalidLimits {
                reason: "max_cube_count must be at least 1".to_string(),
            });
        }

        Ok(Self {
            max_tile,
            max_cube_count,
        })
    }

    /// Limits of the `[reduce]` section of the configuration.
    pub fn from_config(config: &GlobalConfig) -> Result<Self, ReduceError> {
        Self::new(
            config.reduce.max_units_per_cube,
            config.reduce.max_cube_count,
        )
    }

    /// Lower the cube count to what a device can launch.
    pub(crate) fn clamp_cube_count(mut self, device_max: u32) -> Self {
        self.max_cube_count = self.max_cube_count.min(device_max.max(1));
        self
    }

    /// Largest cube of a launch.
    pub fn max_tile(&self) -> TileSize {
        self.max_tile
    }

    /// Largest number of cubes of a launch, also the size of the partial buffer.
    pub fn max_cube_count(&self) -> u32 {
        self.max_cube_count
    }
}

/// Sizing of one reduction launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceConfig {
    /// Units of each cube.
    pub cube_dim: CubeDim,
    /// Cubes of the launch.
    pub cube_count: CubeCount,
    /// The kernel specialization matching `cube_dim`.
    pub tile: TileSize,
    /// Whether the kernel checks its second load.
    pub bound_checks: bool,
}

impl ReduceConfig {
    /// Size the launch reducing `len` elements.
    ///
    /// Returns `None` for an empty input, which is reduced without any launch.
    pub fn generate(len: usize, limits: &ReduceLimits, strategy: &ReduceStrategy) -> Option<Self> {
        if len == 0 {
            return None;
        }

        let config = Self::new()
            .generate_cube_dim(len, limits)
            .generate_cube_count(len, limits)
            .generate_bound_checks(len, strategy);

        Some(config)
    }

    fn new() -> Self {
        Self {
            cube_dim: CubeDim::new_single(),
            cube_count: CubeCount::new_single(),
            tile: TileSize::T1,
            bound_checks: true,
        }
    }

    fn generate_cube_dim(mut self, len: usize, limits: &ReduceLimits) -> Self {
        let max = limits.max_tile();
        // Each unit loads two elements per pass.
        self.tile = if len < max.units() as usize * 2 {
            TileSize::fitting(len.div_ceil(2), max)
        } else {
            max
        };
        self.cube_dim = CubeDim::new_1d(self.tile.units());
        self
    }

    fn generate_cube_count(mut self, len: usize, limits: &ReduceLimits) -> Self {
        let per_cube = self.tile.units() as usize * 2;
        let cube_count = len
            .div_ceil(per_cube)
            .min(limits.max_cube_count() as usize);
        self.cube_count = CubeCount::new_1d(cube_count as u32);
        self
    }

    fn generate_bound_checks(mut self, len: usize, strategy: &ReduceStrategy) -> Self {
        self.bound_checks = match strategy.bound_checks {
            BoundChecks::Always => true,
            BoundChecks::Auto => len % (self.tile.units() as usize * 2) != 0,
        };
        self
    }

    /// Number of cubes launched, also the number of partials combined on the host.
    pub fn num_cubes(&self) -> u32 {
        self.cube_count.num_cubes()
    }
}
