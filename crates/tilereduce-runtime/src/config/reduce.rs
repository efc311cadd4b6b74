/// Sizing limits of the reduction dispatcher.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct ReduceLimitsConfig {
    /// Maximum number of units per cube. Must be a power of two no larger than 512.
    #[serde(default = "default_max_units_per_cube")]
    pub max_units_per_cube: u32,

    /// Maximum number of cubes in a launch, also the length of the partial buffer.
    #[serde(default = "default_max_cube_count")]
    pub max_cube_count: u32,
}

impl Default for ReduceLimitsConfig {
    fn default() -> Self {
        Self {
            max_units_per_cube: default_max_units_per_cube(),
            max_cube_count: default_max_cube_count(),
        }
    }
}

fn default_max_units_per_cube() -> u32 {
    512
}

fn default_max_cube_count() -> u32 {
    64
}
