use serde::{Deserialize, Serialize};

/// How a reduction is executed.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
pub struct ReduceStrategy {
    /// When the kernel checks that the second element a unit loads is in bounds.
    pub bound_checks: BoundChecks,
}

/// Selects between the exact and the checked kernel variants.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
pub enum BoundChecks {
    /// Skip the check when the input length is a multiple of the elements a cube covers per pass.
    #[default]
    Auto,
    /// Always run the checked variant.
    Always,
}

impl ReduceStrategy {
    /// Strategy running the checked kernel whatever the input length.
    pub fn checked() -> Self {
        Self {
            bound_checks: BoundChecks::Always,
        }
    }
}
