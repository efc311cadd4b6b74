use thiserror::Error;
use tilereduce_runtime::error::{DeviceError, LaunchError};

/// Errors that can occur while building or running a reduction.
#[derive(Error, Clone)]
pub enum ReduceError {
    /// The device bound to the engine can't be used.
    #[error("The device can't run the reduction\nCaused by:\n  {0}")]
    Device(#[from] DeviceError),

    /// The reduction kernel failed to launch or to complete.
    #[error("The reduction launch failed\nCaused by:\n  {0}")]
    Launch(#[from] LaunchError),

    /// The limits can't size a reduction.
    #[error("Invalid reduce limits: {reason}")]
    InvalidLimits {
        /// Which limit is rejected.
        reason: String,
    },

    /// A previous launch failed and left the partial buffer undefined.
    #[error("A previous launch of this engine failed, a new engine must be created")]
    Poisoned,
}

impl core::fmt::Debug for ReduceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

impl ReduceError {
    /// Whether the error leaves the engine partial buffer in an undefined state.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(
            self,
            ReduceError::Launch(
                LaunchError::Timeout { .. } | LaunchError::KernelPanicked { .. } | LaunchError::DeviceLost
            )
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilereduce_runtime::error::{BackTrace, ResourceLimitError};

    #[test_log::test]
    fn only_execution_failures_are_fatal() {
        let timeout = ReduceError::from(LaunchError::Timeout {
            limit: core::time::Duration::ZERO,
            elapsed: core::time::Duration::ZERO,
        });
        let resources = ReduceError::from(LaunchError::TooManyResources(
            ResourceLimitError::Units {
                requested: 2048,
                max: 1024,
                backtrace: BackTrace::capture(),
            },
        ));
        let device = ReduceError::from(DeviceError::Unavailable {
            reason: "no worker".to_string(),
        });

        assert!(timeout.is_fatal());
        assert!(ReduceError::from(LaunchError::DeviceLost).is_fatal());
        assert!(!resources.is_fatal());
        assert!(!device.is_fatal());
        assert!(!ReduceError::Poisoned.is_fatal());
    }
}
