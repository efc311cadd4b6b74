use core::time::Duration;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::sync::Arc;
use thiserror::Error;

use crate::cube::CubeDim;

/// Stack of the thread that detected a resource error, captured whatever `RUST_BACKTRACE` says.
#[derive(Clone)]
pub struct BackTrace {
    frames: Arc<Backtrace>,
}

impl BackTrace {
    /// Capture the stack of the current thread.
    pub fn capture() -> Self {
        Self {
            frames: Arc::new(Backtrace::force_capture()),
        }
    }

    /// Whether frames were recorded, which fails only on unsupported platforms.
    pub fn is_captured(&self) -> bool {
        self.frames.status() == BacktraceStatus::Captured
    }
}

impl core::fmt::Debug for BackTrace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.frames, f)
    }
}

impl core::fmt::Display for BackTrace {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.frames, f)
    }
}

/// The device can't run kernels.
#[derive(Error, Clone)]
pub enum DeviceError {
    /// The device can't be brought up.
    #[error("The device is unavailable\nCaused by:\n  {reason}")]
    Unavailable {
        /// Why the device can't be used.
        reason: String,
    },
}

impl core::fmt::Debug for DeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

/// Kernel Launch Errors.
#[derive(Error, Clone)]
pub enum LaunchError {
    /// Too many resources were requested
    #[error("Too many resources were requested during launch\n{0}")]
    TooManyResources(#[from] ResourceLimitError),

    /// The watchdog aborted a launch running past its deadline.
    #[error("The launch exceeded its time limit of {limit:?} after {elapsed:?}")]
    Timeout {
        /// The configured limit.
        limit: Duration,
        /// Time spent before the launch was aborted.
        elapsed: Duration,
    },

    /// A kernel panicked while executing a cube, the device is lost afterward.
    #[error("The kernel panicked during execution\nCaused by:\n  {reason}")]
    KernelPanicked {
        /// The panic payload, when it is a string.
        reason: String,
    },

    /// The device was lost by a previous launch and can't execute anymore.
    #[error("The device was lost and can't execute kernels anymore")]
    DeviceLost,
}

impl core::fmt::Debug for LaunchError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}

/// Resource limit errors.
#[derive(Error, Clone)]
pub enum ResourceLimitError {
    /// Total units exceeds maximum
    #[error(
        "Total unit count exceeds maximum.\nRequested {requested} units, max units is {max}.\nBacktrace\n{backtrace}"
    )]
    Units {
        /// Requested value
        requested: u32,
        /// Maximum value
        max: u32,
        /// The backtrace for this error.
        backtrace: BackTrace,
    },
    /// Cube count exceeds maximum
    #[error(
        "Cube count exceeds maximum.\nRequested {requested} cubes, max is {max}.\nBacktrace\n{backtrace}"
    )]
    CubeCount {
        /// Requested value
        requested: u32,
        /// Maximum value
        max: u32,
        /// The backtrace for this error.
        backtrace: BackTrace,
    },
    /// `CubeDim` has an axis with no unit.
    #[error("Cube dim has an empty axis.\nRequested {requested:?}.\nBacktrace\n{backtrace}")]
    EmptyCubeDim {
        /// Requested value
        requested: CubeDim,
        /// The backtrace for this error.
        backtrace: BackTrace,
    },
    /// The output can't hold one value per cube.
    #[error(
        "Output is too small for the launch grid.\nRequested {requested} cubes, output holds {available}.\nBacktrace\n{backtrace}"
    )]
    Output {
        /// Number of cubes requested
        requested: u32,
        /// Number of output slots
        available: usize,
        /// The backtrace for this error.
        backtrace: BackTrace,
    },
}

impl core::fmt::Debug for ResourceLimitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_fmt(format_args!("{self}"))
    }
}
