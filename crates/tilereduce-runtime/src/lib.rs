#![warn(missing_docs)]

//! Runtime executing cube kernels on CPU workers.
//!
//! A launch dispatches a grid of cubes. Every cube runs its units with a fixed-size shared
//! memory and barriers, and writes one value to the launch output. Cubes are independent and
//! execute concurrently on the device workers.

#[macro_use]
extern crate derive_new;

/// Compute client module.
pub mod client;
/// Configuration module.
pub mod config;
/// Cube model module.
pub mod cube;
/// Device module.
pub mod device;
/// Element types module.
pub mod element;
/// Error module.
pub mod error;
/// Kernel module.
pub mod kernel;

mod runtime;

pub use runtime::*;

/// Everything needed to write and launch a kernel.
pub mod prelude {
    pub use crate::client::{ClientOptions, ComputeClient, LaunchReport};
    pub use crate::cube::{Cube, CubeCount, CubeDim, SharedMemory, WriteOnly};
    pub use crate::device::CpuDevice;
    pub use crate::element::{CubeElement, Float3, Float4, Line, Numeric, Ordered};
    pub use crate::error::{DeviceError, LaunchError, ResourceLimitError};
    pub use crate::kernel::{CubeKernel, KernelId};
    pub use crate::{ComputeRuntime, CpuRuntime};
}
