/// Logging config module.
pub mod logging;
/// Reduce config module.
pub mod reduce;
/// Runtime config module.
pub mod runtime;

mod base;

pub use base::*;
