use core::any::TypeId;
use core::fmt::Display;
use core::hash::{Hash, Hasher};

use crate::cube::{Cube, CubeDim, WriteOnly};
use crate::element::CubeElement;

/// Kernel unique identifier.
#[derive(Clone, Copy, Debug)]
pub struct KernelId {
    type_name: &'static str,
    type_id: TypeId,
    cube_dim: Option<CubeDim>,
}

impl PartialEq for KernelId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id && self.cube_dim == other.cube_dim
    }
}

impl Eq for KernelId {}

impl Hash for KernelId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
        self.cube_dim.hash(state);
    }
}

impl Display for KernelId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let short = self
            .type_name
            .split('<')
            .next()
            .and_then(|path| path.split("::").last())
            .unwrap_or(self.type_name);

        match self.cube_dim {
            Some(dim) => write!(f, "{short}[{}x{}x{}]", dim.x, dim.y, dim.z),
            None => f.write_str(short),
        }
    }
}

impl KernelId {
    /// Create a new [kernel id](KernelId) for a type.
    pub fn new<T: 'static>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: core::any::type_name::<T>(),
            cube_dim: None,
        }
    }

    /// Attach the cube dimension the kernel is launched with.
    pub fn cube_dim(mut self, cube_dim: CubeDim) -> Self {
        self.cube_dim = Some(cube_dim);
        self
    }

    /// Full type name of the kernel.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

/// A kernel executed once per cube of a launch grid.
///
/// The kernel owns its launch arguments (input views, scalars). Each cube produces one value,
/// written through the [WriteOnly] slot matching its position.
pub trait CubeKernel: Sync {
    /// Element written by every cube.
    type Output: CubeElement;

    /// Identifier used for logging.
    fn id(&self) -> KernelId;

    /// Number of units in each cube.
    fn cube_dim(&self) -> CubeDim;

    /// Execute every unit of one cube.
    fn execute(&self, cube: &mut Cube, output: &mut WriteOnly<'_, Self::Output>);
}
