use core::ops::{Index, IndexMut, Range};

use crate::element::CubeElement;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, serde::Serialize, serde::Deserialize)]
#[allow(missing_docs)]
/// The number of units across all 3 axis totalling to the number of working units in a cube.
pub struct CubeDim {
    /// The number of units in the x axis.
    pub x: u32,
    /// The number of units in the y axis.
    pub y: u32,
    /// The number of units in the z axis.
    pub z: u32,
}

impl CubeDim {
    /// Create a new cube dim with x = y = z = 1.
    pub const fn new_single() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }

    /// Create a new cube dim with the given x, and y = z = 1.
    pub const fn new_1d(x: u32) -> Self {
        Self { x, y: 1, z: 1 }
    }

    /// Create a new cube dim with the given x and y, and z = 1.
    pub const fn new_2d(x: u32, y: u32) -> Self {
        Self { x, y, z: 1 }
    }

    /// Total numbers of units per cube
    pub const fn num_elems(&self) -> u32 {
        self.x * self.y * self.z
    }

    /// Total numbers of units per cube, `None` when it doesn't fit a `u32`.
    pub const fn checked_num_elems(&self) -> Option<u32> {
        match self.x.checked_mul(self.y) {
            Some(xy) => xy.checked_mul(self.z),
            None => None,
        }
    }
}

/// Specifies the number of cubes to be dispatched for a kernel.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum CubeCount {
    /// Dispatch a known count of x, y, z cubes.
    Static(u32, u32, u32),
}

impl CubeCount {
    /// Create a new static cube count with the given x = y = z = 1.
    pub fn new_single() -> Self {
        CubeCount::Static(1, 1, 1)
    }

    /// Create a new static cube count with the given x, and y = z = 1.
    pub fn new_1d(x: u32) -> Self {
        CubeCount::Static(x, 1, 1)
    }

    /// Total number of cubes to dispatch.
    pub fn num_cubes(&self) -> u32 {
        match self {
            CubeCount::Static(x, y, z) => x * y * z,
        }
    }
}

/// Builtin values visible to a kernel while one cube executes.
///
/// Units of a cube run phase by phase in program order: every unit finishes the current phase
/// before any unit starts the next one, so [sync_units](Cube::sync_units) only marks the phase
/// boundary.
#[derive(Debug)]
pub struct Cube {
    cube_pos: u32,
    cube_dim: CubeDim,
    cube_count: u32,
    barriers: u32,
}

impl Cube {
    pub(crate) fn new(cube_pos: u32, cube_dim: CubeDim, cube_count: u32) -> Self {
        Self {
            cube_pos,
            cube_dim,
            cube_count,
            barriers: 0,
        }
    }

    /// Position of the cube in the launch grid.
    pub fn cube_pos(&self) -> u32 {
        self.cube_pos
    }

    /// Dimension of the cube.
    pub fn cube_dim(&self) -> CubeDim {
        self.cube_dim
    }

    /// Number of cubes in the launch grid.
    pub fn cube_count(&self) -> u32 {
        self.cube_count
    }

    /// Position of every unit of the cube, in order.
    pub fn units(&self) -> Range<u32> {
        0..self.cube_dim.num_elems()
    }

    /// Wait for every unit of the cube to reach this point.
    pub fn sync_units(&mut self) {
        self.barriers += 1;
    }

    /// Number of barriers the cube went through so far.
    pub fn barriers(&self) -> u32 {
        self.barriers
    }
}

/// Memory local to one cube, sized at compile time.
#[derive(Debug)]
pub struct SharedMemory<E, const SIZE: usize> {
    values: [E; SIZE],
}

impl<E: CubeElement, const SIZE: usize> SharedMemory<E, SIZE> {
    /// Allocate the shared memory with every slot set to `value`.
    pub fn new(value: E) -> Self {
        Self {
            values: [value; SIZE],
        }
    }

    /// Number of slots.
    pub const fn len(&self) -> usize {
        SIZE
    }

    /// Whether the memory has no slot.
    pub const fn is_empty(&self) -> bool {
        SIZE == 0
    }
}

impl<E, const SIZE: usize> Index<usize> for SharedMemory<E, SIZE> {
    type Output = E;

    fn index(&self, index: usize) -> &Self::Output {
        &self.values[index]
    }
}

impl<E, const SIZE: usize> IndexMut<usize> for SharedMemory<E, SIZE> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.values[index]
    }
}

/// Output slot a cube can write to but never read.
#[derive(Debug)]
pub struct WriteOnly<'a, E> {
    slot: &'a mut E,
}

impl<'a, E: CubeElement> WriteOnly<'a, E> {
    pub(crate) fn new(slot: &'a mut E) -> Self {
        Self { slot }
    }

    /// Store `value` in the slot.
    pub fn write(&mut self, value: E) {
        *self.slot = value;
    }
}
