use tilereduce_runtime::prelude::*;

/// Every cube writes the sum of the global positions of its units.
#[derive(Debug)]
pub struct DummyUnitPositionSum {
    pub cube_dim: CubeDim,
}

impl CubeKernel for DummyUnitPositionSum {
    type Output = u32;

    fn id(&self) -> KernelId {
        KernelId::new::<Self>()
    }

    fn cube_dim(&self) -> CubeDim {
        self.cube_dim
    }

    fn execute(&self, cube: &mut Cube, output: &mut WriteOnly<'_, u32>) {
        let units = cube.cube_dim().num_elems();
        let sum = cube
            .units()
            .map(|unit| cube.cube_pos() * units + unit)
            .sum();
        output.write(sum);
    }
}

/// Every cube goes through `barriers` barriers and writes its position.
#[derive(Debug)]
pub struct DummyBarriers {
    pub barriers: u32,
}

impl CubeKernel for DummyBarriers {
    type Output = u32;

    fn id(&self) -> KernelId {
        KernelId::new::<Self>()
    }

    fn cube_dim(&self) -> CubeDim {
        CubeDim::new_1d(4)
    }

    fn execute(&self, cube: &mut Cube, output: &mut WriteOnly<'_, u32>) {
        for _ in 0..self.barriers {
            cube.sync_units();
        }
        output.write(cube.cube_pos());
    }
}

/// Panics while executing the given cube.
#[derive(Debug)]
pub struct DummyPanicking {
    pub cube_pos: u32,
}

impl CubeKernel for DummyPanicking {
    type Output = f32;

    fn id(&self) -> KernelId {
        KernelId::new::<Self>()
    }

    fn cube_dim(&self) -> CubeDim {
        CubeDim::new_1d(1)
    }

    fn execute(&self, cube: &mut Cube, output: &mut WriteOnly<'_, f32>) {
        if cube.cube_pos() == self.cube_pos {
            panic!("Cube {} out of bounds", self.cube_pos);
        }
        output.write(1.0);
    }
}

/// Every cube sleeps for `duration` before writing its position.
#[derive(Debug)]
pub struct DummySleeping {
    pub duration: core::time::Duration,
}

impl CubeKernel for DummySleeping {
    type Output = u32;

    fn id(&self) -> KernelId {
        KernelId::new::<Self>()
    }

    fn cube_dim(&self) -> CubeDim {
        CubeDim::new_single()
    }

    fn execute(&self, cube: &mut Cube, output: &mut WriteOnly<'_, u32>) {
        std::thread::sleep(self.duration);
        output.write(cube.cube_pos());
    }
}
