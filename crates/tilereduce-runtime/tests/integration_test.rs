mod dummy;

use core::time::Duration;
use pretty_assertions::assert_eq;

use crate::dummy::{
    test_client, DummyBarriers, DummyPanicking, DummySleeping, DummyUnitPositionSum,
};

use tilereduce_runtime::prelude::*;

#[test_log::test]
fn launch_writes_one_value_per_cube() {
    let client = test_client(2);
    let mut output = vec![0_u32; 4];

    client
        .launch(
            &DummyUnitPositionSum {
                cube_dim: CubeDim::new_1d(4),
            },
            CubeCount::new_1d(3),
            &mut output,
        )
        .unwrap();

    // cube 0: 0+1+2+3, cube 1: 4+5+6+7, cube 2: 8+9+10+11, slot 3 untouched.
    assert_eq!(output, vec![6, 22, 38, 0]);
}

#[test_log::test]
fn report_sums_barriers_of_all_cubes() {
    let client = test_client(4);
    let mut output = vec![0_u32; 8];

    let report = client
        .launch(&DummyBarriers { barriers: 3 }, CubeCount::new_1d(8), &mut output)
        .unwrap();

    assert_eq!(report.cubes, 8);
    assert_eq!(report.units_per_cube, 4);
    assert_eq!(report.barriers, 24);
    assert_eq!(output, (0..8).collect::<Vec<_>>());
}

#[test_log::test]
fn empty_grid_executes_nothing() {
    let client = test_client(1);
    let mut output = vec![7_u32; 2];

    let report = client
        .launch(&DummyBarriers { barriers: 1 }, CubeCount::new_1d(0), &mut output)
        .unwrap();

    assert_eq!(report.barriers, 0);
    assert_eq!(output, vec![7, 7]);
}

#[test_log::test]
fn too_many_units_is_rejected() {
    let client = test_client(1);
    let mut output = vec![0_u32; 1];
    let max = client.properties().max_units_per_cube;

    let result = client.launch(
        &DummyUnitPositionSum {
            cube_dim: CubeDim::new_1d(max * 2),
        },
        CubeCount::new_single(),
        &mut output,
    );

    assert!(matches!(
        result,
        Err(LaunchError::TooManyResources(ResourceLimitError::Units { .. }))
    ));
}

#[test_log::test]
fn overflowing_cube_dim_is_rejected() {
    let client = test_client(1);
    let mut output = vec![0_u32; 1];

    let result = client.launch(
        &DummyUnitPositionSum {
            cube_dim: CubeDim::new_2d(65_536, 65_536),
        },
        CubeCount::new_single(),
        &mut output,
    );

    assert!(matches!(
        result,
        Err(LaunchError::TooManyResources(ResourceLimitError::Units {
            requested: u32::MAX,
            ..
        }))
    ));
}

#[test_log::test]
fn output_must_hold_every_cube() {
    let client = test_client(1);
    let mut output = vec![0_u32; 2];

    let result = client.launch(&DummyBarriers { barriers: 0 }, CubeCount::new_1d(3), &mut output);

    assert!(matches!(
        result,
        Err(LaunchError::TooManyResources(ResourceLimitError::Output {
            requested: 3,
            available: 2,
            ..
        }))
    ));
}

#[test_log::test]
fn watchdog_aborts_late_launch() {
    let options = ClientOptions {
        launch_timeout: Some(Duration::ZERO),
        ..Default::default()
    };
    let client = ComputeClient::new(CpuDevice::Threads(1), options).unwrap();
    let mut output = vec![0_u32; 2];

    let result = client.launch(&DummyBarriers { barriers: 0 }, CubeCount::new_1d(2), &mut output);

    assert!(matches!(result, Err(LaunchError::Timeout { .. })));
    assert!(!client.is_lost());
}

#[test_log::test]
fn watchdog_aborts_cube_running_past_deadline() {
    let options = ClientOptions {
        launch_timeout: Some(Duration::from_millis(20)),
        ..Default::default()
    };
    let client = ComputeClient::new(CpuDevice::Threads(2), options).unwrap();
    let mut output = vec![0_u32; 1];

    let result = client.launch(
        &DummySleeping {
            duration: Duration::from_millis(300),
        },
        CubeCount::new_single(),
        &mut output,
    );

    match result {
        Err(LaunchError::Timeout { limit, elapsed }) => {
            assert_eq!(limit, Duration::from_millis(20));
            assert!(elapsed >= Duration::from_millis(300));
        }
        other => panic!("Expected a timeout, got {other:?}"),
    }
    assert!(!client.is_lost());
}

#[test_log::test]
fn watchdog_accepts_launch_within_deadline() {
    let options = ClientOptions {
        launch_timeout: Some(Duration::from_secs(30)),
        ..Default::default()
    };
    let client = ComputeClient::new(CpuDevice::Threads(2), options).unwrap();
    let mut output = vec![0_u32; 2];

    client
        .launch(
            &DummySleeping {
                duration: Duration::from_millis(1),
            },
            CubeCount::new_1d(2),
            &mut output,
        )
        .unwrap();

    assert_eq!(output, vec![0, 1]);
}

#[test_log::test]
fn kernel_panic_loses_the_device() {
    let client = test_client(2);
    let mut output = vec![0.0_f32; 4];

    let result = client.launch(&DummyPanicking { cube_pos: 2 }, CubeCount::new_1d(4), &mut output);
    assert!(matches!(result, Err(LaunchError::KernelPanicked { .. })));
    assert!(client.is_lost());

    let result = client.launch(&DummyPanicking { cube_pos: 9 }, CubeCount::new_1d(4), &mut output);
    assert!(matches!(result, Err(LaunchError::DeviceLost)));
}

#[test_log::test]
fn device_without_worker_is_unavailable() {
    let result = ComputeClient::new(CpuDevice::Threads(0), ClientOptions::default());

    assert!(matches!(result, Err(DeviceError::Unavailable { .. })));
}

#[test_log::test]
fn runtime_caches_clients_per_device() {
    let device = CpuDevice::Threads(3);
    let first = CpuRuntime::client(&device).unwrap();
    let second = CpuRuntime::client(&device).unwrap();

    assert_eq!(first.properties().num_workers, 3);
    assert_eq!(second.device(), &device);
}

#[test_log::test]
fn runtime_replaces_lost_client() {
    let device = CpuDevice::Threads(5);
    let client = CpuRuntime::client(&device).unwrap();
    let mut output = vec![0.0_f32; 1];

    let _ = client.launch(&DummyPanicking { cube_pos: 0 }, CubeCount::new_single(), &mut output);
    assert!(client.is_lost());

    let replaced = CpuRuntime::client(&device).unwrap();
    assert!(!replaced.is_lost());
    assert!(
        replaced
            .launch(&DummyPanicking { cube_pos: 1 }, CubeCount::new_single(), &mut output)
            .is_ok()
    );
    assert_eq!(output, vec![1.0]);
}
