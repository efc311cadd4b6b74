mod kernels;

pub use kernels::*;

use tilereduce_runtime::prelude::*;

pub fn test_client(num_threads: usize) -> ComputeClient {
    ComputeClient::new(CpuDevice::Threads(num_threads), ClientOptions::default()).unwrap()
}
