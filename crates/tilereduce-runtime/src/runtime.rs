use core::ops::DerefMut;
use hashbrown::HashMap;

use crate::client::{ClientOptions, ComputeClient};
use crate::config::GlobalConfig;
use crate::device::CpuDevice;
use crate::error::DeviceError;

/// The compute type has the responsibility to retrieve the correct compute client based on the
/// given device.
pub struct ComputeRuntime<Device> {
    clients: spin::Mutex<Option<HashMap<Device, ComputeClient>>>,
}

impl<Device> Default for ComputeRuntime<Device>
where
    Device: core::hash::Hash + PartialEq + Eq + Clone + core::fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Device> ComputeRuntime<Device>
where
    Device: core::hash::Hash + PartialEq + Eq + Clone + core::fmt::Debug,
{
    /// Create a new compute.
    pub const fn new() -> Self {
        Self {
            clients: spin::Mutex::new(None),
        }
    }

    /// Get the compute client for the given device.
    ///
    /// Provide the init function to create a new client if it isn't already initialized. A
    /// cached client whose device was lost is replaced by a new one.
    pub fn client<Init>(&self, device: &Device, init: Init) -> Result<ComputeClient, DeviceError>
    where
        Init: FnOnce() -> Result<ComputeClient, DeviceError>,
    {
        let mut clients = self.clients.lock();
        let clients = clients.deref_mut().get_or_insert_with(HashMap::new);

        if let Some(client) = clients.get(device) {
            if !client.is_lost() {
                return Ok(client.clone());
            }
            log::warn!("Device {device:?} was lost, creating a new client");
        }

        let client = init()?;
        clients.insert(device.clone(), client.clone());
        Ok(client)
    }

    /// Register the compute client for the given device, replacing any cached one.
    pub fn register(&self, device: &Device, client: ComputeClient) {
        let mut clients = self.clients.lock();
        clients
            .deref_mut()
            .get_or_insert_with(HashMap::new)
            .insert(device.clone(), client);
    }
}

static RUNTIME: ComputeRuntime<CpuDevice> = ComputeRuntime::new();

/// Runtime executing kernels on [CpuDevice] workers.
#[derive(Debug)]
pub struct CpuRuntime;

impl CpuRuntime {
    /// Retrieve the compute client of the device, creating it from the global config if needed.
    pub fn client(device: &CpuDevice) -> Result<ComputeClient, DeviceError> {
        RUNTIME.client(device, || {
            let options = ClientOptions::from_config(&GlobalConfig::get());
            ComputeClient::new(device.clone(), options)
        })
    }

    /// Retrieve the compute client of the default device.
    pub fn default_client() -> Result<ComputeClient, DeviceError> {
        Self::client(&CpuDevice::default())
    }

    /// Use `client` for every later lookup of `device`.
    pub fn register(device: &CpuDevice, client: ComputeClient) {
        RUNTIME.register(device, client)
    }
}
