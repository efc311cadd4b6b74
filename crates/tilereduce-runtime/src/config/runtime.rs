use core::time::Duration;

/// Configuration of the CPU device workers.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct RuntimeConfig {
    /// Number of worker threads of the default device. Uses the available parallelism if unset.
    #[serde(default)]
    pub num_threads: Option<usize>,

    /// Watchdog limit for a single launch, in milliseconds. No limit if unset.
    #[serde(default)]
    pub launch_timeout_ms: Option<u64>,
}

impl RuntimeConfig {
    /// The watchdog limit as a duration.
    pub fn launch_timeout(&self) -> Option<Duration> {
        self.launch_timeout_ms.map(Duration::from_millis)
    }
}
