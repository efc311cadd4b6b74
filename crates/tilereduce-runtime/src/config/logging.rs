/// Configuration for the logs emitted around kernel launches.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct LoggingConfig {
    /// How much is logged for each launch.
    #[serde(default)]
    pub launch: LaunchLogLevel,
}

/// Verbosity of launch logs, emitted through the `log` crate.
#[derive(Default, Clone, Copy, Debug, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum LaunchLogLevel {
    /// Nothing is logged.
    #[serde(rename = "disabled")]
    Disabled,
    /// One debug line per launch.
    #[default]
    #[serde(rename = "basic")]
    Basic,
    /// A trace report with cubes, units, barriers and timing after every launch.
    #[serde(rename = "full")]
    Full,
}
