use super::{logging::LoggingConfig, reduce::ReduceLimitsConfig, runtime::RuntimeConfig};
use std::sync::Arc;

/// Static mutex holding the global configuration, initialized as `None`.
static GLOBAL_CONFIG: spin::Mutex<Option<Arc<GlobalConfig>>> = spin::Mutex::new(None);

/// Represents the global configuration, combining runtime, reduction and logging settings.
#[derive(Default, Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct GlobalConfig {
    /// Configuration of the CPU device.
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Limits used to size reductions.
    #[serde(default)]
    pub reduce: ReduceLimitsConfig,

    /// Configuration of launch logs.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl GlobalConfig {
    /// Retrieves the current global configuration, loading it from the current directory if not set.
    ///
    /// If no configuration is set, it attempts to load one from `tilereduce.toml` in the current
    /// directory or its parents, then applies the environment overrides. If no file is found, a
    /// default configuration is used.
    pub fn get() -> Arc<Self> {
        let mut state = GLOBAL_CONFIG.lock();
        match state.as_ref() {
            Some(config) => config.clone(),
            None => {
                let config = Arc::new(Self::from_current_dir().override_from_env());
                *state = Some(config.clone());
                config
            }
        }
    }

    /// Sets the global configuration to the provided value.
    ///
    /// # Panics
    /// Panics if the configuration has already been set or read, as it cannot be overridden.
    ///
    /// # Warning
    /// This method must be called at the start of the program, before any calls to `get`.
    pub fn set(config: Self) {
        let mut state = GLOBAL_CONFIG.lock();
        if state.is_some() {
            panic!("Cannot set the global configuration multiple times.");
        }
        *state = Some(Arc::new(config));
    }

    /// Save the current configuration to the provided file path.
    pub fn save_default<P: AsRef<std::path::Path>>(path: P) -> std::io::Result<()> {
        let config = Self::get();
        let content = toml::to_string_pretty(config.as_ref())
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))?;
        std::fs::write(path, content)
    }

    /// Overrides configuration fields based on environment variables.
    pub fn override_from_env(mut self) -> Self {
        use super::logging::LaunchLogLevel;

        if let Ok(val) = std::env::var("TILEREDUCE_DEBUG_LOG") {
            match val.as_str() {
                "0" | "false" | "disabled" => self.logging.launch = LaunchLogLevel::Disabled,
                "basic" => self.logging.launch = LaunchLogLevel::Basic,
                "1" | "true" | "full" => self.logging.launch = LaunchLogLevel::Full,
                other => log::warn!("Ignoring unknown TILEREDUCE_DEBUG_LOG value {other:?}"),
            }
        }

        if let Some(num_threads) = parse_env("TILEREDUCE_NUM_THREADS") {
            self.runtime.num_threads = Some(num_threads);
        }
        if let Some(timeout) = parse_env("TILEREDUCE_LAUNCH_TIMEOUT_MS") {
            self.runtime.launch_timeout_ms = Some(timeout);
        }
        if let Some(max_units) = parse_env("TILEREDUCE_MAX_UNITS_PER_CUBE") {
            self.reduce.max_units_per_cube = max_units;
        }
        if let Some(max_cubes) = parse_env("TILEREDUCE_MAX_CUBE_COUNT") {
            self.reduce.max_cube_count = max_cubes;
        }

        self
    }

    /// Parse a configuration from its toml representation.
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    // Loads configuration from `tilereduce.toml` in the current directory or its parents.
    //
    // Traverses up the directory tree until a valid configuration file is found or the root is reached.
    // Returns a default configuration if no file is found.
    fn from_current_dir() -> Self {
        let Ok(mut dir) = std::env::current_dir() else {
            return Self::default();
        };

        loop {
            if let Some(config) = Self::from_file_path(dir.join("tilereduce.toml")) {
                return config;
            }

            if !dir.pop() {
                break;
            }
        }

        Self::default()
    }

    fn from_file_path<P: AsRef<std::path::Path>>(path: P) -> Option<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).ok()?;

        match Self::from_toml(&content) {
            Ok(config) => {
                log::debug!("Loaded configuration from {}", path.display());
                Some(config)
            }
            Err(err) => {
                log::warn!(
                    "The file {} doesn't have the right format, it is ignored => {err}",
                    path.display()
                );
                None
            }
        }
    }
}

fn parse_env<T: core::str::FromStr>(name: &str) -> Option<T> {
    let val = std::env::var(name).ok()?;
    match val.parse() {
        Ok(val) => Some(val),
        Err(_) => {
            log::warn!("Ignoring invalid value {val:?} for {name}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::logging::LaunchLogLevel;

    #[test_log::test]
    fn empty_file_uses_defaults() {
        let config = GlobalConfig::from_toml("").unwrap();

        assert_eq!(config.reduce.max_units_per_cube, 512);
        assert_eq!(config.reduce.max_cube_count, 64);
        assert_eq!(config.runtime.num_threads, None);
        assert_eq!(config.runtime.launch_timeout(), None);
        assert_eq!(config.logging.launch, LaunchLogLevel::Basic);
    }

    #[test_log::test]
    fn sections_are_parsed() {
        let config = GlobalConfig::from_toml(
            r#"
            [runtime]
            num_threads = 3
            launch_timeout_ms = 250

            [reduce]
            max_cube_count = 16

            [logging]
            launch = "full"
            "#,
        )
        .unwrap();

        assert_eq!(config.runtime.num_threads, Some(3));
        assert_eq!(
            config.runtime.launch_timeout(),
            Some(core::time::Duration::from_millis(250))
        );
        assert_eq!(config.reduce.max_cube_count, 16);
        assert_eq!(config.reduce.max_units_per_cube, 512);
        assert_eq!(config.logging.launch, LaunchLogLevel::Full);
    }

    #[test_log::test]
    #[serial_test::serial]
    fn environment_overrides_file() {
        std::env::set_var("TILEREDUCE_MAX_CUBE_COUNT", "8");
        std::env::set_var("TILEREDUCE_LAUNCH_TIMEOUT_MS", "not a number");
        std::env::set_var("TILEREDUCE_DEBUG_LOG", "0");

        let config = GlobalConfig::default().override_from_env();

        std::env::remove_var("TILEREDUCE_MAX_CUBE_COUNT");
        std::env::remove_var("TILEREDUCE_LAUNCH_TIMEOUT_MS");
        std::env::remove_var("TILEREDUCE_DEBUG_LOG");

        assert_eq!(config.reduce.max_cube_count, 8);
        assert_eq!(config.runtime.launch_timeout_ms, None);
        assert_eq!(config.logging.launch, LaunchLogLevel::Disabled);
    }

    #[test_log::test]
    fn bad_level_is_rejected() {
        assert!(GlobalConfig::from_toml("[logging]\nlaunch = \"loud\"").is_err());
    }
}
