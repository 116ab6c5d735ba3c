use anyhow::{Context, Result};
use std::{env, path::PathBuf, sync::OnceLock, time::Duration};

/// Shell configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Garage door controller connection
    pub device: DeviceConfig,

    /// Location of persisted panel state
    pub paths: PathConfig,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    /// Base URL of the device, without trailing slash
    pub url: String,
    pub timeout: Duration,
    /// Endpoint receiving multipart firmware and filesystem images
    pub upload_path: String,
}

#[derive(Clone, Debug)]
pub struct PathConfig {
    /// JSON file holding the panel preferences, inside the data directory
    pub preferences_file: PathBuf,
}

impl AppConfig {
    /// Get or load the application configuration
    ///
    /// On first call the configuration is read from the environment; later
    /// calls return the cached instance.
    ///
    /// # Panics
    /// Panics if configuration loading fails. The panel cannot reach the
    /// device without a valid configuration.
    pub fn get() -> &'static Self {
        static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();
        APP_CONFIG.get_or_init(|| {
            Self::load(|key| env::var(key).ok()).expect("failed to load application configuration")
        })
    }

    /// Load the configuration from a variable lookup
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let device = DeviceConfig::load(&lookup)?;
        let paths = PathConfig::load(&lookup)?;

        Ok(Self { device, paths })
    }
}

impl DeviceConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("GARAGE_DEVICE_URL")
            .unwrap_or_else(|| "http://192.168.4.1".to_string())
            .trim_end_matches('/')
            .to_string();

        anyhow::ensure!(
            url.starts_with("http://") || url.starts_with("https://"),
            "failed to parse GARAGE_DEVICE_URL: expected an http(s) URL, got {url}"
        );

        let timeout = lookup("GARAGE_HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|| "10".to_string())
            .parse::<u64>()
            .context("failed to parse GARAGE_HTTP_TIMEOUT_SECS: invalid format")?;

        let upload_path = lookup("GARAGE_UPLOAD_PATH").unwrap_or_else(|| "/update".to_string());
        let upload_path = format!("/{}", upload_path.trim_start_matches('/'));

        Ok(Self {
            url,
            timeout: Duration::from_secs(timeout),
            upload_path,
        })
    }
}

impl PathConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let data_dir = match lookup("GARAGE_DATA_DIR") {
            Some(dir) => PathBuf::from(dir),
            None => lookup("HOME")
                .map(|home| PathBuf::from(home).join(".garage-panel"))
                .unwrap_or_else(|| env::temp_dir().join("garage-panel")),
        };

        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create data directory {data_dir:?}"))?;

        let preferences_file = data_dir.join("preferences.json");

        Ok(Self { preferences_file })
    }
}
