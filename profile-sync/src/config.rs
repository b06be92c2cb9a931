use std::{
    fs,
    path::PathBuf,
    sync::{Arc, RwLock},
    time::Duration,
};

use log::{debug, info};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use serde_json::from_str;
use serde_with::{DurationMilliSeconds, serde_as};
use url::Url;

use crate::error::{Error, Result};

const APP_DIR: &str = "profile-sync";
const CONFIG_FILE: &str = "profile-sync/config.json";
const DEFAULT_API_BASE_URL: &str = "https://jsonplaceholder.typicode.com/";

// OnceCell rather than Lazy so that initialization can fail explicitly.
static CONFIG: OnceCell<Arc<RwLock<Config>>> = OnceCell::new();

#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub db_path: PathBuf,
    pub api_base_url: Url,
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub request_timeout: Duration,
    /// How long a removed follower can still be restored.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub undo_window: Duration,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_dir()
            .unwrap_or_else(PathBuf::new)
            .join(APP_DIR);
        Self {
            db_path: data_dir.join("profile.db"),
            api_base_url: Url::parse(DEFAULT_API_BASE_URL).expect("default base url is valid"),
            request_timeout: Duration::from_secs(10),
            undo_window: Duration::from_secs(4),
        }
    }
}

/// Explicit initialization, to be called once at application start.
///
/// Loads the config file from the known locations. When none exists a
/// default config is created and written to the local config directory.
///
/// # Errors
///
/// Fails when a config file exists but cannot be read or parsed, or when
/// writing the new default file fails.
pub fn init() -> Result<()> {
    let config = load_or_create()?;
    // Already set means another caller won the race; keep theirs.
    let _ = CONFIG.set(Arc::new(RwLock::new(config)));
    Ok(())
}

/// Returns the global config.
///
/// Never fails: without a prior `init()` it tries to load the file once
/// (without creating it) and falls back to the in-memory default.
pub fn get_config() -> Arc<RwLock<Config>> {
    CONFIG
        .get_or_init(|| {
            let config = load_from_files().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Replaces the global config and persists it to the local config dir.
pub fn save_config(config: &Config) -> Result<()> {
    let path = local_config_path();
    write_config(&path, config)?;
    *get_config().write()? = config.clone();
    info!("Config saved to {path:?}");
    Ok(())
}

fn local_config_path() -> PathBuf {
    dirs::config_local_dir()
        .unwrap_or_else(PathBuf::new)
        .join(CONFIG_FILE)
}

fn write_config(path: &PathBuf, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(config)?)?;
    Ok(())
}

fn load_from_files() -> Result<Config> {
    let config_path =
        find_config_file()?.ok_or(Error::Other("config file not found".to_string()))?;
    let content = fs::read_to_string(config_path)?;
    Ok(from_str(&content)?)
}

fn load_or_create() -> Result<Config> {
    if let Some(path) = find_config_file()? {
        debug!("Loading configuration from {path:?}");
        let content = fs::read_to_string(path)?;
        return Ok(from_str(&content)?);
    }

    let config = Config::default();
    let path = local_config_path();
    write_config(&path, &config)?;
    debug!("Default configuration file created at: {path:?}");

    Ok(config)
}

fn find_config_file() -> Result<Option<PathBuf>> {
    let exe_path = std::env::current_exe()?;
    let exe_dir = exe_path.parent().unwrap_or(&exe_path);

    let paths = [
        local_config_path(),
        dirs::config_dir().unwrap_or_default().join(CONFIG_FILE),
        exe_dir.join(CONFIG_FILE),
    ];

    Ok(paths.into_iter().find(|p| p.exists()))
}
