//! Runtime configuration read from the environment.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

/// Where save slots live and which one is active.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub save_dir: PathBuf,
    /// One save file per profile.
    pub profile: String,
    /// Slot whose unlocks gate the sandbox.
    pub slot: String,
    /// TOML file with the host's reserved type names.
    pub host_catalog: Option<PathBuf>,
}

impl RuntimeConfig {
    pub const DEFAULT_PROFILE: &'static str = "default";
    pub const DEFAULT_SLOT: &'static str = "sav";

    /// Loads configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `CONTENT_SAVE_DIR` - Directory for save files (default: platform data dir)
    /// - `CONTENT_SAVE_PROFILE` - Save profile name (default: `default`)
    /// - `CONTENT_SLOT` - Active save slot (default: `sav`)
    /// - `CONTENT_HOST_CATALOG` - Path to the host catalog TOML (default: none)
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(dir) = read_env::<PathBuf>("CONTENT_SAVE_DIR") {
            config.save_dir = dir;
        }
        if let Some(profile) = read_env::<String>("CONTENT_SAVE_PROFILE") {
            config.profile = profile;
        }
        if let Some(slot) = read_env::<String>("CONTENT_SLOT") {
            config.slot = slot;
        }
        config.host_catalog = read_env::<PathBuf>("CONTENT_HOST_CATALOG");

        config
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            profile: Self::DEFAULT_PROFILE.to_string(),
            slot: Self::DEFAULT_SLOT.to_string(),
            host_catalog: None,
        }
    }
}

/// Platform data directory, falling back to `./saves`.
///
/// - Linux: `~/.local/share/content-runtime/saves`
/// - macOS: `~/Library/Application Support/content-runtime/saves`
/// - Windows: `%APPDATA%\content-runtime\data\saves`
fn default_save_dir() -> PathBuf {
    directories::ProjectDirs::from("", "", "content-runtime")
        .map(|dirs| dirs.data_dir().join("saves"))
        .unwrap_or_else(|| PathBuf::from("./saves"))
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    let value = env::var(key).ok()?;
    if value.trim().is_empty() {
        return None;
    }
    value.parse().ok()
}
