use super::Result;
use crate::api::client::DEFAULT_TIMEOUT_SECS;
use crate::controller::movies::DEFAULT_SEARCH_DEBOUNCE;
use crate::error::{ConfigError, StorageError};
use crate::utils::validation::{parse_positive_u64, validate_url};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_PROFILE: &str = "default";
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

const APP_DIR: &str = "movie-catalog";
const CONFIG_FILE: &str = "config.toml";

/// Keys accepted by `config set`.
pub const CONFIG_KEYS: [&str; 4] = [
    "api_url",
    "image_base_url",
    "timeout_seconds",
    "debounce_millis",
];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub default_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Profile {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    pub timeout_seconds: Option<u64>,
    pub debounce_millis: Option<u64>,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            image_base_url: default_image_base_url(),
            timeout_seconds: None,
            debounce_millis: None,
        }
    }
}

impl Profile {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECS)
    }

    pub fn debounce(&self) -> Duration {
        self.debounce_millis
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_SEARCH_DEBOUNCE)
    }

    /// Validates and applies one `key = value` setting.
    pub fn set_value(&mut self, key: &str, value: &str) -> std::result::Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidValue {
            field: key.to_string(),
            value: value.to_string(),
            reason,
        };

        match key {
            "api_url" | "image_base_url" => {
                let url = value.trim().trim_end_matches('/').to_string();
                validate_url(&url).map_err(|e| invalid(e.to_string()))?;
                if key == "api_url" {
                    self.api_url = url;
                } else {
                    self.image_base_url = url;
                }
            }
            "timeout_seconds" => {
                let seconds = parse_positive_u64(key, value).map_err(|e| invalid(e.to_string()))?;
                self.timeout_seconds = Some(seconds);
            }
            "debounce_millis" => {
                let millis = parse_positive_u64(key, value).map_err(|e| invalid(e.to_string()))?;
                self.debounce_millis = Some(millis);
            }
            _ => {
                return Err(ConfigError::UnknownKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        let mut profiles = BTreeMap::new();
        profiles.insert(DEFAULT_PROFILE.to_string(), Profile::default());
        Self {
            default_profile: Some(DEFAULT_PROFILE.to_string()),
            profiles,
        }
    }
}

impl Config {
    /// Loads the config at `path`, or the per-user location when `None`.
    /// A missing file yields [`Config::default`].
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path(None)?,
        };

        if !config_path.exists() {
            debug!("no config at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|e| StorageError::ConfigParseError {
                message: format!("{}: {}", config_path.display(), e),
            })?;

        debug!(
            "loaded {} profile(s) from {}",
            config.profiles.len(),
            config_path.display()
        );
        Ok(config)
    }

    pub fn save(&self, path: Option<PathBuf>) -> Result<()> {
        let config_path = match path {
            Some(p) => p,
            None => Self::config_file_path(None)?,
        };

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).map_err(|source| StorageError::FileIo {
                path: parent.to_string_lossy().to_string(),
                source,
            })?;
        }

        let toml_content = toml::to_string(self).map_err(|e| StorageError::ConfigSaveFailed {
            message: e.to_string(),
        })?;

        fs::write(&config_path, toml_content).map_err(|source| StorageError::FileIo {
            path: config_path.to_string_lossy().to_string(),
            source,
        })?;

        debug!("saved config to {}", config_path.display());
        Ok(())
    }

    /// `<dir>/config.toml` when a directory is given, otherwise
    /// `<user config dir>/movie-catalog/config.toml`.
    pub fn config_file_path(config_dir: Option<&Path>) -> Result<PathBuf> {
        match config_dir {
            Some(dir) => Ok(dir.join(CONFIG_FILE)),
            None => {
                let config_dir = dirs::config_dir().ok_or(StorageError::ConfigDirNotFound)?;
                Ok(config_dir.join(APP_DIR).join(CONFIG_FILE))
            }
        }
    }

    pub fn get_profile(&self, name: &str) -> Option<&Profile> {
        self.profiles.get(name)
    }

    pub fn set_profile(&mut self, name: String, profile: Profile) {
        self.profiles.insert(name, profile);
    }

    /// Name of the profile used when none is requested explicitly.
    pub fn active_profile_name(&self, requested: Option<&str>) -> String {
        requested
            .map(str::to_string)
            .or_else(|| self.default_profile.clone())
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    /// Resolves the profile to use. The built-in default profile is always available.
    pub fn active_profile(&self, requested: Option<&str>) -> std::result::Result<Profile, ConfigError> {
        let name = self.active_profile_name(requested);
        match self.get_profile(&name) {
            Some(profile) => Ok(profile.clone()),
            None if name == DEFAULT_PROFILE => Ok(Profile::default()),
            None => Err(ConfigError::ProfileNotFound { name }),
        }
    }

    /// Applies `key = value` to the named profile, creating it from defaults if needed.
    pub fn set_value(
        &mut self,
        profile_name: &str,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let mut profile = self.get_profile(profile_name).cloned().unwrap_or_default();
        profile.set_value(key, value)?;
        self.set_profile(profile_name.to_string(), profile);
        Ok(())
    }
}
