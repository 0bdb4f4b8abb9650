use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Key that arms, starts and stops the timer
    pub control_key: char,
    /// `tracing` filter directives, used when no env override is set
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            control_key: ' ',
            log_filter: None,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.control_key.is_control() {
            return Err(Error::InvalidControlKey(self.control_key));
        }
        Ok(())
    }

    /// Human name of the control key for hints
    pub fn control_key_name(&self) -> String {
        key_name(self.control_key)
    }
}

pub fn key_name(key: char) -> String {
    match key {
        ' ' => "space".to_string(),
        c => c.to_string(),
    }
}

pub trait ConfigStore {
    /// A missing file yields the defaults.
    fn load(&self) -> Result<Config>;
    fn save(&self, cfg: &Config) -> Result<()>;
}

/// Load the stored config, or the defaults when the file cannot be read or
/// holds a key the timer cannot use. The error comes back alongside so it
/// can be reported once logging is up.
pub fn load_or_default(store: &impl ConfigStore) -> (Config, Option<Error>) {
    match store.load().and_then(|cfg| cfg.validate().map(|()| cfg)) {
        Ok(cfg) => (cfg, None),
        Err(err) => (Config::default(), Some(err)),
    }
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Result<Config> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice::<Config>(&bytes).map_err(|source| Error::Config {
                path: self.path.clone(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Config::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, cfg: &Config) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).map_err(|source| Error::Config {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}
