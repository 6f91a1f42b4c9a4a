use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;
use std::sync::{RwLockReadGuard, RwLockWriteGuard};

use config::{Environment, Source};
use lazy_static::lazy_static;

use super::error::Result;

static DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/resources/default_config.toml"));

/// A new type to impl `config::Source`
#[derive(Debug, Clone, serde::Deserialize)]
struct Preset(HashMap<String, config::Value>);

impl config::Source for Preset {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> std::result::Result<HashMap<String, config::Value>, config::ConfigError> {
        let mut kv = self.0.clone();
        // make sure it's not getting endlessly recursive
        kv.remove("presets");
        Ok(kv)
    }
}

/// Layered application config: built-in defaults, then user file, then env
pub struct AppConfig(config::Config);

impl AppConfig {
    pub(crate) fn new() -> Self {
        Self(config::Config::new())
    }

    pub fn setup(&mut self) -> Result<&mut Self> {
        self.0
            .merge(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))?;
        self.use_env()
    }

    /// Env variables like `SCHEDSIM_SJF__IDLE_ADVANCE=tick`
    fn use_env(&mut self) -> Result<&mut Self> {
        self.0
            .merge(Environment::with_prefix("SCHEDSIM").separator("__"))?;
        Ok(self)
    }

    /// Load config from a file. Env variables still take precedence.
    pub fn use_file(&mut self, path: &Path) -> Result<&mut Self> {
        self.0.merge(config::File::from(path))?;
        self.use_env()
    }

    /// Merge `presets.<name>` on top of the current values
    pub fn use_preset(&mut self, name: &str) -> Result<&mut Self> {
        let preset: Preset = self.get(format!("presets.{}", name))?;
        self.0.merge(preset)?;
        Ok(self)
    }

    /// Get a single value and deserialize to the given type
    pub fn get<T, K>(&self, key: K) -> Result<T>
    where
        // the lock on CONFIG is released before returning, so T can not borrow from it
        T: serde::de::DeserializeOwned,
        K: AsRef<str>,
    {
        Ok(self.0.get(key.as_ref())?)
    }

    /// Deserialize the whole config tree to the given type
    pub fn fetch<T>(&self) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let t = self.0.clone().try_into()?;
        Ok(t)
    }
}

lazy_static! {
    /// global AppConfig instance
    static ref CONFIG: RwLock<AppConfig> = RwLock::new(AppConfig::new());
}

/// Load defaults and env, then the optional user file
pub fn setup(file: Option<&Path>) -> Result<()> {
    let mut cfg = config_mut();
    cfg.setup()?;
    if let Some(path) = file {
        cfg.use_file(path)?;
    }
    Ok(())
}

/// global AppConfig instance
pub fn config() -> RwLockReadGuard<'static, AppConfig> {
    // a poisoned lock only means some thread panicked while merging, values are still readable
    CONFIG.read().unwrap_or_else(|e| e.into_inner())
}

/// mutable global AppConfig instance
pub fn config_mut() -> RwLockWriteGuard<'static, AppConfig> {
    CONFIG.write().unwrap_or_else(|e| e.into_inner())
}

pub mod prelude {
    pub use super::{config, config_mut};
}
