mod config;
pub mod database;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::{Result, StorageError};

/// String key-value storage backing the session state.
pub trait KvStore {
    /// Get a value, `None` when the key was never written.
    fn kv_get(&self, key: &str) -> Result<Option<String>>;

    /// Insert or replace a value.
    fn kv_set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove every key starting with `prefix`, returning how many went.
    fn kv_clear_prefix(&self, prefix: &str) -> Result<usize>;
}

impl<T: KvStore + ?Sized> KvStore for &T {
    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        (**self).kv_set(key, value)
    }

    fn kv_clear_prefix(&self, prefix: &str) -> Result<usize> {
        (**self).kv_clear_prefix(prefix)
    }
}

/// Returns `~/.config/nightduty[-dev]/` based on NIGHTDUTY_ENV.
///
/// Set NIGHTDUTY_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("NIGHTDUTY_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("nightduty-dev")
    } else {
        base_dir.join("nightduty")
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}
