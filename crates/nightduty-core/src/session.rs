//! Per-session state: memory, conversation history and typed persistence.
//!
//! Everything here is read at the start of a turn and written at the end.
//! Loads never fail: a missing or unreadable value is replaced by its
//! default and the problem is logged.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::registry::PsvRegistry;
use crate::storage::KvStore;

/// Key holding [`SessionMemory`].
pub const MEMORY_KEY: &str = "session.memory";
/// Key holding the conversation history.
pub const HISTORY_KEY: &str = "session.history";
/// Key holding the PSV registry.
pub const REGISTRY_KEY: &str = "session.registry";
/// Common prefix of every session key.
pub const SESSION_PREFIX: &str = "session.";

/// Version tag stamped on exported transcripts.
pub const EXPORT_VERSION: &str = concat!("v", env!("CARGO_PKG_VERSION"), "-conv");

/// Facts remembered across turns to fill in what the user leaves out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionMemory {
    /// Free-form local-time base reference (e.g. `SCL`, `UTC-3`).
    pub base_lt: String,
    /// Last departure station code seen.
    pub last_dep: String,
    /// Last arrival station code seen.
    pub last_arr: String,
}

impl SessionMemory {
    /// Fold a rule's context hints into memory. Empty hints leave the
    /// remembered value untouched.
    pub fn merge(&mut self, update: &ContextUpdate) {
        if let Some(dep) = update.last_dep.as_deref().filter(|s| !s.is_empty()) {
            self.last_dep = dep.to_string();
        }
        if let Some(arr) = update.last_arr.as_deref().filter(|s| !s.is_empty()) {
            self.last_arr = arr.to_string();
        }
    }

    pub fn has_route(&self) -> bool {
        !self.last_dep.is_empty() || !self.last_arr.is_empty()
    }
}

/// Hints a rule hands back for the session memory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_dep: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_arr: Option<String>,
}

impl ContextUpdate {
    pub fn route(dep: impl Into<String>, arr: impl Into<String>) -> Self {
        Self {
            last_dep: Some(dep.into()),
            last_arr: Some(arr.into()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.last_dep.is_none() && self.last_arr.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message of the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// Write-only transcript export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportSnapshot {
    pub exported_at: DateTime<Utc>,
    pub version: String,
    pub history: Vec<Turn>,
}

impl ExportSnapshot {
    pub fn new(history: Vec<Turn>, exported_at: DateTime<Utc>) -> Self {
        Self {
            exported_at,
            version: EXPORT_VERSION.to_string(),
            history,
        }
    }

    /// Pretty-printed JSON bytes, ready to be written to a file.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Suggested download name, `conv-psv-<epoch millis>.json`.
    pub fn file_name(&self) -> String {
        format!("conv-psv-{}.json", self.exported_at.timestamp_millis())
    }
}

/// Typed access to session values on top of a [`KvStore`].
pub struct SessionStore<S> {
    kv: S,
}

impl<S: KvStore> SessionStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn load_memory(&self) -> SessionMemory {
        self.load_or_default(MEMORY_KEY)
    }

    pub fn save_memory(&self, memory: &SessionMemory) -> Result<()> {
        self.save(MEMORY_KEY, memory)
    }

    pub fn load_history(&self) -> Vec<Turn> {
        self.load_or_default(HISTORY_KEY)
    }

    pub fn save_history(&self, history: &[Turn]) -> Result<()> {
        self.save(HISTORY_KEY, history)
    }

    pub fn load_registry(&self) -> PsvRegistry {
        self.load_or_default(REGISTRY_KEY)
    }

    pub fn save_registry(&self, registry: &PsvRegistry) -> Result<()> {
        self.save(REGISTRY_KEY, registry)
    }

    /// Drop every session value; later loads see defaults.
    pub fn clear(&self) -> Result<usize> {
        self.kv.kv_clear_prefix(SESSION_PREFIX)
    }

    fn load_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        let raw = match self.kv.kv_get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return T::default(),
            Err(e) => {
                tracing::warn!(key, error = %e, "session load failed, using default");
                return T::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(key, error = %e, "corrupt session value, using default");
            T::default()
        })
    }

    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.kv_set(key, &raw)
    }
}
