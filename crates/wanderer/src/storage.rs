//! Persisted host state
//!
//! Two values survive a restart of the simulated computer: the computer
//! status and the environment variable map. They are kept in a key-value
//! [`HostStorage`] under fixed keys, separate from the filesystem tree,
//! which is rebuilt on every boot.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

/// Storage key of the computer status.
pub const COMPUTER_STATUS_KEY: &str = "computerStatus";

/// Storage key of the environment map.
pub const ENVS_KEY: &str = "envs";

/// Key-value store backing the host state. Values are JSON documents.
pub trait HostStorage: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;

    fn set(&mut self, key: &str, value: Value) -> Result<()>;

    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Storage that lives as long as the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: BTreeMap<String, Value>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HostStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Storage kept in a single JSON object file, rewritten on every change.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
    entries: BTreeMap<String, Value>,
}

impl JsonFileStorage {
    /// Open the store at `path`. A missing file starts an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let text = std::fs::read_to_string(&path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        let text = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl HostStorage for JsonFileStorage {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        self.flush()
    }
}

/// Power state of the simulated computer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ComputerStatus {
    #[default]
    Off,
    Booting,
    On,
}

impl From<ComputerStatus> for u8 {
    fn from(status: ComputerStatus) -> Self {
        match status {
            ComputerStatus::Off => 0,
            ComputerStatus::Booting => 1,
            ComputerStatus::On => 2,
        }
    }
}

impl TryFrom<u8> for ComputerStatus {
    type Error = String;

    fn try_from(value: u8) -> std::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(ComputerStatus::Off),
            1 => Ok(ComputerStatus::Booting),
            2 => Ok(ComputerStatus::On),
            other => Err(format!("unknown computer status {}", other)),
        }
    }
}

/// Typed view over a [`HostStorage`], with the environment cached in
/// memory and written through on every change.
pub struct HostState {
    storage: Box<dyn HostStorage>,
    envs: BTreeMap<String, String>,
}

impl HostState {
    /// Load the host state. An unreadable `envs` entry starts empty.
    pub fn load(storage: Box<dyn HostStorage>) -> Self {
        let envs = storage
            .get(ENVS_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        Self { storage, envs }
    }

    pub fn computer_status(&self) -> ComputerStatus {
        self.storage
            .get(COMPUTER_STATUS_KEY)
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default()
    }

    pub fn set_computer_status(&mut self, status: ComputerStatus) -> Result<()> {
        self.storage
            .set(COMPUTER_STATUS_KEY, serde_json::to_value(status)?)
    }

    /// Value of an environment variable.
    pub fn env(&self, name: &str) -> Option<&str> {
        self.envs.get(name).map(String::as_str)
    }

    /// All environment variables, sorted by name.
    pub fn envs(&self) -> &BTreeMap<String, String> {
        &self.envs
    }

    /// Set a variable. The cache changes only once the store accepted it.
    pub fn set_env(&mut self, name: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let mut next = self.envs.clone();
        next.insert(name.into(), value.into());
        self.commit_envs(next)
    }

    pub fn remove_env(&mut self, name: &str) -> Result<()> {
        let mut next = self.envs.clone();
        next.remove(name);
        self.commit_envs(next)
    }

    fn commit_envs(&mut self, next: BTreeMap<String, String>) -> Result<()> {
        self.storage.set(ENVS_KEY, serde_json::to_value(&next)?)?;
        self.envs = next;
        Ok(())
    }
}

impl Default for HostState {
    fn default() -> Self {
        Self::load(Box::new(MemoryStorage::new()))
    }
}

impl std::fmt::Debug for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostState")
            .field("envs", &self.envs)
            .finish_non_exhaustive()
    }
}
