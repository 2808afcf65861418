use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use super::record::ProfileRecord;
use crate::core::error::{InstallerError, InstallerResult};
use crate::core::paths::PathResolver;

/// The launcher's `launcher_profiles.json`.
///
/// Only `profiles` is interpreted; every other top-level field, and every
/// profile entry other than the one being upserted, is kept as raw JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LauncherProfileRegistry {
    pub profiles: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl LauncherProfileRegistry {
    /// Inserts or replaces the entry for `record`, returning its key.
    pub fn upsert(&mut self, record: &ProfileRecord) -> serde_json::Result<String> {
        let key = record.registry_key();
        let value = serde_json::to_value(record)?;
        self.profiles.insert(key.clone(), value);
        Ok(key)
    }
}

/// Read-merge-write access to the registry file. No locking: concurrent
/// installers racing on the same file are not supported.
pub struct LauncherProfileStore {
    registry_path: PathBuf,
}

impl LauncherProfileStore {
    pub fn new(paths: &PathResolver) -> Self {
        Self::at(paths.profile_registry())
    }

    pub fn at(registry_path: impl Into<PathBuf>) -> Self {
        Self {
            registry_path: registry_path.into(),
        }
    }

    pub fn registry_path(&self) -> &Path {
        &self.registry_path
    }

    pub async fn read(&self) -> InstallerResult<LauncherProfileRegistry> {
        let raw = tokio::fs::read_to_string(&self.registry_path)
            .await
            .map_err(|e| self.unreadable(e.to_string()))?;
        serde_json::from_str(&raw).map_err(|e| self.unreadable(e.to_string()))
    }

    /// Writes the whole registry through a sibling temp file so an
    /// interrupted write never leaves a truncated registry behind.
    pub async fn write(&self, registry: &LauncherProfileRegistry) -> InstallerResult<()> {
        let json = serde_json::to_string_pretty(registry)
            .map_err(|e| self.write_failure(e.into()))?;

        let mut tmp_name = self
            .registry_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        tmp_name.push(".tmp");
        let tmp_path = self.registry_path.with_file_name(tmp_name);

        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(|source| self.write_failure(source))?;
        if let Err(source) = tokio::fs::rename(&tmp_path, &self.registry_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(self.write_failure(source));
        }
        Ok(())
    }

    /// Read, insert-or-replace one key, write back. Returns the key used.
    pub async fn upsert(&self, record: &ProfileRecord) -> InstallerResult<String> {
        let mut registry = self.read().await?;
        let key = registry
            .upsert(record)
            .map_err(|e| self.write_failure(e.into()))?;
        self.write(&registry).await?;
        info!("Registered launcher profile '{}' in {:?}", key, self.registry_path);
        Ok(key)
    }

    fn unreadable(&self, reason: String) -> InstallerError {
        InstallerError::RegistryUnreadable {
            path: self.registry_path.clone(),
            reason,
        }
    }

    fn write_failure(&self, source: std::io::Error) -> InstallerError {
        InstallerError::RegistryWriteFailure {
            path: self.registry_path.clone(),
            source,
        }
    }
}
