use anyhow::{Context, Result};
use garage_panel_core::{StorageOperation, StorageOutput};
use std::{collections::BTreeMap, path::PathBuf};

/// Durable string key/value store backed by a JSON file
#[derive(Clone, Debug)]
pub struct PreferenceStore {
    path: PathBuf,
}

impl PreferenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read all stored values; a missing file is an empty store.
    async fn load(&self) -> Result<BTreeMap<String, String>> {
        match tokio::fs::read(&self.path).await {
            Ok(content) => serde_json::from_slice(&content)
                .with_context(|| format!("failed to parse {:?}", self.path)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("failed to read {:?}", self.path)),
        }
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load().await?.remove(key))
    }

    pub async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self.load().await?;
        values.insert(key.to_string(), value.to_string());

        let content =
            serde_json::to_vec_pretty(&values).context("failed to serialize preferences")?;

        // write-then-rename keeps the previous file intact on failure
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, content)
            .await
            .with_context(|| format!("failed to write {tmp:?}"))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("failed to replace {:?}", self.path))
    }

    /// Execute a storage request from the core
    pub async fn execute(&self, operation: &StorageOperation) -> StorageOutput {
        let result = match operation {
            StorageOperation::Get { key } => self.get(key).await.map(StorageOutput::Value),
            StorageOperation::Set { key, value } => {
                self.set(key, value).await.map(|()| StorageOutput::Stored)
            }
        };

        result.unwrap_or_else(|e| {
            log::error!("preference store: {e:#}");
            StorageOutput::Error {
                message: format!("{e:#}"),
            }
        })
    }
}
