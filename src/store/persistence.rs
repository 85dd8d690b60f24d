// ABOUTME: File-backed store of named saved layouts, one JSON file per record
// Records outlive sessions; their bindings are resolved against live sessions when applied

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::layout::{LayoutError, SavedLayout};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid layout JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid layout '{name}': {source}")]
    InvalidLayout {
        name: String,
        #[source]
        source: LayoutError,
    },

    #[error("Layout name must not be empty")]
    EmptyName,

    #[error("Layout not found: {0}")]
    NotFound(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedLayout {
    pub id: Uuid,
    pub name: String,
    pub layout: SavedLayout,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NamedLayout {
    pub fn new(name: impl Into<String>, layout: SavedLayout) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            layout,
            shortcut: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_shortcut(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut = Some(shortcut.into());
        self
    }
}

pub struct LayoutStore {
    storage_path: PathBuf,
}

impl LayoutStore {
    /// Open (and create if needed) the store directory.
    pub fn open(storage_path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let storage_path = storage_path.into();
        fs::create_dir_all(&storage_path)?;
        Ok(Self { storage_path })
    }

    pub fn path(&self) -> &Path {
        &self.storage_path
    }

    fn record_path(&self, id: Uuid) -> PathBuf {
        self.storage_path.join(format!("{}.json", id))
    }

    /// Save a layout. A record with the same name is replaced and keeps its id
    /// and creation time. A shortcut held by another record moves to this one.
    pub fn save(&self, mut record: NamedLayout) -> Result<NamedLayout, StoreError> {
        if record.name.trim().is_empty() {
            return Err(StoreError::EmptyName);
        }
        record.layout.validate().map_err(|source| StoreError::InvalidLayout {
            name: record.name.clone(),
            source,
        })?;

        if let Some(existing) = self.find_by_name(&record.name)? {
            debug!("replacing layout '{}' ({})", existing.name, existing.id);
            record.id = existing.id;
            record.created_at = existing.created_at;
        }

        if let Some(shortcut) = record.shortcut.as_deref() {
            for mut other in self.list()? {
                if other.id != record.id && other.shortcut.as_deref() == Some(shortcut) {
                    info!("moving shortcut '{}' from '{}' to '{}'", shortcut, other.name, record.name);
                    other.shortcut = None;
                    fs::write(self.record_path(other.id), serde_json::to_string_pretty(&other)?)?;
                }
            }
        }

        let json = serde_json::to_string_pretty(&record)?;
        fs::write(self.record_path(record.id), json)?;
        info!("saved layout '{}' with {} panes", record.name, record.layout.pane_count());

        Ok(record)
    }

    /// Load all stored layouts, oldest first. Unreadable or invalid files are skipped.
    pub fn list(&self) -> Result<Vec<NamedLayout>, StoreError> {
        let mut layouts = Vec::new();

        if !self.storage_path.exists() {
            return Ok(layouts);
        }

        for entry in fs::read_dir(&self.storage_path)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match fs::read_to_string(&path) {
                Ok(content) => match serde_json::from_str::<NamedLayout>(&content) {
                    Ok(record) => match record.layout.validate() {
                        Ok(()) => layouts.push(record),
                        Err(e) => warn!("Skipping layout file {:?}: {}", path, e),
                    },
                    Err(e) => {
                        warn!("Failed to parse layout file {:?}: {}", path, e);
                    }
                },
                Err(e) => {
                    warn!("Failed to read layout file {:?}: {}", path, e);
                }
            }
        }

        layouts.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name)));
        Ok(layouts)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<NamedLayout>, StoreError> {
        Ok(self.list()?.into_iter().find(|l| l.name == name))
    }

    pub fn find_by_shortcut(&self, shortcut: &str) -> Result<Option<NamedLayout>, StoreError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|l| l.shortcut.as_deref() == Some(shortcut)))
    }

    /// Delete a layout by name.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let record = self
            .find_by_name(name)?
            .ok_or_else(|| StoreError::NotFound(name.to_string()))?;
        let path = self.record_path(record.id);
        if path.exists() {
            fs::remove_file(path)?;
        }
        info!("deleted layout '{}'", name);
        Ok(())
    }
}
