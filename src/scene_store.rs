// THEORY:
// The `scene_store` module owns the collection of captured scenes and its
// durable form. Storage is deliberately simple: the full collection
// serializes to one JSON snapshot file, loaded on open and written on save.
// Scenes are small (a handful of freezes, each a few hundred KB of JPEG), so
// snapshot granularity beats the complexity of an incremental format.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;

use crate::core_modules::ids;
use crate::core_modules::records::{CaptureScene, Freeze};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("scene storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("scene snapshot is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no scene with id {0}")]
    UnknownScene(u64),
}

/// The collection of captured scenes, newest first, with optional JSON-file
/// persistence.
pub struct SceneStore {
    scenes: Vec<CaptureScene>,
    path: Option<PathBuf>,
}

impl SceneStore {
    /// A store with no durable backing; `save` is a no-op.
    pub fn in_memory() -> Self {
        Self {
            scenes: Vec::new(),
            path: None,
        }
    }

    /// Opens a store backed by a JSON snapshot file. A missing file is an
    /// empty store. Loading floors the id counter above every persisted id
    /// so fresh records never collide with loaded ones.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let scenes: Vec<CaptureScene> = if path.exists() {
            serde_json::from_str(&fs::read_to_string(&path)?)?
        } else {
            Vec::new()
        };

        if let Some(max_id) = max_persisted_id(&scenes) {
            ids::ensure_above(max_id);
        }
        log::info!("loaded {} scene(s) from {}", scenes.len(), path.display());

        Ok(Self {
            scenes,
            path: Some(path),
        })
    }

    /// Scenes in display order, newest first.
    pub fn scenes(&self) -> &[CaptureScene] {
        &self.scenes
    }

    /// Creates a scene and makes it the newest entry. Returns its id.
    pub fn create_scene(&mut self, name: impl Into<String>) -> u64 {
        let scene = CaptureScene::new(name);
        let id = scene.id;
        self.scenes.insert(0, scene);
        id
    }

    /// Appends a freeze to an existing scene.
    pub fn add_freeze(&mut self, scene_id: u64, freeze: Freeze) -> Result<(), StoreError> {
        let scene = self
            .scenes
            .iter_mut()
            .find(|scene| scene.id == scene_id)
            .ok_or(StoreError::UnknownScene(scene_id))?;
        scene.freezes.push(freeze);
        Ok(())
    }

    /// Removes a scene and everything it holds. Unknown ids are a no-op.
    pub fn delete_scene(&mut self, scene_id: u64) {
        self.scenes.retain(|scene| scene.id != scene_id);
    }

    /// Writes the snapshot. A no-op for in-memory stores.
    pub fn save(&self) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        fs::write(path, serde_json::to_string_pretty(&self.scenes)?)?;
        log::debug!("saved {} scene(s) to {}", self.scenes.len(), path.display());
        Ok(())
    }
}

fn max_persisted_id(scenes: &[CaptureScene]) -> Option<u64> {
    scenes
        .iter()
        .map(|scene| {
            let freeze_max = scene
                .freezes
                .iter()
                .map(|freeze| {
                    let color_max = freeze.palette.iter().map(|color| color.id).max();
                    freeze.id.max(color_max.unwrap_or(0))
                })
                .max();
            scene.id.max(freeze_max.unwrap_or(0))
        })
        .max()
}
