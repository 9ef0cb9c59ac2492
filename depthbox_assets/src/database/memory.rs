use super::AssetDatabase;
use crate::{Artifact, AssetErrors, AssetPath};
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use std::path::{Path, PathBuf};

/// Database living entirely in memory
#[derive(Debug, Default)]
pub struct MemoryAssetDatabase {
    artifacts: DashMap<AssetPath, Artifact>,
    folders: DashSet<PathBuf>,
}

impl MemoryAssetDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    fn insert_folder(&self, dir: &Path) {
        for ancestor in dir.ancestors().filter(|a| !a.as_os_str().is_empty()) {
            self.folders.insert(ancestor.to_path_buf());
        }
    }
}

impl AssetDatabase for MemoryAssetDatabase {
    fn load(&self, path: &AssetPath) -> anyhow::Result<Option<Artifact>> {
        Ok(self.artifacts.get(path).map(|a| a.value().clone()))
    }

    fn create(&self, artifact: &Artifact, path: &AssetPath) -> anyhow::Result<()> {
        if !path.is_valid() {
            return Err(AssetErrors::InvalidName(path.name().to_string()).into());
        }
        self.insert_folder(path.dir());
        match self.artifacts.entry(path.clone()) {
            Entry::Occupied(_) => Err(AssetErrors::Occupied(path.clone()).into()),
            Entry::Vacant(slot) => {
                slot.insert(artifact.clone());
                Ok(())
            }
        }
    }

    fn delete(&self, path: &AssetPath) -> anyhow::Result<bool> {
        Ok(self.artifacts.remove(path).is_some())
    }

    fn refresh(&self) -> anyhow::Result<()> {
        Ok(())
    }

    fn create_folder(&self, dir: &Path) -> anyhow::Result<()> {
        self.insert_folder(dir);
        Ok(())
    }

    fn folder_exists(&self, dir: &Path) -> bool {
        self.folders.contains(dir)
    }

    fn list(&self, dir: &Path) -> anyhow::Result<Vec<AssetPath>> {
        let mut paths: Vec<AssetPath> = self
            .artifacts
            .iter()
            .filter(|entry| entry.key().dir() == dir)
            .map(|entry| entry.key().clone())
            .collect();
        paths.sort();
        Ok(paths)
    }
}
