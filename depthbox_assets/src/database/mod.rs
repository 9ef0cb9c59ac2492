use crate::{Artifact, AssetPath};
use std::path::Path;

mod fs;
mod memory;

pub use fs::FsAssetDatabase;
pub use memory::MemoryAssetDatabase;

/// The host's asset store. The pipeline only ever talks to this trait.
///
/// `create` refuses occupied paths; replacing an artifact is always an explicit delete followed by
/// a create, see [`crate::AssetPersistor`].
pub trait AssetDatabase: Send + Sync {
    /// Load whatever artifact lives at `path`, [`None`] if the path is free
    fn load(&self, path: &AssetPath) -> anyhow::Result<Option<Artifact>>;

    fn create(&self, artifact: &Artifact, path: &AssetPath) -> anyhow::Result<()>;

    /// Returns whether an artifact was removed
    fn delete(&self, path: &AssetPath) -> anyhow::Result<bool>;

    /// Drop cached state so later loads observe the backing store
    fn refresh(&self) -> anyhow::Result<()>;

    fn create_folder(&self, dir: &Path) -> anyhow::Result<()>;

    fn folder_exists(&self, dir: &Path) -> bool;

    /// Every artifact directly inside `dir`, sorted
    fn list(&self, dir: &Path) -> anyhow::Result<Vec<AssetPath>>;
}
