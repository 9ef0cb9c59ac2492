use crate::{Artifact, AssetDatabase, AssetPath};
use derivative::Derivative;
use std::sync::Arc;

/// Create-or-replace persistence over an [`AssetDatabase`].
///
/// Replacing is an unconditional delete followed by a create, never a merge with what was there
/// before, so at most one artifact ever occupies a path.
#[derive(Derivative, Clone)]
#[derivative(Debug)]
pub struct AssetPersistor {
    #[derivative(Debug = "ignore")]
    database: Arc<dyn AssetDatabase>,
}

impl AssetPersistor {
    pub fn new(database: Arc<dyn AssetDatabase>) -> Self {
        Self { database }
    }

    #[inline]
    pub fn database(&self) -> &Arc<dyn AssetDatabase> {
        &self.database
    }

    pub fn create_or_replace(
        &self,
        artifact: impl Into<Artifact>,
        path: &AssetPath,
    ) -> anyhow::Result<()> {
        let artifact = artifact.into();
        if self.database.delete(path)? {
            tracing::debug!("Replacing {:?} at {}", artifact.kind(), path);
        }
        self.database.create(&artifact, path)
    }
}
