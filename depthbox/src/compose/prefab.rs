use super::{check_not_template, load_template};
use crate::{RendererBinding, ResourceError, SkyboxError};
use bevy_ecs::entity::Entity;
use depthbox_assets::{Artifact, AssetDatabase, AssetPath, AssetPersistor};
use depthbox_scene::WorkingScene;

/// Authors skybox prefabs from a base prefab.
///
/// Composing runs in two phases. The base is instantiated transiently, the material is bound at
/// the configured renderer, and the result is persisted before the transient copy goes away.
/// The live copy is then instantiated from what the database holds, not from memory.
#[derive(Debug, Clone, Default)]
pub struct PrefabComposer {
    binding: RendererBinding,
}

impl PrefabComposer {
    pub fn new(binding: RendererBinding) -> Self {
        Self { binding }
    }

    pub fn compose(
        &self,
        scene: &mut WorkingScene,
        persistor: &AssetPersistor,
        base: &AssetPath,
        material: &AssetPath,
        out: &AssetPath,
    ) -> Result<Entity, SkyboxError> {
        self.author(scene, persistor, base, material, out)?;
        Self::materialize(scene, persistor.database().as_ref(), out)
    }

    /// Persists `base` with `material` bound at the binding point as `out`
    pub fn author(
        &self,
        scene: &mut WorkingScene,
        persistor: &AssetPersistor,
        base: &AssetPath,
        material: &AssetPath,
        out: &AssetPath,
    ) -> Result<(), SkyboxError> {
        check_not_template(base, out)?;
        let prefab = load_template(persistor.database().as_ref(), base, Artifact::into_prefab)?;
        let unbound = |source| ResourceError::MissingBindingPoint {
            template: base.clone(),
            source,
        };

        let mut transient = scene.transient(&prefab);
        let root = transient.root();
        let node = transient
            .find_node(root, &self.binding.node)
            .map_err(unbound)?;
        transient
            .set_material(node, self.binding.material_index, material.clone())
            .map_err(unbound)?;
        let authored = transient.to_prefab(root).map_err(unbound)?;
        persistor
            .create_or_replace(authored, out)
            .map_err(|source| SkyboxError::persist(out, source))?;
        Ok(())
    }

    /// Instantiates the persisted prefab at `path` into the scene
    pub fn materialize(
        scene: &mut WorkingScene,
        database: &dyn AssetDatabase,
        path: &AssetPath,
    ) -> Result<Entity, SkyboxError> {
        database.refresh().map_err(SkyboxError::Database)?;
        let prefab = database
            .load(path)
            .map_err(SkyboxError::Database)?
            .ok_or_else(|| {
                SkyboxError::Database(anyhow::anyhow!("{path} vanished after being persisted"))
            })?
            .into_prefab(path)
            .map_err(|err| SkyboxError::Database(err.into()))?;
        let live = scene.instantiate(&prefab, Some(path.clone()));
        tracing::debug!("Instantiated {} as {:?}", path, live);
        Ok(live)
    }
}
