use crate::WorkingScene;
use bevy_ecs::entity::Entity;
use std::ops::{Deref, DerefMut};

/// An instance owned by whoever holds the guard. It is despawned when the guard drops, on every
/// exit path.
pub struct TransientInstance<'s> {
    scene: &'s mut WorkingScene,
    root: Entity,
}

impl<'s> TransientInstance<'s> {
    pub(crate) fn new(scene: &'s mut WorkingScene, root: Entity) -> Self {
        Self { scene, root }
    }

    #[inline]
    pub fn root(&self) -> Entity {
        self.root
    }
}

impl Deref for TransientInstance<'_> {
    type Target = WorkingScene;

    fn deref(&self) -> &Self::Target {
        self.scene
    }
}

impl DerefMut for TransientInstance<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.scene
    }
}

impl Drop for TransientInstance<'_> {
    fn drop(&mut self) {
        let despawned = self.scene.despawn_instance(self.root);
        tracing::trace!(
            "Released transient instance {:?} ({} nodes)",
            self.root,
            despawned
        );
    }
}

#[cfg(test)]
mod tests {
    use crate::{SceneErrors, WorkingScene};
    use depthbox_assets::{Prefab, SceneNode};

    #[test]
    fn dropping_the_guard_despawns() {
        let mut scene = WorkingScene::new();
        let prefab = Prefab::new(SceneNode::new("DepthSkybox").with_child(SceneNode::new("Sphere")));
        let root = {
            let mut transient = scene.transient(&prefab);
            let root = transient.root();
            assert_eq!(transient.to_prefab(root).unwrap(), prefab);
            root
        };
        assert_eq!(scene.instance_count(), 0);
        assert_eq!(scene.to_prefab(root), Err(SceneErrors::NullInstance(root)));
    }

    #[test]
    fn dropping_on_an_error_path_despawns() {
        fn fails(scene: &mut WorkingScene, prefab: &Prefab) -> Result<(), SceneErrors> {
            let mut transient = scene.transient(prefab);
            let root = transient.root();
            transient.find_node(root, "Missing")?;
            Ok(())
        }

        let mut scene = WorkingScene::new();
        let prefab = Prefab::new(SceneNode::new("DepthSkybox"));
        assert!(fails(&mut scene, &prefab).is_err());
        assert_eq!(scene.instance_count(), 0);
    }
}
