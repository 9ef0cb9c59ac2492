use bevy_ecs::entity::Entity;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneErrors {
    #[error("Entity {0:?} is not the root of a prefab instance")]
    NullInstance(Entity),
    #[error("No node at {0:?}")]
    NullNode(String),
    #[error("Node {0:?} has no mesh renderer")]
    NoRenderer(Entity),
    #[error("Material index {index} is out of range for a renderer with {len} materials")]
    MaterialIndex { index: usize, len: usize },
}
