use bevy_ecs::prelude::*;
use depthbox_assets::AssetPath;

#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct NodeName(pub String);

/// Places a node inside an instance
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeOf {
    /// Root entity of the owning instance, the root points at itself
    pub root: Entity,
    pub parent: Option<Entity>,
    /// Position among the parent's children
    pub sibling: usize,
}

/// Marks the root of an instantiated prefab
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct PrefabInstance {
    /// Persisted prefab this instance was created from, [`None`] for unsaved copies
    pub source: Option<AssetPath>,
}
