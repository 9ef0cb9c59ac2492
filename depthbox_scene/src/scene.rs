use crate::{NodeName, NodeOf, PrefabInstance, SceneErrors, TransientInstance};
use bevy_ecs::prelude::*;
use depthbox_assets::{AssetPath, MeshRenderer, Prefab, SceneNode, Transform};

/// The editable scene hosting prefab instances.
///
/// Every node of an instance is its own entity carrying [`NodeName`], [`Transform`], [`NodeOf`]
/// and, when it renders, a [`MeshRenderer`]. The root also carries [`PrefabInstance`].
#[derive(Default)]
pub struct WorkingScene {
    world: World,
}

impl WorkingScene {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a copy of `prefab`, returning the root entity
    pub fn instantiate(&mut self, prefab: &Prefab, source: Option<AssetPath>) -> Entity {
        let root = self.world.spawn(PrefabInstance { source }).id();
        self.spawn_node(&prefab.root, root, root, None, 0);
        root
    }

    fn spawn_node(
        &mut self,
        node: &SceneNode,
        entity: Entity,
        root: Entity,
        parent: Option<Entity>,
        sibling: usize,
    ) {
        {
            let mut entity_mut = self.world.entity_mut(entity);
            entity_mut.insert((
                NodeName(node.name.clone()),
                node.transform,
                NodeOf {
                    root,
                    parent,
                    sibling,
                },
            ));
            if let Some(renderer) = &node.renderer {
                entity_mut.insert(renderer.clone());
            }
        }
        for (index, child) in node.children.iter().enumerate() {
            let child_entity = self.world.spawn_empty().id();
            self.spawn_node(child, child_entity, root, Some(entity), index);
        }
    }

    /// Spawn a copy of `prefab` that is despawned once the returned guard drops
    pub fn transient(&mut self, prefab: &Prefab) -> TransientInstance<'_> {
        let root = self.instantiate(prefab, None);
        TransientInstance::new(self, root)
    }

    /// Despawn every node of the instance rooted at `root`, returning how many were removed
    pub fn despawn_instance(&mut self, root: Entity) -> usize {
        let mut query = self.world.query::<(Entity, &NodeOf)>();
        let nodes: Vec<Entity> = query
            .iter(&self.world)
            .filter(|(_, node_of)| node_of.root == root)
            .map(|(entity, _)| entity)
            .collect();
        nodes
            .into_iter()
            .filter(|entity| self.world.despawn(*entity))
            .count()
    }

    pub fn is_instance(&self, root: Entity) -> bool {
        self.world.get::<PrefabInstance>(root).is_some()
    }

    pub fn source_of(&self, root: Entity) -> Option<&AssetPath> {
        self.world
            .get::<PrefabInstance>(root)
            .and_then(|instance| instance.source.as_ref())
    }

    /// Roots of every live instance created from `source`
    pub fn instances_of(&mut self, source: &AssetPath) -> Vec<Entity> {
        let mut query = self.world.query::<(Entity, &PrefabInstance)>();
        query
            .iter(&self.world)
            .filter(|(_, instance)| instance.source.as_ref() == Some(source))
            .map(|(entity, _)| entity)
            .collect()
    }

    pub fn instance_count(&mut self) -> usize {
        let mut query = self.world.query::<&PrefabInstance>();
        query.iter(&self.world).count()
    }

    fn children_of(&mut self, parent: Entity) -> Vec<Entity> {
        let mut query = self.world.query::<(Entity, &NodeOf)>();
        let mut children: Vec<(usize, Entity)> = query
            .iter(&self.world)
            .filter(|(_, node_of)| node_of.parent == Some(parent))
            .map(|(entity, node_of)| (node_of.sibling, entity))
            .collect();
        children.sort();
        children.into_iter().map(|(_, entity)| entity).collect()
    }

    /// Resolve a `/` separated path of node names below `root`, the first sibling wins on
    /// duplicate names
    pub fn find_node(&mut self, root: Entity, path: &str) -> Result<Entity, SceneErrors> {
        if !self.is_instance(root) {
            return Err(SceneErrors::NullInstance(root));
        }
        let mut current = root;
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current = self
                .children_of(current)
                .into_iter()
                .find(|child| {
                    self.world
                        .get::<NodeName>(*child)
                        .is_some_and(|name| name.0 == segment)
                })
                .ok_or_else(|| SceneErrors::NullNode(path.to_string()))?;
        }
        Ok(current)
    }

    pub fn set_material(
        &mut self,
        node: Entity,
        index: usize,
        material: AssetPath,
    ) -> Result<(), SceneErrors> {
        let mut renderer = self
            .world
            .get_mut::<MeshRenderer>(node)
            .ok_or(SceneErrors::NoRenderer(node))?;
        let len = renderer.materials.len();
        let slot = renderer
            .materials
            .get_mut(index)
            .ok_or(SceneErrors::MaterialIndex { index, len })?;
        *slot = Some(material);
        Ok(())
    }

    pub fn material_at(&self, node: Entity, index: usize) -> Option<AssetPath> {
        self.world
            .get::<MeshRenderer>(node)?
            .materials
            .get(index)?
            .clone()
    }

    /// Rebuild the node tree of an instance from its components
    pub fn to_prefab(&mut self, root: Entity) -> Result<Prefab, SceneErrors> {
        if !self.is_instance(root) {
            return Err(SceneErrors::NullInstance(root));
        }
        Ok(Prefab::new(self.to_node(root)))
    }

    fn to_node(&mut self, entity: Entity) -> SceneNode {
        let name = self
            .world
            .get::<NodeName>(entity)
            .map(|name| name.0.clone())
            .unwrap_or_default();
        let transform = self
            .world
            .get::<Transform>(entity)
            .copied()
            .unwrap_or_default();
        let renderer = self.world.get::<MeshRenderer>(entity).cloned();
        let children = self
            .children_of(entity)
            .into_iter()
            .map(|child| self.to_node(child))
            .collect();
        SceneNode {
            name,
            transform,
            renderer,
            children,
        }
    }
}
